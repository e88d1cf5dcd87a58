//! Locale conventions used to build the format catalogs.
//!
//! Each entry captures the rendering conventions one locale applies to
//! numbers, percentages, currency amounts, dates and times: separators,
//! currency symbol placement, minor-unit digits, and strftime-style date and
//! time patterns. The catalog builder iterates this table and collapses
//! locales that render the canonical samples identically, so the table is
//! deliberately redundant; redundancy is what the deduplication is for.
//!
//! Patterns stick to plain numeric strftime directives (plus `%b` for
//! abbreviated month names) so the same pattern drives both rendering and
//! parsing through chrono.

/// Rendering conventions for one locale.
#[derive(Debug, Clone, Copy)]
pub struct LocaleSpec {
    /// Locale identifier, e.g. "de_DE".
    pub id: &'static str,
    /// Decimal separator.
    pub decimal_sep: char,
    /// Digit grouping separator.
    pub group_sep: char,
    /// Currency symbol (or ISO code where the locale conventionally uses one).
    pub currency_symbol: &'static str,
    /// Symbol precedes the amount.
    pub symbol_first: bool,
    /// A space separates symbol and amount (also used for the percent sign).
    pub symbol_spaced: bool,
    /// Minor-unit digits of the locale's currency.
    pub currency_frac: u32,
    /// strftime-style date pattern.
    pub date_fmt: &'static str,
    /// strftime-style time pattern.
    pub time_fmt: &'static str,
}

const fn l(
    id: &'static str,
    decimal_sep: char,
    group_sep: char,
    currency_symbol: &'static str,
    symbol_first: bool,
    symbol_spaced: bool,
    currency_frac: u32,
    date_fmt: &'static str,
    time_fmt: &'static str,
) -> LocaleSpec {
    LocaleSpec {
        id,
        decimal_sep,
        group_sep,
        currency_symbol,
        symbol_first,
        symbol_spaced,
        currency_frac,
        date_fmt,
        time_fmt,
    }
}

/// All locales the catalogs are built from.
pub fn all() -> &'static [LocaleSpec] {
    LOCALES
}

static LOCALES: &[LocaleSpec] = &[
    // English-speaking
    l("en_US", '.', ',', "$", true, false, 2, "%m/%d/%Y", "%I:%M:%S %p"),
    l("en_GB", '.', ',', "£", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("en_IE", '.', ',', "€", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("en_AU", '.', ',', "$", true, false, 2, "%d/%m/%Y", "%I:%M:%S %p"),
    l("en_NZ", '.', ',', "$", true, false, 2, "%d/%m/%Y", "%I:%M:%S %p"),
    l("en_CA", '.', ',', "$", true, false, 2, "%Y-%m-%d", "%I:%M:%S %p"),
    l("en_ZA", '.', ',', "R", true, true, 2, "%Y/%m/%d", "%H:%M:%S"),
    l("en_IN", '.', ',', "₹", true, false, 2, "%d/%m/%Y", "%I:%M:%S %p"),
    l("en_PH", '.', ',', "₱", true, false, 2, "%m/%d/%Y", "%I:%M:%S %p"),
    l("en_SG", '.', ',', "$", true, false, 2, "%d/%m/%Y", "%I:%M:%S %p"),
    l("en_HK", '.', ',', "HK$", true, false, 2, "%d/%m/%Y", "%I:%M:%S %p"),
    l("en_MT", '.', ',', "€", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("ga_IE", '.', ',', "€", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("cy_GB", '.', ',', "£", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("mt_MT", '.', ',', "€", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    // German-speaking
    l("de_DE", ',', '.', "€", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("de_AT", ',', '.', "€", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("de_LU", ',', '.', "€", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("de_BE", ',', '.', "€", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("de_CH", '.', '\'', "CHF", true, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    // French-speaking
    l("fr_FR", ',', ' ', "€", false, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("fr_BE", ',', '.', "€", false, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("fr_LU", ',', '.', "€", false, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("fr_CH", '.', '\'', "CHF", true, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("fr_CA", ',', ' ', "$", false, true, 2, "%Y-%m-%d", "%H:%M:%S"),
    // Dutch-speaking
    l("nl_NL", ',', '.', "€", true, true, 2, "%d-%m-%y", "%H:%M:%S"),
    l("nl_BE", ',', '.', "€", true, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    // Italian-speaking
    l("it_IT", ',', '.', "€", false, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("it_CH", '.', '\'', "CHF", true, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    // Iberia
    l("es_ES", ',', '.', "€", false, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("ca_ES", ',', '.', "€", false, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("eu_ES", ',', '.', "€", false, true, 2, "%Y/%m/%d", "%H:%M:%S"),
    l("gl_ES", ',', '.', "€", false, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("pt_PT", ',', ' ', "€", false, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    // Latin America
    l("pt_BR", ',', '.', "R$", true, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_MX", '.', ',', "$", true, false, 2, "%d/%m/%Y", "%I:%M:%S %p"),
    l("es_US", '.', ',', "$", true, false, 2, "%m/%d/%Y", "%I:%M:%S %p"),
    l("es_GT", '.', ',', "Q", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_HN", '.', ',', "L", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_NI", '.', ',', "C$", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_CR", ',', ' ', "₡", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_PA", '.', ',', "B/.", true, false, 2, "%m/%d/%Y", "%H:%M:%S"),
    l("es_DO", '.', ',', "RD$", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_SV", '.', ',', "$", true, false, 2, "%m/%d/%Y", "%H:%M:%S"),
    l("es_AR", ',', '.', "$", true, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_CL", ',', '.', "$", true, true, 0, "%d-%m-%Y", "%H:%M:%S"),
    l("es_CO", ',', '.', "$", true, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_VE", ',', '.', "Bs.", true, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_UY", ',', '.', "$", true, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_PY", ',', '.', "₲", true, true, 0, "%d/%m/%Y", "%H:%M:%S"),
    l("es_BO", ',', '.', "Bs", true, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_EC", ',', '.', "$", true, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("es_PE", '.', ',', "S/", true, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    // Nordics
    l("da_DK", ',', '.', "kr", false, true, 2, "%d-%m-%Y", "%H:%M:%S"),
    l("sv_SE", ',', ' ', "kr", false, true, 2, "%Y-%m-%d", "%H:%M:%S"),
    l("sv_FI", ',', ' ', "€", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("nb_NO", ',', ' ', "kr", true, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("nn_NO", ',', ' ', "kr", true, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("fi_FI", ',', ' ', "€", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("is_IS", ',', '.', "kr", false, true, 0, "%d.%m.%Y", "%H:%M:%S"),
    // Baltics
    l("et_EE", ',', ' ', "€", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("lv_LV", ',', ' ', "€", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("lt_LT", ',', ' ', "€", false, true, 2, "%Y.%m.%d", "%H:%M:%S"),
    // Central and Eastern Europe
    l("pl_PL", ',', ' ', "zł", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("cs_CZ", ',', ' ', "Kč", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("sk_SK", ',', ' ', "€", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("hu_HU", ',', ' ', "Ft", false, true, 0, "%Y.%m.%d", "%H:%M:%S"),
    l("ro_RO", ',', '.', "lei", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("bg_BG", ',', ' ', "лв", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("ru_RU", ',', ' ', "₽", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("uk_UA", ',', ' ', "₴", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("be_BY", ',', ' ', "Br", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("sr_RS", ',', '.', "дин", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("hr_HR", ',', '.', "€", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("sl_SI", ',', '.', "€", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("bs_BA", ',', '.', "KM", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("mk_MK", ',', '.', "ден", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("sq_AL", ',', ' ', "Lekë", false, true, 0, "%d.%m.%Y", "%H:%M:%S"),
    l("el_GR", ',', '.', "€", false, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("el_CY", ',', '.', "€", false, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("tr_TR", ',', '.', "₺", true, false, 2, "%d.%m.%Y", "%H:%M:%S"),
    l("kk_KZ", ',', ' ', "₸", false, true, 2, "%d.%m.%Y", "%H:%M:%S"),
    // Middle East and North Africa
    l("he_IL", '.', ',', "₪", false, true, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("ar_SA", '.', ',', "SAR", false, true, 2, "%d %b, %Y", "%H:%M:%S"),
    l("ar_EG", '.', ',', "EGP", false, true, 2, "%d %b, %Y", "%H:%M:%S"),
    l("ar_AE", '.', ',', "AED", false, true, 2, "%d %b, %Y", "%H:%M:%S"),
    l("ar_JO", '.', ',', "JOD", false, true, 3, "%d %b, %Y", "%H:%M:%S"),
    l("ar_LB", '.', ',', "LBP", false, true, 2, "%d %b, %Y", "%H:%M:%S"),
    l("ar_KW", '.', ',', "KWD", false, true, 3, "%d %b, %Y", "%H:%M:%S"),
    l("ar_QA", '.', ',', "QAR", false, true, 2, "%d %b, %Y", "%H:%M:%S"),
    l("ar_BH", '.', ',', "BHD", false, true, 3, "%d %b, %Y", "%H:%M:%S"),
    l("ar_OM", '.', ',', "OMR", false, true, 3, "%d %b, %Y", "%H:%M:%S"),
    l("ar_YE", '.', ',', "YER", false, true, 2, "%d %b, %Y", "%H:%M:%S"),
    l("ar_SY", '.', ',', "SYP", false, true, 2, "%d %b, %Y", "%H:%M:%S"),
    l("ar_IQ", '.', ',', "IQD", false, true, 3, "%d %b, %Y", "%H:%M:%S"),
    l("ar_LY", ',', '.', "LYD", false, true, 3, "%d %b, %Y", "%H:%M:%S"),
    l("ar_SD", '.', ',', "SDG", false, true, 2, "%d %b, %Y", "%H:%M:%S"),
    l("ar_MA", ',', '.', "MAD", false, true, 2, "%d %b, %Y", "%H:%M:%S"),
    l("ar_DZ", ',', '.', "DZD", false, true, 2, "%d %b, %Y", "%H:%M:%S"),
    l("ar_TN", ',', '.', "TND", false, true, 3, "%d %b, %Y", "%H:%M:%S"),
    // Africa
    l("af_ZA", ',', ' ', "R", true, true, 2, "%Y-%m-%d", "%H:%M:%S"),
    l("sw_KE", '.', ',', "KSh", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    // Asia
    l("ja_JP", '.', ',', "¥", true, false, 0, "%Y年%m月%d日", "%H時%M分%S秒"),
    l("ko_KR", '.', ',', "₩", true, false, 0, "%Y.%m.%d", "%H:%M:%S"),
    l("zh_CN", '.', ',', "¥", true, false, 2, "%Y年%m月%d日", "%H:%M:%S"),
    l("zh_TW", '.', ',', "NT$", true, false, 2, "%Y年%m月%d日", "%H:%M:%S"),
    l("zh_HK", '.', ',', "HK$", true, false, 2, "%d/%m/%Y", "%I:%M:%S %p"),
    l("zh_SG", '.', ',', "S$", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("vi_VN", ',', '.', "₫", false, true, 0, "%d/%m/%Y", "%H:%M:%S"),
    l("th_TH", '.', ',', "฿", true, false, 2, "%d/%m/%Y", "%H:%M:%S"),
    l("id_ID", ',', '.', "Rp", true, false, 0, "%d/%m/%Y", "%H:%M:%S"),
    l("ms_MY", '.', ',', "RM", true, false, 2, "%d/%m/%Y", "%I:%M:%S %p"),
    l("hi_IN", '.', ',', "₹", true, false, 2, "%d-%m-%Y", "%I:%M:%S %p"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn locale_ids_are_unique() {
        let mut seen = HashSet::new();
        for spec in all() {
            assert!(seen.insert(spec.id), "duplicate locale id {}", spec.id);
        }
    }

    #[test]
    fn separators_never_collide() {
        for spec in all() {
            assert_ne!(
                spec.decimal_sep, spec.group_sep,
                "locale {} uses one character for both separators",
                spec.id
            );
        }
    }

    #[test]
    fn table_covers_a_broad_locale_set() {
        assert!(all().len() >= 100);
    }
}
