//! Number, percent and currency formats.
//!
//! Each format owns a regex compiled from one locale's separator conventions
//! at catalog-build time. A window either matches the regex exactly (and is
//! then reduced to a numeric value) or it is a silent non-match; a window
//! that matches but fails numeric reduction indicates a defective format and
//! is a fatal error.

use regex::Regex;

use super::locales::LocaleSpec;
use super::{CatalogError, DetectedValue, FormatError, ValueFormat};

/// Canonical sample rendered by every number format for deduplication.
pub(crate) const NUMBER_SAMPLE: f64 = 1234.56;
/// Canonical sample for percent formats.
pub(crate) const PERCENT_SAMPLE: f64 = 12.34;
/// Canonical sample for currency formats.
pub(crate) const CURRENCY_SAMPLE: f64 = 12.0;

/// Render a value with locale separators and a fixed number of fraction digits.
fn render_grouped(value: f64, frac: u32, decimal: char, grouping: char) -> String {
    let formatted = format!("{:.*}", frac as usize, value);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 + 4);
    out.push_str(sign);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(grouping);
        }
        out.push(ch);
    }
    if let Some(f) = frac_part {
        out.push(decimal);
        out.push_str(f);
    }
    out
}

/// Unanchored regex body matching a number in the given separator convention:
/// an optional sign, digits either fully grouped in threes or ungrouped, and
/// an optional fraction part.
fn number_body(decimal: char, grouping: char) -> String {
    let g = regex::escape(&grouping.to_string());
    let d = regex::escape(&decimal.to_string());
    format!(r"[-+]?(?:\d{{1,3}}(?:{g}\d{{3}})+|\d+)(?:{d}\d+)?")
}

/// Reduce a matched number string to an f64.
///
/// The caller guarantees the string matched the locale's number regex, so a
/// failure here is a format defect, not a non-match.
fn numeric_value(text: &str, decimal: char, grouping: char) -> Result<f64, FormatError> {
    let mut cleaned = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == grouping || ch == '+' {
            continue;
        }
        if ch == decimal {
            cleaned.push('.');
        } else {
            cleaned.push(ch);
        }
    }
    cleaned.parse::<f64>().map_err(|e| FormatError::Malformed {
        input: text.to_string(),
        detail: e.to_string(),
    })
}

/// Plain number format for one locale's separator convention.
pub struct NumberFormat {
    decimal: char,
    grouping: char,
    pattern: Regex,
}

impl NumberFormat {
    pub fn new(spec: &LocaleSpec) -> Result<Self, CatalogError> {
        let body = number_body(spec.decimal_sep, spec.group_sep);
        let pattern = Regex::new(&format!("^{body}$")).map_err(|e| CatalogError::Regex {
            locale: spec.id,
            source: e,
        })?;
        Ok(Self {
            decimal: spec.decimal_sep,
            grouping: spec.group_sep,
            pattern,
        })
    }
}

impl ValueFormat for NumberFormat {
    fn canonical(&self) -> String {
        render_grouped(NUMBER_SAMPLE, 2, self.decimal, self.grouping)
    }

    fn parse(&self, text: &str) -> Result<Option<DetectedValue>, FormatError> {
        if !self.pattern.is_match(text) {
            return Ok(None);
        }
        let value = numeric_value(text, self.decimal, self.grouping)?;
        Ok(Some(DetectedValue::Number(value)))
    }
}

/// Percent format: a locale number followed by a percent sign.
///
/// Parsing tolerates both the spaced and unspaced sign; the locale's spacing
/// convention only affects the canonical rendering.
pub struct PercentFormat {
    decimal: char,
    grouping: char,
    spaced: bool,
    pattern: Regex,
}

impl PercentFormat {
    pub fn new(spec: &LocaleSpec) -> Result<Self, CatalogError> {
        let body = number_body(spec.decimal_sep, spec.group_sep);
        let pattern = Regex::new(&format!("^({body}) ?%$")).map_err(|e| CatalogError::Regex {
            locale: spec.id,
            source: e,
        })?;
        Ok(Self {
            decimal: spec.decimal_sep,
            grouping: spec.group_sep,
            spaced: spec.symbol_spaced,
            pattern,
        })
    }
}

impl ValueFormat for PercentFormat {
    fn canonical(&self) -> String {
        let number = render_grouped(PERCENT_SAMPLE, 2, self.decimal, self.grouping);
        if self.spaced {
            format!("{number} %")
        } else {
            format!("{number}%")
        }
    }

    fn parse(&self, text: &str) -> Result<Option<DetectedValue>, FormatError> {
        let captures = match self.pattern.captures(text) {
            Some(c) => c,
            None => return Ok(None),
        };
        let value = numeric_value(&captures[1], self.decimal, self.grouping)?;
        Ok(Some(DetectedValue::Percent(value)))
    }
}

/// Currency format: a locale number plus the locale's currency symbol in its
/// conventional position.
pub struct CurrencyFormat {
    decimal: char,
    grouping: char,
    symbol: String,
    symbol_first: bool,
    spaced: bool,
    frac: u32,
    pattern: Regex,
}

impl CurrencyFormat {
    pub fn new(spec: &LocaleSpec) -> Result<Self, CatalogError> {
        let body = number_body(spec.decimal_sep, spec.group_sep);
        let symbol = regex::escape(spec.currency_symbol);
        let raw = if spec.symbol_first {
            format!("^{symbol} ?({body})$")
        } else {
            format!("^({body}) ?{symbol}$")
        };
        let pattern = Regex::new(&raw).map_err(|e| CatalogError::Regex {
            locale: spec.id,
            source: e,
        })?;
        Ok(Self {
            decimal: spec.decimal_sep,
            grouping: spec.group_sep,
            symbol: spec.currency_symbol.to_string(),
            symbol_first: spec.symbol_first,
            spaced: spec.symbol_spaced,
            frac: spec.currency_frac,
            pattern,
        })
    }
}

impl ValueFormat for CurrencyFormat {
    fn canonical(&self) -> String {
        let amount = render_grouped(CURRENCY_SAMPLE, self.frac, self.decimal, self.grouping);
        let sep = if self.spaced { " " } else { "" };
        if self.symbol_first {
            format!("{}{}{}", self.symbol, sep, amount)
        } else {
            format!("{}{}{}", amount, sep, self.symbol)
        }
    }

    fn parse(&self, text: &str) -> Result<Option<DetectedValue>, FormatError> {
        let captures = match self.pattern.captures(text) {
            Some(c) => c,
            None => return Ok(None),
        };
        let amount = numeric_value(&captures[1], self.decimal, self.grouping)?;
        Ok(Some(DetectedValue::Currency {
            amount,
            symbol: self.symbol.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::locales;

    fn spec(id: &str) -> &'static LocaleSpec {
        locales::all()
            .iter()
            .find(|s| s.id == id)
            .expect("locale present")
    }

    #[test]
    fn render_grouped_variants() {
        assert_eq!(render_grouped(1234.56, 2, '.', ','), "1,234.56");
        assert_eq!(render_grouped(1234.56, 2, ',', '.'), "1.234,56");
        assert_eq!(render_grouped(1234.56, 2, ',', ' '), "1 234,56");
        assert_eq!(render_grouped(12.0, 0, '.', ','), "12");
        assert_eq!(render_grouped(1234567.0, 2, '.', ','), "1,234,567.00");
    }

    #[test]
    fn number_parses_grouped_and_plain() {
        let fmt = NumberFormat::new(spec("de_DE")).unwrap();
        assert_eq!(
            fmt.parse("1.234,56").unwrap(),
            Some(DetectedValue::Number(1234.56))
        );
        assert_eq!(fmt.parse("17").unwrap(), Some(DetectedValue::Number(17.0)));
        assert_eq!(
            fmt.parse("-3,5").unwrap(),
            Some(DetectedValue::Number(-3.5))
        );
        // Wrong-convention grouping does not match.
        assert_eq!(fmt.parse("1,234.56").unwrap(), None);
        // Partial grouping does not match.
        assert_eq!(fmt.parse("12.34,5").unwrap(), None);
        assert_eq!(fmt.parse("banana").unwrap(), None);
    }

    #[test]
    fn number_with_space_grouping_spans_tokens() {
        let fmt = NumberFormat::new(spec("fr_FR")).unwrap();
        assert_eq!(
            fmt.parse("1 234,56").unwrap(),
            Some(DetectedValue::Number(1234.56))
        );
    }

    #[test]
    fn percent_accepts_spaced_and_unspaced_sign() {
        let fmt = PercentFormat::new(spec("de_DE")).unwrap();
        assert_eq!(
            fmt.parse("12,34 %").unwrap(),
            Some(DetectedValue::Percent(12.34))
        );
        assert_eq!(
            fmt.parse("12,34%").unwrap(),
            Some(DetectedValue::Percent(12.34))
        );
        assert_eq!(fmt.parse("12,34").unwrap(), None);
        assert_eq!(fmt.canonical(), "12,34 %");
    }

    #[test]
    fn currency_prefix_and_suffix() {
        let usd = CurrencyFormat::new(spec("en_US")).unwrap();
        assert_eq!(usd.canonical(), "$12.00");
        assert_eq!(
            usd.parse("$12.00").unwrap(),
            Some(DetectedValue::Currency {
                amount: 12.0,
                symbol: "$".to_string()
            })
        );
        assert_eq!(usd.parse("12.00 $").unwrap(), None);

        let eur = CurrencyFormat::new(spec("de_DE")).unwrap();
        assert_eq!(eur.canonical(), "12,00 €");
        assert_eq!(
            eur.parse("1.234,50 €").unwrap(),
            Some(DetectedValue::Currency {
                amount: 1234.5,
                symbol: "€".to_string()
            })
        );
        assert_eq!(eur.parse("€ 12,00").unwrap(), None);
    }

    #[test]
    fn zero_fraction_currency_renders_without_decimals() {
        let yen = CurrencyFormat::new(spec("ja_JP")).unwrap();
        assert_eq!(yen.canonical(), "¥12");
    }

    #[test]
    fn swiss_apostrophe_grouping() {
        let fmt = NumberFormat::new(spec("de_CH")).unwrap();
        assert_eq!(
            fmt.parse("1'234.56").unwrap(),
            Some(DetectedValue::Number(1234.56))
        );
    }
}
