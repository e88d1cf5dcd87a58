//! Locale-specific format catalogs.
//!
//! A catalog family (numbers, percentages, currency amounts, dates, times,
//! date-times) is built once per process by iterating the locale table,
//! rendering a fixed canonical sample with every locale's formatter and
//! deduplicating on the rendered string: locales whose formatters are
//! functionally identical collapse into one [`FormatDescriptor`] carrying the
//! union of their locales. Detection then attempts each descriptor exactly
//! once per window instead of once per locale.
//!
//! The maximum window size the detection engine explores is derived from the
//! catalog (the widest canonical rendering in whitespace tokens), never
//! hard-coded.

pub mod locales;

mod datetime;
mod number;

pub use datetime::ChronoFormat;
pub use number::{CurrencyFormat, NumberFormat, PercentFormat};

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use locales::LocaleSpec;

/// Errors while building a catalog.
///
/// Any construction failure for a single locale is fatal for the whole
/// catalog; there is no partial-catalog fallback.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("bad pattern {pattern:?} for locale {locale}: {detail}")]
    Pattern {
        locale: &'static str,
        pattern: String,
        detail: String,
    },

    #[error("regex error for locale {locale}: {source}")]
    Regex {
        locale: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Fatal parse-time failure.
///
/// Not the "does not match" outcome; that is `Ok(None)` from
/// [`ValueFormat::parse`]. An error here means a format accepted a window it
/// could not reduce to a value, which is a catalog defect and aborts the
/// detection run.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("format matched {input:?} but could not reduce it: {detail}")]
    Malformed { input: String, detail: String },
}

/// The format families the catalogs are split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Number,
    Percent,
    Currency,
    Date,
    Time,
    DateTime,
}

impl ValueKind {
    /// All families, in catalog order.
    pub const ALL: [ValueKind; 6] = [
        ValueKind::Number,
        ValueKind::Percent,
        ValueKind::Currency,
        ValueKind::Date,
        ValueKind::Time,
        ValueKind::DateTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Number => "number",
            ValueKind::Percent => "percent",
            ValueKind::Currency => "currency",
            ValueKind::Date => "date",
            ValueKind::Time => "time",
            ValueKind::DateTime => "date_time",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "number" => Some(ValueKind::Number),
            "percent" => Some(ValueKind::Percent),
            "currency" => Some(ValueKind::Currency),
            "date" => Some(ValueKind::Date),
            "time" => Some(ValueKind::Time),
            "date_time" | "datetime" => Some(ValueKind::DateTime),
            _ => None,
        }
    }
}

/// A typed value recognized in text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DetectedValue {
    Number(f64),
    /// The displayed magnitude: "12,34 %" parses to 12.34.
    Percent(f64),
    Currency {
        amount: f64,
        symbol: String,
    },
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl std::fmt::Display for DetectedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectedValue::Number(v) => write!(f, "{v}"),
            DetectedValue::Percent(v) => write!(f, "{v} %"),
            DetectedValue::Currency { amount, symbol } => write!(f, "{amount} {symbol}"),
            DetectedValue::Date(v) => write!(f, "{v}"),
            DetectedValue::Time(v) => write!(f, "{v}"),
            DetectedValue::DateTime(v) => write!(f, "{v}"),
        }
    }
}

/// A locale formatter: renders the family's canonical sample and parses
/// candidate windows.
pub trait ValueFormat: Send + Sync {
    /// Rendering of the family's fixed canonical sample; the deduplication
    /// key of the catalog.
    fn canonical(&self) -> String;

    /// Attempt to parse a window.
    ///
    /// `Ok(Some(_))` is a match, `Ok(None)` the expected non-match, and
    /// `Err(_)` a fatal format defect.
    fn parse(&self, text: &str) -> Result<Option<DetectedValue>, FormatError>;
}

/// A deduplicated formatter: one representative format plus every locale that
/// renders the canonical sample the same way.
#[derive(Clone)]
pub struct FormatDescriptor {
    rendering: String,
    locales: Vec<&'static str>,
    format: Arc<dyn ValueFormat>,
}

impl FormatDescriptor {
    /// Assemble a descriptor directly; catalogs built from the locale table
    /// use [`FamilyCatalog::build`] instead.
    pub fn new(
        rendering: impl Into<String>,
        locales: Vec<&'static str>,
        format: Arc<dyn ValueFormat>,
    ) -> Self {
        Self {
            rendering: rendering.into(),
            locales,
            format,
        }
    }

    /// The canonical-sample rendering this descriptor was deduplicated on.
    pub fn rendering(&self) -> &str {
        &self.rendering
    }

    /// Locales whose formatters share this rendering.
    pub fn locales(&self) -> &[&'static str] {
        &self.locales
    }

    /// The representative format (first locale encountered).
    pub fn format(&self) -> &Arc<dyn ValueFormat> {
        &self.format
    }
}

fn build_format(kind: ValueKind, spec: &LocaleSpec) -> Result<Arc<dyn ValueFormat>, CatalogError> {
    Ok(match kind {
        ValueKind::Number => Arc::new(NumberFormat::new(spec)?),
        ValueKind::Percent => Arc::new(PercentFormat::new(spec)?),
        ValueKind::Currency => Arc::new(CurrencyFormat::new(spec)?),
        ValueKind::Date => Arc::new(ChronoFormat::date(spec)?),
        ValueKind::Time => Arc::new(ChronoFormat::time(spec)?),
        ValueKind::DateTime => Arc::new(ChronoFormat::date_time(spec)?),
    })
}

/// The deduplicated descriptors of one format family.
pub struct FamilyCatalog {
    kind: ValueKind,
    descriptors: Vec<FormatDescriptor>,
}

impl FamilyCatalog {
    /// Build the family from the locale table, deduplicating by canonical
    /// rendering. The first locale producing a rendering contributes the
    /// representative format; later ones only extend the locale list.
    pub fn build(kind: ValueKind) -> Result<Self, CatalogError> {
        let mut by_rendering: BTreeMap<String, FormatDescriptor> = BTreeMap::new();
        for spec in locales::all() {
            let format = build_format(kind, spec)?;
            let rendering = format.canonical();
            match by_rendering.get_mut(&rendering) {
                Some(descriptor) => descriptor.locales.push(spec.id),
                None => {
                    by_rendering.insert(
                        rendering.clone(),
                        FormatDescriptor::new(rendering, vec![spec.id], format),
                    );
                }
            }
        }
        tracing::debug!(
            kind = kind.as_str(),
            descriptors = by_rendering.len(),
            locales = locales::all().len(),
            "built format family"
        );
        Ok(Self {
            kind,
            descriptors: by_rendering.into_values().collect(),
        })
    }

    /// Assemble a family from explicit descriptors (custom catalogs, tests).
    pub fn new(kind: ValueKind, descriptors: Vec<FormatDescriptor>) -> Self {
        Self { kind, descriptors }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn descriptors(&self) -> &[FormatDescriptor] {
        &self.descriptors
    }

    /// Widest canonical rendering of the family, in whitespace tokens.
    pub fn max_window_words(&self) -> usize {
        self.descriptors
            .iter()
            .map(|d| d.rendering.split_whitespace().count())
            .max()
            .unwrap_or(1)
            .max(1)
    }
}

/// All format families, one catalog per family.
pub struct FormatCatalog {
    families: Vec<FamilyCatalog>,
}

impl FormatCatalog {
    /// Build every family from the locale table.
    pub fn build() -> Result<Self, CatalogError> {
        let families = ValueKind::ALL
            .iter()
            .map(|&kind| FamilyCatalog::build(kind))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { families })
    }

    /// Assemble a catalog from explicit families (custom catalogs, tests).
    pub fn from_families(families: Vec<FamilyCatalog>) -> Self {
        Self { families }
    }

    /// The shared catalog, built once for the process lifetime.
    pub fn global() -> &'static FormatCatalog {
        static CATALOG: LazyLock<FormatCatalog> = LazyLock::new(|| {
            FormatCatalog::build().expect("format catalog builds from the built-in locale table")
        });
        &CATALOG
    }

    pub fn families(&self) -> &[FamilyCatalog] {
        &self.families
    }

    /// One family's catalog, if present.
    pub fn family(&self, kind: ValueKind) -> Option<&FamilyCatalog> {
        self.families.iter().find(|f| f.kind == kind)
    }

    /// Window bound for detection: the widest canonical rendering across all
    /// families.
    pub fn max_window_words(&self) -> usize {
        self.families
            .iter()
            .map(FamilyCatalog::max_window_words)
            .max()
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_builds_from_locale_table() {
        let catalog = FormatCatalog::build().unwrap();
        assert_eq!(catalog.families().len(), 6);
        for family in catalog.families() {
            assert!(!family.descriptors().is_empty());
        }
    }

    #[test]
    fn identical_renderings_collapse_to_one_descriptor() {
        let catalog = FormatCatalog::global();
        let currency = catalog.family(ValueKind::Currency).unwrap();
        let descriptor = currency
            .descriptors()
            .iter()
            .find(|d| d.rendering() == "12,00 €")
            .expect("shared euro rendering");
        assert!(descriptor.locales().contains(&"de_DE"));
        assert!(descriptor.locales().contains(&"fi_FI"));
        // Merged, not duplicated.
        assert_eq!(
            currency
                .descriptors()
                .iter()
                .filter(|d| d.rendering() == "12,00 €")
                .count(),
            1
        );
    }

    #[test]
    fn dedup_shrinks_the_locale_set() {
        let catalog = FormatCatalog::global();
        for family in catalog.families() {
            assert!(
                family.descriptors().len() < locales::all().len(),
                "family {} did not deduplicate",
                family.kind().as_str()
            );
            let locale_total: usize = family
                .descriptors()
                .iter()
                .map(|d| d.locales().len())
                .sum();
            assert_eq!(locale_total, locales::all().len());
        }
    }

    #[test]
    fn dollar_rendering_present() {
        let catalog = FormatCatalog::global();
        let currency = catalog.family(ValueKind::Currency).unwrap();
        assert!(currency
            .descriptors()
            .iter()
            .any(|d| d.rendering() == "$12.00"));
    }

    #[test]
    fn window_bound_is_catalog_derived() {
        let catalog = FormatCatalog::global();
        // Widest rendering in the table: "%d %b, %Y" date + 24h time.
        assert_eq!(catalog.family(ValueKind::Date).unwrap().max_window_words(), 3);
        assert_eq!(catalog.max_window_words(), 4);
    }

    #[test]
    fn representative_format_parses_its_own_rendering() {
        let catalog = FormatCatalog::global();
        for family in catalog.families() {
            for descriptor in family.descriptors() {
                let parsed = descriptor.format().parse(descriptor.rendering()).unwrap();
                assert!(
                    parsed.is_some(),
                    "{} descriptor {:?} cannot parse its own rendering",
                    family.kind().as_str(),
                    descriptor.rendering()
                );
            }
        }
    }
}
