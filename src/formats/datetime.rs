//! Date, time and date-time formats driven by strftime-style patterns.
//!
//! A pattern is validated at construction against the directives the family
//! supports, then used for both the canonical rendering and window parsing
//! through chrono. A window chrono cannot parse is a silent non-match; there
//! is no fatal path at parse time because defective patterns are rejected
//! when the catalog is built.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::locales::LocaleSpec;
use super::{CatalogError, DetectedValue, FormatError, ValueFormat};

/// Directives usable in date patterns.
const DATE_DIRECTIVES: &[char] = &['b', 'd', 'e', 'm', 'y', 'Y'];
/// Directives usable in time patterns.
const TIME_DIRECTIVES: &[char] = &['H', 'I', 'M', 'S', 'p'];

/// Which temporal family a [`ChronoFormat`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Temporal {
    Date,
    Time,
    DateTime,
}

fn sample_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2006, 11, 25).unwrap()
}

fn sample_time() -> NaiveTime {
    NaiveTime::from_hms_opt(14, 35, 9).unwrap()
}

fn sample_date_time() -> NaiveDateTime {
    sample_date().and_time(sample_time())
}

/// Reject patterns using directives outside the family's supported set.
fn validate_pattern(
    spec: &LocaleSpec,
    pattern: &str,
    allowed: &[&[char]],
) -> Result<(), CatalogError> {
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            continue;
        }
        match chars.next() {
            Some('%') => {}
            Some(directive) if allowed.iter().any(|set| set.contains(&directive)) => {}
            Some(directive) => {
                return Err(CatalogError::Pattern {
                    locale: spec.id,
                    pattern: pattern.to_string(),
                    detail: format!("unsupported directive %{}", directive),
                });
            }
            None => {
                return Err(CatalogError::Pattern {
                    locale: spec.id,
                    pattern: pattern.to_string(),
                    detail: "dangling % at end of pattern".to_string(),
                });
            }
        }
    }
    Ok(())
}

/// A date, time or date-time format for one locale pattern.
pub struct ChronoFormat {
    temporal: Temporal,
    pattern: String,
}

impl ChronoFormat {
    /// Date format from the locale's date pattern.
    pub fn date(spec: &LocaleSpec) -> Result<Self, CatalogError> {
        validate_pattern(spec, spec.date_fmt, &[DATE_DIRECTIVES])?;
        Ok(Self {
            temporal: Temporal::Date,
            pattern: spec.date_fmt.to_string(),
        })
    }

    /// Time format from the locale's time pattern.
    pub fn time(spec: &LocaleSpec) -> Result<Self, CatalogError> {
        validate_pattern(spec, spec.time_fmt, &[TIME_DIRECTIVES])?;
        Ok(Self {
            temporal: Temporal::Time,
            pattern: spec.time_fmt.to_string(),
        })
    }

    /// Date-time format: the locale's date pattern followed by its time
    /// pattern, the composition most locales render combined stamps with.
    pub fn date_time(spec: &LocaleSpec) -> Result<Self, CatalogError> {
        let pattern = format!("{} {}", spec.date_fmt, spec.time_fmt);
        validate_pattern(spec, &pattern, &[DATE_DIRECTIVES, TIME_DIRECTIVES])?;
        Ok(Self {
            temporal: Temporal::DateTime,
            pattern,
        })
    }
}

impl ValueFormat for ChronoFormat {
    fn canonical(&self) -> String {
        match self.temporal {
            Temporal::Date => sample_date().format(&self.pattern).to_string(),
            Temporal::Time => sample_time().format(&self.pattern).to_string(),
            Temporal::DateTime => sample_date_time().format(&self.pattern).to_string(),
        }
    }

    fn parse(&self, text: &str) -> Result<Option<DetectedValue>, FormatError> {
        let value = match self.temporal {
            Temporal::Date => NaiveDate::parse_from_str(text, &self.pattern)
                .ok()
                .map(DetectedValue::Date),
            Temporal::Time => NaiveTime::parse_from_str(text, &self.pattern)
                .ok()
                .map(DetectedValue::Time),
            Temporal::DateTime => NaiveDateTime::parse_from_str(text, &self.pattern)
                .ok()
                .map(DetectedValue::DateTime),
        };
        Ok(value)
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
    fn date_round_trips_its_canonical_rendering() {
        for id in ["en_US", "de_DE", "ja_JP", "ar_SA", "nl_NL", "lt_LT"] {
            let fmt = ChronoFormat::date(spec(id)).unwrap();
            let rendering = fmt.canonical();
            let parsed = fmt.parse(&rendering).unwrap();
            assert_eq!(
                parsed,
                Some(DetectedValue::Date(sample_date())),
                "locale {} rendering {:?}",
                id,
                rendering
            );
        }
    }

    #[test]
    fn twelve_hour_time_round_trips() {
        let fmt = ChronoFormat::time(spec("en_US")).unwrap();
        assert_eq!(fmt.canonical(), "02:35:09 PM");
        assert_eq!(
            fmt.parse("02:35:09 PM").unwrap(),
            Some(DetectedValue::Time(sample_time()))
        );
    }

    #[test]
    fn date_rejects_wrong_order() {
        // Day-first pattern must not accept a month-first rendering with an
        // impossible month.
        let fmt = ChronoFormat::date(spec("de_DE")).unwrap();
        assert_eq!(fmt.parse("11.25.2006").unwrap(), None);
        assert!(fmt.parse("25.11.2006").unwrap().is_some());
    }

    #[test]
    fn date_time_combines_patterns() {
        let fmt = ChronoFormat::date_time(spec("de_DE")).unwrap();
        assert_eq!(fmt.canonical(), "25.11.2006 14:35:09");
        assert_eq!(
            fmt.parse("25.11.2006 14:35:09").unwrap(),
            Some(DetectedValue::DateTime(sample_date_time()))
        );
    }

    #[test]
    fn abbreviated_month_pattern() {
        let fmt = ChronoFormat::date(spec("ar_SA")).unwrap();
        assert_eq!(fmt.canonical(), "25 Nov, 2006");
        assert_eq!(
            fmt.parse("25 Nov, 2006").unwrap(),
            Some(DetectedValue::Date(sample_date()))
        );
    }

    #[test]
    fn unsupported_directive_is_fatal_at_construction() {
        let mut bad = *spec("en_US");
        bad.date_fmt = "%m/%d/%Y %Z";
        assert!(ChronoFormat::date(&bad).is_err());
    }

    #[test]
    fn dangling_percent_is_fatal_at_construction() {
        let mut bad = *spec("en_US");
        bad.time_fmt = "%H:%M:%";
        assert!(ChronoFormat::time(&bad).is_err());
    }
}
