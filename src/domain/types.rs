//! Shared domain types.
//!
//! Observations are produced by an external parsing/storage layer and are
//! treated as immutable here. Everything derived from them (samples, reports)
//! is recomputed on demand and serializable so it can be exported as JSON.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Visa preference category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "EB-1")]
    Eb1,
    #[serde(rename = "EB-2")]
    Eb2,
    #[serde(rename = "EB-3")]
    Eb3,
    #[serde(rename = "EB-4")]
    Eb4,
    #[serde(rename = "EB-5")]
    Eb5,
    #[serde(rename = "F1")]
    F1,
    #[serde(rename = "F2A")]
    F2a,
    #[serde(rename = "F2B")]
    F2b,
    #[serde(rename = "F3")]
    F3,
    #[serde(rename = "F4")]
    F4,
}

impl Category {
    pub const EMPLOYMENT: [Category; 5] = [
        Category::Eb1,
        Category::Eb2,
        Category::Eb3,
        Category::Eb4,
        Category::Eb5,
    ];

    /// Label as printed on the bulletin tables.
    pub fn label(self) -> &'static str {
        match self {
            Category::Eb1 => "EB-1",
            Category::Eb2 => "EB-2",
            Category::Eb3 => "EB-3",
            Category::Eb4 => "EB-4",
            Category::Eb5 => "EB-5",
            Category::F1 => "F1",
            Category::F2a => "F2A",
            Category::F2b => "F2B",
            Category::F3 => "F3",
            Category::F4 => "F4",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Category {
    type Err = AppError;

    /// Accepts `EB-2`, `eb2`, `EB 2`, `F2A`, `f-2a`, ...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        let category = match key.as_str() {
            "EB1" => Category::Eb1,
            "EB2" => Category::Eb2,
            "EB3" => Category::Eb3,
            "EB4" => Category::Eb4,
            "EB5" => Category::Eb5,
            "F1" => Category::F1,
            "F2A" => Category::F2a,
            "F2B" => Category::F2b,
            "F3" => Category::F3,
            "F4" => Category::F4,
            _ => return Err(AppError::invalid(format!("Unknown visa category '{s}'."))),
        };
        Ok(category)
    }
}

/// Chargeability area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Country {
    /// "All chargeability areas except those listed".
    All,
    China,
    India,
    Mexico,
    Philippines,
}

impl Country {
    pub fn label(self) -> &'static str {
        match self {
            Country::All => "ALL",
            Country::China => "CHINA",
            Country::India => "INDIA",
            Country::Mexico => "MEXICO",
            Country::Philippines => "PHILIPPINES",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Country {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        let country = match key.as_str() {
            "ALL" | "ALLCHARGEABILITY" | "ALLCHARGEABILITYAREAS" | "ROW" => Country::All,
            "CHINA" | "CN" | "CHINAMAINLANDBORN" => Country::China,
            "INDIA" | "IN" => Country::India,
            "MEXICO" | "MX" => Country::Mexico,
            "PHILIPPINES" | "PH" => Country::Philippines,
            _ => return Err(AppError::invalid(format!("Unknown chargeability country '{s}'."))),
        };
        Ok(country)
    }
}

/// Uppercase and drop separators so `eb-2`, `EB 2` and `EB2` compare equal.
fn normalize_key(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Cutoff status of one bulletin cell.
///
/// A priority date exists only for `DateSpecified`, so the date-presence rule
/// is enforced by the type rather than checked at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum VisaStatus {
    /// No backlog ("C").
    Current,
    /// No visas available ("U").
    Unavailable,
    /// A priority/cutoff date.
    DateSpecified(NaiveDate),
}

impl VisaStatus {
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            VisaStatus::DateSpecified(d) => Some(d),
            VisaStatus::Current | VisaStatus::Unavailable => None,
        }
    }
}

/// One dated data point for a (category, country) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Bulletin month the cutoff applies to.
    pub observation_date: NaiveDate,
    pub status: VisaStatus,
}

impl Observation {
    pub fn new(observation_date: NaiveDate, status: VisaStatus) -> Self {
        Self {
            observation_date,
            status,
        }
    }

    pub fn dated(observation_date: NaiveDate, value: NaiveDate) -> Self {
        Self::new(observation_date, VisaStatus::DateSpecified(value))
    }

    pub fn current(observation_date: NaiveDate) -> Self {
        Self::new(observation_date, VisaStatus::Current)
    }

    pub fn unavailable(observation_date: NaiveDate) -> Self {
        Self::new(observation_date, VisaStatus::Unavailable)
    }

    /// The priority date, when one was published.
    pub fn value(&self) -> Option<NaiveDate> {
        self.status.date()
    }
}

/// Signed movement of the cutoff date between two consecutive dated observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancementSample {
    /// Positive = forward movement, negative = retrogression.
    pub days: i64,
    /// Bulletin date of the later observation of the pair.
    pub observation_date: NaiveDate,
}

impl AdvancementSample {
    pub fn month(&self) -> u32 {
        self.observation_date.month()
    }
}

/// Inclusive range of bulletin dates an analysis covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::invalid(format!(
                "Invalid window: start {start} is after end {end}."
            )));
        }
        Ok(Self { start, end })
    }

    /// `years` of history ending at `end` (inclusive).
    pub fn trailing_years(end: NaiveDate, years: u32) -> Result<Self, AppError> {
        if years == 0 {
            return Err(AppError::invalid("Window must span at least one year."));
        }
        let start = end
            .checked_sub_months(Months::new(years.saturating_mul(12)))
            .ok_or_else(|| AppError::invalid(format!("Window start before {end} is out of range.")))?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Short label for reports, e.g. `2021-06-01..2024-06-01`.
    pub fn label(&self) -> String {
        format!("{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn category_parsing_accepts_common_spellings() {
        assert_eq!("EB-2".parse::<Category>().unwrap(), Category::Eb2);
        assert_eq!("eb2".parse::<Category>().unwrap(), Category::Eb2);
        assert_eq!(" EB 3 ".parse::<Category>().unwrap(), Category::Eb3);
        assert_eq!("f2a".parse::<Category>().unwrap(), Category::F2a);
        assert!("EB-9".parse::<Category>().is_err());
    }

    #[test]
    fn unknown_country_is_a_validation_error() {
        let err = "ATLANTIS".parse::<Country>().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert_eq!("india".parse::<Country>().unwrap(), Country::India);
        assert_eq!("All Chargeability Areas".parse::<Country>().unwrap(), Country::All);
    }

    #[test]
    fn only_dated_status_carries_a_value() {
        let asof = date(2024, 1, 1);
        assert_eq!(Observation::current(asof).value(), None);
        assert_eq!(Observation::unavailable(asof).value(), None);
        assert_eq!(
            Observation::dated(asof, date(2012, 5, 1)).value(),
            Some(date(2012, 5, 1))
        );
    }

    #[test]
    fn trailing_window_is_anchored_to_end_date() {
        let w = Window::trailing_years(date(2024, 6, 1), 3).unwrap();
        assert_eq!(w.start, date(2021, 6, 1));
        assert!(w.contains(date(2021, 6, 1)));
        assert!(w.contains(date(2024, 6, 1)));
        assert!(!w.contains(date(2024, 7, 1)));
        assert!(Window::trailing_years(date(2024, 6, 1), 0).is_err());
    }

    #[test]
    fn status_serializes_with_tag() {
        let json = serde_json::to_string(&VisaStatus::DateSpecified(date(2015, 1, 1))).unwrap();
        assert_eq!(json, r#"{"status":"date_specified","value":"2015-01-01"}"#);
        let json = serde_json::to_string(&VisaStatus::Current).unwrap();
        assert_eq!(json, r#"{"status":"current"}"#);
    }
}
