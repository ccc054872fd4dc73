//! Visit model

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub(crate) static COUNTRY_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid country code pattern"));

/// One country on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    /// ISO 3166-1 alpha-2 code, uppercase
    pub country_code: String,
    /// Calendar day; time of day is never stored
    #[serde(with = "iso_date")]
    pub date: NaiveDate,
}

impl Visit {
    pub fn new(country_code: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            country_code: country_code.into(),
            date,
        }
    }
}

/// Persisted/imported collection: `{ "visits": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitCollection {
    pub visits: Vec<Visit>,
}

/// Add-visits request coming from the input form
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVisits {
    #[validate(regex(
        path = *COUNTRY_CODE_RE,
        message = "country code must be two uppercase letters"
    ))]
    pub country_code: String,
    pub start_date: NaiveDate,
    /// Inclusive; defaults to `start_date`
    pub end_date: Option<NaiveDate>,
}

impl CreateVisits {
    pub fn new(country_code: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            country_code: country_code.into(),
            start_date,
            end_date: Some(end_date),
        }
    }

    pub fn single_day(country_code: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            country_code: country_code.into(),
            start_date: date,
            end_date: None,
        }
    }

    pub fn end(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.start_date)
    }

    /// Days covered by the inclusive range; zero or less when inverted
    pub fn day_count(&self) -> i64 {
        (self.end() - self.start_date).num_days() + 1
    }
}

/// Wire format for visit dates.
///
/// Written as a midnight UTC ISO-8601 datetime. Read from an RFC 3339
/// datetime, a naive datetime or a bare date; the day is kept as written.
pub mod iso_date {
    use super::*;
    use serde::{de, Deserializer, Serializer};

    const WIRE_FORMAT: &str = "%Y-%m-%dT00:00:00.000Z";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(WIRE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.date());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_wire_shape() {
        let visit = Visit {
            id: "v1".into(),
            country_code: "UG".into(),
            date: d(2023, 4, 13),
        };
        let json = serde_json::to_value(&visit).unwrap();
        assert_eq!(json["countryCode"], "UG");
        assert_eq!(json["date"], "2023-04-13T00:00:00.000Z");
    }

    #[test]
    fn test_round_trip_keeps_day() {
        let original = VisitCollection {
            visits: vec![
                Visit::new("UG", d(2023, 4, 13)),
                Visit::new("MA", d(2024, 2, 29)),
                Visit::new("FR", d(2023, 12, 31)),
            ],
        };
        let json = serde_json::to_string(&original).unwrap();
        let back: VisitCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_parse_accepts_time_components() {
        assert_eq!(iso_date::parse("2023-04-13T18:45:10.123Z"), Some(d(2023, 4, 13)));
        assert_eq!(iso_date::parse("2023-04-13T23:00:00+02:00"), Some(d(2023, 4, 13)));
        assert_eq!(iso_date::parse("2023-04-13T08:00:00"), Some(d(2023, 4, 13)));
        assert_eq!(iso_date::parse("2023-04-13"), Some(d(2023, 4, 13)));
        assert_eq!(iso_date::parse("13/04/2023"), None);
        assert_eq!(iso_date::parse("2023-02-30"), None);
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = Visit::new("UG", d(2023, 4, 13));
        let b = Visit::new("UG", d(2023, 4, 13));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_create_visits_validation() {
        assert!(CreateVisits::single_day("UG", d(2023, 4, 13)).validate().is_ok());
        assert!(CreateVisits::single_day("ug", d(2023, 4, 13)).validate().is_err());
        assert!(CreateVisits::single_day("UGA", d(2023, 4, 13)).validate().is_err());
    }

    #[test]
    fn test_end_defaults_to_start() {
        let req: CreateVisits =
            serde_json::from_str(r#"{"countryCode": "UG", "startDate": "2023-04-13"}"#).unwrap();
        assert_eq!(req.end(), d(2023, 4, 13));
        assert_eq!(req.day_count(), 1);
    }

    #[test]
    fn test_day_count() {
        assert_eq!(CreateVisits::new("UG", d(2023, 4, 13), d(2023, 4, 18)).day_count(), 6);
        assert_eq!(CreateVisits::new("UG", d(2024, 1, 1), d(2024, 12, 31)).day_count(), 366);
        assert!(CreateVisits::new("UG", d(2023, 4, 18), d(2023, 4, 13)).day_count() <= 0);
    }
}
