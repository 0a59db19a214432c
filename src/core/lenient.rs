//! Lenient field decoders for loosely shaped telemetry.
//!
//! Entity exports and threshold files are produced by spreadsheets and
//! settings stores that do not enforce types. Every decoder here accepts any
//! value and maps anything unusable (wrong type, `null`, NaN, infinity,
//! negative counts, unparseable timestamps) to "not reported"
//! instead of failing the whole document.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Either a value of the expected type or anything else, which is discarded.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose<T> {
    Value(T),
    Other(IgnoredAny),
}

impl<T> Loose<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Loose::Value(value) => Some(value),
            Loose::Other(_) => None,
        }
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Keep a reading only if it is finite.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Interpret a reading as a non-negative count. Fractional readings round
/// up so that any positive value stays positive.
pub fn whole_count(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 {
        Some(value.ceil() as u64)
    } else {
        None
    }
}

/// Parse a scan timestamp. Naive forms are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::<f64>::deserialize(deserializer)?
        .into_option()
        .and_then(finite))
}

pub fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::<f64>::deserialize(deserializer)?
        .into_option()
        .and_then(whole_count))
}

pub fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::<bool>::deserialize(deserializer)?.into_option())
}

/// A flag that is only set by an explicit boolean `true`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_flag(deserializer)?.unwrap_or(false))
}

pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::<String>::deserialize(deserializer)?
        .into_option()
        .and_then(|raw| parse_timestamp(&raw)))
}

pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::<String>::deserialize(deserializer)?.into_option())
}

/// Decode a nested record, substituting its default when the shape is wrong.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Loose::<T>::deserialize(deserializer)?
        .into_option()
        .unwrap_or_default())
}
