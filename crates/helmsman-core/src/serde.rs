//! Custom serde helpers.
//!
//! Calendar dates (session start/end, birth dates) are accepted either as plain
//! `YYYY-MM-DD` or as RFC 3339 timestamps. Browsers usually send midnight in the
//! user's local zone, e.g. `2025-03-01T00:00:00+02:00`; converting that to UTC
//! first would shift it to the previous day, so the date is taken in the offset
//! the client sent.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into the sender's calendar date.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .map_err(|_| format!("invalid date `{}`, expected YYYY-MM-DD or RFC 3339", value))
}

pub fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_calendar_date(&s).map_err(serde::de::Error::custom)
}

pub fn deserialize_optional_calendar_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_calendar_date(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
