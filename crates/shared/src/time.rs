//! Timestamp parsing and serde helpers for backend payloads.
//!
//! The events backend writes naive ISO-8601 timestamps (UTC without an
//! offset, e.g. `2025-06-01T10:00:00`). Form inputs may also omit seconds.
//! Values with an explicit offset are accepted and normalised to UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Error returned when a timestamp string cannot be interpreted.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid timestamp: {0}")]
pub struct TimestampError(pub String);

/// Parses an RFC 3339 timestamp or a naive ISO-8601 timestamp (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = trimmed.parse::<NaiveDateTime>() {
        return Ok(naive.and_utc());
    }

    // `datetime-local` form values carry no seconds
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError(raw.to_string()))
}

/// Formats a timestamp the way the backend accepts it.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serde adapter for required backend timestamps.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}

/// Serde adapter for optional backend timestamps (`null` or missing → `None`).
///
/// Use together with `#[serde(default)]` so absent fields deserialize.
pub mod optional_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ts {
            Some(ts) => serializer.serialize_str(&super::format_timestamp(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_timestamp(value)
                .map(Some)
                .map_err(de::Error::custom),
        }
    }
}
