//! Purchase timestamp parsing.
//!
//! The order API is loose about how it sends `purchaseDate`:
//! - RFC 3339 (`2024-03-01T12:00:00Z`, `2024-03-01T12:00:00.000+01:00`)
//! - naive ISO-like text (`2024-03-01 12:00:00`, `2024-03-01T12:00:00.250`),
//!   taken as UTC
//! - epoch milliseconds as a JSON integer
//!
//! Everything is normalised to `DateTime<Utc>` on the way in.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::QueueError;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a textual purchase timestamp.
pub fn parse(text: &str) -> Result<DateTime<Utc>, QueueError> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(naive.and_utc());
        }
    }

    // Some feeds stringify the epoch value.
    if let Ok(millis) = trimmed.parse::<i64>() {
        return from_epoch_millis(millis);
    }

    Err(QueueError::InvalidTimestamp(text.to_string()))
}

/// Convert epoch milliseconds into a UTC timestamp.
pub fn from_epoch_millis(millis: i64) -> Result<DateTime<Utc>, QueueError> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| QueueError::InvalidTimestamp(millis.to_string()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PurchaseDateRepr {
    Millis(i64),
    Text(String),
}

/// Serde adapter for `#[serde(deserialize_with = "...")]`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = PurchaseDateRepr::deserialize(deserializer)?;
    let parsed = match repr {
        PurchaseDateRepr::Millis(ms) => from_epoch_millis(ms),
        PurchaseDateRepr::Text(text) => parse(&text),
    };
    parsed.map_err(serde::de::Error::custom)
}
