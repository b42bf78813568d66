//! Error types for the order-ahead core.
//!
//! The engine operations themselves (`admit`, `tick`, `sort`) are
//! infallible; records are rejected while decoding when their purchase
//! timestamp cannot be understood or their arrival time overflows.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The purchase timestamp was neither RFC 3339, a naive
    /// `YYYY-MM-DD HH:MM:SS` timestamp, nor epoch milliseconds.
    #[error("invalid purchase timestamp: {0}")]
    InvalidTimestamp(String),

    /// `purchase_date + eta` minutes is outside the representable range.
    #[error("arrival time out of range: purchased {purchase_date}, eta {eta} min")]
    ArrivalOutOfRange {
        purchase_date: DateTime<Utc>,
        eta: i64,
    },
}
