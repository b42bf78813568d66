//! Order representations.
//!
//! - [`RawOrder`]: the record as it comes off the API or the live feed.
//! - [`Order`]: the engine-owned order, enriched with its arrival time
//!   and countdown state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::Countdown;
use crate::error::QueueError;
use crate::purchase_date;

/// Identity of an order: the `(transaction, user)` pair.
///
/// Both halves are opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderKey {
    pub transaction_oid: String,
    pub user_oid: String,
}

impl OrderKey {
    pub fn new(transaction_oid: impl Into<String>, user_oid: impl Into<String>) -> Self {
        OrderKey {
            transaction_oid: transaction_oid.into(),
            user_oid: user_oid.into(),
        }
    }
}

/// A line item on an order. Only used for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// An order record as supplied by the bulk fetch or a live notification.
///
/// Decoding rejects records whose arrival time (`purchase_date + eta`)
/// cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawOrderRecord")]
pub struct RawOrder {
    pub transaction_oid: String,
    pub user_oid: String,

    pub purchase_date: DateTime<Utc>,

    /// Minutes from purchase until the customer is expected.
    pub eta: i64,

    pub is_processing: bool,

    /// The server already knows this order expired.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_expired: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOrderRecord {
    transaction_oid: String,
    user_oid: String,
    #[serde(deserialize_with = "purchase_date::deserialize")]
    purchase_date: DateTime<Utc>,
    eta: i64,
    #[serde(default)]
    is_processing: bool,
    #[serde(default)]
    is_expired: bool,
    #[serde(default)]
    customer_name: Option<String>,
    #[serde(default)]
    items: Vec<OrderItem>,
    #[serde(default)]
    total: Option<f64>,
}

impl TryFrom<RawOrderRecord> for RawOrder {
    type Error = QueueError;

    fn try_from(record: RawOrderRecord) -> Result<Self, Self::Error> {
        let raw = RawOrder {
            transaction_oid: record.transaction_oid,
            user_oid: record.user_oid,
            purchase_date: record.purchase_date,
            eta: record.eta,
            is_processing: record.is_processing,
            is_expired: record.is_expired,
            customer_name: record.customer_name,
            items: record.items,
            total: record.total,
        };
        raw.arrival_date()?;
        Ok(raw)
    }
}

impl RawOrder {
    /// Minimal record with no fulfilment metadata.
    pub fn new(
        transaction_oid: impl Into<String>,
        user_oid: impl Into<String>,
        purchase_date: DateTime<Utc>,
        eta: i64,
    ) -> Self {
        RawOrder {
            transaction_oid: transaction_oid.into(),
            user_oid: user_oid.into(),
            purchase_date,
            eta,
            is_processing: false,
            is_expired: false,
            customer_name: None,
            items: Vec::new(),
            total: None,
        }
    }

    pub fn key(&self) -> OrderKey {
        OrderKey::new(self.transaction_oid.clone(), self.user_oid.clone())
    }

    /// `purchase_date + eta` minutes, or an error if that overflows.
    pub fn arrival_date(&self) -> Result<DateTime<Utc>, QueueError> {
        Duration::try_minutes(self.eta)
            .and_then(|eta| self.purchase_date.checked_add_signed(eta))
            .ok_or(QueueError::ArrivalOutOfRange {
                purchase_date: self.purchase_date,
                eta: self.eta,
            })
    }
}

/// An order in the working set.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub key: OrderKey,

    pub purchase_date: DateTime<Utc>,
    pub eta_minutes: i64,

    /// `purchase_date + eta`, fixed at admission.
    pub arrival_date: DateTime<Utc>,

    // Remaining time until arrival, refreshed every tick while unexpired.
    pub arrival_mins: u32,
    pub arrival_seconds: u32,

    pub is_expired: bool,
    pub is_processing: bool,
    pub show_details: bool,

    /// Set when the server flagged the record expired, so reaching
    /// arrival locally does not notify it a second time.
    pub expiry_reported: bool,

    pub customer_name: Option<String>,
    pub items: Vec<OrderItem>,
    pub total: Option<f64>,
}

impl Order {
    /// Build an engine order from a raw record.
    ///
    /// The countdown starts out as seen from the purchase instant
    /// (`eta` minutes, zero seconds) until the first tick refreshes it.
    /// A hand-built record whose arrival overflows never arrives.
    pub fn from_raw(raw: RawOrder) -> Self {
        let arrival_date = raw.arrival_date().unwrap_or(DateTime::<Utc>::MAX_UTC);
        let initial_mins = raw.eta.rem_euclid(60) as u32;

        Order {
            key: OrderKey::new(raw.transaction_oid, raw.user_oid),
            purchase_date: raw.purchase_date,
            eta_minutes: raw.eta,
            arrival_date,
            arrival_mins: initial_mins,
            arrival_seconds: 0,
            is_expired: false,
            is_processing: raw.is_processing,
            show_details: false,
            expiry_reported: raw.is_expired,
            customer_name: raw.customer_name,
            items: raw.items,
            total: raw.total,
        }
    }

    pub fn countdown(&self) -> Countdown {
        Countdown::new(self.arrival_mins, self.arrival_seconds)
    }

    /// Milliseconds until arrival as seen from `now` (negative once late).
    pub fn millis_until_arrival(&self, now: DateTime<Utc>) -> i64 {
        (self.arrival_date - now).num_milliseconds()
    }
}
