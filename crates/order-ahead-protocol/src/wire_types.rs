//! Request and response bodies.
//!
//! Field names follow the order API's camelCase JSON. Every request is a
//! `POST` carrying the company (and for the fetch, location) the session
//! is bound to.

use order_ahead_core::{OrderKey, RawOrder};
use serde::{Deserialize, Serialize};

/// Live-feed event name carrying a freshly placed order.
pub const INCOMING_NEW_ORDER: &str = "incomingNewOrder";

/// Body of the "get active orders" route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOrdersRequest {
    pub location_oid: String,
    pub company_oid: String,
}

/// Body shared by the expire / process / clear routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderActionRequest {
    pub company_oid: String,
    pub transaction_oid: String,
    pub user_oid: String,
}

impl OrderActionRequest {
    pub fn new(company_oid: &str, key: &OrderKey) -> Self {
        OrderActionRequest {
            company_oid: company_oid.to_string(),
            transaction_oid: key.transaction_oid.clone(),
            user_oid: key.user_oid.clone(),
        }
    }
}

/// Every API response wraps its payload in `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOrdersData {
    #[serde(default)]
    pub active_orders: Vec<RawOrder>,
}

/// A frame pushed over the live feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveEnvelope {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}
