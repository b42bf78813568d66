//! JSON decoding for API responses and live-feed frames.

use order_ahead_core::RawOrder;

use crate::error::ProtocolError;
use crate::wire_types::{ActiveOrdersData, ApiEnvelope, LiveEnvelope, INCOMING_NEW_ORDER};

/// Decode the body of the "get active orders" route.
///
/// A response whose `data` lacks `activeOrders` yields an empty list.
pub fn decode_active_orders(body: &str) -> Result<Vec<RawOrder>, ProtocolError> {
    let envelope: ApiEnvelope<ActiveOrdersData> = serde_json::from_str(body)?;
    Ok(envelope.data.active_orders)
}

/// Decode a live-feed text frame.
///
/// Returns `Ok(None)` for events other than a new order arriving.
pub fn decode_live_frame(text: &str) -> Result<Option<RawOrder>, ProtocolError> {
    let envelope: LiveEnvelope = serde_json::from_str(text)?;
    if envelope.event != INCOMING_NEW_ORDER {
        return Ok(None);
    }
    let order = serde_json::from_value(envelope.data)?;
    Ok(Some(order))
}

/// Encode a new-order frame, as the live feed would push it.
pub fn encode_live_frame(order: &RawOrder) -> Result<String, ProtocolError> {
    let envelope = LiveEnvelope {
        event: INCOMING_NEW_ORDER.to_string(),
        data: serde_json::to_value(order)?,
    };
    Ok(serde_json::to_string(&envelope)?)
}
