//! order-ahead-protocol
//!
//! Wire-level shapes for the order-ahead queue.
//!
//! - [`wire_types`] : request / response bodies of the order API and the
//!   live feed envelope
//! - [`json_codec`] : decoding API responses and live frames
//! - [`csv_codec`]  : line-based scenario format (replay / regression)

pub mod error;
pub mod wire_types;
pub mod json_codec;
pub mod csv_codec;

pub use error::ProtocolError;
pub use json_codec::{decode_active_orders, decode_live_frame, encode_live_frame};
