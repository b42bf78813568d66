//! order-ahead-core
//!
//! Pure order-ahead queue logic:
//! - raw order records and the engine-owned `Order`
//! - purchase timestamp parsing
//! - `admit` / `tick` / `sort` engine operations
//! - the `OrderQueue` working set owned by a dashboard

pub mod error;
pub mod purchase_date;
pub mod order;
pub mod countdown;
pub mod engine;
pub mod order_queue;

pub use error::QueueError;
pub use order::{Order, OrderItem, OrderKey, RawOrder};
pub use countdown::Countdown;
pub use engine::{admit, sort, tick};
pub use order_queue::OrderQueue;
