//! order-ahead-service
//!
//! Async runtime around the order-ahead queue: the order API client, the
//! live feed subscriber and the dashboard task that owns the working set.

pub mod config;
pub mod types;
pub mod api;
pub mod clock;
pub mod ticker;
pub mod live_feed;
pub mod dashboard_task;

pub use api::{ApiError, HttpApi, OrderAheadApi, SharedApi};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, Routes, ServiceConfig};
pub use dashboard_task::{run_dashboard_loop, spawn_dashboard, DashboardHandle};
pub use live_feed::LiveFeed;
pub use types::{CommandTx, DashboardCommand, DashboardSnapshot, SnapshotRx};
