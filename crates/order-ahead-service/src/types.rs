//! Shared types for the dashboard runtime.
//!
//! This module defines:
//! - `DashboardCommand`: messages flowing from the screen / live feed into
//!   the dashboard task
//! - `DashboardSnapshot`: what the dashboard task publishes after each change
//! - channel aliases between them

use chrono::{DateTime, Utc};
use order_ahead_core::{Order, OrderKey, RawOrder};
use tokio::sync::{mpsc, watch};

/// Input to the dashboard task.
#[derive(Debug, Clone)]
pub enum DashboardCommand {
    /// Re-fetch the full list and replace the working set.
    Refresh,

    /// A single order pushed by the live feed.
    Incoming(RawOrder),

    /// Start fulfilling an order (API first, then the local flag).
    Process(OrderKey),

    /// Remove an order (API first, then locally).
    Clear(OrderKey),

    /// Expand / collapse an order's details.
    ToggleDetails(OrderKey),

    /// Stop the task and release the ticker.
    Shutdown,
}

/// Point-in-time view of the working set.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    /// Orders in display order.
    pub orders: Vec<Order>,

    /// Whether the 1-second ticker is currently armed.
    pub ticker_active: bool,

    /// A bulk fetch is in flight.
    pub loading: bool,

    /// Last user-facing error, cleared by the next successful fetch.
    pub status: Option<String>,

    /// Expiry notifications fired since the task started.
    pub expired_total: u64,

    pub updated_at: Option<DateTime<Utc>>,
}

/// Channel from screen / live feed → dashboard task.
pub type CommandTx = mpsc::UnboundedSender<DashboardCommand>;
pub type CommandRx = mpsc::UnboundedReceiver<DashboardCommand>;

/// Channel from dashboard task → screen.
pub type SnapshotTx = watch::Sender<DashboardSnapshot>;
pub type SnapshotRx = watch::Receiver<DashboardSnapshot>;
