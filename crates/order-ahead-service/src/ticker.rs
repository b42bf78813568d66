//! The periodic countdown tick as a scoped resource.
//!
//! A `Ticker` exists only while there is something to count down; dropping
//! it releases the underlying timer.

use std::future;
use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

#[derive(Debug)]
pub struct Ticker {
    interval: Interval,
}

impl Ticker {
    /// Arm a ticker. The first tick completes immediately.
    pub fn start(period: Duration) -> Self {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Ticker { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Wait for the next tick, or forever when no ticker is armed.
///
/// Meant for a `select!` branch whose ticker comes and goes.
pub async fn next_tick(ticker: &mut Option<Ticker>) {
    match ticker {
        Some(t) => t.tick().await,
        None => future::pending::<()>().await,
    }
}
