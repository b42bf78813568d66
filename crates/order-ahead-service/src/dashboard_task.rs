//! Central dashboard loop.
//!
//! This task owns the `OrderQueue` and is the only place it is mutated.
//! It reacts to:
//! - `DashboardCommand`s from the screen and the live feed,
//! - completions of the API calls it spawned,
//! - the countdown ticker, armed only while an unexpired order exists.
//!
//! After every event it re-evaluates the ticker and publishes a fresh
//! `DashboardSnapshot`. Expiry notifications are fire-and-forget; process
//! and clear only touch local state once the API call succeeded.

use std::sync::Arc;
use std::time::Duration;

use order_ahead_core::{OrderKey, OrderQueue, RawOrder};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, SharedApi};
use crate::clock::Clock;
use crate::ticker::{next_tick, Ticker};
use crate::types::{
    CommandRx, CommandTx, DashboardCommand, DashboardSnapshot, SnapshotRx, SnapshotTx,
};

/// Result of an API call spawned by the dashboard task.
#[derive(Debug)]
enum Completion {
    Fetched(Result<Vec<RawOrder>, ApiError>),
    Processed(OrderKey, Result<(), ApiError>),
    Cleared(OrderKey, Result<(), ApiError>),
}

type CompletionTx = mpsc::UnboundedSender<Completion>;

/// Handle to a running dashboard task.
pub struct DashboardHandle {
    commands: CommandTx,
    snapshots: SnapshotRx,
    join: JoinHandle<()>,
}

impl DashboardHandle {
    /// A sender for the screen or the live feed.
    pub fn commands(&self) -> CommandTx {
        self.commands.clone()
    }

    pub fn send(&self, cmd: DashboardCommand) {
        if self.commands.send(cmd).is_err() {
            warn!("dashboard task is gone; command dropped");
        }
    }

    pub fn subscribe(&self) -> SnapshotRx {
        self.snapshots.clone()
    }

    /// Ask the task to stop and wait for it to release its resources.
    pub async fn shutdown(self) {
        let _ = self.commands.send(DashboardCommand::Shutdown);
        if let Err(e) = self.join.await {
            error!("dashboard task panicked: {}", e);
        }
    }
}

/// Spawn the dashboard task on the current runtime.
pub fn spawn_dashboard(api: SharedApi, clock: Arc<dyn Clock>, tick_period: Duration) -> DashboardHandle {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(DashboardSnapshot::default());

    let join = tokio::spawn(run_dashboard_loop(api, clock, tick_period, cmd_rx, snapshot_tx));

    DashboardHandle {
        commands: cmd_tx,
        snapshots: snapshot_rx,
        join,
    }
}

/// Run the dashboard processing loop until `Shutdown` or until every
/// command sender is dropped.
pub async fn run_dashboard_loop(
    api: SharedApi,
    clock: Arc<dyn Clock>,
    tick_period: Duration,
    mut cmd_rx: CommandRx,
    snapshot_tx: SnapshotTx,
) {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let mut state = DashboardState::new(api, clock, tick_period, done_tx, snapshot_tx);
    let mut ticker: Option<Ticker> = None;

    state.spawn_fetch();
    state.publish(false);

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(DashboardCommand::Shutdown) | None => break,
                Some(cmd) => state.handle_command(cmd),
            },
            Some(done) = done_rx.recv() => state.handle_completion(done),
            _ = next_tick(&mut ticker) => state.on_tick(),
        }

        state.sync_ticker(&mut ticker);
        state.publish(ticker.is_some());
    }

    if ticker.take().is_some() {
        debug!("ticker released on shutdown");
    }
    state.publish(false);
    info!("Dashboard loop shutting down");
}

struct DashboardState {
    api: SharedApi,
    clock: Arc<dyn Clock>,
    tick_period: Duration,
    queue: OrderQueue,
    done_tx: CompletionTx,
    snapshot_tx: SnapshotTx,
    loading: bool,
    status: Option<String>,
    expired_total: u64,
}

impl DashboardState {
    fn new(
        api: SharedApi,
        clock: Arc<dyn Clock>,
        tick_period: Duration,
        done_tx: CompletionTx,
        snapshot_tx: SnapshotTx,
    ) -> Self {
        DashboardState {
            api,
            clock,
            tick_period,
            queue: OrderQueue::new(),
            done_tx,
            snapshot_tx,
            loading: false,
            status: None,
            expired_total: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Event handlers
    // -------------------------------------------------------------------------

    fn handle_command(&mut self, cmd: DashboardCommand) {
        match cmd {
            DashboardCommand::Refresh => self.spawn_fetch(),
            DashboardCommand::Incoming(raw) => {
                info!(transaction = %raw.transaction_oid, eta = raw.eta, "incoming order");
                let expired = self.queue.append(raw, self.clock.now());
                self.notify_expired(expired);
            }
            DashboardCommand::Process(key) => {
                if self.queue.get(&key).is_none() {
                    warn!(transaction = %key.transaction_oid, "process requested for unknown order");
                    return;
                }
                let api = self.api.clone();
                let done_tx = self.done_tx.clone();
                tokio::spawn(async move {
                    let result = api.process_order(&key).await;
                    let _ = done_tx.send(Completion::Processed(key, result));
                });
            }
            DashboardCommand::Clear(key) => {
                if self.queue.get(&key).is_none() {
                    warn!(transaction = %key.transaction_oid, "clear requested for unknown order");
                    return;
                }
                let api = self.api.clone();
                let done_tx = self.done_tx.clone();
                tokio::spawn(async move {
                    let result = api.clear_order(&key).await;
                    let _ = done_tx.send(Completion::Cleared(key, result));
                });
            }
            DashboardCommand::ToggleDetails(key) => {
                self.queue.toggle_details(&key);
            }
            // Handled by the loop itself.
            DashboardCommand::Shutdown => {}
        }
    }

    fn handle_completion(&mut self, done: Completion) {
        match done {
            Completion::Fetched(Ok(records)) => {
                self.loading = false;
                self.status = None;
                info!(count = records.len(), "active orders loaded");
                let expired = self.queue.replace(records, self.clock.now());
                self.notify_expired(expired);
            }
            Completion::Fetched(Err(e)) => {
                self.loading = false;
                error!("failed to load active orders: {}", e);
                self.status = Some(format!("Could not load orders: {}", e));
            }
            Completion::Processed(key, Ok(())) => {
                if self.queue.mark_processing(&key) {
                    info!(transaction = %key.transaction_oid, "order processing");
                }
            }
            Completion::Processed(key, Err(e)) => {
                error!(transaction = %key.transaction_oid, "process failed: {}", e);
                self.status = Some(format!("Could not process {}: {}", key.transaction_oid, e));
            }
            Completion::Cleared(key, Ok(())) => {
                if self.queue.remove(&key).is_some() {
                    info!(transaction = %key.transaction_oid, "order cleared");
                }
            }
            Completion::Cleared(key, Err(e)) => {
                error!(transaction = %key.transaction_oid, "clear failed: {}", e);
                self.status = Some(format!("Could not clear {}: {}", key.transaction_oid, e));
            }
        }
    }

    fn on_tick(&mut self) {
        let expired = self.queue.tick(self.clock.now());
        self.notify_expired(expired);
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn spawn_fetch(&mut self) {
        self.loading = true;
        let api = self.api.clone();
        let done_tx = self.done_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_active_orders().await;
            let _ = done_tx.send(Completion::Fetched(result));
        });
    }

    /// One notification per newly expired order; the outcome is only logged.
    fn notify_expired(&mut self, keys: Vec<OrderKey>) {
        for key in keys {
            self.expired_total += 1;
            info!(transaction = %key.transaction_oid, user = %key.user_oid, "order expired");

            let api = self.api.clone();
            tokio::spawn(async move {
                if let Err(e) = api.set_order_expired(&key).await {
                    warn!(transaction = %key.transaction_oid, "expiry notification failed: {}", e);
                }
            });
        }
    }

    /// Arm the ticker while something is counting down, release it otherwise.
    fn sync_ticker(&self, ticker: &mut Option<Ticker>) {
        match (self.queue.needs_ticker(), ticker.is_some()) {
            (true, false) => {
                *ticker = Some(Ticker::start(self.tick_period));
                debug!("ticker armed");
            }
            (false, true) => {
                *ticker = None;
                debug!("ticker released");
            }
            _ => {}
        }
    }

    fn publish(&self, ticker_active: bool) {
        self.snapshot_tx.send_replace(DashboardSnapshot {
            orders: self.queue.orders().to_vec(),
            ticker_active,
            loading: self.loading,
            status: self.status.clone(),
            expired_total: self.expired_total,
            updated_at: Some(self.clock.now()),
        });
    }
}
