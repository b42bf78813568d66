// crates/order-ahead-dashboard/src/app.rs

use order_ahead_core::{Order, OrderKey};
use order_ahead_service::{CommandTx, DashboardCommand, DashboardSnapshot};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OrderStatus {
    Arriving,
    Processing,
    Expired,
}

impl OrderStatus {
    pub fn of(order: &Order) -> Self {
        if order.is_expired {
            OrderStatus::Expired
        } else if order.is_processing {
            OrderStatus::Processing
        } else {
            OrderStatus::Arriving
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Arriving => "ARRIVING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Expired => "EXPIRED",
        }
    }
}

pub struct App {
    pub location: String,

    // UI state
    pub should_quit: bool,
    pub show_help: bool,
    pub selected_index: usize,

    // Latest view of the working set
    pub snapshot: DashboardSnapshot,

    commands: CommandTx,
}

impl App {
    pub fn new(location: &str, commands: CommandTx) -> Self {
        Self {
            location: location.to_string(),
            should_quit: false,
            show_help: false,
            selected_index: 0,
            snapshot: DashboardSnapshot::default(),
            commands,
        }
    }

    /// Take a new snapshot, keeping the cursor on the same order when it
    /// moved because of re-sorting.
    pub fn apply_snapshot(&mut self, snapshot: DashboardSnapshot) {
        let selected = self.selected_key();
        self.snapshot = snapshot;

        if let Some(key) = selected {
            if let Some(idx) = self.snapshot.orders.iter().position(|o| o.key == key) {
                self.selected_index = idx;
                return;
            }
        }
        self.clamp_selection();
    }

    pub fn selected_order(&self) -> Option<&Order> {
        self.snapshot.orders.get(self.selected_index)
    }

    pub fn selected_key(&self) -> Option<OrderKey> {
        self.selected_order().map(|o| o.key.clone())
    }

    pub fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.snapshot.orders.len() {
            self.selected_index += 1;
        }
    }

    pub fn process_selected(&self) {
        if let Some(order) = self.selected_order() {
            if OrderStatus::of(order) == OrderStatus::Arriving {
                self.send(DashboardCommand::Process(order.key.clone()));
            }
        }
    }

    pub fn clear_selected(&self) {
        if let Some(key) = self.selected_key() {
            self.send(DashboardCommand::Clear(key));
        }
    }

    pub fn toggle_selected_details(&self) {
        if let Some(key) = self.selected_key() {
            self.send(DashboardCommand::ToggleDetails(key));
        }
    }

    pub fn request_refresh(&self) {
        self.send(DashboardCommand::Refresh);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn expired_count(&self) -> usize {
        self.snapshot.orders.iter().filter(|o| o.is_expired).count()
    }

    fn clamp_selection(&mut self) {
        let len = self.snapshot.orders.len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    fn send(&self, cmd: DashboardCommand) {
        // The dashboard task only goes away while quitting.
        let _ = self.commands.send(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use order_ahead_core::RawOrder;
    use tokio::sync::mpsc;

    fn snapshot(ids: &[(&str, i64)]) -> DashboardSnapshot {
        let purchased = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        DashboardSnapshot {
            orders: ids
                .iter()
                .map(|(id, eta)| Order::from_raw(RawOrder::new(*id, "u", purchased, *eta)))
                .collect(),
            ..DashboardSnapshot::default()
        }
    }

    #[test]
    fn selection_follows_order_across_resort() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new("l1", tx);
        app.apply_snapshot(snapshot(&[("a", 1), ("b", 2), ("c", 3)]));
        app.move_selection_down();
        assert_eq!(app.selected_key().unwrap().transaction_oid, "b");

        app.apply_snapshot(snapshot(&[("new", 0), ("a", 1), ("b", 2), ("c", 3)]));
        assert_eq!(app.selected_index, 2);
        assert_eq!(app.selected_key().unwrap().transaction_oid, "b");
    }

    #[test]
    fn selection_clamped_when_order_disappears() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new("l1", tx);
        app.apply_snapshot(snapshot(&[("a", 1), ("b", 2)]));
        app.move_selection_down();
        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.apply_snapshot(snapshot(&[("a", 1)]));
        assert_eq!(app.selected_index, 0);

        app.apply_snapshot(snapshot(&[]));
        assert!(app.selected_order().is_none());
    }

    #[test]
    fn actions_send_commands_for_selected_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new("l1", tx);
        app.apply_snapshot(snapshot(&[("a", 1)]));

        app.process_selected();
        app.clear_selected();
        app.request_refresh();

        assert!(matches!(rx.try_recv(), Ok(DashboardCommand::Process(k)) if k.transaction_oid == "a"));
        assert!(matches!(rx.try_recv(), Ok(DashboardCommand::Clear(k)) if k.transaction_oid == "a"));
        assert!(matches!(rx.try_recv(), Ok(DashboardCommand::Refresh)));
    }

    #[test]
    fn expired_orders_cannot_be_processed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new("l1", tx);
        let mut snap = snapshot(&[("a", 1)]);
        snap.orders[0].is_expired = true;
        app.apply_snapshot(snap);

        app.process_selected();
        assert!(rx.try_recv().is_err());
        assert_eq!(OrderStatus::of(&app.snapshot.orders[0]).label(), "EXPIRED");
    }
}
