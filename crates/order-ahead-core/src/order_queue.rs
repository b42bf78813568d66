//! The working set of in-flight orders.
//!
//! `OrderQueue` is the explicit state object a dashboard owns. Every
//! mutation goes through it so the list stays partitioned (unexpired by
//! arrival, then expired) after each change.

use chrono::{DateTime, Utc};

use crate::engine::{admit, sort, tick};
use crate::order::{Order, OrderKey, RawOrder};

#[derive(Debug, Default, Clone)]
pub struct OrderQueue {
    orders: Vec<Order>,
}

impl OrderQueue {
    pub fn new() -> Self {
        OrderQueue::default()
    }

    /// Bulk path: the fetched list replaces the working set.
    ///
    /// Returns the keys that were already past arrival at `now`.
    pub fn replace(&mut self, records: Vec<RawOrder>, now: DateTime<Utc>) -> Vec<OrderKey> {
        self.orders = admit(records);
        self.refresh(now)
    }

    /// Live path: a single pushed order is appended to the working set.
    pub fn append(&mut self, record: RawOrder, now: DateTime<Utc>) -> Vec<OrderKey> {
        self.orders.extend(admit(vec![record]));
        self.refresh(now)
    }

    /// Periodic refresh: recompute countdowns, flag expiries, re-sort.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<OrderKey> {
        self.refresh(now)
    }

    /// Explicit removal (the clear action). Expiry never removes.
    pub fn remove(&mut self, key: &OrderKey) -> Option<Order> {
        let idx = self.orders.iter().position(|o| &o.key == key)?;
        Some(self.orders.remove(idx))
    }

    /// Flag an order as being fulfilled. Returns `false` if unknown.
    pub fn mark_processing(&mut self, key: &OrderKey) -> bool {
        match self.get_mut(key) {
            Some(order) => {
                order.is_processing = true;
                true
            }
            None => false,
        }
    }

    /// Flip the display-only details flag. Returns `false` if unknown.
    pub fn toggle_details(&mut self, key: &OrderKey) -> bool {
        match self.get_mut(key) {
            Some(order) => {
                order.show_details = !order.show_details;
                true
            }
            None => false,
        }
    }

    /// Whether the periodic tick has any work to do.
    pub fn needs_ticker(&self) -> bool {
        self.orders.iter().any(|o| !o.is_expired)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, key: &OrderKey) -> Option<&Order> {
        self.orders.iter().find(|o| &o.key == key)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn expired_count(&self) -> usize {
        self.orders.iter().filter(|o| o.is_expired).count()
    }

    fn get_mut(&mut self, key: &OrderKey) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| &o.key == key)
    }

    /// Tick and re-sort. Expiries the server already reported are not
    /// handed back for notification.
    fn refresh(&mut self, now: DateTime<Utc>) -> Vec<OrderKey> {
        let newly_expired = tick(&mut self.orders, now);
        self.orders = sort(std::mem::take(&mut self.orders));
        newly_expired
            .into_iter()
            .filter(|key| self.get(key).map_or(true, |o| !o.expiry_reported))
            .collect()
    }
}
