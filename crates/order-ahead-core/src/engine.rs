//! The three engine operations over a plain sequence of orders.
//!
//! These are free functions so a caller can apply them to any collection;
//! [`OrderQueue`](crate::OrderQueue) strings them together for the
//! dashboard's working set.

use chrono::{DateTime, Utc};

use crate::countdown::Countdown;
use crate::order::{Order, OrderKey, RawOrder};

/// Enrich raw records with their arrival time.
///
/// There is no caching by identity: admitting the same record twice
/// yields two independent orders with freshly computed arrival dates.
/// Merging into a working set (replace vs append) is up to the caller.
pub fn admit(records: Vec<RawOrder>) -> Vec<Order> {
    records.into_iter().map(Order::from_raw).collect()
}

/// Refresh countdowns as seen from `now`.
///
/// Orders already expired are skipped and keep the countdown they had when
/// they expired. An order whose arrival time has been reached is flagged
/// expired and its key returned; each key is returned at most once over
/// the lifetime of the order.
pub fn tick(orders: &mut [Order], now: DateTime<Utc>) -> Vec<OrderKey> {
    let mut newly_expired = Vec::new();

    for order in orders.iter_mut().filter(|o| !o.is_expired) {
        match Countdown::from_millis(order.millis_until_arrival(now)) {
            Some(left) => {
                order.arrival_mins = left.minutes;
                order.arrival_seconds = left.seconds;
            }
            None => {
                order.is_expired = true;
                newly_expired.push(order.key.clone());
            }
        }
    }

    newly_expired
}

/// Order the working set for display.
///
/// Unexpired orders come first, soonest arrival first by whole minutes
/// (seconds are not a tie-breaker). Expired orders follow in the relative
/// order they already had.
pub fn sort(orders: Vec<Order>) -> Vec<Order> {
    let (mut unexpired, expired): (Vec<Order>, Vec<Order>) =
        orders.into_iter().partition(|o| !o.is_expired);

    // `sort_by_key` is stable, so equal minutes keep their order.
    unexpired.sort_by_key(|o| o.arrival_mins);
    unexpired.extend(expired);
    unexpired
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, m, s).unwrap()
    }

    fn raw(id: &str, eta: i64) -> RawOrder {
        RawOrder::new(id, format!("user-{id}"), at(12, 0, 0), eta)
    }

    #[test]
    fn admit_computes_arrival_date() {
        let orders = admit(vec![raw("a", 5), raw("b", 90)]);
        assert_eq!(orders[0].arrival_date, at(12, 5, 0));
        assert_eq!(orders[1].arrival_date, at(13, 30, 0));
        assert!(orders.iter().all(|o| !o.is_expired && !o.show_details));
    }

    #[test]
    fn admit_starts_unexpired_even_when_server_flagged() {
        let mut record = raw("a", 5);
        record.is_expired = true;
        let orders = admit(vec![record]);
        assert!(!orders[0].is_expired);
        assert!(orders[0].expiry_reported);
    }

    #[test]
    fn admit_twice_recomputes_from_record() {
        let record = raw("a", 5);
        let first = admit(vec![record.clone()]);
        let mut changed = record;
        changed.eta = 7;
        let second = admit(vec![changed]);
        assert_eq!(first[0].arrival_date, at(12, 5, 0));
        assert_eq!(second[0].arrival_date, at(12, 7, 0));
    }

    #[test]
    fn tick_refreshes_countdown_without_moving_arrival() {
        let mut orders = admit(vec![raw("a", 5)]);
        let arrival = orders[0].arrival_date;

        let expired = tick(&mut orders, at(12, 1, 30));
        assert!(expired.is_empty());
        assert_eq!((orders[0].arrival_mins, orders[0].arrival_seconds), (3, 30));

        tick(&mut orders, at(12, 4, 59));
        assert_eq!((orders[0].arrival_mins, orders[0].arrival_seconds), (0, 1));
        assert_eq!(orders[0].arrival_date, arrival);
    }

    #[test]
    fn tick_expires_exactly_once_and_freezes() {
        let mut orders = admit(vec![raw("a", 2)]);
        tick(&mut orders, at(12, 1, 58));
        let before = (orders[0].arrival_mins, orders[0].arrival_seconds);

        let first = tick(&mut orders, at(12, 2, 0));
        assert_eq!(first, vec![orders[0].key.clone()]);
        assert!(orders[0].is_expired);

        let second = tick(&mut orders, at(12, 10, 0));
        assert!(second.is_empty());
        assert_eq!((orders[0].arrival_mins, orders[0].arrival_seconds), before);
    }

    #[test]
    fn tick_with_no_time_left_at_admission() {
        let mut orders = admit(vec![raw("late", 0)]);
        let expired = tick(&mut orders, at(12, 0, 0));
        assert_eq!(expired.len(), 1);
    }

    #[test]
    fn sort_orders_by_minutes() {
        let mut orders = admit(vec![raw("a", 5), raw("b", 2)]);
        orders = sort(orders);
        assert_eq!(orders[0].key.transaction_oid, "b");
        assert_eq!(orders[1].key.transaction_oid, "a");
    }

    #[test]
    fn sort_ignores_seconds_and_is_stable() {
        let mut orders = admit(vec![raw("a", 0), raw("b", 0)]);
        orders[0].arrival_mins = 1;
        orders[0].arrival_seconds = 58;
        orders[1].arrival_mins = 1;
        orders[1].arrival_seconds = 2;
        let sorted = sort(orders);
        assert_eq!(sorted[0].key.transaction_oid, "a");
        assert_eq!(sorted[1].key.transaction_oid, "b");
    }

    #[test]
    fn expired_orders_always_last_in_existing_order() {
        let mut orders = admit(vec![raw("x1", 0), raw("live", 0), raw("x2", 0)]);
        orders[0].is_expired = true;
        orders[0].arrival_mins = 0;
        orders[1].arrival_mins = 59;
        orders[2].is_expired = true;
        orders[2].arrival_mins = 30;

        let ids: Vec<_> = sort(orders)
            .into_iter()
            .map(|o| o.key.transaction_oid)
            .collect();
        assert_eq!(ids, vec!["live", "x1", "x2"]);
    }

    #[test]
    fn countdown_never_negative_before_arrival() {
        let mut orders = admit(vec![raw("a", 3)]);
        let mut now = at(12, 0, 0);
        while now < orders[0].arrival_date {
            assert!(tick(&mut orders, now).is_empty());
            assert!(!orders[0].is_expired);
            now += Duration::milliseconds(750);
        }
    }
}
