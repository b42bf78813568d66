// crates/order-ahead-service/src/live_feed.rs

use std::time::Duration;

use anyhow::Result;
use futures::StreamExt;
use order_ahead_protocol::json_codec::decode_live_frame;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::types::{CommandTx, DashboardCommand};

/// How a feed connection ended.
#[derive(Debug, PartialEq, Eq)]
enum FeedEnd {
    /// The server closed the socket; worth reconnecting.
    Closed,
    /// Nobody is listening for orders anymore.
    ReceiverGone,
}

/// Websocket subscriber pushing new orders into the dashboard task.
pub struct LiveFeed {
    url: String,
    cmd_tx: CommandTx,
    reconnect_attempts: u32,
}

impl LiveFeed {
    pub fn new(url: impl Into<String>, cmd_tx: CommandTx) -> Self {
        Self {
            url: url.into(),
            cmd_tx,
            reconnect_attempts: 0,
        }
    }

    /// Stream until the dashboard task goes away, reconnecting on failure.
    pub async fn run(mut self) {
        loop {
            match self.stream_once().await {
                Ok(FeedEnd::ReceiverGone) => break,
                Ok(FeedEnd::Closed) => warn!("Live feed closed by server"),
                Err(e) => error!("Live feed error: {}", e),
            }

            if self.cmd_tx.is_closed() {
                break;
            }
            self.backoff().await;
        }
        info!("Live feed stopped");
    }

    async fn stream_once(&mut self) -> Result<FeedEnd> {
        info!("Connecting to live feed {}...", self.url);
        let (mut ws, _) = connect_async(self.url.as_str()).await?;
        self.reconnect_attempts = 0;
        info!("Live feed connected");

        while let Some(msg) = ws.next().await {
            match msg? {
                Message::Text(text) => {
                    if !self.forward(text.as_str()) {
                        return Ok(FeedEnd::ReceiverGone);
                    }
                }
                Message::Close(_) => return Ok(FeedEnd::Closed),
                _ => {}
            }
        }
        Ok(FeedEnd::Closed)
    }

    /// Hand a frame to the dashboard. Returns `false` once nobody listens.
    fn forward(&self, text: &str) -> bool {
        match decode_live_frame(text) {
            Ok(Some(order)) => {
                debug!(transaction = %order.transaction_oid, "live order received");
                self.cmd_tx.send(DashboardCommand::Incoming(order)).is_ok()
            }
            Ok(None) => {
                debug!("ignoring live event");
                true
            }
            Err(e) => {
                warn!("Skipping malformed live frame: {}", e);
                true
            }
        }
    }

    async fn backoff(&mut self) {
        self.reconnect_attempts += 1;

        // Exponential backoff
        let delay = Duration::from_millis(1000 * (2_u64.pow(self.reconnect_attempts.min(5))));
        warn!("Reconnecting to live feed in {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use order_ahead_core::RawOrder;
    use order_ahead_protocol::encode_live_frame;
    use tokio::sync::mpsc;

    #[test]
    fn forwards_new_orders_only() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let feed = LiveFeed::new("ws://unused", tx);

        let order = RawOrder::new("t1", "u1", Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(), 3);
        assert!(feed.forward(&encode_live_frame(&order).unwrap()));
        assert!(feed.forward(r#"{"event": "somethingElse", "data": {}}"#));
        assert!(feed.forward("{{{"));
        assert!(feed.forward(
            r#"{"event": "incomingNewOrder", "data": {"transactionOid": "t2", "userOid": "u2",
                "purchaseDate": "2024-03-01T12:00:00Z", "eta": 200000000000}}"#
        ));

        match rx.try_recv() {
            Ok(DashboardCommand::Incoming(got)) => assert_eq!(got, order),
            other => panic!("expected incoming order, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn reports_receiver_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        let feed = LiveFeed::new("ws://unused", tx);
        drop(rx);

        let order = RawOrder::new("t1", "u1", Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(), 3);
        assert!(!feed.forward(&encode_live_frame(&order).unwrap()));
    }
}
