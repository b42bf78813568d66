use std::time::Duration;

use chrono::{TimeZone, Utc};
use futures::SinkExt;
use order_ahead_core::RawOrder;
use order_ahead_protocol::encode_live_frame;
use order_ahead_service::{DashboardCommand, LiveFeed};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

#[tokio::test]
async fn forwards_pushed_orders_and_skips_other_frames() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let order = RawOrder::new(
        "t-live",
        "u-live",
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        6,
    );
    let frame = encode_live_frame(&order).unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        let greeting = r#"{"event": "hello", "data": null}"#.to_string();
        ws.send(Message::Text(greeting.into())).await.unwrap();
        ws.send(Message::Text("garbage".to_string().into())).await.unwrap();
        ws.send(Message::Text(frame.into())).await.unwrap();
        let _ = ws.close(None).await;
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let feed = tokio::spawn(LiveFeed::new(format!("ws://{addr}"), tx).run());

    let cmd = timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no order forwarded")
        .expect("feed dropped its sender");

    match cmd {
        DashboardCommand::Incoming(got) => assert_eq!(got, order),
        other => panic!("unexpected command: {other:?}"),
    }

    feed.abort();
    let _ = server.await;
}
