//! Feed worker integration tests, driven over the in-memory transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use comanda_client::feed::{FeedConnector, FeedSubscription, FeedTransport, FeedWorker, MemoryConnector};
use comanda_client::{ChangeAction, ClientError, ClientResult};
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};
use tokio_util::sync::CancellationToken;

/// Fake server side of a subscription: the worker reads from `server_tx`
/// and writes into `client_tx`.
fn wire() -> (
    broadcast::Sender<String>,
    broadcast::Sender<String>,
    broadcast::Receiver<String>,
) {
    let (server_tx, _) = broadcast::channel(32);
    let (client_tx, from_worker) = broadcast::channel(32);
    (server_tx, client_tx, from_worker)
}

fn change_frame(action: &str, table: &str, record: serde_json::Value) -> String {
    serde_json::json!({
        "topic": format!("realtime:public:{table}"),
        "event": "postgres_changes",
        "payload": { "data": { "type": action, "table": table, "record": record } },
        "ref": null
    })
    .to_string()
}

async fn next_frame(rx: &mut broadcast::Receiver<String>) -> serde_json::Value {
    let text = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for worker frame")
        .expect("worker channel closed");
    serde_json::from_str(&text).expect("worker sent invalid JSON")
}

#[tokio::test]
async fn subscription_joins_and_decodes_changes() {
    let (server_tx, client_tx, mut from_worker) = wire();
    let connector = MemoryConnector::new(server_tx.clone(), client_tx);

    let subscription = FeedSubscription::spawn(Box::new(connector), "payments");
    let mut events = subscription.events();

    // the first outbound frame is the topic join
    let join = next_frame(&mut from_worker).await;
    assert_eq!(join["event"], "phx_join");
    assert_eq!(join["topic"], "realtime:public:payments");
    assert_eq!(
        join["payload"]["config"]["postgres_changes"][0]["table"],
        "payments"
    );

    server_tx
        .send(change_frame(
            "INSERT",
            "payments",
            serde_json::json!({ "id": "p1", "amount": 12.5 }),
        ))
        .unwrap();

    let event = timeout(Duration::from_secs(1), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.action, ChangeAction::Insert);
    assert_eq!(event.table, "payments");
    assert_eq!(event.record.unwrap()["id"], "p1");
}

#[tokio::test]
async fn update_frames_carry_old_and_new_rows() {
    let (server_tx, client_tx, mut from_worker) = wire();
    let connector = MemoryConnector::new(server_tx.clone(), client_tx);

    let subscription = FeedSubscription::spawn(Box::new(connector), "payments");
    let mut events = subscription.events();
    let _ = next_frame(&mut from_worker).await; // join

    server_tx
        .send(
            serde_json::json!({
                "topic": "realtime:public:payments",
                "event": "postgres_changes",
                "payload": { "data": {
                    "type": "UPDATE",
                    "table": "payments",
                    "record": { "id": "p1", "amount": 20.0 },
                    "old_record": { "id": "p1", "amount": 12.5 }
                } },
                "ref": null
            })
            .to_string(),
        )
        .unwrap();

    let event = timeout(Duration::from_secs(1), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.action, ChangeAction::Update);
    assert_eq!(event.record.unwrap()["amount"], 20.0);
    assert_eq!(event.old_record.unwrap()["amount"], 12.5);
}

#[tokio::test]
async fn non_change_frames_are_ignored() {
    let (server_tx, client_tx, mut from_worker) = wire();
    let connector = MemoryConnector::new(server_tx.clone(), client_tx);

    let subscription = FeedSubscription::spawn(Box::new(connector), "payments");
    let mut events = subscription.events();
    let _ = next_frame(&mut from_worker).await; // join

    // replies, unknown events and garbage must not produce change events
    server_tx
        .send(r#"{"topic":"realtime:public:payments","event":"phx_reply","payload":{"status":"ok"}}"#.to_string())
        .unwrap();
    server_tx
        .send(r#"{"topic":"phoenix","event":"system","payload":{}}"#.to_string())
        .unwrap();
    server_tx.send("not json at all".to_string()).unwrap();
    server_tx
        .send(change_frame(
            "DELETE",
            "payments",
            serde_json::Value::Null,
        ))
        .unwrap();

    let event = timeout(Duration::from_secs(1), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.action, ChangeAction::Delete);
}

#[tokio::test]
async fn heartbeat_is_sent_on_schedule() {
    let (server_tx, client_tx, mut from_worker) = wire();
    let connector = MemoryConnector::new(server_tx, client_tx);

    let (events_tx, _) = broadcast::channel(8);
    let shutdown = CancellationToken::new();
    let worker = FeedWorker::new(Box::new(connector), "orders", events_tx, shutdown.clone())
        .with_heartbeat_interval(Duration::from_millis(50));
    tokio::spawn(worker.run());

    let join = next_frame(&mut from_worker).await;
    assert_eq!(join["event"], "phx_join");

    let heartbeat = next_frame(&mut from_worker).await;
    assert_eq!(heartbeat["event"], "heartbeat");
    assert_eq!(heartbeat["topic"], "phoenix");

    shutdown.cancel();
}

/// Connector that fails its first attempts, then hands out memory transports.
struct FlakyConnector {
    inner: MemoryConnector,
    attempts: Arc<AtomicU32>,
    failures: u32,
}

#[async_trait::async_trait]
impl FeedConnector for FlakyConnector {
    async fn connect(&self) -> ClientResult<Box<dyn FeedTransport>> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            return Err(ClientError::Feed("simulated connect failure".into()));
        }
        self.inner.connect().await
    }
}

#[tokio::test]
async fn reconnects_after_a_failed_connect() {
    let (server_tx, client_tx, mut from_worker) = wire();
    let attempts = Arc::new(AtomicU32::new(0));
    let connector = FlakyConnector {
        inner: MemoryConnector::new(server_tx, client_tx),
        attempts: attempts.clone(),
        failures: 1,
    };

    let (events_tx, _) = broadcast::channel(8);
    let shutdown = CancellationToken::new();
    let worker = FeedWorker::new(Box::new(connector), "orders", events_tx, shutdown.clone())
        .with_reconnect_delay(Duration::from_millis(10));
    tokio::spawn(worker.run());

    // the join only appears once the second connect attempt succeeded
    let join = next_frame(&mut from_worker).await;
    assert_eq!(join["event"], "phx_join");
    assert!(attempts.load(Ordering::SeqCst) >= 2);

    shutdown.cancel();
}

#[tokio::test]
async fn stop_tears_the_session_down() {
    let (server_tx, client_tx, mut from_worker) = wire();
    let connector = MemoryConnector::new(server_tx.clone(), client_tx);

    let subscription = FeedSubscription::spawn(Box::new(connector), "payments");
    let mut events = subscription.events();
    let _ = next_frame(&mut from_worker).await; // join

    subscription.stop();

    // the worker drops its transport, releasing the server-side receiver
    let mut gone = false;
    for _ in 0..100 {
        if server_tx.receiver_count() == 0 {
            gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(gone, "worker kept the transport after stop");

    // and no further events are delivered
    let result = timeout(Duration::from_millis(200), events.recv()).await;
    assert!(result.is_err(), "expected no events after stop");
}
