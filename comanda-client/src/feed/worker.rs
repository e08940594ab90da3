//! Feed worker: one websocket session per subscribed table
//!
//! 1. Connect through the connector
//! 2. Join the table topic
//! 3. Heartbeat every 25 s
//! 4. Decode change notifications → broadcast fan-out
//! 5. Reconnect with exponential backoff on disconnect

use serde::{Deserialize, Serialize};
use shared::feed::{ChangeAction, ChangeEvent};
use tokio::sync::broadcast;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::feed::transport::{FeedConnector, FeedTransport};

/// Keepalive heartbeat interval
const HEARTBEAT_INTERVAL_SECS: u64 = 25;
/// Initial reconnect delay
const INITIAL_RECONNECT_DELAY_SECS: u64 = 5;
/// Max reconnect delay
const MAX_RECONNECT_DELAY_SECS: u64 = 120;

/// Frame sent to the realtime endpoint
#[derive(Serialize)]
struct OutboundFrame<'a> {
    topic: &'a str,
    event: &'a str,
    payload: serde_json::Value,
    #[serde(rename = "ref")]
    reference: String,
}

/// Frame received from the realtime endpoint
#[derive(Deserialize)]
struct InboundFrame {
    #[serde(default)]
    topic: String,
    event: String,
    #[serde(default)]
    payload: serde_json::Value,
}

/// Payload of a `postgres_changes` frame
#[derive(Deserialize)]
struct ChangePayload {
    data: ChangeData,
}

#[derive(Deserialize)]
struct ChangeData {
    #[serde(rename = "type")]
    action: ChangeAction,
    table: String,
    #[serde(default)]
    record: Option<serde_json::Value>,
    #[serde(default)]
    old_record: Option<serde_json::Value>,
}

pub struct FeedWorker {
    connector: Box<dyn FeedConnector>,
    table: String,
    topic: String,
    events: broadcast::Sender<ChangeEvent>,
    shutdown: CancellationToken,
    heartbeat_interval: Duration,
    initial_reconnect_delay: Duration,
    next_ref: u64,
}

impl FeedWorker {
    pub fn new(
        connector: Box<dyn FeedConnector>,
        table: &str,
        events: broadcast::Sender<ChangeEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            connector,
            table: table.to_string(),
            topic: format!("realtime:public:{table}"),
            events,
            shutdown,
            heartbeat_interval: Duration::from_secs(HEARTBEAT_INTERVAL_SECS),
            initial_reconnect_delay: Duration::from_secs(INITIAL_RECONNECT_DELAY_SECS),
            next_ref: 0,
        }
    }

    /// Override the heartbeat interval (tests use a short one).
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Override the initial reconnect delay (tests use a short one).
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.initial_reconnect_delay = delay;
        self
    }

    /// Main run loop: connect, run the session, reconnect on failure.
    pub async fn run(mut self) {
        tracing::info!(table = %self.table, "feed worker started");
        let mut reconnect_delay = self.initial_reconnect_delay;

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            match self.connector.connect().await {
                Ok(transport) => {
                    reconnect_delay = self.initial_reconnect_delay;
                    self.run_session(transport.as_ref()).await;
                }
                Err(e) => {
                    tracing::warn!(table = %self.table, "feed connect failed: {e}");
                }
            }

            if self.shutdown.is_cancelled() {
                break;
            }

            tracing::debug!(
                table = %self.table,
                delay_secs = reconnect_delay.as_secs(),
                "feed reconnecting after delay"
            );
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(reconnect_delay) => {},
            }
            reconnect_delay =
                (reconnect_delay * 2).min(Duration::from_secs(MAX_RECONNECT_DELAY_SECS));
        }

        tracing::info!(table = %self.table, "feed worker stopped");
    }

    /// Run a single session until disconnect or shutdown.
    async fn run_session(&mut self, transport: &dyn FeedTransport) {
        let join = self.join_frame();
        if let Err(e) = transport.write_text(&join).await {
            tracing::warn!(table = %self.table, "feed join failed: {e}");
            return;
        }

        let mut heartbeat = tokio::time::interval(self.heartbeat_interval);
        heartbeat.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    let _ = transport.close().await;
                    return;
                }

                _ = heartbeat.tick() => {
                    let frame = self.heartbeat_frame();
                    if let Err(e) = transport.write_text(&frame).await {
                        tracing::warn!(table = %self.table, "feed heartbeat failed: {e}");
                        return;
                    }
                }

                frame = transport.read_text() => {
                    match frame {
                        Ok(Some(text)) => self.handle_frame(&text),
                        Ok(None) => {
                            tracing::info!(table = %self.table, "feed closed by server");
                            return;
                        }
                        Err(e) => {
                            tracing::warn!(table = %self.table, "feed read failed: {e}");
                            return;
                        }
                    }
                }
            }
        }
    }

    fn handle_frame(&self, text: &str) {
        let frame: InboundFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(table = %self.table, "undecodable feed frame: {e}");
                return;
            }
        };

        match frame.event.as_str() {
            "postgres_changes" => {
                let payload: ChangePayload = match serde_json::from_value(frame.payload) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!(table = %self.table, "bad change payload: {e}");
                        return;
                    }
                };
                let data = payload.data;
                tracing::debug!(table = %data.table, action = %data.action, "row change");
                // A send error only means nobody is listening right now.
                let _ = self.events.send(ChangeEvent {
                    table: data.table,
                    action: data.action,
                    record: data.record,
                    old_record: data.old_record,
                });
            }
            "phx_reply" => {
                tracing::trace!(topic = %frame.topic, "reply acknowledged");
            }
            "phx_error" => {
                tracing::warn!(topic = %frame.topic, "channel reported an error");
            }
            other => {
                tracing::trace!(event = other, "ignoring feed frame");
            }
        }
    }

    fn join_frame(&mut self) -> String {
        let payload = serde_json::json!({
            "config": {
                "postgres_changes": [
                    { "event": "*", "schema": "public", "table": self.table }
                ]
            }
        });
        let reference = self.next_reference();
        render_frame(&OutboundFrame {
            topic: &self.topic,
            event: "phx_join",
            payload,
            reference,
        })
    }

    fn heartbeat_frame(&mut self) -> String {
        let reference = self.next_reference();
        render_frame(&OutboundFrame {
            topic: "phoenix",
            event: "heartbeat",
            payload: serde_json::json!({}),
            reference,
        })
    }

    fn next_reference(&mut self) -> String {
        self.next_ref += 1;
        self.next_ref.to_string()
    }
}

// Outbound frames hold plain JSON-safe fields; serialization cannot fail.
fn render_frame(frame: &OutboundFrame<'_>) -> String {
    serde_json::to_string(frame).unwrap_or_default()
}
