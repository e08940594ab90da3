//! Realtime change feed
//!
//! A subscription owns one background worker per table. The worker keeps a
//! websocket session alive (join, heartbeat, reconnect with backoff) and
//! fans decoded [`ChangeEvent`]s out over a broadcast channel.

mod transport;
mod worker;

pub use transport::{FeedConnector, FeedTransport, MemoryConnector, MemoryTransport, WsConnector};
pub use worker::FeedWorker;

use shared::feed::ChangeEvent;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Capacity of the fan-out channel; a slow consumer lags rather than
/// blocking the worker.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Handle to a running table subscription
#[derive(Debug)]
pub struct FeedSubscription {
    events: broadcast::Sender<ChangeEvent>,
    shutdown: CancellationToken,
}

impl FeedSubscription {
    /// Spawn the worker for `table`. Normally reached through
    /// `Backend::subscribe`; tests drive it with a memory connector.
    pub fn spawn(connector: Box<dyn FeedConnector>, table: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let shutdown = CancellationToken::new();
        let worker = FeedWorker::new(connector, table, events.clone(), shutdown.clone());
        tokio::spawn(worker.run());
        Self { events, shutdown }
    }

    /// New receiver for this subscription's events.
    pub fn events(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    /// Stop the worker. Idempotent.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
