//! Feed transport abstraction
//!
//! The worker only ever sees text frames. The websocket transport handles
//! the real backend; the memory transport drives the worker in-process for
//! tests.

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, broadcast};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::{ClientError, ClientResult};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport abstraction for the realtime socket
#[async_trait]
pub trait FeedTransport: Send + Sync {
    /// Next text frame. `Ok(None)` when the peer closed the connection.
    async fn read_text(&self) -> ClientResult<Option<String>>;
    async fn write_text(&self, text: &str) -> ClientResult<()>;
    async fn close(&self) -> ClientResult<()>;
}

/// Produces a fresh transport for every (re)connection attempt
#[async_trait]
pub trait FeedConnector: Send + Sync {
    async fn connect(&self) -> ClientResult<Box<dyn FeedTransport>>;
}

/// WebSocket transport implementation
pub struct WsTransport {
    reader: Arc<Mutex<SplitStream<WsStream>>>,
    writer: Arc<Mutex<SplitSink<WsStream, Message>>>,
}

impl WsTransport {
    pub async fn connect(url: &str) -> ClientResult<Self> {
        let (ws, _) = connect_async(url)
            .await
            .map_err(|e| ClientError::Feed(format!("connect failed: {e}")))?;
        let (writer, reader) = ws.split();
        Ok(Self {
            reader: Arc::new(Mutex::new(reader)),
            writer: Arc::new(Mutex::new(writer)),
        })
    }
}

#[async_trait]
impl FeedTransport for WsTransport {
    async fn read_text(&self) -> ClientResult<Option<String>> {
        let mut reader = self.reader.lock().await;
        loop {
            match reader.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text.to_string())),
                Some(Ok(Message::Ping(data))) => {
                    let mut writer = self.writer.lock().await;
                    let _ = writer.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => {} // Binary, Pong: ignore
                Some(Err(e)) => return Err(ClientError::Feed(e.to_string())),
            }
        }
    }

    async fn write_text(&self, text: &str) -> ClientResult<()> {
        let mut writer = self.writer.lock().await;
        writer
            .send(Message::Text(text.to_string().into()))
            .await
            .map_err(|e| ClientError::Feed(e.to_string()))
    }

    async fn close(&self) -> ClientResult<()> {
        let mut writer = self.writer.lock().await;
        let _ = writer.send(Message::Close(None)).await;
        Ok(())
    }
}

/// Connector for the real backend
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl FeedConnector for WsConnector {
    async fn connect(&self) -> ClientResult<Box<dyn FeedTransport>> {
        Ok(Box::new(WsTransport::connect(&self.url).await?))
    }
}

/// Memory transport implementation (for in-process tests)
#[derive(Debug)]
pub struct MemoryTransport {
    /// Frames FROM the fake server
    rx: Arc<Mutex<broadcast::Receiver<String>>>,
    /// Frames TO the fake server
    tx: broadcast::Sender<String>,
}

impl MemoryTransport {
    pub fn new(server_tx: &broadcast::Sender<String>, client_tx: &broadcast::Sender<String>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(server_tx.subscribe())),
            tx: client_tx.clone(),
        }
    }
}

#[async_trait]
impl FeedTransport for MemoryTransport {
    async fn read_text(&self) -> ClientResult<Option<String>> {
        let mut rx = self.rx.lock().await;
        loop {
            match rx.recv().await {
                Ok(text) => return Ok(Some(text)),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return Ok(None),
            }
        }
    }

    async fn write_text(&self, text: &str) -> ClientResult<()> {
        self.tx
            .send(text.to_string())
            .map_err(|e| ClientError::Feed(format!("memory channel closed: {e}")))?;
        Ok(())
    }

    async fn close(&self) -> ClientResult<()> {
        Ok(())
    }
}

/// Connector handing out memory transports over a fixed channel pair
pub struct MemoryConnector {
    server_tx: broadcast::Sender<String>,
    client_tx: broadcast::Sender<String>,
}

impl MemoryConnector {
    pub fn new(server_tx: broadcast::Sender<String>, client_tx: broadcast::Sender<String>) -> Self {
        Self {
            server_tx,
            client_tx,
        }
    }
}

#[async_trait]
impl FeedConnector for MemoryConnector {
    async fn connect(&self) -> ClientResult<Box<dyn FeedTransport>> {
        Ok(Box::new(MemoryTransport::new(
            &self.server_tx,
            &self.client_tx,
        )))
    }
}
