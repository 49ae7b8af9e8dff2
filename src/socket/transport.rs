use async_trait::async_trait;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};

use super::messages::{ServerEvent, TurnMessage};
use crate::error::{ClientError, Result};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Transport carrying one session's socket traffic.
///
/// Implementations parse inbound frames and deliver them as [`ServerEvent`]s
/// over a single ordered channel; the session reducer never sees transport
/// mechanics. The channel closing means the connection is gone — there is no
/// reconnect, the operator restarts the session instead.
#[async_trait]
pub trait SocketTransport: Send + Sync {
    /// Connect and start delivering events.
    ///
    /// Returns the receiving end of the inbound event channel. Events are
    /// delivered in the order the server sent them.
    async fn open(&mut self) -> Result<mpsc::Receiver<ServerEvent>>;

    /// Send an ordinary user turn.
    async fn send_turn(&mut self, turn: &TurnMessage) -> Result<()>;

    /// Send the distinguished end-of-interview frame (workplace sessions).
    async fn send_end(&mut self) -> Result<()>;

    /// Close the connection. Safe to call more than once.
    async fn close(&mut self) -> Result<()>;

    /// Whether the connection is currently open.
    fn is_open(&self) -> bool;

    /// Transport name for logging.
    fn name(&self) -> &str;
}

/// WebSocket implementation of [`SocketTransport`].
pub struct WebSocketTransport {
    url: String,
    sink: Option<WsSink>,
    reader_task: Option<JoinHandle<()>>,
}

impl WebSocketTransport {
    /// Channel capacity for inbound events. Chunks are small and applied
    /// promptly, so a shallow buffer is enough to absorb bursts.
    const EVENT_BUFFER: usize = 64;

    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            sink: None,
            reader_task: None,
        }
    }

    async fn send_frame(&mut self, payload: String) -> Result<()> {
        let sink = self
            .sink
            .as_mut()
            .ok_or_else(|| ClientError::Transport("socket is not open".to_string()))?;

        sink.send(Message::Text(payload))
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }
}

#[async_trait]
impl SocketTransport for WebSocketTransport {
    async fn open(&mut self) -> Result<mpsc::Receiver<ServerEvent>> {
        info!("Connecting to interview socket at {}", self.url);

        let (ws, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        info!("Interview socket connected");

        let (sink, mut stream) = ws.split();
        let (event_tx, event_rx) = mpsc::channel(Self::EVENT_BUFFER);

        let reader = tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ServerEvent>(&text) {
                            Ok(event) => {
                                if event_tx.send(event).await.is_err() {
                                    // Receiver dropped; the session is gone.
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!("Failed to parse socket frame: {}", e);
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        info!("Interview socket closed by server");
                        break;
                    }
                    // Pings are answered by the protocol layer.
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Interview socket read error: {}", e);
                        break;
                    }
                }
            }
        });

        self.sink = Some(sink);
        self.reader_task = Some(reader);

        Ok(event_rx)
    }

    async fn send_turn(&mut self, turn: &TurnMessage) -> Result<()> {
        let payload = serde_json::to_string(turn)?;
        self.send_frame(payload).await
    }

    async fn send_end(&mut self) -> Result<()> {
        let payload = serde_json::json!({ "type": "end" }).to_string();
        self.send_frame(payload).await
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut sink) = self.sink.take() {
            info!("Closing interview socket");
            // Best effort; the server may already be gone.
            sink.send(Message::Close(None)).await.ok();
            sink.close().await.ok();
        }

        if let Some(task) = self.reader_task.take() {
            task.abort();
        }

        Ok(())
    }

    fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    fn name(&self) -> &str {
        "websocket"
    }
}
