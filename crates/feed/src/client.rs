//! WebSocket implementation of [`LiveFeed`].
//!
//! [`WebSocketFeed`] holds the feed URL. Each call to
//! [`LiveFeed::subscribe`] opens its own connection, sends a `subscribe`
//! frame and spawns a task that forwards matching snapshots to the
//! returned [`FeedSubscription`]. Dropped connections are re-established
//! with [`reconnect_loop`] and the subscription is re-sent.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use vitals_core::snapshot::Snapshot;

use crate::feed::{FeedError, FeedSubscription, LiveFeed};
use crate::messages::{parse_feed_message, FeedMessage, SubscribeRequest};
use crate::reconnect::{reconnect_loop, ReconnectConfig};

/// Snapshots buffered per subscription before the reader applies
/// back-pressure to the socket.
const CHANNEL_CAPACITY: usize = 64;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open a WebSocket connection to `url`.
pub async fn connect(url: &str) -> Result<WsStream, FeedError> {
    let (stream, _response) = connect_async(url)
        .await
        .map_err(|e| FeedError::Connection(format!("Failed to connect to feed at {url}: {e}")))?;
    Ok(stream)
}

/// Live feed reached over WebSocket.
pub struct WebSocketFeed {
    url: String,
    reconnect: ReconnectConfig,
}

impl WebSocketFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect: ReconnectConfig::default(),
        }
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LiveFeed for WebSocketFeed {
    async fn subscribe(&self, path: &str) -> Result<FeedSubscription, FeedError> {
        let stream = connect(&self.url).await?;
        tracing::info!(url = %self.url, path, "Connected to live feed");

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let cancel = CancellationToken::new();

        let url = self.url.clone();
        let reconnect = self.reconnect.clone();
        let path_owned = path.to_string();
        let cancel_clone = cancel.clone();

        tokio::spawn(async move {
            run_connection(stream, &url, &path_owned, &reconnect, &tx, &cancel_clone).await;
            tracing::info!(url = %url, path = %path_owned, "Feed connection task exited");
        });

        Ok(FeedSubscription::new(path, rx, cancel))
    }
}

/// How a single session ended.
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    Cancelled,
    ListenerGone,
    Disconnected,
}

/// Connection loop: run a session, reconnect when it drops.
///
/// Runs until the subscription is cancelled or its receiver is dropped.
async fn run_connection(
    mut stream: WsStream,
    url: &str,
    path: &str,
    reconnect: &ReconnectConfig,
    tx: &mpsc::Sender<Snapshot>,
    cancel: &CancellationToken,
) {
    loop {
        match run_session(stream, path, tx, cancel).await {
            SessionEnd::Cancelled | SessionEnd::ListenerGone => return,
            SessionEnd::Disconnected => {}
        }

        if cancel.is_cancelled() || tx.is_closed() {
            return;
        }

        tracing::info!(url, path, "Feed connection lost, entering reconnect loop");
        stream = match reconnect_loop(url, reconnect, cancel).await {
            Some(stream) => stream,
            None => return,
        };
    }
}

/// Drive one connection: send the subscription, then forward snapshots
/// until the socket closes or the subscription ends.
async fn run_session(
    stream: WsStream,
    path: &str,
    tx: &mpsc::Sender<Snapshot>,
    cancel: &CancellationToken,
) -> SessionEnd {
    let (mut ws_tx, mut ws_rx) = stream.split();

    let request = match serde_json::to_string(&SubscribeRequest::new(path)) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize subscribe request");
            return SessionEnd::Cancelled;
        }
    };
    if let Err(e) = ws_tx.send(Message::Text(request)).await {
        tracing::warn!(path, error = %e, "Failed to send subscribe request");
        return SessionEnd::Disconnected;
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = ws_tx.send(Message::Close(None)).await;
                return SessionEnd::Cancelled;
            }
            _ = tx.closed() => {
                let _ = ws_tx.send(Message::Close(None)).await;
                return SessionEnd::ListenerGone;
            }
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Some(end) = handle_text(&text, path, tx).await {
                        return end;
                    }
                }
                Some(Ok(Message::Ping(data))) => {
                    let _ = ws_tx.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(path, "Feed closed the connection");
                    return SessionEnd::Disconnected;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(path, error = %e, "Feed read error");
                    return SessionEnd::Disconnected;
                }
            }
        }
    }
}

async fn handle_text(text: &str, path: &str, tx: &mpsc::Sender<Snapshot>) -> Option<SessionEnd> {
    match parse_feed_message(text) {
        Ok(FeedMessage::Snapshot { path: from, data }) if from == path => {
            let snapshot = data.unwrap_or_default();
            if tx.send(snapshot).await.is_err() {
                return Some(SessionEnd::ListenerGone);
            }
        }
        Ok(FeedMessage::Snapshot { path: from, .. }) => {
            tracing::debug!(path, other = %from, "Ignoring snapshot for another path");
        }
        Ok(FeedMessage::Error { message }) => {
            tracing::error!(path, message = %message, "Feed reported an error");
        }
        Err(e) => {
            tracing::warn!(path, error = %e, "Malformed feed frame");
        }
    }
    None
}
