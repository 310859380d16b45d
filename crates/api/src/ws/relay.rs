use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use vitals_events::MonitorEvent;

use crate::ws::manager::WsManager;

/// Forwards every [`MonitorEvent`] on the bus to all browser WebSockets as
/// a JSON text frame.
pub struct EventRelay {
    ws_manager: Arc<WsManager>,
}

impl EventRelay {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run until `cancel` fires or the bus closes.
    pub async fn run(
        self,
        mut receiver: broadcast::Receiver<MonitorEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                event = receiver.recv() => event,
            };

            match event {
                Ok(event) => self.forward(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event relay shutting down");
                    break;
                }
            }
        }
    }

    async fn forward(&self, event: &MonitorEvent) {
        match serde_json::to_string(event) {
            Ok(json) => self.ws_manager.broadcast(Message::Text(json.into())).await,
            Err(e) => tracing::error!(error = %e, "Failed to serialize monitor event"),
        }
    }
}
