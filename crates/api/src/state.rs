use std::sync::Arc;

use tokio::sync::watch;
use vitals_events::{EventLogReader, WarningLogStore};
use vitals_feed::DashboardState;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc` or is a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Backing store of the warning log; used for health reporting.
    pub store: Arc<dyn WarningLogStore>,
    /// Read side of the warning log for the configured subject.
    pub reader: Arc<EventLogReader>,
    /// Latest dashboard state published by the live subscription.
    pub dashboard: watch::Receiver<DashboardState>,
    /// Browser WebSocket connections.
    pub ws_manager: Arc<WsManager>,
}
