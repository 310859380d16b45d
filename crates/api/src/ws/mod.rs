//! WebSocket push of live monitor events to browser clients.
//!
//! Provides connection management, heartbeat pings, the relay from the
//! event bus, and the HTTP upgrade handler used by Axum routes.

mod handler;
mod heartbeat;
pub mod manager;
mod relay;

pub use handler::ws_handler;
pub use heartbeat::{start_heartbeat, HEARTBEAT_INTERVAL};
pub use manager::WsManager;
pub use relay::EventRelay;
