//! Live feed WebSocket message types and parser.
//!
//! The feed speaks JSON text frames tagged by `"type"`:
//!
//! ```text
//! -> {"type": "subscribe", "path": "monitoring"}
//! <- {"type": "snapshot", "path": "monitoring", "data": {"ecg": "72", "hr": "98", "fall": "2.0"}}
//! <- {"type": "error", "message": "permission denied"}
//! ```

use serde::{Deserialize, Serialize};
use vitals_core::metric_names::MSG_TYPE_SUBSCRIBE;
use vitals_core::snapshot::Snapshot;

/// Messages the feed sends to us.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    /// Current value of a subscribed path. `data` is `null` when the path
    /// holds nothing.
    Snapshot {
        path: String,
        #[serde(default)]
        data: Option<Snapshot>,
    },

    /// Server-side failure for this connection.
    Error { message: String },
}

/// Listener registration sent right after connecting.
#[derive(Debug, Serialize)]
pub struct SubscribeRequest<'a> {
    r#type: &'static str,
    path: &'a str,
}

impl<'a> SubscribeRequest<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            r#type: MSG_TYPE_SUBSCRIBE,
            path,
        }
    }
}

/// Parse one text frame.
pub fn parse_feed_message(text: &str) -> Result<FeedMessage, serde_json::Error> {
    serde_json::from_str(text)
}
