//! The live feed collaborator interface.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use vitals_core::snapshot::Snapshot;

/// Errors raised while subscribing to or reading from a live feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Failed to establish the connection to the feed.
    #[error("Connection error: {0}")]
    Connection(String),
}

/// A source of snapshots, addressed by path.
#[async_trait]
pub trait LiveFeed: Send + Sync {
    /// Register one standing listener on `path`.
    ///
    /// Snapshots arrive on the returned subscription until it is closed or
    /// dropped.
    async fn subscribe(&self, path: &str) -> Result<FeedSubscription, FeedError>;
}

/// One standing listener on a feed path.
///
/// Closing or dropping the subscription releases the listener on the
/// feed side.
#[derive(Debug)]
pub struct FeedSubscription {
    path: String,
    snapshots: mpsc::Receiver<Snapshot>,
    cancel: CancellationToken,
}

impl FeedSubscription {
    /// Wrap a snapshot channel. `cancel` is triggered when the subscription
    /// is closed so the producing side can tear down.
    pub fn new(
        path: impl Into<String>,
        snapshots: mpsc::Receiver<Snapshot>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            path: path.into(),
            snapshots,
            cancel,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Next snapshot, or `None` once the feed side has gone away.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.snapshots.recv().await
    }

    /// Release the listener. Idempotent.
    pub fn close(&mut self) {
        self.cancel.cancel();
        self.snapshots.close();
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
