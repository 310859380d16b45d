//! In-process [`LiveFeed`] backed by `tokio::sync::mpsc` channels.
//!
//! Snapshots are pushed by the owner via [`ChannelFeed::push`] and
//! delivered to every open subscription on that path.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use vitals_core::snapshot::Snapshot;

use crate::feed::{FeedError, FeedSubscription, LiveFeed};

/// Per-subscription buffer.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
pub struct ChannelFeed {
    listeners: Mutex<HashMap<String, Vec<mpsc::Sender<Snapshot>>>>,
}

impl ChannelFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `snapshot` to every open subscription on `path`.
    ///
    /// Returns the number of subscriptions it was delivered to. Closed
    /// subscriptions are pruned.
    pub async fn push(&self, path: &str, snapshot: Snapshot) -> usize {
        let senders = {
            let mut listeners = self.listeners.lock().await;
            let Some(senders) = listeners.get_mut(path) else {
                return 0;
            };
            senders.retain(|tx| !tx.is_closed());
            senders.clone()
        };

        let mut delivered = 0;
        for tx in senders {
            if tx.send(snapshot.clone()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of open subscriptions on `path`.
    pub async fn listener_count(&self, path: &str) -> usize {
        self.listeners
            .lock()
            .await
            .get(path)
            .map_or(0, |senders| senders.iter().filter(|tx| !tx.is_closed()).count())
    }
}

#[async_trait]
impl LiveFeed for ChannelFeed {
    async fn subscribe(&self, path: &str) -> Result<FeedSubscription, FeedError> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        self.listeners
            .lock()
            .await
            .entry(path.to_string())
            .or_default()
            .push(tx);

        tracing::debug!(path, "Channel feed listener registered");
        Ok(FeedSubscription::new(path, rx, CancellationToken::new()))
    }
}

#[cfg(test)]
mod tests {
    use vitals_core::metric::MetricKind;

    use super::*;

    #[tokio::test]
    async fn delivers_to_subscribers_of_the_path_only() {
        let feed = ChannelFeed::new();
        let mut monitoring = feed.subscribe("monitoring").await.unwrap();
        let _other = feed.subscribe("other").await.unwrap();

        let snap = Snapshot::new().with(MetricKind::Ecg, "72");
        assert_eq!(feed.push("monitoring", snap.clone()).await, 1);

        assert_eq!(monitoring.next().await, Some(snap));
    }

    #[tokio::test]
    async fn closed_subscription_is_released() {
        let feed = ChannelFeed::new();
        let mut sub = feed.subscribe("monitoring").await.unwrap();
        assert_eq!(feed.listener_count("monitoring").await, 1);

        sub.close();
        assert_eq!(feed.listener_count("monitoring").await, 0);
        assert_eq!(feed.push("monitoring", Snapshot::new()).await, 0);
    }

    #[tokio::test]
    async fn push_without_listeners_is_noop() {
        let feed = ChannelFeed::new();
        assert_eq!(feed.push("monitoring", Snapshot::new()).await, 0);
    }
}
