//! The live subscription pipeline.
//!
//! [`LiveFeedSubscriber::start`] registers one listener on the feed path
//! and spawns a task that processes each snapshot to completion, in
//! arrival order:
//!
//! 1. [`ChangeTracker::observe`] against the session's [`ObservedState`].
//! 2. Each change updates the [`DashboardState`] and is published as
//!    [`MonitorEvent::ReadingChanged`].
//! 3. [`WarningRecorder::record_warnings`] on the full snapshot.
//!
//! The returned [`SubscriptionHandle`] stops the task. Once
//! [`SubscriptionHandle::stop`] returns no further snapshot is processed.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use vitals_core::snapshot::Snapshot;
use vitals_core::thresholds;
use vitals_core::tracker::{ChangeTracker, ObservedState};
use vitals_events::{EventBus, MonitorEvent, WarningRecorder};

use crate::display::DashboardState;
use crate::feed::{FeedError, FeedSubscription, LiveFeed};

pub struct LiveFeedSubscriber {
    feed: Arc<dyn LiveFeed>,
    path: String,
    recorder: Arc<WarningRecorder>,
    bus: Option<Arc<EventBus>>,
    dashboard: Arc<watch::Sender<DashboardState>>,
}

impl LiveFeedSubscriber {
    pub fn new(
        feed: Arc<dyn LiveFeed>,
        path: impl Into<String>,
        recorder: Arc<WarningRecorder>,
    ) -> Self {
        let (dashboard, _) = watch::channel(DashboardState::default());
        Self {
            feed,
            path: path.into(),
            recorder,
            bus: None,
            dashboard: Arc::new(dashboard),
        }
    }

    /// Publish a [`MonitorEvent::ReadingChanged`] for every detected change.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current dashboard state; updated after every snapshot.
    pub fn dashboard(&self) -> watch::Receiver<DashboardState> {
        self.dashboard.subscribe()
    }

    /// Subscribe to the feed and spawn the processing task.
    ///
    /// A subscribe failure is returned as-is; the subscriber does not
    /// retry.
    pub async fn start(&self) -> Result<SubscriptionHandle, FeedError> {
        let subscription = self.feed.subscribe(&self.path).await?;
        let cancel = CancellationToken::new();

        let session = Session {
            recorder: Arc::clone(&self.recorder),
            bus: self.bus.clone(),
            dashboard: Arc::clone(&self.dashboard),
            observed: ObservedState::new(),
        };

        // Each session starts from unknown values.
        self.dashboard.send_replace(DashboardState::default());

        let task = tokio::spawn(session.run(subscription, cancel.clone()));
        tracing::info!(path = %self.path, "Live feed subscription started");

        Ok(SubscriptionHandle {
            cancel,
            task: Some(task),
            path: self.path.clone(),
        })
    }

    /// Stop a subscription started by this subscriber. Idempotent.
    pub async fn stop(&self, handle: &mut SubscriptionHandle) {
        handle.stop().await;
    }
}

/// State owned by one processing task.
struct Session {
    recorder: Arc<WarningRecorder>,
    bus: Option<Arc<EventBus>>,
    dashboard: Arc<watch::Sender<DashboardState>>,
    observed: ObservedState,
}

impl Session {
    async fn run(mut self, mut subscription: FeedSubscription, cancel: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = subscription.next() => match next {
                    Some(snapshot) => self.process(&snapshot),
                    None => {
                        tracing::warn!(path = %subscription.path(), "Live feed ended");
                        break;
                    }
                }
            }
        }
        subscription.close();
    }

    fn process(&mut self, snapshot: &Snapshot) {
        let now = Utc::now();
        let changes = ChangeTracker::observe(&mut self.observed, snapshot, now);

        self.dashboard.send_modify(|state| {
            for change in &changes {
                state.apply(change);
            }
            state.snapshots_received += 1;
        });

        if let Some(bus) = &self.bus {
            for change in &changes {
                bus.publish(MonitorEvent::ReadingChanged {
                    metric: change.kind,
                    value: change.value.clone(),
                    changed_at: change.changed_at,
                    warning: thresholds::is_warning(change.kind, &change.value),
                });
            }
        }

        if !changes.is_empty() {
            tracing::debug!(changes = changes.len(), "Readings changed");
        }

        self.recorder.record_warnings(snapshot, &changes, now);
    }
}

/// Handle to a running subscription.
///
/// Dropping the handle cancels the subscription without waiting for the
/// task to finish.
#[derive(Debug)]
pub struct SubscriptionHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    path: String,
}

impl SubscriptionHandle {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the subscription and wait for the processing task to exit.
    /// Calling it again is a no-op.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(e) = task.await {
            tracing::error!(path = %self.path, error = %e, "Subscription task failed");
        }
        tracing::info!(path = %self.path, "Live feed subscription stopped");
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
