//! Warning detection and fire-and-forget persistence.
//!
//! [`WarningRecorder`] classifies every metric in a snapshot, builds one
//! [`WarningRecord`] per breach and spawns one store write per record. The
//! caller never waits for the store: a failed write is logged and dropped,
//! and sibling writes are unaffected.

use std::str::FromStr;
use std::sync::Arc;

use tokio_util::task::TaskTracker;
use vitals_core::error::CoreError;
use vitals_core::metric::MetricKind;
use vitals_core::snapshot::Snapshot;
use vitals_core::thresholds;
use vitals_core::tracker::MetricChange;
use vitals_core::types::Timestamp;
use vitals_core::warning::WarningRecord;

use crate::bus::{EventBus, MonitorEvent};
use crate::store::WarningLogStore;

/// Which breaching readings produce a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WarningPolicy {
    /// Every snapshot in which a metric breaches, even when the breaching
    /// value is merely re-sent.
    #[default]
    EverySnapshot,
    /// Only breaching metrics whose value changed in this snapshot.
    OnChange,
}

impl FromStr for WarningPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "every_snapshot" => Ok(WarningPolicy::EverySnapshot),
            "on_change" => Ok(WarningPolicy::OnChange),
            other => Err(CoreError::Validation(format!(
                "unknown warning policy '{other}', expected 'every_snapshot' or 'on_change'"
            ))),
        }
    }
}

/// Persists warning records for one monitored subject.
pub struct WarningRecorder {
    store: Arc<dyn WarningLogStore>,
    subject_id: Arc<str>,
    policy: WarningPolicy,
    bus: Option<Arc<EventBus>>,
    tasks: TaskTracker,
}

impl WarningRecorder {
    pub fn new(store: Arc<dyn WarningLogStore>, subject_id: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            subject_id: subject_id.into(),
            policy: WarningPolicy::default(),
            bus: None,
            tasks: TaskTracker::new(),
        }
    }

    pub fn with_policy(mut self, policy: WarningPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Publish a [`MonitorEvent::WarningRecorded`] after each successful
    /// write.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn policy(&self) -> WarningPolicy {
        self.policy
    }

    /// Build warning records for `snapshot` and dispatch their writes.
    ///
    /// Returns the records that were dispatched, without waiting for the
    /// store. Must be called from within a Tokio runtime.
    pub fn record_warnings(
        &self,
        snapshot: &Snapshot,
        changes: &[MetricChange],
        now: Timestamp,
    ) -> Vec<WarningRecord> {
        let records = detect_warnings(snapshot, changes, now, self.policy);
        for record in &records {
            self.dispatch(record.clone());
        }
        records
    }

    /// Wait until every dispatched write has finished.
    pub async fn flush(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    /// Number of writes still in flight.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    fn dispatch(&self, record: WarningRecord) {
        let store = Arc::clone(&self.store);
        let subject_id = Arc::clone(&self.subject_id);
        let bus = self.bus.clone();

        self.tasks.spawn(async move {
            match store.insert(&subject_id, &record).await {
                Ok(()) => {
                    tracing::info!(
                        record_id = %record.id,
                        metric = %record.kind,
                        value = %record.value,
                        "Warning record saved",
                    );
                    if let Some(bus) = bus {
                        bus.publish(MonitorEvent::WarningRecorded { record });
                    }
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        record_id = %record.id,
                        metric = %record.kind,
                        "Failed to save warning record",
                    );
                }
            }
        });
    }
}

/// Pure detection step of [`WarningRecorder::record_warnings`].
///
/// Every metric is evaluated on its current value, whether or not the
/// snapshot carries it; a missing or empty value reads as `0` and is
/// recorded as `""`. An empty snapshot yields nothing. Under
/// [`WarningPolicy::OnChange`] a metric must also appear in `changes`.
pub fn detect_warnings(
    snapshot: &Snapshot,
    changes: &[MetricChange],
    now: Timestamp,
    policy: WarningPolicy,
) -> Vec<WarningRecord> {
    if snapshot.is_empty() {
        return Vec::new();
    }

    MetricKind::ALL
        .into_iter()
        .map(|kind| (kind, snapshot.get(kind)))
        .filter(|(kind, value)| thresholds::is_warning_opt(*kind, *value))
        .filter(|(kind, _)| match policy {
            WarningPolicy::EverySnapshot => true,
            WarningPolicy::OnChange => changes.iter().any(|c| c.kind == *kind),
        })
        .map(|(kind, value)| WarningRecord::new(kind, value.unwrap_or(""), now))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use vitals_core::tracker::{ChangeTracker, ObservedState};

    use super::*;
    use crate::store::InMemoryWarningLogStore;

    fn snapshot(ecg: &str, hr: &str, fall: &str) -> Snapshot {
        Snapshot::new()
            .with(MetricKind::Ecg, ecg)
            .with(MetricKind::HeartRateOrOxygen, hr)
            .with(MetricKind::Fall, fall)
    }

    #[test]
    fn detects_only_breaching_metrics() {
        let records = detect_warnings(
            &snapshot("150", "80", "2.0"),
            &[],
            Utc::now(),
            WarningPolicy::EverySnapshot,
        );
        let kinds: Vec<_> = records.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, [MetricKind::Ecg, MetricKind::HeartRateOrOxygen]);
        assert_eq!(records[0].value, "150");
    }

    #[test]
    fn null_fall_value_is_a_warning() {
        let snap: Snapshot =
            serde_json::from_str(r#"{"ecg":"72","hr":"98","fall":null}"#).unwrap();
        let records = detect_warnings(&snap, &[], Utc::now(), WarningPolicy::EverySnapshot);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, MetricKind::Fall);
        assert_eq!(records[0].value, "");
    }

    #[test]
    fn absent_fall_key_is_a_warning() {
        let snap: Snapshot = serde_json::from_str(r#"{"ecg":"72","hr":"98"}"#).unwrap();
        let records = detect_warnings(&snap, &[], Utc::now(), WarningPolicy::EverySnapshot);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, MetricKind::Fall);
        assert_eq!(records[0].value, "");
    }

    #[test]
    fn empty_snapshot_is_not_evaluated() {
        let records = detect_warnings(
            &Snapshot::new(),
            &[],
            Utc::now(),
            WarningPolicy::EverySnapshot,
        );
        assert!(records.is_empty());
    }

    #[test]
    fn empty_fall_value_is_a_warning() {
        let snap = snapshot("72", "98", "");
        let records = detect_warnings(&snap, &[], Utc::now(), WarningPolicy::EverySnapshot);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, MetricKind::Fall);
    }

    #[test]
    fn on_change_skips_resent_breaches() {
        let mut state = ObservedState::new();
        let snap = snapshot("150", "98", "2.0");

        let first = ChangeTracker::observe(&mut state, &snap, Utc::now());
        let second = ChangeTracker::observe(&mut state, &snap, Utc::now());

        assert_eq!(
            detect_warnings(&snap, &first, Utc::now(), WarningPolicy::OnChange).len(),
            1
        );
        assert!(detect_warnings(&snap, &second, Utc::now(), WarningPolicy::OnChange).is_empty());
        assert_eq!(
            detect_warnings(&snap, &second, Utc::now(), WarningPolicy::EverySnapshot).len(),
            1
        );
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!(
            "on_change".parse::<WarningPolicy>().unwrap(),
            WarningPolicy::OnChange
        );
        assert_eq!(
            "every_snapshot".parse::<WarningPolicy>().unwrap(),
            WarningPolicy::EverySnapshot
        );
        assert!("sometimes".parse::<WarningPolicy>().is_err());
    }

    #[tokio::test]
    async fn records_are_persisted_under_subject() {
        let store = Arc::new(InMemoryWarningLogStore::new());
        let recorder = WarningRecorder::new(store.clone(), "patient-1");

        let dispatched = recorder.record_warnings(&snapshot("150", "80", "2.0"), &[], Utc::now());
        recorder.flush().await;

        assert_eq!(dispatched.len(), 2);
        assert_eq!(store.len("patient-1").await, 2);
        assert_eq!(recorder.in_flight(), 0);
    }
}
