//! Change detection for live readings.
//!
//! [`ObservedState`] is owned by one subscription session and passed by
//! `&mut` into [`ChangeTracker::observe`]; there is no shared state.

use std::collections::HashMap;

use serde::Serialize;

use crate::metric::MetricKind;
use crate::snapshot::Snapshot;
use crate::types::Timestamp;

/// Last value seen for one metric and when it last changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservedMetric {
    /// `None` until the metric is first observed.
    pub value: Option<String>,
    /// Time of the last *change*, not of the last snapshot.
    pub changed_at: Option<Timestamp>,
}

/// Per-metric observed state for one subscription session.
///
/// Starts with every metric unknown.
#[derive(Debug, Clone, Default)]
pub struct ObservedState {
    metrics: HashMap<MetricKind, ObservedMetric>,
}

impl ObservedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observed entry for `kind` (unknown entries read as default).
    pub fn get(&self, kind: MetricKind) -> ObservedMetric {
        self.metrics.get(&kind).cloned().unwrap_or_default()
    }

    /// Last observed value for `kind`, if any.
    pub fn value(&self, kind: MetricKind) -> Option<&str> {
        self.metrics.get(&kind).and_then(|m| m.value.as_deref())
    }
}

/// One detected value change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricChange {
    pub kind: MetricKind,
    pub value: String,
    pub changed_at: Timestamp,
}

/// Detects per-metric value changes between snapshots.
pub struct ChangeTracker;

impl ChangeTracker {
    /// Compare `snapshot` against `state` and return the metrics whose
    /// value changed, stamping each with `now`.
    ///
    /// Metrics absent from the snapshot or present with an empty value are
    /// skipped. Replaying an identical snapshot yields no changes. Output
    /// follows [`MetricKind::ALL`] order.
    pub fn observe(
        state: &mut ObservedState,
        snapshot: &Snapshot,
        now: Timestamp,
    ) -> Vec<MetricChange> {
        let mut changes = Vec::new();

        for (kind, value) in snapshot.iter() {
            if value.is_empty() {
                continue;
            }

            let entry = state.metrics.entry(kind).or_default();
            if entry.value.as_deref() == Some(value) {
                continue;
            }

            entry.value = Some(value.to_string());
            entry.changed_at = Some(now);
            changes.push(MetricChange {
                kind,
                value: value.to_string(),
                changed_at: now,
            });
        }

        changes
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
