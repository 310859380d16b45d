//! Dashboard display state.
//!
//! One [`MetricReading`] per [`MetricKind`], updated from the changes the
//! subscriber detects. Readers get it through a `watch` channel.

use serde::Serialize;
use vitals_core::metric::MetricKind;
use vitals_core::metric_names::UNKNOWN_VALUE;
use vitals_core::thresholds;
use vitals_core::tracker::MetricChange;
use vitals_core::types::Timestamp;

/// Bounds of the safe range shown next to a reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SafeRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl SafeRange {
    pub fn for_kind(kind: MetricKind) -> Self {
        let rule = thresholds::rule(kind);
        Self {
            min: rule.min,
            max: rule.max,
        }
    }
}

/// What the dashboard shows for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReading {
    #[serde(rename = "type")]
    pub kind: MetricKind,
    pub title: &'static str,
    /// Latest value, or `"-"` before the first one arrives.
    pub value: String,
    pub unit: Option<&'static str>,
    #[serde(with = "vitals_core::types::iso8601::option")]
    pub last_changed: Option<Timestamp>,
    pub warning: bool,
    pub safe_range: SafeRange,
}

impl MetricReading {
    /// A reading that has not been observed yet.
    pub fn unknown(kind: MetricKind) -> Self {
        Self {
            kind,
            title: kind.title(),
            value: UNKNOWN_VALUE.to_string(),
            unit: kind.unit(),
            last_changed: None,
            warning: false,
            safe_range: SafeRange::for_kind(kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardState {
    pub readings: Vec<MetricReading>,
    /// Snapshots processed since the subscription started.
    #[serde(skip)]
    pub snapshots_received: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            readings: MetricKind::ALL.into_iter().map(MetricReading::unknown).collect(),
            snapshots_received: 0,
        }
    }
}

impl DashboardState {
    pub fn apply(&mut self, change: &MetricChange) {
        if let Some(reading) = self.readings.iter_mut().find(|r| r.kind == change.kind) {
            reading.value = change.value.clone();
            reading.last_changed = Some(change.changed_at);
            reading.warning = thresholds::is_warning(change.kind, &change.value);
        }
    }

    pub fn reading(&self, kind: MetricKind) -> Option<&MetricReading> {
        self.readings.iter().find(|r| r.kind == kind)
    }
}
