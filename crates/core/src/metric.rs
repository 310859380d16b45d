//! The closed set of monitored biometric metrics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::metric_names::{
    FEED_KEY_ECG, FEED_KEY_FALL, FEED_KEY_HR, LABEL_ECG, LABEL_FALL, LABEL_HR,
};

/// A monitored metric. Each kind has exactly one threshold rule
/// (see [`crate::thresholds`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricKind {
    /// ECG-derived heart rate in beats per minute.
    #[serde(rename = "ECG")]
    Ecg,
    /// Pulse-oximeter reading (oxygen saturation percent).
    #[serde(rename = "HR")]
    HeartRateOrOxygen,
    /// Fall-detection sensor reading.
    #[serde(rename = "Fall")]
    Fall,
}

impl MetricKind {
    /// Every kind, in display order.
    pub const ALL: [MetricKind; 3] = [
        MetricKind::Ecg,
        MetricKind::HeartRateOrOxygen,
        MetricKind::Fall,
    ];

    /// Label persisted in the `type` field of a warning record.
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Ecg => LABEL_ECG,
            MetricKind::HeartRateOrOxygen => LABEL_HR,
            MetricKind::Fall => LABEL_FALL,
        }
    }

    /// Field name used for this metric inside a feed snapshot.
    pub fn feed_key(self) -> &'static str {
        match self {
            MetricKind::Ecg => FEED_KEY_ECG,
            MetricKind::HeartRateOrOxygen => FEED_KEY_HR,
            MetricKind::Fall => FEED_KEY_FALL,
        }
    }

    /// Human-readable dashboard title.
    pub fn title(self) -> &'static str {
        match self {
            MetricKind::Ecg => "ECG Monitoring",
            MetricKind::HeartRateOrOxygen => "Pulse Oximeter",
            MetricKind::Fall => "Fall Detection Alerts",
        }
    }

    /// Display unit appended to the value on the dashboard, if any.
    pub fn unit(self) -> Option<&'static str> {
        match self {
            MetricKind::Ecg => Some("bpm"),
            MetricKind::HeartRateOrOxygen => Some("%"),
            MetricKind::Fall => None,
        }
    }

    /// Resolve a snapshot field name to a kind.
    pub fn from_feed_key(key: &str) -> Option<MetricKind> {
        MetricKind::ALL.into_iter().find(|k| k.feed_key() == key)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts either the persisted label (`"ECG"`) or the feed key (`"ecg"`).
impl FromStr for MetricKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKind::ALL
            .into_iter()
            .find(|k| k.label() == s || k.feed_key() == s)
            .ok_or_else(|| CoreError::UnknownMetric(s.to_string()))
    }
}
