//! The persisted warning entity.

use std::fmt;
use std::str::FromStr;

use chrono::SubsecRound;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::metric::MetricKind;
use crate::types::Timestamp;

/// Status marker carried by every record. Only warnings are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningStatus {
    Warning,
}

impl WarningStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WarningStatus::Warning => "warning",
        }
    }
}

impl fmt::Display for WarningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarningStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(WarningStatus::Warning),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// A metric reading that breached its threshold at detection time.
///
/// Immutable once created. Serializes as
/// `{"id", "type", "value", "status", "timestamp"}` with an ISO-8601
/// millisecond timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningRecord {
    /// Caller-generated, globally unique.
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: MetricKind,
    /// The raw value that triggered the warning.
    pub value: String,
    pub status: WarningStatus,
    #[serde(with = "crate::types::iso8601")]
    pub timestamp: Timestamp,
}

impl WarningRecord {
    /// Build a record with a fresh UUID v4.
    ///
    /// `timestamp` is truncated to whole milliseconds, the precision it is
    /// serialized with.
    pub fn new(kind: MetricKind, value: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            value: value.into(),
            status: WarningStatus::Warning,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }
}
