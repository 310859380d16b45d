//! Row model for the `warning_records` table.

use sqlx::FromRow;
use uuid::Uuid;
use vitals_core::error::CoreError;
use vitals_core::types::Timestamp;
use vitals_core::warning::WarningRecord;

/// A row from the `warning_records` table.
#[derive(Debug, Clone, FromRow)]
pub struct WarningRecordRow {
    pub id: Uuid,
    pub seq: i64,
    pub subject_id: String,
    pub metric_type: String,
    pub value: String,
    pub status: String,
    pub recorded_at: Timestamp,
    pub created_at: Timestamp,
}

impl TryFrom<WarningRecordRow> for WarningRecord {
    type Error = CoreError;

    fn try_from(row: WarningRecordRow) -> Result<Self, Self::Error> {
        Ok(WarningRecord {
            id: row.id,
            kind: row.metric_type.parse()?,
            value: row.value,
            status: row.status.parse()?,
            timestamp: row.recorded_at,
        })
    }
}
