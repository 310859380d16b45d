//! Repository for the `warning_records` table (append-only).

use sqlx::PgPool;
use vitals_core::warning::WarningRecord;

use crate::models::warning_record::WarningRecordRow;

/// Column list for `warning_records` SELECT queries.
const COLUMNS: &str = "\
    id, seq, subject_id, metric_type, value, status, recorded_at, created_at";

/// Provides query operations for the warning log.
pub struct WarningRecordRepo;

impl WarningRecordRepo {
    /// Insert one warning record under `subject_id`.
    ///
    /// The record id is caller-generated; inserting the same id twice is a
    /// primary-key violation.
    pub async fn insert(
        pool: &PgPool,
        subject_id: &str,
        record: &WarningRecord,
    ) -> Result<WarningRecordRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO warning_records \
                (id, subject_id, metric_type, value, status, recorded_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WarningRecordRow>(&query)
            .bind(record.id)
            .bind(subject_id)
            .bind(record.kind.label())
            .bind(&record.value)
            .bind(record.status.as_str())
            .bind(record.timestamp)
            .fetch_one(pool)
            .await
    }

    /// All records for `subject_id`, newest first.
    ///
    /// Ties on `recorded_at` keep insertion order.
    pub async fn list_for_subject(
        pool: &PgPool,
        subject_id: &str,
    ) -> Result<Vec<WarningRecordRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM warning_records \
             WHERE subject_id = $1 \
             ORDER BY recorded_at DESC, seq ASC"
        );
        sqlx::query_as::<_, WarningRecordRow>(&query)
            .bind(subject_id)
            .fetch_all(pool)
            .await
    }

    /// Number of records stored for `subject_id`.
    pub async fn count_for_subject(pool: &PgPool, subject_id: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM warning_records WHERE subject_id = $1")
                .bind(subject_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
