//! The persistent warning log collaborator.
//!
//! [`WarningLogStore`] is the narrow interface the pipeline writes to and
//! the event-log view reads from. Records are scoped by a subject id.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;
use vitals_core::error::CoreError;
use vitals_core::warning::WarningRecord;
use vitals_db::repositories::WarningRecordRepo;
use vitals_db::DbPool;

/// Errors raised by a [`WarningLogStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back to a record.
    #[error("Corrupt record: {0}")]
    Corrupt(#[from] CoreError),

    #[error("Duplicate record id: {0}")]
    Duplicate(Uuid),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Document-style store for warning records.
#[async_trait]
pub trait WarningLogStore: Send + Sync {
    /// Write one record under `subject_id`.
    async fn insert(&self, subject_id: &str, record: &WarningRecord) -> Result<(), StoreError>;

    /// All records for `subject_id`, newest first. Ties on timestamp keep
    /// the store's insertion order.
    async fn list_desc(&self, subject_id: &str) -> Result<Vec<WarningRecord>, StoreError>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`WarningLogStore`] backed by the `warning_records` table.
#[derive(Clone)]
pub struct PgWarningLogStore {
    pool: DbPool,
}

impl PgWarningLogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WarningLogStore for PgWarningLogStore {
    async fn insert(&self, subject_id: &str, record: &WarningRecord) -> Result<(), StoreError> {
        WarningRecordRepo::insert(&self.pool, subject_id, record).await?;
        Ok(())
    }

    async fn list_desc(&self, subject_id: &str) -> Result<Vec<WarningRecord>, StoreError> {
        WarningRecordRepo::list_for_subject(&self.pool, subject_id)
            .await?
            .into_iter()
            .map(|row| WarningRecord::try_from(row).map_err(StoreError::from))
            .collect()
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        vitals_db::health_check(&self.pool).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local [`WarningLogStore`]. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryWarningLogStore {
    subjects: RwLock<HashMap<String, SubjectLog>>,
}

/// Records of one subject in insertion order, plus their ids.
#[derive(Default)]
struct SubjectLog {
    records: Vec<WarningRecord>,
    ids: HashSet<Uuid>,
}

impl InMemoryWarningLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held for `subject_id`.
    pub async fn len(&self, subject_id: &str) -> usize {
        self.subjects
            .read()
            .await
            .get(subject_id)
            .map_or(0, |log| log.records.len())
    }
}

#[async_trait]
impl WarningLogStore for InMemoryWarningLogStore {
    async fn insert(&self, subject_id: &str, record: &WarningRecord) -> Result<(), StoreError> {
        let mut subjects = self.subjects.write().await;
        let log = subjects.entry(subject_id.to_string()).or_default();
        if !log.ids.insert(record.id) {
            return Err(StoreError::Duplicate(record.id));
        }
        log.records.push(record.clone());
        Ok(())
    }

    async fn list_desc(&self, subject_id: &str) -> Result<Vec<WarningRecord>, StoreError> {
        let mut records = self
            .subjects
            .read()
            .await
            .get(subject_id)
            .map(|log| log.records.clone())
            .unwrap_or_default();
        // Stable: equal timestamps stay in insertion order.
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }
}
