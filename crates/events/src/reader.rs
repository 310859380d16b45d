//! Read side of the warning log.
//!
//! [`EventLogReader`] loads every record for the configured subject,
//! newest first, into an [`EventLog`]. Paging is a slice over that loaded
//! sequence; the store is not asked for pages.

use std::sync::Arc;

use serde::Serialize;
use vitals_core::pagination::{clamp_page, page_slice, total_pages, PAGE_SIZE};
use vitals_core::warning::WarningRecord;

use crate::store::{StoreError, WarningLogStore};

/// Loads the warning log for one monitored subject.
pub struct EventLogReader {
    store: Arc<dyn WarningLogStore>,
    subject_id: Arc<str>,
}

impl EventLogReader {
    pub fn new(store: Arc<dyn WarningLogStore>, subject_id: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            subject_id: subject_id.into(),
        }
    }

    /// Load the full log, propagating store errors.
    pub async fn try_load_all(&self) -> Result<EventLog, StoreError> {
        let records = self.store.list_desc(&self.subject_id).await?;
        Ok(EventLog::from_records(records))
    }

    /// Load the full log. A store failure is logged and yields an empty
    /// log.
    pub async fn load_all(&self) -> EventLog {
        match self.try_load_all().await {
            Ok(log) => log,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    subject_id = %self.subject_id,
                    "Failed to load warning log",
                );
                EventLog::default()
            }
        }
    }
}

/// The loaded warning log, newest first.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<WarningRecord>,
}

impl EventLog {
    /// Wrap `records`, sorting newest first. The sort is stable, so records
    /// with equal timestamps keep the order the store returned them in.
    pub fn from_records(mut records: Vec<WarningRecord>) -> Self {
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self { records }
    }

    pub fn records(&self) -> &[WarningRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.records.len())
    }

    /// Up to [`PAGE_SIZE`] records of 1-based `page`. Out-of-range pages
    /// yield an empty slice; callers clamp first.
    pub fn page(&self, page: usize) -> &[WarningRecord] {
        page_slice(&self.records, page)
    }

    /// Clamp `page` into range and build the page view.
    pub fn view(&self, page: usize) -> EventLogPage {
        let page = clamp_page(page, self.records.len());
        EventLogPage {
            page,
            page_size: PAGE_SIZE,
            total_pages: self.total_pages(),
            total_records: self.records.len(),
            records: self.page(page).to_vec(),
        }
    }
}

/// One page of the warning log as served to the event-log view.
#[derive(Debug, Clone, Serialize)]
pub struct EventLogPage {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_records: usize,
    pub records: Vec<WarningRecord>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use vitals_core::metric::MetricKind;

    use super::*;

    fn log_of(n: i64) -> EventLog {
        let base = Utc::now();
        // Inserted oldest first; the log must come back newest first.
        let records = (0..n)
            .map(|i| WarningRecord::new(MetricKind::Ecg, i.to_string(), base + Duration::seconds(i)))
            .collect();
        EventLog::from_records(records)
    }

    #[test]
    fn first_page_holds_most_recent_ten() {
        let log = log_of(25);
        let first = log.page(1);
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].value, "24");
        assert_eq!(first[9].value, "15");
    }

    #[test]
    fn last_page_holds_remainder_and_beyond_is_empty() {
        let log = log_of(25);
        assert_eq!(log.total_pages(), 3);
        let third = log.page(3);
        assert_eq!(third.len(), 5);
        assert_eq!(third[4].value, "0");
        assert!(log.page(4).is_empty());
        assert!(log.page(0).is_empty());
    }

    #[test]
    fn view_clamps_requested_page() {
        let log = log_of(25);
        let view = log.view(99);
        assert_eq!(view.page, 3);
        assert_eq!(view.records.len(), 5);
        assert_eq!(view.total_records, 25);

        let view = log.view(0);
        assert_eq!(view.page, 1);
        assert_eq!(view.records.len(), 10);
    }

    #[test]
    fn empty_log_view() {
        let view = EventLog::default().view(1);
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 0);
        assert!(view.records.is_empty());
    }

    #[test]
    fn ties_keep_store_order() {
        let now = Utc::now();
        let a = WarningRecord::new(MetricKind::Ecg, "150", now);
        let b = WarningRecord::new(MetricKind::Fall, "0.1", now);
        let log = EventLog::from_records(vec![a.clone(), b.clone()]);
        assert_eq!(log.records()[0].id, a.id);
        assert_eq!(log.records()[1].id, b.id);
    }
}
