//! Integration tests for the warning recorder and event-log reader against
//! a store that can be told to fail.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use vitals_core::metric::MetricKind;
use vitals_core::snapshot::Snapshot;
use vitals_core::warning::WarningRecord;
use vitals_events::{
    EventBus, EventLogReader, InMemoryWarningLogStore, MonitorEvent, StoreError, WarningLogStore,
    WarningRecorder,
};

// ---------------------------------------------------------------------------
// Test store
// ---------------------------------------------------------------------------

/// Wraps an in-memory store; writes for `fail_kinds` and all reads can be
/// made to fail.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryWarningLogStore,
    fail_kinds: Mutex<HashSet<MetricKind>>,
    fail_reads: Mutex<bool>,
}

impl FlakyStore {
    async fn fail_writes_for(&self, kind: MetricKind) {
        self.fail_kinds.lock().await.insert(kind);
    }

    async fn fail_reads(&self) {
        *self.fail_reads.lock().await = true;
    }
}

#[async_trait]
impl WarningLogStore for FlakyStore {
    async fn insert(&self, subject_id: &str, record: &WarningRecord) -> Result<(), StoreError> {
        if self.fail_kinds.lock().await.contains(&record.kind) {
            return Err(StoreError::Unavailable("simulated write failure".into()));
        }
        self.inner.insert(subject_id, record).await
    }

    async fn list_desc(&self, subject_id: &str) -> Result<Vec<WarningRecord>, StoreError> {
        if *self.fail_reads.lock().await {
            return Err(StoreError::Unavailable("simulated read failure".into()));
        }
        self.inner.list_desc(subject_id).await
    }
}

fn snapshot(ecg: &str, hr: &str, fall: &str) -> Snapshot {
    Snapshot::new()
        .with(MetricKind::Ecg, ecg)
        .with(MetricKind::HeartRateOrOxygen, hr)
        .with(MetricKind::Fall, fall)
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

#[tokio::test]
async fn persists_exactly_the_breaching_metrics() {
    let store = Arc::new(FlakyStore::default());
    let recorder = WarningRecorder::new(store.clone(), "subject");

    recorder.record_warnings(&snapshot("150", "80", "2.0"), &[], Utc::now());
    recorder.flush().await;

    let saved = store.list_desc("subject").await.unwrap();
    let kinds: HashSet<_> = saved.iter().map(|r| r.kind).collect();
    assert_eq!(saved.len(), 2);
    assert_eq!(
        kinds,
        HashSet::from([MetricKind::Ecg, MetricKind::HeartRateOrOxygen])
    );
}

#[tokio::test]
async fn failed_write_does_not_block_sibling() {
    let store = Arc::new(FlakyStore::default());
    store.fail_writes_for(MetricKind::Ecg).await;
    let recorder = WarningRecorder::new(store.clone(), "subject");

    let dispatched = recorder.record_warnings(&snapshot("150", "80", "2.0"), &[], Utc::now());
    recorder.flush().await;

    assert_eq!(dispatched.len(), 2);
    let saved = store.list_desc("subject").await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].kind, MetricKind::HeartRateOrOxygen);
}

#[tokio::test]
async fn resent_breach_is_recorded_every_snapshot_by_default() {
    let store = Arc::new(FlakyStore::default());
    let recorder = WarningRecorder::new(store.clone(), "subject");
    let snap = snapshot("72", "98", "0.4");

    for _ in 0..3 {
        recorder.record_warnings(&snap, &[], Utc::now());
    }
    recorder.flush().await;

    assert_eq!(store.list_desc("subject").await.unwrap().len(), 3);
}

#[tokio::test]
async fn missing_fall_reading_is_persisted_as_empty_warning() {
    let store = Arc::new(FlakyStore::default());
    let recorder = WarningRecorder::new(store.clone(), "subject");
    let snap: Snapshot = serde_json::from_str(r#"{"ecg":"72","hr":"98","fall":null}"#).unwrap();

    recorder.record_warnings(&snap, &[], Utc::now());
    recorder.flush().await;

    let saved = store.list_desc("subject").await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].kind, MetricKind::Fall);
    assert_eq!(saved[0].value, "");
}

#[tokio::test]
async fn successful_writes_are_published_on_the_bus() {
    let store = Arc::new(FlakyStore::default());
    store.fail_writes_for(MetricKind::HeartRateOrOxygen).await;
    let bus = Arc::new(EventBus::default());
    let mut rx = bus.subscribe();
    let recorder = WarningRecorder::new(store.clone(), "subject").with_event_bus(bus.clone());

    recorder.record_warnings(&snapshot("150", "80", "2.0"), &[], Utc::now());
    recorder.flush().await;

    match rx.recv().await.expect("one event should be published") {
        MonitorEvent::WarningRecorded { record } => assert_eq!(record.kind, MetricKind::Ecg),
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(rx.try_recv().is_err(), "failed write must not be published");
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reader_pages_a_25_record_log() {
    let store = Arc::new(FlakyStore::default());
    let base = Utc::now();
    for i in 0..25 {
        let record = WarningRecord::new(MetricKind::Fall, i.to_string(), base + Duration::seconds(i));
        store.insert("subject", &record).await.unwrap();
    }

    let reader = EventLogReader::new(store.clone(), "subject");
    let log = reader.load_all().await;

    assert_eq!(log.len(), 25);
    let first: Vec<&str> = log.page(1).iter().map(|r| r.value.as_str()).collect();
    assert_eq!(first, ["24", "23", "22", "21", "20", "19", "18", "17", "16", "15"]);
    assert_eq!(log.page(3).len(), 5);
    assert!(log.page(4).is_empty());
}

#[tokio::test]
async fn reader_is_scoped_to_its_subject() {
    let store = Arc::new(FlakyStore::default());
    store
        .insert("other", &WarningRecord::new(MetricKind::Ecg, "150", Utc::now()))
        .await
        .unwrap();

    let log = EventLogReader::new(store, "subject").load_all().await;
    assert!(log.is_empty());
}

#[tokio::test]
async fn read_failure_yields_empty_log() {
    let store = Arc::new(FlakyStore::default());
    store
        .insert("subject", &WarningRecord::new(MetricKind::Ecg, "150", Utc::now()))
        .await
        .unwrap();
    store.fail_reads().await;

    let reader = EventLogReader::new(store, "subject");
    assert!(reader.try_load_all().await.is_err());

    let log = reader.load_all().await;
    assert!(log.is_empty());
    assert_eq!(log.view(1).total_pages, 0);
}
