//! Wiring of the monitoring pipeline.
//!
//! [`open_store`] picks the warning store from configuration and
//! [`Monitor::new`] connects recorder, reader, subscriber and event bus for
//! the configured subject.

use std::sync::Arc;

use vitals_events::{
    EventBus, EventLogReader, InMemoryWarningLogStore, PgWarningLogStore, WarningLogStore,
    WarningRecorder,
};
use vitals_feed::{FeedError, LiveFeed, LiveFeedSubscriber};

use crate::config::{ConfigError, MonitorConfig};

/// Anything that stops the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Live feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// PostgreSQL when `DATABASE_URL` is set, the in-memory store otherwise.
pub async fn open_store(config: &MonitorConfig) -> Result<Arc<dyn WarningLogStore>, StartupError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, warning log is kept in memory only");
        return Ok(Arc::new(InMemoryWarningLogStore::new()));
    };

    let pool = vitals_db::create_pool(database_url).await?;
    tracing::info!("Database connection pool created");

    vitals_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    vitals_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(PgWarningLogStore::new(pool)))
}

/// The pipeline for one monitored subject.
pub struct Monitor {
    pub bus: Arc<EventBus>,
    pub recorder: Arc<WarningRecorder>,
    pub reader: Arc<EventLogReader>,
    pub subscriber: LiveFeedSubscriber,
}

impl Monitor {
    pub fn new(
        config: &MonitorConfig,
        store: Arc<dyn WarningLogStore>,
        feed: Arc<dyn LiveFeed>,
    ) -> Self {
        let bus = Arc::new(EventBus::default());

        let recorder = Arc::new(
            WarningRecorder::new(Arc::clone(&store), config.subject_id.as_str())
                .with_policy(config.warning_policy)
                .with_event_bus(Arc::clone(&bus)),
        );
        let reader = Arc::new(EventLogReader::new(store, config.subject_id.as_str()));
        let subscriber =
            LiveFeedSubscriber::new(feed, config.feed_path.clone(), Arc::clone(&recorder))
                .with_event_bus(Arc::clone(&bus));

        Self {
            bus,
            recorder,
            reader,
            subscriber,
        }
    }
}
