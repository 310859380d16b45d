#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use vitals_api::config::{MonitorConfig, ServerConfig};
use vitals_api::monitor::Monitor;
use vitals_api::router::build_app_router;
use vitals_api::state::AppState;
use vitals_api::ws::WsManager;
use vitals_core::snapshot::Snapshot;
use vitals_events::{InMemoryWarningLogStore, WarningLogStore, WarningPolicy};
use vitals_feed::{ChannelFeed, SubscriptionHandle};

pub const FEED_PATH: &str = "monitoring";
pub const SUBJECT_ID: &str = "test-subject";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

pub fn test_monitor_config() -> MonitorConfig {
    MonitorConfig {
        feed_ws_url: "ws://127.0.0.1:9".to_string(),
        feed_path: FEED_PATH.to_string(),
        subject_id: SUBJECT_ID.to_string(),
        warning_policy: WarningPolicy::EverySnapshot,
        database_url: None,
    }
}

/// A running app over the in-process feed and in-memory store.
pub struct TestApp {
    pub router: Router,
    pub feed: Arc<ChannelFeed>,
    pub store: Arc<dyn WarningLogStore>,
    pub monitor: Monitor,
    pub subscription: SubscriptionHandle,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_store(Arc::new(InMemoryWarningLogStore::new())).await
    }

    pub async fn with_store(store: Arc<dyn WarningLogStore>) -> Self {
        let config = test_config();
        let feed = Arc::new(ChannelFeed::new());
        let monitor = Monitor::new(&test_monitor_config(), Arc::clone(&store), feed.clone());
        let subscription = monitor.subscriber.start().await.unwrap();

        let state = AppState {
            config: Arc::new(config.clone()),
            store: Arc::clone(&store),
            reader: Arc::clone(&monitor.reader),
            dashboard: monitor.subscriber.dashboard(),
            ws_manager: Arc::new(WsManager::new()),
        };
        let router = build_app_router(state, &config).unwrap();

        Self {
            router,
            feed,
            store,
            monitor,
            subscription,
        }
    }

    /// Push a snapshot, wait for the pipeline to process it and for its
    /// warning writes to land.
    pub async fn push(&self, snapshot: Snapshot) {
        let mut dashboard = self.monitor.subscriber.dashboard();
        let target = dashboard.borrow().snapshots_received + 1;
        assert_eq!(self.feed.push(FEED_PATH, snapshot).await, 1);
        dashboard
            .wait_for(|state| state.snapshots_received >= target)
            .await
            .unwrap();
        self.monitor.recorder.flush().await;
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        get(self.router.clone(), uri).await
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
