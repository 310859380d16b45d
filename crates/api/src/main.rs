use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitals_api::config::{ConfigError, MonitorConfig, ServerConfig};
use vitals_api::monitor::{open_store, Monitor, StartupError};
use vitals_api::router::build_app_router;
use vitals_api::state::AppState;
use vitals_api::ws;
use vitals_feed::WebSocketFeed;

/// How long shutdown waits for each background service.
const SHUTDOWN_STEP_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "vitals_api=debug,vitals_feed=info,vitals_events=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    let monitor_config = MonitorConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        port = %config.port,
        feed_path = %monitor_config.feed_path,
        subject_id = %monitor_config.subject_id,
        policy = ?monitor_config.warning_policy,
        "Loaded configuration",
    );

    // --- Warning store ---
    let store = open_store(&monitor_config).await?;

    // --- Monitoring pipeline ---
    let feed = Arc::new(WebSocketFeed::new(monitor_config.feed_ws_url.clone()));
    let monitor = Monitor::new(&monitor_config, Arc::clone(&store), feed);
    let mut subscription = monitor.subscriber.start().await?;

    // --- WebSocket push ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager), ws::HEARTBEAT_INTERVAL);

    let relay_cancel = CancellationToken::new();
    let relay = ws::EventRelay::new(Arc::clone(&ws_manager));
    let relay_handle = tokio::spawn(relay.run(monitor.bus.subscribe(), relay_cancel.clone()));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        reader: Arc::clone(&monitor.reader),
        dashboard: monitor.subscriber.dashboard(),
        ws_manager: Arc::clone(&ws_manager),
    };
    let app = build_app_router(state, &config)?;

    // --- Start server ---
    let host: IpAddr = config.host.parse().map_err(|e| ConfigError::Invalid {
        var: "HOST",
        message: format!("{e}"),
    })?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // No snapshot is processed once this returns.
    monitor.subscriber.stop(&mut subscription).await;

    if tokio::time::timeout(SHUTDOWN_STEP_TIMEOUT, monitor.recorder.flush())
        .await
        .is_err()
    {
        tracing::warn!(
            in_flight = monitor.recorder.in_flight(),
            "Timed out waiting for warning writes",
        );
    }

    relay_cancel.cancel();
    let _ = tokio::time::timeout(SHUTDOWN_STEP_TIMEOUT, relay_handle).await;
    tracing::info!("Event relay stopped");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Resolve on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
