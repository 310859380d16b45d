use std::str::FromStr;

use vitals_events::WarningPolicy;

/// A configuration variable was missing or did not parse.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", &lookup, 3000u16)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = parse_or("REQUEST_TIMEOUT_SECS", &lookup, 30u64)?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        })
    }
}

/// What to monitor and where warnings go.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Live feed WebSocket endpoint (`FEED_WS_URL`, required).
    pub feed_ws_url: String,
    /// Feed path carrying the readings (`FEED_PATH`, default `monitoring`).
    pub feed_path: String,
    /// Subject the warning log is scoped to (`SUBJECT_ID`, required).
    pub subject_id: String,
    /// `WARNING_POLICY`: `every_snapshot` (default) or `on_change`.
    pub warning_policy: WarningPolicy,
    /// PostgreSQL URL; the in-memory store is used when unset.
    pub database_url: Option<String>,
}

impl MonitorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let feed_ws_url = required("FEED_WS_URL", &lookup)?;
        if !(feed_ws_url.starts_with("ws://") || feed_ws_url.starts_with("wss://")) {
            return Err(ConfigError::Invalid {
                var: "FEED_WS_URL",
                message: format!("expected a ws:// or wss:// URL, got '{feed_ws_url}'"),
            });
        }

        let feed_path = lookup("FEED_PATH")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "monitoring".into());

        let subject_id = required("SUBJECT_ID", &lookup)?;
        let warning_policy = parse_or("WARNING_POLICY", &lookup, WarningPolicy::default())?;
        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        Ok(Self {
            feed_ws_url,
            feed_path,
            subject_id,
            warning_policy,
            database_url,
        })
    }
}

fn required(
    var: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    lookup(var)
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

fn parse_or<T>(
    var: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
