//! Exponential-backoff reconnection for the live feed WebSocket.
//!
//! When the connection drops, the feed client calls [`reconnect_loop`] to
//! keep retrying with increasing delays until either the connection is
//! restored or the [`CancellationToken`] is triggered.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::{connect, WsStream};

/// Tunable parameters for the exponential-backoff strategy.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay, clamped to
/// [`ReconnectConfig::max_delay`].
pub fn next_delay(current: Duration, config: &ReconnectConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Reconnect to `url` with exponential backoff.
///
/// Returns `Some(stream)` once a connection succeeds, or `None` if `cancel`
/// is triggered first.
pub async fn reconnect_loop(
    url: &str,
    config: &ReconnectConfig,
    cancel: &CancellationToken,
) -> Option<WsStream> {
    let mut delay = config.initial_delay;
    let mut attempt = 0u32;

    loop {
        // Wait before each attempt; the previous connection just failed.
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(url, "Feed reconnect cancelled");
                return None;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        attempt += 1;
        tracing::info!(
            url,
            attempt,
            delay_ms = delay.as_millis() as u64,
            "Reconnecting to live feed",
        );

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(url, "Feed reconnect cancelled");
                return None;
            }
            result = connect(url) => match result {
                Ok(stream) => {
                    tracing::info!(url, attempt, "Reconnected to live feed");
                    return Some(stream);
                }
                Err(e) => {
                    tracing::warn!(url, error = %e, "Reconnect attempt {attempt} failed");
                }
            }
        }

        delay = next_delay(delay, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_delay_doubles() {
        let config = ReconnectConfig::default();
        assert_eq!(
            next_delay(Duration::from_secs(1), &config),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn next_delay_clamps_at_max() {
        let config = ReconnectConfig {
            max_delay: Duration::from_secs(10),
            ..Default::default()
        };
        assert_eq!(
            next_delay(Duration::from_secs(8), &config),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn full_backoff_sequence() {
        let config = ReconnectConfig::default();
        let mut delay = config.initial_delay;
        let expected = [1, 2, 4, 8, 16, 30, 30, 30];

        for &expected_secs in &expected {
            assert_eq!(delay.as_secs(), expected_secs);
            delay = next_delay(delay, &config);
        }
    }

    #[tokio::test]
    async fn cancellation_token_stops_reconnect() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = reconnect_loop("ws://127.0.0.1:9", &ReconnectConfig::default(), &cancel).await;
        assert!(result.is_none());
    }
}
