pub mod health;
pub mod monitoring;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /dashboard                  current readings
/// /eventlogs?page=n           one page of the warning log
/// /thresholds                 all threshold rules
/// /thresholds/{metric}        one threshold rule
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(monitoring::router())
}
