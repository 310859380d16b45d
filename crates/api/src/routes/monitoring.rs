use axum::routing::get;
use axum::Router;

use crate::handlers::{dashboard, eventlogs, thresholds};
use crate::state::AppState;

/// Dashboard, event log and threshold routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/eventlogs", get(eventlogs::list_eventlogs))
        .route("/thresholds", get(thresholds::list_thresholds))
        .route("/thresholds/{metric}", get(thresholds::get_threshold))
}
