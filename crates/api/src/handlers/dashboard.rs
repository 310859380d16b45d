//! Handler for the live dashboard view.

use axum::extract::State;
use axum::Json;
use vitals_feed::DashboardState;

use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
///
/// Current value, last-change time and warning flag of every metric.
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DataResponse<DashboardState>> {
    let dashboard = state.dashboard.borrow().clone();
    Json(DataResponse { data: dashboard })
}
