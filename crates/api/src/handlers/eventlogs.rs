//! Handler for the paginated warning log.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use vitals_events::EventLogPage;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EventLogQuery {
    /// 1-based page number; defaults to the first page.
    pub page: Option<usize>,
}

/// GET /api/v1/eventlogs?page=n
///
/// Loads the whole log newest first and returns one page of it. The page
/// number is clamped into range. A failed read is logged and served as an
/// empty log.
pub async fn list_eventlogs(
    State(state): State<AppState>,
    query: Result<Query<EventLogQuery>, QueryRejection>,
) -> AppResult<Json<DataResponse<EventLogPage>>> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let page = params.page.unwrap_or(1);

    let log = state.reader.load_all().await;
    Ok(Json(DataResponse {
        data: log.view(page),
    }))
}
