use axum::extract::Path;
use axum::Json;
use vitals_core::metric::MetricKind;
use vitals_core::thresholds::{self, ThresholdRule};

use crate::error::AppResult;
use crate::response::DataResponse;

/// GET /api/v1/thresholds
pub async fn list_thresholds() -> Json<DataResponse<Vec<ThresholdRule>>> {
    let rules = MetricKind::ALL.into_iter().map(thresholds::rule).collect();
    Json(DataResponse { data: rules })
}

/// GET /api/v1/thresholds/{metric}
///
/// `metric` is either the persisted label (`ECG`) or the feed key (`ecg`).
pub async fn get_threshold(Path(metric): Path<String>) -> AppResult<Json<DataResponse<ThresholdRule>>> {
    let kind: MetricKind = metric.parse()?;
    Ok(Json(DataResponse {
        data: thresholds::rule(kind),
    }))
}
