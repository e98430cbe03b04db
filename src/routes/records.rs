use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RECENT_ROWS, MAX_RECENT_ROWS};
use crate::extractors::JsonBody;
use crate::metadata::{MeasurementRecord, SaveRequest};
use crate::response::{created, ok, AppError};
use crate::state::AppState;
use crate::store::schema::CsvRow;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_recent).post(save_record))
}

#[derive(Debug, Deserialize)]
struct RecentQuery {
    limit: Option<usize>,
}

impl RecentQuery {
    fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_RECENT_ROWS)
            .clamp(1, MAX_RECENT_ROWS)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecentRows {
    rows: Vec<CsvRow>,
    total: usize,
}

async fn list_recent(
    Query(q): Query<RecentQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let all = state.store().load_all()?;
    let total = all.len();
    let rows = all[total.saturating_sub(q.limit())..].to_vec();
    Ok(ok(RecentRows { rows, total }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveResponse {
    record: MeasurementRecord,
    path: String,
    total_rows: usize,
    recent: Vec<CsvRow>,
}

async fn save_record(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SaveRequest>,
) -> Result<impl IntoResponse, AppError> {
    let record = req.into_record()?;

    let appended = state
        .store()
        .append(&record, DEFAULT_RECENT_ROWS)
        .map_err(|e| AppError::store_failed("STORE_WRITE_FAILED", &e.to_string()))?;

    Ok(created(SaveResponse {
        record,
        path: state.store().path().display().to_string(),
        total_rows: appended.total_rows,
        recent: appended.recent,
    }))
}
