use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/store", get(store_health))
}

pub async fn health_check(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "uptimeSecs": state.uptime_secs(),
        "detector": {
            "name": state.detector().name(),
            "available": state.detector().is_available(),
        }
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Ready once the table's directory exists; the table itself may not yet.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    let dir_ok = state
        .store()
        .path()
        .parent()
        .map(|p| p.as_os_str().is_empty() || p.is_dir())
        .unwrap_or(true);
    if dir_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

pub async fn store_health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let start = std::time::Instant::now();
    let result = state.store().count();
    let latency_us = start.elapsed().as_micros() as u64;

    let (healthy, rows, error) = match result {
        Ok(rows) => (true, Some(rows), None),
        Err(e) => (false, None, Some(e.to_string())),
    };

    Json(serde_json::json!({
        "healthy": healthy,
        "path": state.store().path().display().to_string(),
        "exists": state.store().exists(),
        "rows": rows,
        "error": error,
        "latencyUs": latency_us,
    }))
}
