pub mod health;
pub mod measurements;
pub mod options;
pub mod records;

use std::path::Path;

use axum::extract::{DefaultBodyLimit, OriginalUri};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::middleware::request_id;
use crate::response::AppError;
use crate::state::AppState;

/// JSON bodies (landmark sets, save requests) are small.
const MAX_JSON_BODY_SIZE: usize = 256 * 1024;

/// Room for multipart boundaries and headers on top of the photo itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config().max_upload_bytes + MULTIPART_OVERHEAD;

    let api_routes = Router::new()
        .nest("/options", options::router())
        .nest("/measurements", measurements::router())
        .nest("/records", records::router())
        .layer(DefaultBodyLimit::max(MAX_JSON_BODY_SIZE))
        .nest(
            "/detect",
            measurements::detect_router().layer(DefaultBodyLimit::max(upload_limit)),
        )
        .fallback(api_not_found);

    let static_dir = Path::new(&state.config().static_dir);
    let spa_fallback =
        ServeDir::new(static_dir).not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback_service(spa_fallback)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

/// Unknown API paths answer in JSON instead of falling through to the form page.
async fn api_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(&format!("No API route for {}", uri.path()))
}
