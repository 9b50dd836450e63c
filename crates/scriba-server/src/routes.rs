use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(handlers::health::health_check))
        .route("/api/extract", post(handlers::extract::extract_document))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
