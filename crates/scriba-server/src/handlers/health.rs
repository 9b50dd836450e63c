use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use scriba_core::api_types::HealthResponse;

use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        model: state.config.model.clone(),
    };
    (StatusCode::OK, Json(response))
}
