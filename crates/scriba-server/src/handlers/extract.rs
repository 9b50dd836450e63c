use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use scriba_core::api_types::ExtractResponse;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractParams {
    #[serde(default = "default_filename")]
    pub filename: String,
}

fn default_filename() -> String {
    "document.pdf".to_string()
}

/// POST /api/extract — run one extraction over the raw PDF body.
/// The orchestrator never errors; failures come back inside the result.
pub async fn extract_document(
    State(state): State<AppState>,
    Query(params): Query<ExtractParams>,
    body: Bytes,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        filename = %params.filename,
        file_size = body.len(),
        "Received extraction request"
    );

    let result = state.extractor.extract(&body, &params.filename).await;

    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    let response = ExtractResponse {
        filename: params.filename,
        file_size: body.len() as u64,
        extracted_at: Utc::now(),
        result,
    };

    (status, Json(response))
}
