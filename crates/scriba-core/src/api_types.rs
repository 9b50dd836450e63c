use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::ExtractionResult;

// --- Health ---

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
}

// --- Extraction ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub filename: String,
    pub file_size: u64,
    pub extracted_at: DateTime<Utc>,
    pub result: ExtractionResult,
}
