use serde::{Deserialize, Serialize};

/// Outcome of one top-level extraction call. Constructed once, immutable for
/// the caller. `success` implies `text` is present and `error` absent, and
/// vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub text: Option<String>,
    pub error: Option<String>,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
    pub page_count: Option<u32>,
    #[serde(default)]
    pub used_caching: bool,
}

impl ExtractionResult {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(error.into()),
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            page_count: None,
            used_caching: false,
        }
    }

    pub fn success(text: String) -> Self {
        Self {
            success: true,
            text: Some(text),
            error: None,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            page_count: None,
            used_caching: false,
        }
    }
}

/// Inclusive, 1-indexed page range processed by a single generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBatch {
    pub start_page: u32,
    pub end_page: u32,
}

impl PageBatch {
    pub fn new(start_page: u32, end_page: u32) -> Self {
        debug_assert!(start_page >= 1 && start_page <= end_page);
        Self {
            start_page,
            end_page,
        }
    }
}

/// Text and token accounting produced by one batch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub text: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}
