use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScribaError {
    /// Input failed the magic-signature gate. No remote call was attempted.
    #[error("{0}")]
    InvalidDocument(String),

    /// Page count could not be determined from the raw bytes.
    #[error("Failed to read PDF: {0}")]
    DocumentUnreadable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// The document does not meet the service's minimum size for context
    /// caching. Recoverable: the orchestrator falls back to uncached batches.
    #[error("Context caching not available for this document: {0}")]
    CacheUnsupported(String),

    #[error("Cache creation failed: {0}")]
    CacheCreateFailed(String),

    /// The service no longer recognises the cache reference. Recoverable
    /// exactly once per batch via recreate-and-retry.
    #[error("Context cache expired: {0}")]
    CacheExpired(String),

    /// Generation ended abnormally (truncation, safety block, recitation
    /// block, ...). The message names the specific cause.
    #[error("{0}")]
    IncompleteResponse(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for otherwise-unclassified failures, wrapping the cause text.
    #[error("Extraction error: {0}")]
    Unclassified(String),
}

pub type Result<T> = std::result::Result<T, ScribaError>;
