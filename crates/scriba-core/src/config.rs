use serde::{Deserialize, Serialize};

/// Model used when none is configured explicitly.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    pub api_key: String,
    pub model: String,
    /// Documents with more pages than this go through the cached-batched path.
    pub batch_threshold_pages: u32,
    /// Pages per generation call on the batched path.
    pub pages_per_batch: u32,
    /// Requested TTL for the server-side context cache.
    pub cache_ttl_seconds: u64,
    pub server_host: String,
    pub server_port: u16,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            batch_threshold_pages: 5,
            pages_per_batch: 2,
            cache_ttl_seconds: 3600,
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
        }
    }
}

impl ExtractorConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            ..Self::default()
        }
    }
}
