use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Reference to a document blob uploaded to the remote service. Owned by the
/// orchestrator for the duration of one extraction call and deleted
/// (best-effort) before the call returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDocumentHandle {
    /// Resource name, e.g. `files/abc123`.
    pub name: String,
    /// Download URI used to reference the blob in generation requests.
    pub uri: String,
}

/// Reference to a time-limited server-side context cache. May become invalid
/// before its nominal TTL; the orchestrator treats that as recoverable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCacheHandle {
    /// Resource name, e.g. `cachedContents/xyz789`.
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

/// One completion from the remote service, before classification. A missing
/// finish reason together with a missing text means the service returned no
/// candidates at all.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: Option<String>,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

/// A single piece of request content. The concrete client translates these
/// into the service's wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Text(String),
    /// Raw PDF bytes sent inline with the request (direct extraction path).
    InlinePdf(Vec<u8>),
    /// Reference to a previously uploaded document blob.
    FileRef { uri: String },
}

/// Outbound capability boundary: the remote generative document service.
/// Implementations must report recoverable conditions (`CacheUnsupported`,
/// `CacheExpired`) as their structured error variants rather than free text.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn upload(&self, bytes: &[u8], display_name: &str) -> Result<RemoteDocumentHandle>;

    async fn create_cache(
        &self,
        document: &RemoteDocumentHandle,
        system_instruction: &str,
        ttl_seconds: u64,
    ) -> Result<RemoteCacheHandle>;

    async fn delete_cache(&self, cache: &RemoteCacheHandle) -> Result<()>;

    async fn delete_document(&self, document: &RemoteDocumentHandle) -> Result<()>;

    /// Issue one generation call. When `cached_content` is set the full
    /// document is implicit via the cache and `system_instruction` must be
    /// `None` (it is baked into the cache at creation time).
    async fn generate(
        &self,
        system_instruction: Option<&str>,
        parts: Vec<RequestPart>,
        cached_content: Option<&RemoteCacheHandle>,
    ) -> Result<Generation>;
}
