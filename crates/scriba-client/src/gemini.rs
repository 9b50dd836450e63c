use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use scriba_core::config::ExtractorConfig;
use scriba_core::error::{Result, ScribaError};
use scriba_core::remote::{
    GenerativeClient, Generation, RemoteCacheHandle, RemoteDocumentHandle, RequestPart, TokenUsage,
};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const UPLOAD_URL: &str = "https://generativelanguage.googleapis.com/upload/v1beta/files";
const PDF_MIME_TYPE: &str = "application/pdf";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Gemini REST client implementing the outbound capability boundary.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

// ── Wire types ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cached_content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    mime_type: String,
    file_uri: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
    total_token_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: FileInfo,
}

#[derive(Debug, Deserialize)]
struct FileInfo {
    name: String,
    uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCacheRequest {
    model: String,
    contents: Vec<Content>,
    system_instruction: Content,
    ttl: String,
}

#[derive(Debug, Deserialize)]
struct CachedContentInfo {
    name: String,
}

// ── Implementation ─────────────────────────────────────────────────────────

impl GeminiClient {
    /// Fails with a configuration error when no API key is supplied; the
    /// credential is validated here, never at call time.
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ScribaError::Config(
                "Gemini API key is not configured".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn request_part_to_wire(part: RequestPart) -> Part {
        match part {
            RequestPart::Text(text) => Part {
                text: Some(text),
                ..Part::default()
            },
            RequestPart::InlinePdf(bytes) => Part {
                inline_data: Some(InlineData {
                    mime_type: PDF_MIME_TYPE.to_string(),
                    data: BASE64_STANDARD.encode(bytes),
                }),
                ..Part::default()
            },
            RequestPart::FileRef { uri } => Part {
                file_data: Some(FileData {
                    mime_type: PDF_MIME_TYPE.to_string(),
                    file_uri: uri,
                }),
                ..Part::default()
            },
        }
    }

    async fn read_error_body(response: reqwest::Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string())
    }
}

fn generation_from_response(response: GenerateContentResponse) -> Generation {
    let usage = response.usage_metadata.map(|u| TokenUsage {
        prompt_tokens: u.prompt_token_count,
        completion_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    });

    let candidate = match response.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => {
            return Generation {
                text: None,
                finish_reason: None,
                usage,
            }
        }
    };

    let text = candidate
        .content
        .into_iter()
        .flat_map(|content| content.parts)
        .find_map(|part| part.text)
        .filter(|text| !text.is_empty());

    Generation {
        text,
        finish_reason: candidate.finish_reason,
        usage,
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn upload(&self, bytes: &[u8], display_name: &str) -> Result<RemoteDocumentHandle> {
        tracing::debug!(display_name, size = bytes.len(), "Uploading document");

        let response = self
            .client
            .post(UPLOAD_URL)
            .header("x-goog-api-key", &self.api_key)
            .header("X-Goog-Upload-Protocol", "raw")
            .header("X-Goog-File-Name", display_name)
            .header("Content-Type", PDF_MIME_TYPE)
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::read_error_body(response).await;
            return Err(ScribaError::UploadFailed(format!(
                "Gemini API returned status {status}: {body}"
            )));
        }

        let uploaded: UploadResponse = response.json().await?;
        tracing::debug!(name = %uploaded.file.name, "Document uploaded");

        Ok(RemoteDocumentHandle {
            name: uploaded.file.name,
            uri: uploaded.file.uri,
        })
    }

    async fn create_cache(
        &self,
        document: &RemoteDocumentHandle,
        system_instruction: &str,
        ttl_seconds: u64,
    ) -> Result<RemoteCacheHandle> {
        let request = CreateCacheRequest {
            model: format!("models/{}", self.model),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Self::request_part_to_wire(RequestPart::FileRef {
                    uri: document.uri.clone(),
                })],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Self::request_part_to_wire(RequestPart::Text(
                    system_instruction.to_string(),
                ))],
            },
            ttl: format!("{ttl_seconds}s"),
        };

        tracing::debug!(document = %document.name, ttl_seconds, "Creating context cache");

        let response = self
            .client
            .post(format!("{API_BASE_URL}/cachedContents"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::read_error_body(response).await;
            // The service rejects cache creation for documents below its
            // minimum token count with an INVALID_ARGUMENT (400) response.
            if status == StatusCode::BAD_REQUEST {
                return Err(ScribaError::CacheUnsupported(format!(
                    "Gemini API returned status {status}: {body}"
                )));
            }
            return Err(ScribaError::CacheCreateFailed(format!(
                "Gemini API returned status {status}: {body}"
            )));
        }

        let cache: CachedContentInfo = response.json().await?;
        tracing::debug!(cache = %cache.name, "Context cache created");

        Ok(RemoteCacheHandle { name: cache.name })
    }

    async fn delete_cache(&self, cache: &RemoteCacheHandle) -> Result<()> {
        let response = self
            .client
            .delete(format!("{API_BASE_URL}/{}", cache.name))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::read_error_body(response).await;
            return Err(ScribaError::Unclassified(format!(
                "Gemini API returned status {status}: {body}"
            )));
        }
        Ok(())
    }

    async fn delete_document(&self, document: &RemoteDocumentHandle) -> Result<()> {
        let response = self
            .client
            .delete(format!("{API_BASE_URL}/{}", document.name))
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::read_error_body(response).await;
            return Err(ScribaError::Unclassified(format!(
                "Gemini API returned status {status}: {body}"
            )));
        }
        Ok(())
    }

    async fn generate(
        &self,
        system_instruction: Option<&str>,
        parts: Vec<RequestPart>,
        cached_content: Option<&RemoteCacheHandle>,
    ) -> Result<Generation> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: parts.into_iter().map(Self::request_part_to_wire).collect(),
            }],
            system_instruction: system_instruction.map(|text| Content {
                role: None,
                parts: vec![Self::request_part_to_wire(RequestPart::Text(
                    text.to_string(),
                ))],
            }),
            cached_content: cached_content.map(|cache| cache.name.clone()),
        };

        tracing::debug!(
            model = %self.model,
            cached = request.cached_content.is_some(),
            "Sending generation request"
        );

        let response = self
            .client
            .post(format!(
                "{API_BASE_URL}/models/{}:generateContent",
                self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = Self::read_error_body(response).await;
            // A cache reference the service no longer knows comes back as
            // 403 or 404; the orchestrator recreates the cache and retries.
            if cached_content.is_some()
                && (status == StatusCode::FORBIDDEN || status == StatusCode::NOT_FOUND)
            {
                return Err(ScribaError::CacheExpired(format!(
                    "Gemini API returned status {status}: {body}"
                )));
            }
            return Err(ScribaError::Unclassified(format!(
                "Gemini API returned status {status}: {body}"
            )));
        }

        let api_response: GenerateContentResponse = response.json().await?;
        let generation = generation_from_response(api_response);

        tracing::debug!(
            finish_reason = ?generation.finish_reason,
            response_len = generation.text.as_ref().map(|t| t.len()).unwrap_or(0),
            "Received generation response"
        );

        Ok(generation)
    }
}
