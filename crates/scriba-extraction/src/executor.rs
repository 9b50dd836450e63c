use scriba_core::error::{Result, ScribaError};
use scriba_core::remote::{
    GenerativeClient, Generation, RemoteCacheHandle, RemoteDocumentHandle, RequestPart, TokenUsage,
};
use scriba_core::result::{BatchOutcome, PageBatch};

use crate::prompt;

/// Issues one generation call per batch, in either the cached or the uncached
/// variant, and classifies the response.
pub struct BatchExecutor<'a> {
    client: &'a dyn GenerativeClient,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(client: &'a dyn GenerativeClient) -> Self {
        Self { client }
    }

    /// Cached variant: only the page-range instruction is sent; the document
    /// and system instruction are implicit via the cache.
    pub async fn run_cached(
        &self,
        cache: &RemoteCacheHandle,
        batch: PageBatch,
        is_first_batch: bool,
    ) -> Result<BatchOutcome> {
        let parts = vec![RequestPart::Text(prompt::batch_prompt(
            batch,
            is_first_batch,
        ))];
        let generation = self.client.generate(None, parts, Some(cache)).await?;
        let (text, usage) = classify(generation)?;
        Ok(outcome(text, usage))
    }

    /// Uncached variant: resends the document reference with every call. Used
    /// when the document is not eligible for caching.
    pub async fn run_uncached(
        &self,
        document: &RemoteDocumentHandle,
        batch: PageBatch,
        is_first_batch: bool,
    ) -> Result<BatchOutcome> {
        let parts = vec![
            RequestPart::FileRef {
                uri: document.uri.clone(),
            },
            RequestPart::Text(prompt::batch_prompt(batch, is_first_batch)),
        ];
        let generation = self
            .client
            .generate(Some(prompt::SYSTEM_INSTRUCTION), parts, None)
            .await?;
        let (text, usage) = classify(generation)?;
        Ok(outcome(text, usage))
    }
}

fn outcome(text: String, usage: TokenUsage) -> BatchOutcome {
    BatchOutcome {
        text,
        prompt_tokens: usage.prompt_tokens.unwrap_or(0),
        completion_tokens: usage.completion_tokens.unwrap_or(0),
    }
}

/// Inspect the completion's finish reason and extract text plus token usage.
/// Missing usage metadata is not an error.
pub fn classify(generation: Generation) -> Result<(String, TokenUsage)> {
    if let Some(reason) = generation.finish_reason.as_deref() {
        if reason != "STOP" {
            return Err(ScribaError::IncompleteResponse(finish_reason_message(
                reason,
            )));
        }
    }

    let had_candidate = generation.finish_reason.is_some();
    match generation.text {
        // An empty string is no extraction either; success requires text.
        Some(text) if !text.is_empty() => Ok((text, generation.usage.unwrap_or_default())),
        _ if had_candidate => Err(ScribaError::IncompleteResponse(
            "No text was extracted from the document".to_string(),
        )),
        _ => Err(ScribaError::IncompleteResponse(
            "No response from the model".to_string(),
        )),
    }
}

fn finish_reason_message(reason: &str) -> String {
    match reason {
        "MAX_TOKENS" => "Response was truncated due to the maximum token limit".to_string(),
        "SAFETY" => "Response was blocked by safety filters".to_string(),
        "RECITATION" => "Response was blocked due to recitation concerns".to_string(),
        "OTHER" => "Response generation stopped unexpectedly".to_string(),
        other => format!("Response incomplete (finish reason: {other})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generation(
        text: Option<&str>,
        finish_reason: Option<&str>,
        usage: Option<TokenUsage>,
    ) -> Generation {
        Generation {
            text: text.map(String::from),
            finish_reason: finish_reason.map(String::from),
            usage,
        }
    }

    #[test]
    fn test_normal_stop_yields_text_and_usage() {
        let usage = TokenUsage {
            prompt_tokens: Some(100),
            completion_tokens: Some(50),
            total_tokens: Some(150),
        };
        let (text, got) =
            classify(generation(Some("| row |"), Some("STOP"), Some(usage))).unwrap();
        assert_eq!(text, "| row |");
        assert_eq!(got.prompt_tokens, Some(100));
        assert_eq!(got.completion_tokens, Some(50));
    }

    #[test]
    fn test_missing_usage_yields_zeroes_not_failure() {
        let (text, usage) = classify(generation(Some("content"), Some("STOP"), None)).unwrap();
        assert_eq!(text, "content");
        assert_eq!(usage.prompt_tokens, None);
        assert_eq!(outcome(text, usage).prompt_tokens, 0);
    }

    #[test]
    fn test_truncation_is_classified() {
        let err = classify(generation(Some("partial"), Some("MAX_TOKENS"), None)).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("truncated"));
    }

    #[test]
    fn test_safety_block_is_classified() {
        let err = classify(generation(None, Some("SAFETY"), None)).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("safety"));
    }

    #[test]
    fn test_recitation_block_is_classified() {
        let err = classify(generation(None, Some("RECITATION"), None)).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("recitation"));
    }

    #[test]
    fn test_unknown_finish_reason_names_it() {
        let err = classify(generation(None, Some("SPII"), None)).unwrap_err();
        assert!(err.to_string().contains("SPII"));
    }

    #[test]
    fn test_no_candidates_at_all() {
        let err = classify(generation(None, None, None)).unwrap_err();
        assert!(err.to_string().contains("No response"));
    }

    #[test]
    fn test_candidate_without_text() {
        let err = classify(generation(None, Some("STOP"), None)).unwrap_err();
        assert!(err.to_string().contains("No text"));
    }

    #[test]
    fn test_empty_text_is_not_a_success() {
        let err = classify(generation(Some(""), Some("STOP"), None)).unwrap_err();
        assert!(matches!(err, ScribaError::IncompleteResponse(_)));
        assert!(err.to_string().contains("No text"));
    }
}
