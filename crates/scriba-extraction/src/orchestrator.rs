use std::collections::BTreeMap;
use std::sync::Arc;

use scriba_core::config::ExtractorConfig;
use scriba_core::error::{Result, ScribaError};
use scriba_core::remote::{GenerativeClient, RemoteCacheHandle, RemoteDocumentHandle, RequestPart};
use scriba_core::result::{ExtractionResult, PageBatch};

use crate::batch::plan_batches;
use crate::executor::{self, BatchExecutor};
use crate::pdf;
use crate::prompt;

/// Top-level extraction orchestrator.
///
/// Validates and probes the document, picks the direct or cached-batched
/// strategy, drives the remote resource lifecycle (upload, cache, generate,
/// cleanup), and recovers from cache expiry. Batches run strictly
/// sequentially; remote handles are owned by the single in-flight call and
/// released best-effort on every exit path.
pub struct PdfExtractor {
    client: Arc<dyn GenerativeClient>,
    config: ExtractorConfig,
}

impl PdfExtractor {
    pub fn new(client: Arc<dyn GenerativeClient>, config: ExtractorConfig) -> Self {
        Self { client, config }
    }

    /// All failures come back as `ExtractionResult { success: false, .. }`;
    /// nothing propagates to the caller as an error.
    pub async fn extract(&self, bytes: &[u8], filename: &str) -> ExtractionResult {
        if let Err(e) = pdf::validate_pdf_bytes(bytes) {
            return ExtractionResult::failure(e.to_string());
        }

        let page_count = match pdf::page_count(bytes) {
            Ok(count) => count,
            Err(e) => return ExtractionResult::failure(e.to_string()),
        };

        tracing::info!(filename, page_count, "Starting extraction");

        let mut result = if page_count <= self.config.batch_threshold_pages {
            self.extract_direct(bytes).await
        } else {
            self.extract_batched(bytes, filename, page_count).await
        };
        result.page_count = Some(page_count);

        if result.success {
            tracing::info!(
                filename,
                page_count,
                used_caching = result.used_caching,
                total_tokens = result.total_tokens,
                "Extraction complete"
            );
        } else {
            tracing::warn!(filename, error = ?result.error, "Extraction failed");
        }
        result
    }

    /// Single whole-document call: no upload, no cache.
    async fn extract_direct(&self, bytes: &[u8]) -> ExtractionResult {
        let parts = vec![
            RequestPart::InlinePdf(bytes.to_vec()),
            RequestPart::Text(prompt::WHOLE_DOCUMENT_PROMPT.to_string()),
        ];

        let classified = match self
            .client
            .generate(Some(prompt::SYSTEM_INSTRUCTION), parts, None)
            .await
        {
            Ok(generation) => executor::classify(generation),
            Err(e) => Err(e),
        };

        match classified {
            Ok((text, usage)) => {
                let mut result = ExtractionResult::success(text);
                result.prompt_tokens = usage.prompt_tokens;
                result.completion_tokens = usage.completion_tokens;
                result.total_tokens = usage.total_tokens;
                result
            }
            Err(e) => ExtractionResult::failure(e.to_string()),
        }
    }

    async fn extract_batched(
        &self,
        bytes: &[u8],
        filename: &str,
        page_count: u32,
    ) -> ExtractionResult {
        let batches = plan_batches(page_count, self.config.pages_per_batch);

        // Nothing to clean up if the upload itself fails.
        let document = match self.client.upload(bytes, filename).await {
            Ok(handle) => handle,
            Err(e) => return ExtractionResult::failure(e.to_string()),
        };

        let outcome = match self
            .client
            .create_cache(
                &document,
                prompt::SYSTEM_INSTRUCTION,
                self.config.cache_ttl_seconds,
            )
            .await
        {
            Ok(mut cache) => {
                let outcome = self
                    .run_cached_batches(&document, &mut cache, &batches)
                    .await;
                self.cleanup(Some(&cache), &document).await;
                outcome
            }
            Err(ScribaError::CacheUnsupported(reason)) => {
                tracing::warn!(
                    %reason,
                    "Document not eligible for context caching; falling back to uncached batches"
                );
                let outcome = self.run_uncached_batches(&document, &batches).await;
                self.cleanup(None, &document).await;
                outcome
            }
            Err(e) => {
                self.cleanup(None, &document).await;
                Err(e)
            }
        };

        match outcome {
            Ok(result) => result,
            Err(e) => ExtractionResult::failure(e.to_string()),
        }
    }

    async fn run_cached_batches(
        &self,
        document: &RemoteDocumentHandle,
        cache: &mut RemoteCacheHandle,
        batches: &[PageBatch],
    ) -> Result<ExtractionResult> {
        let executor = BatchExecutor::new(self.client.as_ref());
        let mut sections = BTreeMap::new();
        let mut prompt_tokens = 0u64;
        let mut completion_tokens = 0u64;

        for (index, batch) in batches.iter().copied().enumerate() {
            let is_first_batch = index == 0;
            let outcome = match executor.run_cached(cache, batch, is_first_batch).await {
                Ok(outcome) => outcome,
                Err(ScribaError::CacheExpired(reason)) => {
                    // One recreate-and-retry per batch; a second expiry on the
                    // retried call aborts the whole extraction.
                    tracing::warn!(
                        start_page = batch.start_page,
                        end_page = batch.end_page,
                        %reason,
                        "Context cache expired; recreating and retrying batch"
                    );
                    *cache = self
                        .client
                        .create_cache(
                            document,
                            prompt::SYSTEM_INSTRUCTION,
                            self.config.cache_ttl_seconds,
                        )
                        .await?;
                    executor.run_cached(cache, batch, is_first_batch).await?
                }
                Err(e) => return Err(e),
            };

            prompt_tokens += outcome.prompt_tokens;
            completion_tokens += outcome.completion_tokens;
            sections.insert(batch.start_page, section_text(batch, &outcome.text));
        }

        Ok(assemble(sections, prompt_tokens, completion_tokens, true))
    }

    async fn run_uncached_batches(
        &self,
        document: &RemoteDocumentHandle,
        batches: &[PageBatch],
    ) -> Result<ExtractionResult> {
        let executor = BatchExecutor::new(self.client.as_ref());
        let mut sections = BTreeMap::new();
        let mut prompt_tokens = 0u64;
        let mut completion_tokens = 0u64;

        for (index, batch) in batches.iter().copied().enumerate() {
            let outcome = executor.run_uncached(document, batch, index == 0).await?;
            prompt_tokens += outcome.prompt_tokens;
            completion_tokens += outcome.completion_tokens;
            sections.insert(batch.start_page, section_text(batch, &outcome.text));
        }

        Ok(assemble(sections, prompt_tokens, completion_tokens, false))
    }

    /// Best-effort release of remote resources, cache first, then the
    /// uploaded document. Failures are logged and swallowed so cleanup never
    /// masks the primary result.
    async fn cleanup(&self, cache: Option<&RemoteCacheHandle>, document: &RemoteDocumentHandle) {
        if let Some(cache) = cache {
            if let Err(e) = self.client.delete_cache(cache).await {
                tracing::warn!(
                    cache = %cache.name,
                    error = %e,
                    "Failed to delete context cache; remote resource may be leaked"
                );
            }
        }
        if let Err(e) = self.client.delete_document(document).await {
            tracing::warn!(
                document = %document.name,
                error = %e,
                "Failed to delete uploaded document; remote resource may be leaked"
            );
        }
    }
}

fn section_text(batch: PageBatch, text: &str) -> String {
    format!(
        "## Pages {}-{}\n\n{}",
        batch.start_page,
        batch.end_page,
        text.trim()
    )
}

fn assemble(
    sections: BTreeMap<u32, String>,
    prompt_tokens: u64,
    completion_tokens: u64,
    used_caching: bool,
) -> ExtractionResult {
    let text = sections.into_values().collect::<Vec<_>>().join("\n\n");
    let mut result = ExtractionResult::success(text);
    result.prompt_tokens = Some(prompt_tokens);
    result.completion_tokens = Some(completion_tokens);
    result.total_tokens = Some(prompt_tokens + completion_tokens);
    result.used_caching = used_caching;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_orders_sections_by_start_page() {
        let mut sections = BTreeMap::new();
        // Inserted out of page order; the map keys restore it.
        sections.insert(5, section_text(PageBatch::new(5, 6), "third"));
        sections.insert(1, section_text(PageBatch::new(1, 2), "first"));
        sections.insert(3, section_text(PageBatch::new(3, 4), "second"));

        let result = assemble(sections, 10, 5, true);
        let text = result.text.unwrap();

        let first = text.find("## Pages 1-2").unwrap();
        let second = text.find("## Pages 3-4").unwrap();
        let third = text.find("## Pages 5-6").unwrap();
        assert!(first < second && second < third);
        assert_eq!(result.total_tokens, Some(15));
        assert!(result.used_caching);
    }

    #[test]
    fn test_section_text_labels_page_range() {
        let section = section_text(PageBatch::new(7, 7), "  body  ");
        assert_eq!(section, "## Pages 7-7\n\nbody");
    }
}
