use scriba_core::result::PageBatch;

/// System instruction shared by the cached and uncached paths. Baked into the
/// context cache at creation time on the cached path.
pub const SYSTEM_INSTRUCTION: &str = "You are a document extraction system. \
Extract text and tables from the PDF document faithfully as Markdown. \
Preserve table structure, reading order, and paragraph breaks. \
Do not add any commentary or explanation.";

/// Prompt for the single-call direct path (documents at or below the page
/// threshold).
pub const WHOLE_DOCUMENT_PROMPT: &str = "Extract all text and table content \
from this PDF document. Return only the extracted content as Markdown, \
preserving structure. Do not add any commentary or explanation.";

/// Page-range instruction for one batch. The first batch asks for the table
/// header; later batches suppress it so concatenated outputs form one
/// continuous table.
pub fn batch_prompt(batch: PageBatch, is_first_batch: bool) -> String {
    let header_instruction = if is_first_batch {
        "Include the table header row."
    } else {
        "Do not repeat the table header row; continue rows only."
    };
    format!(
        "Extract all text and table content from pages {} to {} of the document \
as Markdown. {} Return only the extracted content.",
        batch.start_page, batch.end_page, header_instruction
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_prompt_names_page_range() {
        let prompt = batch_prompt(PageBatch::new(3, 4), false);
        assert!(prompt.contains("pages 3 to 4"));
    }

    #[test]
    fn test_first_batch_requests_header() {
        let prompt = batch_prompt(PageBatch::new(1, 2), true);
        assert!(prompt.contains("Include the table header"));
    }

    #[test]
    fn test_later_batches_suppress_header() {
        let prompt = batch_prompt(PageBatch::new(3, 4), false);
        assert!(prompt.contains("Do not repeat the table header"));
    }
}
