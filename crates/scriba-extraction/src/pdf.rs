use lopdf::Document;

use scriba_core::error::{Result, ScribaError};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Fast-fail gate run before any remote call is made.
pub fn validate_pdf_bytes(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(ScribaError::InvalidDocument("File is empty".to_string()));
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ScribaError::InvalidDocument(
            "File is not a valid PDF".to_string(),
        ));
    }
    Ok(())
}

/// Parse the page count out of raw PDF bytes. Borrows the buffer; callers
/// reuse it for the subsequent upload.
pub fn page_count(bytes: &[u8]) -> Result<u32> {
    let doc =
        Document::load_mem(bytes).map_err(|e| ScribaError::DocumentUnreadable(e.to_string()))?;
    Ok(u32::try_from(doc.get_pages().len()).unwrap_or(u32::MAX))
}
