use std::sync::Arc;

use scriba_core::ExtractorConfig;
use scriba_extraction::PdfExtractor;

#[derive(Clone)]
pub struct AppState {
    pub config: ExtractorConfig,
    pub extractor: Arc<PdfExtractor>,
}
