pub mod batch;
pub mod executor;
pub mod orchestrator;
pub mod pdf;
pub mod prompt;

pub use batch::plan_batches;
pub use executor::BatchExecutor;
pub use orchestrator::PdfExtractor;
