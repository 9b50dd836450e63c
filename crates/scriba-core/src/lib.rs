pub mod api_types;
pub mod config;
pub mod error;
pub mod remote;
pub mod result;

pub use config::{ExtractorConfig, DEFAULT_MODEL};
pub use error::{Result, ScribaError};
pub use remote::{
    GenerativeClient, Generation, RemoteCacheHandle, RemoteDocumentHandle, RequestPart, TokenUsage,
};
pub use result::{BatchOutcome, ExtractionResult, PageBatch};
