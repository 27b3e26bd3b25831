//! Pipeline orchestration
//!
//! - `orchestrator` - sequential Pipeline (analyze → cache gate → enrich → publish)
//! - `ports` - EnrichmentService / Publisher traits
//! - `offline` - deterministic enrichment backend for the CLI
//! - `publisher` - JSON Lines output
//! - `scanner` - minimal Python file discovery

pub mod error;
pub mod offline;
pub mod orchestrator;
pub mod ports;
pub mod publisher;
pub mod report;
pub mod scanner;

pub use error::{EnrichmentError, PipelineError, PipelineResult};
pub use offline::OfflineEnrichment;
pub use orchestrator::Pipeline;
pub use ports::{excerpt, EnrichmentRequest, EnrichmentService, Publisher};
pub use publisher::JsonLinesPublisher;
pub use report::{EnrichmentState, FileReport};
pub use scanner::scan_python_files;
