//! Error types for codegraph-analysis
//!
//! Feature errors stay in their own modules; this enum is what the pipeline
//! and binary propagate.

use crate::config::ConfigError;
use crate::features::cache::CacheError;
use crate::features::classification::ClassifierError;
use crate::features::parsing::AnalysisError;
use crate::pipeline::PipelineError;
use thiserror::Error;

/// Main error type for codegraph-analysis operations
#[derive(Debug, Error)]
pub enum CodegraphError {
    /// Fatal per-file failure (only surfaces with continue_on_error = false)
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Report error: {0}")]
    Report(#[from] ClassifierError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for codegraph operations
pub type Result<T> = std::result::Result<T, CodegraphError>;
