//! Pipeline errors
//!
//! `EnrichmentError` never fails a file; `PipelineError` is raised by the
//! collaborators whose failure does stop a run (scanner, publisher).

use thiserror::Error;

/// Failure reported by an enrichment backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentError {
    /// Backend unreachable or returned an error
    #[error("Enrichment backend failed: {0}")]
    Backend(String),

    /// Backend answered with something it cannot stand behind
    #[error("Invalid enrichment response: {0}")]
    InvalidResponse(String),
}

/// Collaborator failures that abort a run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Directory walk failed
    #[error("Scan failed under {path}: {reason}")]
    Scan { path: String, reason: String },

    /// Publisher could not write its output
    #[error("Publish failed for {path}: {reason}")]
    Publish { path: String, reason: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
