//! Collaborator traits
//!
//! The pipeline depends on these abstractions only:
//! - `EnrichmentService` turns a model + source excerpt into an opaque payload
//! - `Publisher` receives one report per file and the run statistics
//!
//! Both are called from a single thread, one file at a time.

use super::error::{EnrichmentError, PipelineResult};
use super::report::FileReport;
use crate::features::classification::RunStatistics;
use crate::shared::models::{FileDescriptor, StructuralModel};

// ============================================================================
// Enrichment
// ============================================================================

/// What the pipeline sends to the enrichment backend
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentRequest<'a> {
    pub file: &'a FileDescriptor,
    pub model: &'a StructuralModel,
    /// Leading part of the source, cut on a char boundary
    pub excerpt: &'a str,
}

/// Expensive enrichment backend, gated by the cache
pub trait EnrichmentService {
    /// Identifies backend + prompt configuration; part of every cache key
    fn config_id(&self) -> &str;

    /// Produce the payload stored verbatim in the cache
    fn enrich(&mut self, request: &EnrichmentRequest<'_>) -> Result<serde_json::Value, EnrichmentError>;
}

// ============================================================================
// Publishing
// ============================================================================

pub trait Publisher {
    fn publish(&mut self, file: &FileDescriptor, report: &FileReport) -> PipelineResult<()>;

    /// Called once after the last file
    fn finish(&mut self, statistics: &RunStatistics) -> PipelineResult<()>;
}

/// Bounded prefix of `source`, never splitting a char
pub fn excerpt(source: &str, max_bytes: usize) -> &str {
    if source.len() <= max_bytes {
        return source;
    }
    let mut end = max_bytes;
    while end > 0 && !source.is_char_boundary(end) {
        end -= 1;
    }
    &source[..end]
}
