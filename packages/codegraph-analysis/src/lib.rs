/*
 * Codegraph Analysis - Source Analysis & Caching Pipeline
 *
 * Feature-First Layout:
 * - shared/      : Fact types (StructuralModel, Span, FileDescriptor, outcome)
 * - features/    : parsing → hints → classification → cache
 * - pipeline/    : Sequential orchestration + collaborator ports
 * - config/      : Versioned YAML configuration with presets
 *
 * One file at a time: read → parse → extract → fingerprint → enrich (on miss) → publish.
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Fact constructors mirror the data model
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional

pub mod config;
pub mod errors;
pub mod features;
pub mod pipeline;
pub mod shared;

pub use config::{PipelineConfig, Preset};
pub use errors::{CodegraphError, Result};
pub use features::cache::{CacheEntry, CacheKey, DiskCache, Fingerprint};
pub use features::classification::{ErrorCategory, ErrorClassifier, ErrorRecord, RunStatistics};
pub use features::parsing::{AnalysisContext, AnalysisError, SourceAnalyzer};
pub use pipeline::{EnrichmentService, Pipeline, Publisher};
pub use shared::models::{AnalysisOutcome, FileDescriptor, StructuralModel};
