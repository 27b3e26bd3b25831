//! Parsing Feature
//!
//! Turns one Python file into a `StructuralModel` under hard bounds.
//!
//! ## Structure
//! - `application/` - SourceAnalyzer (read → parse → extract → hints)
//! - `infrastructure/` - source reader, tree-sitter parser, budgeted extractors
//! - `error` - fatal per-file failures

pub mod application;
pub mod error;
pub mod infrastructure;

pub use application::{AnalysisContext, AnalysisState, AnalyzedFile, SourceAnalyzer};
pub use error::{AnalysisError, AnalysisResult};
pub use infrastructure::{ParsedSource, PythonParser, TraversalBudget};
