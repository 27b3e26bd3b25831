//! Application layer for parsing

pub mod analyze_file;

pub use analyze_file::{AnalysisContext, AnalysisState, AnalyzedFile, SourceAnalyzer};
