//! Infrastructure layer for parsing

pub mod budget;
pub mod extractors;
pub mod source_reader;
pub mod tree_sitter;

pub use budget::{walk, Descend, TraversalBudget};
pub use extractors::extract_model;
pub use source_reader::{decode, read_source, SourceText, FALLBACK_ENCODING};
pub use self::tree_sitter::{ParsedSource, PythonParser};
