//! Tree-sitter integration

pub mod parser;

pub use parser::{ParsedSource, PythonParser};
