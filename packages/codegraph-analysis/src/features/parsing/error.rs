//! Fatal per-file errors (Read and Parse steps)
//!
//! Messages never embed file paths or source text: the classifier works on
//! message substrings, and a path like `timeout_utils.py` must not steer it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("File access error: {0}")]
    FileAccess(#[from] std::io::Error),

    #[error("File size {size} bytes exceeds limit of {limit} bytes")]
    ResourceLimit { size: u64, limit: u64 },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Parse timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("Syntax error at line {line}: {detail}")]
    Syntax { line: u32, detail: String },

    #[error("Parser initialization failed: {0}")]
    Parser(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
