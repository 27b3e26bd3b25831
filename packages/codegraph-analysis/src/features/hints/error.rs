use thiserror::Error;

/// Rule evaluation failure; never escalates past the rule that raised it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HintError {
    #[error("Invalid method name pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Pattern '{pattern}' was not compiled for this engine")]
    UncompiledPattern { pattern: String },
}

pub type HintResult<T> = Result<T, HintError>;
