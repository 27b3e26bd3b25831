//! Error taxonomy and message-based classification
//!
//! Classification is a pure function of the lowercased message text. The
//! rule table is ordered most-specific-first and the first match wins:
//! "parse timed out" must land in `TimeoutError`, not `SyntaxError`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    SyntaxError,
    EncodingError,
    TimeoutError,
    ResourceLimitError,
    FileAccessError,
    UnknownError,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 6] = [
        ErrorCategory::SyntaxError,
        ErrorCategory::EncodingError,
        ErrorCategory::TimeoutError,
        ErrorCategory::ResourceLimitError,
        ErrorCategory::FileAccessError,
        ErrorCategory::UnknownError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::SyntaxError => "SyntaxError",
            ErrorCategory::EncodingError => "EncodingError",
            ErrorCategory::TimeoutError => "TimeoutError",
            ErrorCategory::ResourceLimitError => "ResourceLimitError",
            ErrorCategory::FileAccessError => "FileAccessError",
            ErrorCategory::UnknownError => "UnknownError",
        }
    }

    /// Syntax errors will fail again on the same input; everything else may not
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorCategory::SyntaxError)
    }

    /// Classify an error message
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        CLASSIFICATION_RULES
            .iter()
            .find(|rule| rule.needles.iter().any(|n| lowered.contains(n)))
            .map(|rule| rule.category)
            .unwrap_or(ErrorCategory::UnknownError)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct ClassificationRule {
    category: ErrorCategory,
    needles: &'static [&'static str],
}

const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        category: ErrorCategory::TimeoutError,
        needles: &["timed out", "timeout", "deadline"],
    },
    ClassificationRule {
        category: ErrorCategory::ResourceLimitError,
        needles: &[
            "exceeds limit",
            "too large",
            "memory",
            "recursion",
            "resource limit",
        ],
    },
    ClassificationRule {
        category: ErrorCategory::EncodingError,
        needles: &["encoding", "decode", "codec", "utf-8", "unicode", "binary"],
    },
    ClassificationRule {
        category: ErrorCategory::SyntaxError,
        needles: &[
            "syntax",
            "parse error",
            "unexpected",
            "unterminated",
            "indentation",
        ],
    },
    ClassificationRule {
        category: ErrorCategory::FileAccessError,
        needles: &[
            "permission denied",
            "no such file",
            "not found",
            "file access",
            "is a directory",
            "i/o error",
        ],
    },
];
