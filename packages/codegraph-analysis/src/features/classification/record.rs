//! Append-only error records

use super::ErrorCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional facts about the failing file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

impl ErrorContext {
    pub fn with_file_size(mut self, bytes: u64) -> Self {
        self.file_size_bytes = Some(bytes);
        self
    }

    pub fn with_line_count(mut self, lines: usize) -> Self {
        self.line_count = Some(lines);
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub file_path: String,
    pub category: ErrorCategory,
    pub message: String,
    pub context: ErrorContext,
    pub timestamp: DateTime<Utc>,
    pub is_retryable: bool,
}

impl ErrorRecord {
    /// Classify `message` and stamp the record with the current time
    pub fn new(file_path: impl Into<String>, message: impl Into<String>, context: ErrorContext) -> Self {
        let message = message.into();
        let category = ErrorCategory::classify(&message);
        Self {
            file_path: file_path.into(),
            category,
            message,
            context,
            timestamp: Utc::now(),
            is_retryable: category.is_retryable(),
        }
    }
}
