//! File descriptor handed in by the scanner

use crate::features::cache::{CacheResult, Fingerprint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source grammar of a file
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    Python,
}

impl LanguageTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageTag::Python => "python",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "py" | "pyi" => Some(LanguageTag::Python),
            _ => None,
        }
    }
}

/// Immutable description of one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub content_fingerprint: Option<Fingerprint>,
    pub language_tag: LanguageTag,
    pub modified_at: Option<DateTime<Utc>>,
}

impl FileDescriptor {
    /// Descriptor without fingerprint or mtime (tests, programmatic callers)
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            size_bytes,
            content_fingerprint: None,
            language_tag: LanguageTag::Python,
            modified_at: None,
        }
    }

    /// Stat and hash a file on disk
    pub fn from_path(path: impl AsRef<Path>) -> CacheResult<Self> {
        let path = path.as_ref();
        let (fingerprint, mtime_ns, size_bytes) = Fingerprint::from_file_with_metadata(path)?;
        let language_tag = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(LanguageTag::from_extension)
            .unwrap_or(LanguageTag::Python);

        Ok(Self {
            path: path.to_path_buf(),
            size_bytes,
            content_fingerprint: Some(fingerprint),
            language_tag,
            modified_at: Some(DateTime::<Utc>::from_timestamp_nanos(mtime_ns as i64)),
        })
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}
