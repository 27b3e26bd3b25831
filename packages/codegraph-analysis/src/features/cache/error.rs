//! Cache gate errors
//!
//! Undecodable or stale entries are misses, not errors. What remains here is
//! the filesystem, encoding a new entry, and metric registration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("file modification time is before the epoch: {0}")]
    Mtime(#[from] std::time::SystemTimeError),

    #[error("cache metrics registration failed: {0}")]
    Metrics(String),
}

pub type CacheResult<T> = Result<T, CacheError>;
