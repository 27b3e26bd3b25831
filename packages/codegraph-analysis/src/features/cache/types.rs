//! Core types for the cache gate

use blake3::Hash as Blake3Hash;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Content fingerprint (Blake3 hash)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct Fingerprint(pub Blake3Hash);

impl Fingerprint {
    /// Compute fingerprint from raw bytes
    pub fn compute(content: &[u8]) -> Self {
        Self(blake3::hash(content))
    }

    pub fn new(hash: Blake3Hash) -> Self {
        Self(hash)
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }

    pub fn from_hex(hex: &str) -> Result<Self, blake3::HexError> {
        Ok(Self(blake3::Hash::from_hex(hex)?))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

// Blake3Hash doesn't implement serde
impl Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

/// Stable key for one enrichment result
///
/// Built only through `CacheKey::derive` so every key carries the full
/// input set (see `FingerprintInputs`).
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(Fingerprint);

impl CacheKey {
    pub(crate) fn from_fingerprint(fingerprint: Fingerprint) -> Self {
        Self(fingerprint)
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn from_hex(hex: &str) -> Result<Self, blake3::HexError> {
        Fingerprint::from_hex(hex).map(Self)
    }

    /// Shard directory name (first `len` hex chars)
    pub fn prefix(&self, len: usize) -> String {
        let hex = self.to_hex();
        hex[..len.min(hex.len())].to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Where a cached payload came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub path: String,
    pub size_bytes: u64,
    pub line_count: usize,
    pub language: String,
}

/// One stored enrichment result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    /// Opaque enrichment payload, stored verbatim
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub ttl_seconds: u64,
    pub schema_version: String,
    pub source_metadata: SourceMetadata,
}

impl CacheEntry {
    pub fn expires_at(&self) -> DateTime<Utc> {
        // Duration::seconds panics above i64::MAX / 1000
        let ttl = i64::try_from(self.ttl_seconds)
            .unwrap_or(i64::MAX)
            .min(i64::MAX / 1_000);
        self.created_at
            .checked_add_signed(Duration::seconds(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Expired once `now > created_at + ttl`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }
}
