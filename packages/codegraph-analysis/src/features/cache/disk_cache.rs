//! Disk-backed cache store
//!
//! Layout:
//! - Entry files: `{cache_dir}/{hex[..prefix_len]}/{hex}.json`
//! - Temp files: `{cache_dir}/{prefix}/.{hex}.json.{uuid}.tmp` (renamed into place)
//!
//! Anything unreadable, stale or shaped for another schema reads as a miss.

use crate::config::CacheConfig;
use crate::features::cache::{
    metrics::CacheMetrics, CacheEntry, CacheKey, CacheResult, SourceMetadata,
};
use crate::shared::io::write_atomic;
use chrono::{DateTime, Utc};
use prometheus::Registry;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct DiskCache {
    root: PathBuf,
    prefix_len: usize,
    schema_version: String,
    metrics: CacheMetrics,
}

impl DiskCache {
    pub fn new(config: &CacheConfig) -> CacheResult<Self> {
        let registry = Registry::new();
        Self::new_with_registry(config, &registry)
    }

    pub fn new_with_registry(config: &CacheConfig, registry: &Registry) -> CacheResult<Self> {
        fs::create_dir_all(&config.directory)?;

        Ok(Self {
            root: config.directory.clone(),
            prefix_len: config.shard_prefix_len,
            schema_version: config.schema_version.clone(),
            metrics: CacheMetrics::new(registry)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Entry file for a key
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root
            .join(key.prefix(self.prefix_len))
            .join(format!("{}.json", key.to_hex()))
    }

    /// Fresh entry for `key`, if any
    pub fn get(&self, key: &CacheKey) -> CacheResult<Option<CacheEntry>> {
        self.get_at(key, Utc::now())
    }

    /// Lookup against an explicit clock
    pub fn get_at(&self, key: &CacheKey, now: DateTime<Utc>) -> CacheResult<Option<CacheEntry>> {
        let path = self.entry_path(key);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key = %key, "cache miss");
                self.metrics.misses.inc();
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupted cache entry, treating as miss");
                self.metrics.corrupted.inc();
                self.metrics.misses.inc();
                return Ok(None);
            }
        };

        if entry.key != *key || entry.schema_version != self.schema_version {
            debug!(
                key = %key,
                schema = %entry.schema_version,
                "cache entry does not match key or schema"
            );
            self.metrics.misses.inc();
            return Ok(None);
        }

        if entry.is_expired_at(now) {
            debug!(key = %key, expired_at = %entry.expires_at(), "cache entry expired");
            self.metrics.expired.inc();
            self.metrics.misses.inc();
            return Ok(None);
        }

        debug!(key = %key, "cache hit");
        self.metrics.hits.inc();
        Ok(Some(entry))
    }

    /// Store a payload, replacing any previous entry for the key
    pub fn put(
        &self,
        key: &CacheKey,
        payload: serde_json::Value,
        ttl_seconds: u64,
        source_metadata: SourceMetadata,
    ) -> CacheResult<CacheEntry> {
        self.put_at(key, payload, ttl_seconds, source_metadata, Utc::now())
    }

    pub fn put_at(
        &self,
        key: &CacheKey,
        payload: serde_json::Value,
        ttl_seconds: u64,
        source_metadata: SourceMetadata,
        now: DateTime<Utc>,
    ) -> CacheResult<CacheEntry> {
        let entry = CacheEntry {
            key: *key,
            payload,
            created_at: now,
            ttl_seconds,
            schema_version: self.schema_version.clone(),
            source_metadata,
        };

        let bytes = serde_json::to_vec(&entry)?;

        let path = self.entry_path(key);
        if let Some(shard) = path.parent() {
            fs::create_dir_all(shard)?;
        }
        write_atomic(&path, &bytes)?;

        debug!(key = %key, ttl_seconds, "cache write");
        self.metrics.writes.inc();
        Ok(entry)
    }

    pub fn invalidate(&self, key: &CacheKey) -> CacheResult<bool> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every entry and leftover temp file
    ///
    /// Only files named like entries inside shard-named directories are
    /// touched; shard directories are removed once empty. The root itself is
    /// kept, so pointing the cache at a non-empty directory loses nothing else.
    pub fn clear(&self) -> CacheResult<()> {
        for shard in self.shard_dirs()? {
            for entry in fs::read_dir(&shard)? {
                let path = entry?.path();
                let owned = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, |n| is_entry_name(n) || is_temp_name(n));
                if owned && path.is_file() {
                    fs::remove_file(&path)?;
                }
            }
            // still holds foreign files
            if let Err(e) = fs::remove_dir(&shard) {
                debug!(shard = %shard.display(), error = %e, "shard kept after clear");
            }
        }
        Ok(())
    }

    /// Delete expired or undecodable entries; returns how many were removed
    pub fn purge_expired(&self) -> CacheResult<usize> {
        let now = Utc::now();
        let mut removed = 0;

        for path in self.entry_files()? {
            let stale = match fs::read(&path) {
                Ok(bytes) => match serde_json::from_slice::<CacheEntry>(&bytes) {
                    Ok(entry) => {
                        entry.is_expired_at(now) || entry.schema_version != self.schema_version
                    }
                    Err(_) => true,
                },
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => return Err(e.into()),
            };

            if stale {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }

        debug!(removed, "purged stale cache entries");
        Ok(removed)
    }

    pub fn entry_count(&self) -> CacheResult<usize> {
        Ok(self.entry_files()?.len())
    }

    /// Subdirectories named exactly like a key prefix
    fn shard_dirs(&self) -> CacheResult<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_shard = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| is_hex(n, self.prefix_len));
            if is_shard && path.is_dir() {
                dirs.push(path);
            }
        }
        Ok(dirs)
    }

    /// `<64 hex>.json` files inside shard directories
    fn entry_files(&self) -> CacheResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for shard in self.shard_dirs()? {
            for entry in fs::read_dir(&shard)? {
                let path = entry?.path();
                let is_entry = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map_or(false, is_entry_name);
                if is_entry && path.is_file() {
                    files.push(path);
                }
            }
        }
        Ok(files)
    }
}

const KEY_HEX_LEN: usize = 64;

fn is_hex(name: &str, len: usize) -> bool {
    name.len() == len && name.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn is_entry_name(name: &str) -> bool {
    name.strip_suffix(".json")
        .map_or(false, |stem| is_hex(stem, KEY_HEX_LEN))
}

/// `.<hex>.json.<uuid>.tmp` left behind by an interrupted write
fn is_temp_name(name: &str) -> bool {
    name.strip_prefix('.')
        .and_then(|rest| rest.split_once(".json."))
        .map_or(false, |(stem, tail)| {
            is_hex(stem, KEY_HEX_LEN) && tail.ends_with(".tmp")
        })
}
