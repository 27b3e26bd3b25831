//! Prometheus metrics for the cache gate

use super::{CacheError, CacheResult};
use prometheus::{register_int_counter_with_registry, IntCounter, Opts, Registry};

/// Disk cache counters
#[derive(Clone)]
pub struct CacheMetrics {
    pub hits: IntCounter,
    pub misses: IntCounter,
    /// Subset of misses: entry present but past its TTL
    pub expired: IntCounter,
    pub writes: IntCounter,
    pub corrupted: IntCounter,
}

impl CacheMetrics {
    pub fn new(registry: &Registry) -> CacheResult<Self> {
        Ok(Self {
            hits: counter(registry, "cache_gate_hits_total", "Cache gate hits")?,
            misses: counter(registry, "cache_gate_misses_total", "Cache gate misses")?,
            expired: counter(
                registry,
                "cache_gate_expired_total",
                "Cache gate entries read past their TTL",
            )?,
            writes: counter(registry, "cache_gate_writes_total", "Cache gate writes")?,
            corrupted: counter(
                registry,
                "cache_gate_corrupted_total",
                "Cache gate undecodable entries",
            )?,
        })
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.get() as f64;
        let total = hits + self.misses.get() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

fn counter(registry: &Registry, name: &str, help: &str) -> CacheResult<IntCounter> {
    register_int_counter_with_registry!(Opts::new(name, help), registry)
        .map_err(|e| CacheError::Metrics(e.to_string()))
}
