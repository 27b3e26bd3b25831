//! Cache Gate
//!
//! Content-addressable disk cache in front of the enrichment call:
//!
//! - **Fingerprint**: Blake3 over a fixed-order pre-image (content, enrichment
//!   config id, structural signature, schema version)
//! - **Storage**: one JSON document per entry under `{dir}/{hex[..n]}/{hex}.json`
//! - **TTL**: expired entries read as a miss and are overwritten on next put
//! - **Writes**: temp file + rename, never truncate in place
//!
//! Single writer. Parallel callers would need per-key in-flight de-duplication
//! before the "one enrichment per key per TTL window" guarantee holds.

mod disk_cache;
mod error;
mod fingerprint;
mod metrics;
mod types;

pub use disk_cache::DiskCache;
pub use error::*;
pub use fingerprint::*;
pub use metrics::*;
pub use types::*;
