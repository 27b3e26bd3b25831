//! Error Classifier
//!
//! Maps failure messages onto a fixed taxonomy, keeps the per-run record
//! list and derives `RunStatistics` on demand.

mod category;
mod classifier;
mod error;
mod record;
mod statistics;

pub use category::*;
pub use classifier::*;
pub use error::*;
pub use record::*;
pub use statistics::*;
