//! Shared models
//!
//! The fact types produced by extraction and consumed by the cache gate,
//! the hint engine and the publisher.

mod facts;
mod file;
mod outcome;
mod span;

pub use facts::*;
pub use file::*;
pub use outcome::*;
pub use span::*;
