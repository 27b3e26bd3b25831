//! Vertical feature slices
//!
//! Leaves first: classification has no dependencies, parsing reports into it,
//! hints run over extracted facts, cache fingerprints the result.

pub mod cache;
pub mod classification;
pub mod hints;
pub mod parsing;
