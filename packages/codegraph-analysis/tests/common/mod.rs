//! Common test utilities for codegraph-analysis
//!
//! Python fixtures, workspace helpers and in-memory pipeline collaborators
//! shared by the integration targets.

#![allow(dead_code)]

pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
