//! Shared data types and helpers used across features

pub mod io;
pub mod models;
