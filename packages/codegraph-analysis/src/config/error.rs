//! Configuration errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} = {value} is outside {min}..={max}: {hint}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
        hint: &'static str,
    },

    #[error("config file has no 'version' key (expected `version: 1` at the top)")]
    MissingVersion,

    #[error("config version {found} is not supported (known: {supported:?})")]
    UnsupportedVersion { found: u64, supported: Vec<u64> },

    #[error("unknown preset '{0}' (fast, balanced, thorough, custom)")]
    UnknownPreset(String),

    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
