//! Configuration System
//!
//! - Level 1: Preset (`PipelineConfig::preset(Preset::Fast)`)
//! - Level 2: Builder overrides (`.with_ttl_seconds(60)`)
//! - Level 3: Versioned YAML (`PipelineConfig::from_yaml("codegraph.yaml")`)
//!
//! ```rust,ignore
//! use codegraph_analysis::config::{PipelineConfig, Preset};
//!
//! let config = PipelineConfig::preset(Preset::Balanced)
//!     .with_cache_dir(".cache/codegraph")
//!     .with_continue_on_error(false);
//! config.validate()?;
//! ```

pub mod error;
pub mod io;
pub mod pipeline_config;
pub mod preset;

pub use error::{ConfigError, ConfigResult};
pub use io::{AnalysisOverrides, CacheOverrides, ConfigExportV1, ConfigOverrides};
pub use pipeline_config::{
    AnalysisConfig, CacheConfig, EnrichmentConfig, PipelineConfig, ReportConfig,
};
pub use preset::{Preset, PresetBudget};
