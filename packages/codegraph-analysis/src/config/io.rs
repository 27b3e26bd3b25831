//! Configuration I/O (YAML schema types)
//!
//! Defines the on-disk schema. Loading and export live in pipeline_config.rs.

use super::pipeline_config::{EnrichmentConfig, ReportConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: u64,

    /// Base preset
    pub preset: String,

    /// Fine-grained overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisOverrides>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheOverrides>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichmentConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,
}

/// Partial analysis section; absent fields keep the preset value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_children: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continue_on_error: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding_fallback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt_max_bytes: Option<usize>,
}

/// Partial cache section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_prefix_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_path_in_key: Option<bool>,
}
