//! Pipeline configuration
//!
//! Three sections (analysis budgets, cache gate, enrichment identity) plus an
//! optional report destination. Start from a preset, adjust with `with_*`,
//! or load a versioned YAML file.

use super::error::{ConfigError, ConfigResult};
use super::io::{AnalysisOverrides, CacheOverrides, ConfigExportV1, ConfigOverrides};
use super::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SUPPORTED_VERSIONS: &[u64] = &[1];

/// Per-file resource bounds and failure policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    pub max_file_size_bytes: u64,
    pub parse_timeout_ms: u64,
    /// Nesting depth the tree walk will descend to
    pub max_depth: usize,
    /// Total node visits per file across all walks
    pub max_nodes: usize,
    /// Children visited per node
    pub max_children: usize,
    pub continue_on_error: bool,
    /// Decode invalid UTF-8 as ISO-8859-1 instead of failing
    pub encoding_fallback: bool,
    /// Source excerpt sent with an enrichment request
    pub excerpt_max_bytes: usize,
}

impl AnalysisConfig {
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    pub fn parse_timeout(&self) -> Duration {
        Duration::from_millis(self.parse_timeout_ms)
    }

    fn for_preset(preset: Preset) -> Self {
        let budget = preset.budget();
        Self {
            max_file_size_bytes: Self::DEFAULT_MAX_FILE_SIZE,
            parse_timeout_ms: budget.parse_timeout_ms,
            max_depth: budget.max_depth,
            max_nodes: budget.max_nodes,
            max_children: 10_000,
            continue_on_error: true,
            encoding_fallback: true,
            excerpt_max_bytes: 4096,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::for_preset(Preset::Balanced)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    pub directory: PathBuf,
    pub ttl_seconds: u64,
    /// Bump when the stored payload changes shape
    pub schema_version: String,
    /// Hex chars of the key used as shard directory name
    pub shard_prefix_len: usize,
    /// Same content at two paths gets two entries when set
    pub include_path_in_key: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from(".codegraph-cache"),
            ttl_seconds: 7 * 24 * 60 * 60,
            schema_version: "1".to_string(),
            shard_prefix_len: 2,
            include_path_in_key: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentConfig {
    /// Identifies the enrichment backend + prompt configuration in cache keys
    pub config_id: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            config_id: "offline-summary".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    preset: Preset,
    pub analysis: AnalysisConfig,
    pub cache: CacheConfig,
    pub enrichment: EnrichmentConfig,
    pub report: ReportConfig,
}

impl PipelineConfig {
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            analysis: AnalysisConfig::for_preset(preset),
            cache: CacheConfig::default(),
            enrichment: EnrichmentConfig::default(),
            report: ReportConfig::default(),
        }
    }

    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.analysis.max_file_size_bytes = bytes;
        self
    }

    pub fn with_parse_timeout(mut self, timeout: Duration) -> Self {
        self.analysis.parse_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_budget(mut self, max_depth: usize, max_nodes: usize, max_children: usize) -> Self {
        self.analysis.max_depth = max_depth;
        self.analysis.max_nodes = max_nodes;
        self.analysis.max_children = max_children;
        self
    }

    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.analysis.continue_on_error = continue_on_error;
        self
    }

    pub fn with_encoding_fallback(mut self, enabled: bool) -> Self {
        self.analysis.encoding_fallback = enabled;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache.directory = dir.into();
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache.enabled = enabled;
        self
    }

    pub fn with_ttl_seconds(mut self, ttl: u64) -> Self {
        self.cache.ttl_seconds = ttl;
        self
    }

    pub fn with_schema_version(mut self, version: impl Into<String>) -> Self {
        self.cache.schema_version = version.into();
        self
    }

    pub fn with_path_sensitive_keys(mut self, enabled: bool) -> Self {
        self.cache.include_path_in_key = enabled;
        self
    }

    pub fn with_enrichment_config_id(mut self, id: impl Into<String>) -> Self {
        self.enrichment.config_id = id.into();
        self
    }

    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report.path = Some(path.into());
        self
    }

    /// Range checks
    pub fn validate(&self) -> ConfigResult<()> {
        let a = &self.analysis;
        check_range("analysis.max_file_size_bytes", a.max_file_size_bytes, 1, u64::MAX, "a zero ceiling rejects every file")?;
        check_range("analysis.parse_timeout_ms", a.parse_timeout_ms, 1, u64::MAX, "the deadline must be positive")?;
        check_range("analysis.max_depth", a.max_depth as u64, 1, u64::MAX, "the walk must reach top-level statements")?;
        check_range("analysis.max_nodes", a.max_nodes as u64, 1, u64::MAX, "the walk must visit the module node")?;
        check_range("analysis.max_children", a.max_children as u64, 1, u64::MAX, "each node needs one child slot")?;

        check_range(
            "cache.shard_prefix_len",
            self.cache.shard_prefix_len as u64,
            1,
            8,
            "shard directories are named by a short hex prefix of the key",
        )
    }

    /// Load and validate a YAML file (schema v1)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        // Version is checked before the typed parse so a missing or future
        // version gets a precise error rather than a serde one.
        let raw: serde_yaml::Value = serde_yaml::from_str(content)?;
        let version = raw
            .get("version")
            .ok_or(ConfigError::MissingVersion)?
            .as_u64()
            .ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let export: ConfigExportV1 = serde_yaml::from_value(raw)?;
        let preset: Preset = export.preset.parse()?;

        let mut config = Self::preset(preset);
        if let Some(overrides) = export.overrides {
            config.apply(overrides);
        }
        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(a) = overrides.analysis {
            let target = &mut self.analysis;
            if let Some(v) = a.max_file_size_bytes {
                target.max_file_size_bytes = v;
            }
            if let Some(v) = a.parse_timeout_ms {
                target.parse_timeout_ms = v;
            }
            if let Some(v) = a.max_depth {
                target.max_depth = v;
            }
            if let Some(v) = a.max_nodes {
                target.max_nodes = v;
            }
            if let Some(v) = a.max_children {
                target.max_children = v;
            }
            if let Some(v) = a.continue_on_error {
                target.continue_on_error = v;
            }
            if let Some(v) = a.encoding_fallback {
                target.encoding_fallback = v;
            }
            if let Some(v) = a.excerpt_max_bytes {
                target.excerpt_max_bytes = v;
            }
        }

        if let Some(c) = overrides.cache {
            let target = &mut self.cache;
            if let Some(v) = c.enabled {
                target.enabled = v;
            }
            if let Some(v) = c.directory {
                target.directory = v;
            }
            if let Some(v) = c.ttl_seconds {
                target.ttl_seconds = v;
            }
            if let Some(v) = c.schema_version {
                target.schema_version = v;
            }
            if let Some(v) = c.shard_prefix_len {
                target.shard_prefix_len = v;
            }
            if let Some(v) = c.include_path_in_key {
                target.include_path_in_key = v;
            }
        }

        if let Some(e) = overrides.enrichment {
            self.enrichment = e;
        }
        if let Some(r) = overrides.report {
            self.report = r;
        }
    }

    /// Export as YAML v1 (full overrides, so the file is self-contained)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let a = &self.analysis;
        let c = &self.cache;
        let export = ConfigExportV1 {
            version: 1,
            preset: self.preset.to_string(),
            overrides: Some(ConfigOverrides {
                analysis: Some(AnalysisOverrides {
                    max_file_size_bytes: Some(a.max_file_size_bytes),
                    parse_timeout_ms: Some(a.parse_timeout_ms),
                    max_depth: Some(a.max_depth),
                    max_nodes: Some(a.max_nodes),
                    max_children: Some(a.max_children),
                    continue_on_error: Some(a.continue_on_error),
                    encoding_fallback: Some(a.encoding_fallback),
                    excerpt_max_bytes: Some(a.excerpt_max_bytes),
                }),
                cache: Some(CacheOverrides {
                    enabled: Some(c.enabled),
                    directory: Some(c.directory.clone()),
                    ttl_seconds: Some(c.ttl_seconds),
                    schema_version: Some(c.schema_version.clone()),
                    shard_prefix_len: Some(c.shard_prefix_len),
                    include_path_in_key: Some(c.include_path_in_key),
                }),
                enrichment: Some(self.enrichment.clone()),
                report: self.report.path.as_ref().map(|_| self.report.clone()),
            }),
        };

        Ok(serde_yaml::to_string(&export)?)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

fn check_range(
    field: &'static str,
    value: u64,
    min: u64,
    max: u64,
    hint: &'static str,
) -> ConfigResult<()> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
            hint,
        });
    }
    Ok(())
}
