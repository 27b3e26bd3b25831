//! Budget presets
//!
//! A preset fixes the parse deadline and the traversal budget; everything
//! else starts from the shared defaults.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI gate over many small files
    Fast,
    #[default]
    Balanced,
    /// Large or generated sources
    Thorough,
    /// Balanced budgets, expected to be overridden
    Custom,
}

/// Deadline and traversal bounds selected by a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetBudget {
    pub parse_timeout_ms: u64,
    pub max_depth: usize,
    pub max_nodes: usize,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Fast, Preset::Balanced, Preset::Thorough, Preset::Custom];

    pub fn budget(&self) -> PresetBudget {
        let (parse_timeout_ms, max_depth, max_nodes) = match self {
            Preset::Fast => (5_000, 64, 250_000),
            Preset::Balanced | Preset::Custom => (30_000, 256, 2_000_000),
            Preset::Thorough => (120_000, 1024, 10_000_000),
        };
        PresetBudget {
            parse_timeout_ms,
            max_depth,
            max_nodes,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Fast => "fast",
            Preset::Balanced => "balanced",
            Preset::Thorough => "thorough",
            Preset::Custom => "custom",
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
