//! Per-file result handed to the publisher

use crate::features::cache::CacheKey;
use crate::shared::models::AnalysisOutcome;
use serde::{Deserialize, Serialize};

/// How the enrichment payload for a file was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EnrichmentState {
    /// Fresh cache entry; the backend was not called
    Cached { payload: serde_json::Value },
    /// Backend called on a cache miss
    Fresh { payload: serde_json::Value },
    /// Backend failed; nothing was stored
    Failed { message: String },
    /// Analysis failed, so there was nothing to enrich
    Skipped,
    /// Cache gate turned off; analysis-only run
    Disabled,
}

impl EnrichmentState {
    pub fn payload(&self) -> Option<&serde_json::Value> {
        match self {
            EnrichmentState::Cached { payload } | EnrichmentState::Fresh { payload } => {
                Some(payload)
            }
            _ => None,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, EnrichmentState::Cached { .. })
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, EnrichmentState::Fresh { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub outcome: AnalysisOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<CacheKey>,
    pub enrichment: EnrichmentState,
}
