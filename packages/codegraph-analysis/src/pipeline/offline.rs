//! Deterministic, network-free enrichment used by the CLI
//!
//! Produces a structural summary instead of natural-language documentation,
//! so runs are reproducible and the cache gate can be exercised end to end.

use super::error::EnrichmentError;
use super::ports::{EnrichmentRequest, EnrichmentService};
use serde_json::{json, Value};

pub struct OfflineEnrichment {
    config_id: String,
    calls: usize,
}

impl OfflineEnrichment {
    pub fn new(config_id: impl Into<String>) -> Self {
        Self {
            config_id: config_id.into(),
            calls: 0,
        }
    }

    /// Number of `enrich` calls so far
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Default for OfflineEnrichment {
    fn default() -> Self {
        Self::new("offline-summary")
    }
}

impl EnrichmentService for OfflineEnrichment {
    fn config_id(&self) -> &str {
        &self.config_id
    }

    fn enrich(&mut self, request: &EnrichmentRequest<'_>) -> Result<Value, EnrichmentError> {
        self.calls += 1;
        let model = request.model;

        let functions: Vec<Value> = model
            .functions
            .iter()
            .map(|f| {
                json!({
                    "name": f.name,
                    "parameters": f.parameter_names().collect::<Vec<_>>(),
                    "complexity": f.complexity,
                    "is_async": f.is_async,
                    "summary": f.docstring.as_deref().and_then(|d| d.lines().next()),
                })
            })
            .collect();

        let classes: Vec<Value> = model
            .classes
            .iter()
            .map(|c| {
                json!({
                    "name": c.name,
                    "bases": c.base_class_names,
                    "methods": c.methods.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
                    "patterns": c.detected_patterns,
                    "summary": c.docstring.as_deref().and_then(|d| d.lines().next()),
                })
            })
            .collect();

        Ok(json!({
            "generator": self.config_id,
            "summary": model.docstring.as_deref().and_then(|d| d.lines().next()),
            "line_count": model.line_count,
            "complexity": model.complexity,
            "frameworks": model.framework_hints,
            "imports": model.imports.iter().map(|i| i.module.as_str()).collect::<Vec<_>>(),
            "functions": functions,
            "classes": classes,
            "excerpt_bytes": request.excerpt.len(),
        }))
    }
}
