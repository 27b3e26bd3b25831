//! Sequential pipeline orchestrator
//!
//! For each file, strictly in input order:
//! 1. Analyze (Read → Parse → Extract → Hints)
//! 2. Derive the cache key from content + enrichment id + structural signature + schema
//! 3. Cache hit → reuse payload; miss → enrich with a bounded excerpt and store
//! 4. Publish the per-file report
//!
//! One writer, one file at a time. Cache and enrichment failures degrade the
//! file's report; only a fatal analysis error under `continue_on_error = false`
//! or a publisher failure stops the run.

use super::ports::{excerpt, EnrichmentRequest, EnrichmentService, Publisher};
use super::report::{EnrichmentState, FileReport};
use crate::config::PipelineConfig;
use crate::errors::Result;
use crate::features::cache::{
    CacheKey, DiskCache, FingerprintInputs, SourceMetadata, StructuralSignature,
};
use crate::features::classification::{ErrorClassifier, RunStatistics};
use crate::features::hints::HintEngine;
use crate::features::parsing::{AnalysisContext, SourceAnalyzer};
use crate::shared::models::{FileDescriptor, StructuralModel};
use prometheus::Registry;
use tracing::{debug, info, warn};

pub struct Pipeline<E: EnrichmentService, P: Publisher> {
    config: PipelineConfig,
    analyzer: SourceAnalyzer,
    cache: Option<DiskCache>,
    classifier: ErrorClassifier,
    enrichment: E,
    publisher: P,
    project_path: String,
}

impl<E: EnrichmentService, P: Publisher> Pipeline<E, P> {
    /// Validate the config and open the cache directory (when enabled)
    pub fn new(config: PipelineConfig, enrichment: E, publisher: P) -> Result<Self> {
        Self::build(config, enrichment, publisher, None)
    }

    /// Same as `new`, registering cache metrics on a caller-owned registry
    pub fn with_registry(
        config: PipelineConfig,
        enrichment: E,
        publisher: P,
        registry: &Registry,
    ) -> Result<Self> {
        Self::build(config, enrichment, publisher, Some(registry))
    }

    fn build(
        config: PipelineConfig,
        enrichment: E,
        publisher: P,
        registry: Option<&Registry>,
    ) -> Result<Self> {
        config.validate()?;

        let cache = if config.cache.enabled {
            let cache = match registry {
                Some(registry) => DiskCache::new_with_registry(&config.cache, registry)?,
                None => DiskCache::new(&config.cache)?,
            };
            Some(cache)
        } else {
            None
        };

        Ok(Self {
            analyzer: SourceAnalyzer::new(config.analysis.clone()),
            config,
            cache,
            classifier: ErrorClassifier::new(),
            enrichment,
            publisher,
            project_path: ".".to_string(),
        })
    }

    pub fn with_hint_engine(mut self, hints: HintEngine) -> Self {
        self.analyzer = SourceAnalyzer::new(self.config.analysis.clone()).with_hint_engine(hints);
        self
    }

    /// Project root recorded in the error report
    pub fn with_project_path(mut self, project_path: impl Into<String>) -> Self {
        self.project_path = project_path.into();
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Classifier of the current (or last) run
    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    pub fn cache(&self) -> Option<&DiskCache> {
        self.cache.as_ref()
    }

    pub fn enrichment(&self) -> &E {
        &self.enrichment
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn into_parts(self) -> (E, P) {
        (self.enrichment, self.publisher)
    }

    /// Process every file in order and return the run statistics
    pub fn run(&mut self, files: &[FileDescriptor]) -> Result<RunStatistics> {
        self.classifier = ErrorClassifier::new();
        self.classifier.set_total_files(files.len());
        info!(
            files = files.len(),
            cache = self.cache.is_some(),
            continue_on_error = self.config.analysis.continue_on_error,
            "analysis run started"
        );

        for file in files {
            let step = self.process(file).and_then(|report| {
                self.publisher
                    .publish(file, &report)
                    .map_err(Into::into)
            });
            if let Err(err) = step {
                // aborted run: keep what was recorded so far
                if let Err(export_err) = self.export_report() {
                    warn!("error report export failed: {}", export_err);
                }
                return Err(err);
            }
        }

        let statistics = self.classifier.statistics();
        self.export_report()?;
        self.publisher.finish(&statistics)?;

        info!(
            total = statistics.total_files,
            successful = statistics.successful,
            failed = statistics.failed,
            elapsed_ms = statistics.elapsed_ms,
            "analysis run finished"
        );
        Ok(statistics)
    }

    fn process(&mut self, file: &FileDescriptor) -> Result<FileReport> {
        let path = file.display_path();
        let analyzed = {
            let mut ctx =
                AnalysisContext::new(&mut self.classifier, self.config.analysis.continue_on_error);
            self.analyzer.analyze_file(file, &mut ctx)?
        };

        let outcome = analyzed.outcome;
        let (cache_key, enrichment) =
            match (outcome.model(), analyzed.source.as_deref(), self.cache.as_ref()) {
                (Some(model), Some(source), Some(cache)) => {
                    let gate = CacheGate {
                        cache,
                        config: &self.config,
                        file,
                        path: &path,
                    };
                    let (key, state) = gate.resolve(&mut self.enrichment, model, source);
                    (Some(key), state)
                }
                (Some(_), Some(_), None) => (None, EnrichmentState::Disabled),
                _ => (None, EnrichmentState::Skipped),
            };

        Ok(FileReport {
            path,
            outcome,
            cache_key,
            enrichment,
        })
    }

    fn export_report(&self) -> Result<()> {
        if let Some(path) = &self.config.report.path {
            self.classifier
                .export_report(path, self.project_path.clone())?;
        }
        Ok(())
    }
}

/// Borrowed view used for one cache lookup + enrichment
struct CacheGate<'a> {
    cache: &'a DiskCache,
    config: &'a PipelineConfig,
    file: &'a FileDescriptor,
    path: &'a str,
}

impl CacheGate<'_> {
    fn key<E: EnrichmentService>(
        &self,
        enrichment: &E,
        model: &StructuralModel,
        source: &str,
    ) -> CacheKey {
        let signature = StructuralSignature::from_model(model);
        CacheKey::derive(&FingerprintInputs {
            content: source.as_bytes(),
            enrichment_config_id: enrichment.config_id(),
            structural_signature: &signature,
            schema_version: self.cache.schema_version(),
            path: self.config.cache.include_path_in_key.then_some(self.path),
        })
    }

    fn resolve<E: EnrichmentService>(
        &self,
        enrichment: &mut E,
        model: &StructuralModel,
        source: &str,
    ) -> (CacheKey, EnrichmentState) {
        let key = self.key(enrichment, model, source);

        match self.cache.get(&key) {
            Ok(Some(entry)) => {
                return (
                    key,
                    EnrichmentState::Cached {
                        payload: entry.payload,
                    },
                )
            }
            Ok(None) => debug!(file = %self.path, key = %key, "cache miss"),
            Err(e) => warn!(file = %self.path, "cache read failed, treating as miss: {}", e),
        }

        let request = EnrichmentRequest {
            file: self.file,
            model,
            excerpt: excerpt(source, self.config.analysis.excerpt_max_bytes),
        };
        let payload = match enrichment.enrich(&request) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(file = %self.path, "enrichment failed, nothing cached: {}", e);
                return (
                    key,
                    EnrichmentState::Failed {
                        message: e.to_string(),
                    },
                );
            }
        };

        let metadata = SourceMetadata {
            path: self.path.to_string(),
            size_bytes: source.len() as u64,
            line_count: model.line_count,
            language: self.file.language_tag.as_str().to_string(),
        };
        if let Err(e) = self
            .cache
            .put(&key, payload.clone(), self.config.cache.ttl_seconds, metadata)
        {
            warn!(file = %self.path, "cache write failed: {}", e);
        }

        (key, EnrichmentState::Fresh { payload })
    }
}
