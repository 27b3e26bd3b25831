//! Workspace and collaborator builders

use codegraph_analysis::features::classification::RunStatistics;
use codegraph_analysis::pipeline::{
    EnrichmentError, EnrichmentRequest, EnrichmentService, FileReport, PipelineResult, Publisher,
};
use codegraph_analysis::{FileDescriptor, PipelineConfig};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temp project root plus a separate cache directory
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn project(&self) -> PathBuf {
        self.dir.path().join("project")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.dir.path().join("cache")
    }

    /// Write `content` under the project root and describe it
    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> FileDescriptor {
        let path = self.project().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write fixture");
        FileDescriptor::from_path(&path).expect("stat fixture")
    }

    /// Default config with the cache rooted in this workspace
    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::default().with_cache_dir(self.cache_dir())
    }
}

/// Enrichment double that counts calls and can be told to fail
pub struct MockEnrichment {
    config_id: String,
    pub calls: usize,
    pub seen_paths: Vec<String>,
    pub fail_with: Option<String>,
}

impl MockEnrichment {
    pub fn new() -> Self {
        Self {
            config_id: "mock-enrichment-v1".to_string(),
            calls: 0,
            seen_paths: Vec::new(),
            fail_with: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new()
        }
    }
}

impl EnrichmentService for MockEnrichment {
    fn config_id(&self) -> &str {
        &self.config_id
    }

    fn enrich(&mut self, request: &EnrichmentRequest<'_>) -> Result<Value, EnrichmentError> {
        self.calls += 1;
        self.seen_paths.push(request.file.display_path());
        if let Some(message) = &self.fail_with {
            return Err(EnrichmentError::Backend(message.clone()));
        }
        Ok(json!({
            "functions": request.model.functions.len(),
            "classes": request.model.classes.len(),
            "excerpt_bytes": request.excerpt.len(),
        }))
    }
}

/// Publisher that keeps everything in memory
#[derive(Default)]
pub struct MemoryPublisher {
    pub reports: Vec<FileReport>,
    pub statistics: Option<RunStatistics>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, suffix: &str) -> &FileReport {
        self.reports
            .iter()
            .find(|r| r.path.ends_with(suffix))
            .unwrap_or_else(|| panic!("no report for {suffix}"))
    }
}

impl Publisher for MemoryPublisher {
    fn publish(&mut self, _file: &FileDescriptor, report: &FileReport) -> PipelineResult<()> {
        self.reports.push(report.clone());
        Ok(())
    }

    fn finish(&mut self, statistics: &RunStatistics) -> PipelineResult<()> {
        self.statistics = Some(statistics.clone());
        Ok(())
    }
}
