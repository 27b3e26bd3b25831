//! Error Classifier: per-run sink for file-level failures
//!
//! Keeps a flat, append-only list of `ErrorRecord`s plus a success counter.
//! No per-file identity beyond the records themselves.

use super::{ClassifierError, ClassifierResult, ErrorCategory, ErrorContext, ErrorRecord, RunStatistics};
use crate::shared::io::write_atomic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};

/// Exported error report document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub timestamp: DateTime<Utc>,
    pub project_path: String,
    pub summary: RunStatistics,
    pub errors: Vec<ErrorRecord>,
}

#[derive(Debug)]
pub struct ErrorClassifier {
    records: Vec<ErrorRecord>,
    successful: usize,
    total_files: usize,
    started: Instant,
}

impl ErrorClassifier {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            successful: 0,
            total_files: 0,
            started: Instant::now(),
        }
    }

    /// Classify and append a failure
    pub fn log_error(
        &mut self,
        file_path: impl Into<String>,
        err: &dyn Display,
        context: ErrorContext,
    ) -> &ErrorRecord {
        let record = ErrorRecord::new(file_path, err.to_string(), context);
        error!(
            file = %record.file_path,
            category = %record.category,
            retryable = record.is_retryable,
            "{}",
            record.message
        );
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn record_success(&mut self) {
        self.successful += 1;
    }

    pub fn set_total_files(&mut self, total: usize) {
        self.total_files = total;
    }

    pub fn statistics(&self) -> RunStatistics {
        RunStatistics::compute(
            self.total_files,
            self.successful,
            &self.records,
            self.started.elapsed().as_millis() as u64,
        )
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn errors_for(&self, category: ErrorCategory) -> impl Iterator<Item = &ErrorRecord> {
        self.records.iter().filter(move |r| r.category == category)
    }

    pub fn retryable_records(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.records.iter().filter(|r| r.is_retryable)
    }

    pub fn has_errors(&self) -> bool {
        !self.records.is_empty()
    }

    /// Human-readable summary with a few sample paths per category
    pub fn summary_report(&self) -> String {
        let mut report = self.statistics().to_string();

        for category in ErrorCategory::ALL {
            let paths: Vec<&str> = self
                .errors_for(category)
                .map(|r| r.file_path.as_str())
                .collect();
            if paths.is_empty() {
                continue;
            }
            report.push_str(&format!("\n{}:\n", category));
            for path in paths.iter().take(3) {
                report.push_str(&format!("    - {}\n", path));
            }
            if paths.len() > 3 {
                report.push_str(&format!("    ... and {} more\n", paths.len() - 3));
            }
        }

        report
    }

    pub fn build_report(&self, project_path: impl Into<String>) -> ErrorReport {
        ErrorReport {
            timestamp: Utc::now(),
            project_path: project_path.into(),
            summary: self.statistics(),
            errors: self.records.clone(),
        }
    }

    /// Write the full report as pretty JSON
    pub fn export_report(
        &self,
        path: impl AsRef<Path>,
        project_path: impl Into<String>,
    ) -> ClassifierResult<()> {
        let path = path.as_ref();
        let report = self.build_report(project_path);
        let json = serde_json::to_vec_pretty(&report)
            .map_err(|e| ClassifierError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(path, &json)?;

        info!(
            path = %path.display(),
            errors = report.errors.len(),
            "Error report exported"
        );
        Ok(())
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}
