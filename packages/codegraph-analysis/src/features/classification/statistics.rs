//! Run-level statistics

use super::{ErrorCategory, ErrorRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    /// Fraction in `0.0..=1.0`
    pub success_rate: f64,
    pub errors_by_category: BTreeMap<ErrorCategory, usize>,
    pub elapsed_ms: u64,
}

impl RunStatistics {
    /// Recompute from the record list and the success counter
    pub fn compute(
        declared_total: usize,
        successful: usize,
        records: &[ErrorRecord],
        elapsed_ms: u64,
    ) -> Self {
        let failed = records.len();
        let total_files = declared_total.max(successful + failed);

        let mut errors_by_category = BTreeMap::new();
        for record in records {
            *errors_by_category.entry(record.category).or_insert(0) += 1;
        }

        let success_rate = if total_files > 0 {
            successful as f64 / total_files as f64
        } else {
            0.0
        };

        Self {
            total_files,
            successful,
            failed,
            success_rate,
            errors_by_category,
            elapsed_ms,
        }
    }

    pub fn count(&self, category: ErrorCategory) -> usize {
        self.errors_by_category.get(&category).copied().unwrap_or(0)
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis summary:")?;
        writeln!(f, "  Total files:  {}", self.total_files)?;
        writeln!(f, "  Successful:   {}", self.successful)?;
        writeln!(f, "  Failed:       {}", self.failed)?;
        writeln!(f, "  Success rate: {:.1}%", self.success_rate * 100.0)?;
        writeln!(f, "  Elapsed:      {} ms", self.elapsed_ms)?;
        if !self.errors_by_category.is_empty() {
            writeln!(f, "\nFailures by category:")?;
            for (category, count) in &self.errors_by_category {
                writeln!(f, "  {}: {} file(s)", category, count)?;
            }
        }
        Ok(())
    }
}
