//! Tri-state result of analyzing one file

use super::StructuralModel;
use crate::features::classification::ErrorCategory;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Success {
        model: Box<StructuralModel>,
    },
    /// Tree had error nodes or extraction was truncated, model still usable
    Partial {
        model: Box<StructuralModel>,
        reasons: Vec<String>,
    },
    /// No model exists
    Failed {
        category: ErrorCategory,
        reason: String,
    },
}

impl AnalysisOutcome {
    pub fn success(model: StructuralModel) -> Self {
        Self::Success {
            model: Box::new(model),
        }
    }

    pub fn partial(model: StructuralModel, reasons: Vec<String>) -> Self {
        Self::Partial {
            model: Box::new(model),
            reasons,
        }
    }

    pub fn failed(category: ErrorCategory, reason: impl Into<String>) -> Self {
        Self::Failed {
            category,
            reason: reason.into(),
        }
    }

    pub fn model(&self) -> Option<&StructuralModel> {
        match self {
            Self::Success { model } | Self::Partial { model, .. } => Some(model),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn failure_category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Failed { category, .. } => Some(*category),
            _ => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Partial { .. } => "partial",
            Self::Failed { .. } => "failed",
        }
    }
}
