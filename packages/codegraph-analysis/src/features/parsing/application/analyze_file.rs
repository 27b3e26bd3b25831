//! Analyze file use case
//!
//! `Unstarted → Reading → Parsing → Extracting → {Success | Partial | Failed}`
//!
//! Read and Parse failures are fatal for the file: they are reported to the
//! Error Classifier carried by `AnalysisContext`, then either folded into a
//! `Failed` outcome or returned as `Err` when `continue_on_error` is off.
//! Extraction never fails a file.

use crate::config::AnalysisConfig;
use crate::features::classification::{ErrorClassifier, ErrorContext};
use crate::features::hints::HintEngine;
use crate::features::parsing::infrastructure::{
    extract_model, read_source, PythonParser, SourceText, TraversalBudget,
};
use crate::features::parsing::{AnalysisError, AnalysisResult};
use crate::shared::models::{AnalysisOutcome, FileDescriptor};
use tracing::{debug, warn};

/// Run-scoped state handed into every `analyze` call
pub struct AnalysisContext<'a> {
    pub classifier: &'a mut ErrorClassifier,
    pub continue_on_error: bool,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(classifier: &'a mut ErrorClassifier, continue_on_error: bool) -> Self {
        Self {
            classifier,
            continue_on_error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    Unstarted,
    Reading,
    Parsing,
    Extracting,
    Success,
    Partial,
    Failed,
}

/// Outcome plus the decoded text (needed for fingerprinting)
#[derive(Debug, Clone)]
pub struct AnalyzedFile {
    pub outcome: AnalysisOutcome,
    pub source: Option<String>,
}

pub struct SourceAnalyzer {
    config: AnalysisConfig,
    parser: PythonParser,
    hints: HintEngine,
}

impl SourceAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        let parser = PythonParser::new(config.parse_timeout());
        Self {
            config,
            parser,
            hints: HintEngine::default(),
        }
    }

    pub fn with_hint_engine(mut self, hints: HintEngine) -> Self {
        self.hints = hints;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one file
    pub fn analyze(
        &self,
        file: &FileDescriptor,
        ctx: &mut AnalysisContext<'_>,
    ) -> AnalysisResult<AnalysisOutcome> {
        self.analyze_file(file, ctx).map(|analyzed| analyzed.outcome)
    }

    /// Analyze one file, keeping the decoded source
    pub fn analyze_file(
        &self,
        file: &FileDescriptor,
        ctx: &mut AnalysisContext<'_>,
    ) -> AnalysisResult<AnalyzedFile> {
        let path = file.display_path();
        let mut state = AnalysisState::Unstarted;

        advance(&path, &mut state, AnalysisState::Reading);
        let source = match read_source(
            &file.path,
            self.config.max_file_size_bytes,
            self.config.encoding_fallback,
        ) {
            Ok(source) => source,
            Err(err) => {
                let context = ErrorContext::default().with_file_size(file.size_bytes);
                return self.fail(&path, &mut state, err, context, ctx);
            }
        };

        self.analyze_text(&path, &mut state, source, ctx)
    }

    /// Analyze in-memory text as if it were read from `path`
    pub fn analyze_source(
        &self,
        path: &str,
        text: &str,
        ctx: &mut AnalysisContext<'_>,
    ) -> AnalysisResult<AnalyzedFile> {
        let mut state = AnalysisState::Unstarted;
        advance(path, &mut state, AnalysisState::Reading);

        let size = text.len() as u64;
        if size > self.config.max_file_size_bytes {
            let err = AnalysisError::ResourceLimit {
                size,
                limit: self.config.max_file_size_bytes,
            };
            let context = ErrorContext::default().with_file_size(size);
            return self.fail(path, &mut state, err, context, ctx);
        }

        let source = SourceText {
            text: text.to_string(),
            size_bytes: size,
            encoding: None,
        };
        self.analyze_text(path, &mut state, source, ctx)
    }

    fn analyze_text(
        &self,
        path: &str,
        state: &mut AnalysisState,
        source: SourceText,
        ctx: &mut AnalysisContext<'_>,
    ) -> AnalysisResult<AnalyzedFile> {
        advance(path, state, AnalysisState::Parsing);
        let parsed = match self.parser.parse(&source.text) {
            Ok(parsed) => parsed,
            Err(err) => {
                let mut context = ErrorContext::default()
                    .with_file_size(source.size_bytes)
                    .with_line_count(source.line_count());
                if let Some(encoding) = source.encoding {
                    context = context.with_encoding(encoding);
                }
                return self.fail(path, state, err, context, ctx);
            }
        };

        advance(path, state, AnalysisState::Extracting);
        let mut budget = TraversalBudget::from_config(&self.config);
        let mut model = extract_model(&parsed.tree, &source.text, path, &mut budget);
        model.encoding = source.encoding.map(str::to_string);
        self.hints.apply(&mut model);

        let mut reasons: Vec<String> = parsed
            .errors
            .iter()
            .map(|e| format!("line {}: {}", e.span.start_line, e.message))
            .collect();
        if model.truncated {
            reasons.push("extraction budget exhausted".to_string());
        }
        model.parse_errors = parsed.errors;

        ctx.classifier.record_success();

        let outcome = if reasons.is_empty() {
            advance(path, state, AnalysisState::Success);
            AnalysisOutcome::success(model)
        } else {
            advance(path, state, AnalysisState::Partial);
            warn!(file = %path, reasons = reasons.len(), "partial analysis: {}", reasons[0]);
            AnalysisOutcome::partial(model, reasons)
        };

        Ok(AnalyzedFile {
            outcome,
            source: Some(source.text),
        })
    }

    fn fail(
        &self,
        path: &str,
        state: &mut AnalysisState,
        err: AnalysisError,
        context: ErrorContext,
        ctx: &mut AnalysisContext<'_>,
    ) -> AnalysisResult<AnalyzedFile> {
        advance(path, state, AnalysisState::Failed);
        let category = ctx.classifier.log_error(path, &err, context).category;

        if !ctx.continue_on_error {
            return Err(err);
        }
        Ok(AnalyzedFile {
            outcome: AnalysisOutcome::failed(category, err.to_string()),
            source: None,
        })
    }
}

fn advance(path: &str, state: &mut AnalysisState, next: AnalysisState) {
    debug!(file = %path, from = ?state, to = ?next, "analysis state");
    *state = next;
}
