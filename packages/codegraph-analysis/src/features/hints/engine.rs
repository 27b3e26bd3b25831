//! Hint engine: runs every rule independently over a model

use super::framework::{FrameworkRule, BUILTIN_FRAMEWORK_RULES};
use super::pattern::{CompiledPatterns, PatternRule, BUILTIN_PATTERN_RULES};
use super::HintError;
use crate::shared::models::{FrameworkHint, PatternHint, StructuralModel};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct HintEngine {
    pattern_rules: Vec<PatternRule>,
    framework_rules: Vec<FrameworkRule>,
    patterns: CompiledPatterns,
    rule_errors: Vec<(&'static str, HintError)>,
}

impl Default for HintEngine {
    fn default() -> Self {
        let engine = BUILTIN_PATTERN_RULES
            .iter()
            .cloned()
            .fold(Self::empty(), Self::with_pattern_rule);
        Self {
            framework_rules: BUILTIN_FRAMEWORK_RULES.to_vec(),
            ..engine
        }
    }
}

impl HintEngine {
    /// Engine with no rules
    pub fn empty() -> Self {
        Self {
            pattern_rules: Vec::new(),
            framework_rules: Vec::new(),
            patterns: CompiledPatterns::default(),
            rule_errors: Vec::new(),
        }
    }

    /// Add a rule, compiling its regexes now
    ///
    /// A rule with an invalid pattern is kept but recorded in `rule_errors`;
    /// it only ever evaluates to a non-match.
    pub fn with_pattern_rule(mut self, rule: PatternRule) -> Self {
        if let Err(e) = self.patterns.compile(&rule.condition) {
            warn!(rule = rule.hint, "pattern rule has an invalid pattern: {}", e);
            self.rule_errors.push((rule.hint, e));
        }
        self.pattern_rules.push(rule);
        self
    }

    pub fn with_framework_rule(mut self, rule: FrameworkRule) -> Self {
        self.framework_rules.push(rule);
        self
    }

    pub fn pattern_rules(&self) -> &[PatternRule] {
        &self.pattern_rules
    }

    pub fn framework_rules(&self) -> &[FrameworkRule] {
        &self.framework_rules
    }

    /// Rules whose patterns failed to compile
    pub fn rule_errors(&self) -> &[(&'static str, HintError)] {
        &self.rule_errors
    }

    /// Attach pattern hints to classes and framework hints to the model
    pub fn apply(&self, model: &mut StructuralModel) {
        for class in model.classes.iter_mut() {
            let mut detected = Vec::new();
            for rule in &self.pattern_rules {
                match rule.condition.evaluate_with(class, &self.patterns) {
                    Ok(true) => detected.push(PatternHint(rule.hint.to_string())),
                    Ok(false) => {}
                    // already reported once when the rule was added
                    Err(e) => debug!(
                        file = %model.file_path,
                        class = %class.name,
                        rule = rule.hint,
                        "pattern rule skipped: {}",
                        e
                    ),
                }
            }
            detected.dedup();
            class.detected_patterns = detected;
        }

        let mut frameworks: Vec<FrameworkHint> = self
            .framework_rules
            .iter()
            .filter(|rule| rule.matches(&*model))
            .map(|rule| FrameworkHint(rule.hint.to_string()))
            .collect();
        frameworks.dedup();
        model.framework_hints = frameworks;
    }
}
