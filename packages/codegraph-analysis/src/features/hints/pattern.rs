//! Design-pattern rules over class facts

use super::{HintError, HintResult};
use crate::shared::models::ClassFact;
use regex::Regex;
use std::collections::HashMap;

/// Predicate over one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Every listed method is defined
    HasMethods(&'static [&'static str]),
    /// At least one listed method is defined
    HasAnyMethod(&'static [&'static str]),
    /// At least one listed class-level attribute is defined
    HasClassAttribute(&'static [&'static str]),
    /// At least one listed decorator is applied to the class
    DecoratedWith(&'static [&'static str]),
    /// At least one base class matches (last dotted segment)
    InheritsFrom(&'static [&'static str]),
    /// Some method name matches the regex
    MethodNamePattern(&'static str),
    IsDataClass,
    IsAbstract,
    All(&'static [Condition]),
    Any(&'static [Condition]),
}

impl Condition {
    /// One-off evaluation; compiles any regex the condition needs first
    pub fn evaluate(&self, class: &ClassFact) -> HintResult<bool> {
        let mut patterns = CompiledPatterns::default();
        // an invalid pattern surfaces from evaluate_with if it is reached
        let _ = patterns.compile(self);
        self.evaluate_with(class, &patterns)
    }

    /// Evaluate against regexes compiled ahead of time
    pub fn evaluate_with(&self, class: &ClassFact, patterns: &CompiledPatterns) -> HintResult<bool> {
        Ok(match self {
            Condition::HasMethods(names) => names.iter().all(|n| class.has_method(n)),
            Condition::HasAnyMethod(names) => names.iter().any(|n| class.has_method(n)),
            Condition::HasClassAttribute(names) => {
                names.iter().any(|n| class.class_attribute(n).is_some())
            }
            Condition::DecoratedWith(names) => names.iter().any(|n| class.has_decorator(n)),
            Condition::InheritsFrom(names) => class.base_class_names.iter().any(|base| {
                let last = base.rsplit('.').next().unwrap_or(base);
                names.contains(&last)
            }),
            Condition::MethodNamePattern(pattern) => {
                let re = patterns.get(pattern)?;
                class.methods.iter().any(|m| re.is_match(&m.name))
            }
            Condition::IsDataClass => class.is_dataclass,
            Condition::IsAbstract => class.is_abstract,
            Condition::All(conditions) => {
                for condition in conditions.iter() {
                    if !condition.evaluate_with(class, patterns)? {
                        return Ok(false);
                    }
                }
                true
            }
            Condition::Any(conditions) => {
                for condition in conditions.iter() {
                    if condition.evaluate_with(class, patterns)? {
                        return Ok(true);
                    }
                }
                false
            }
        })
    }
}

/// Method-name regexes, compiled once per distinct pattern
#[derive(Debug, Clone, Default)]
pub struct CompiledPatterns {
    regexes: HashMap<&'static str, Result<Regex, HintError>>,
}

impl CompiledPatterns {
    /// Compile every pattern under `condition`; the first invalid one is returned
    pub fn compile(&mut self, condition: &Condition) -> HintResult<()> {
        match condition {
            Condition::MethodNamePattern(pattern) => self
                .regexes
                .entry(*pattern)
                .or_insert_with(|| {
                    Regex::new(pattern).map_err(|e| HintError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    })
                })
                .as_ref()
                .map(|_| ())
                .map_err(Clone::clone),
            Condition::All(conditions) | Condition::Any(conditions) => {
                let mut first_error = None;
                for condition in conditions.iter() {
                    if let Err(e) = self.compile(condition) {
                        first_error.get_or_insert(e);
                    }
                }
                first_error.map_or(Ok(()), Err)
            }
            _ => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.regexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regexes.is_empty()
    }

    fn get(&self, pattern: &str) -> HintResult<&Regex> {
        match self.regexes.get(pattern) {
            Some(Ok(re)) => Ok(re),
            Some(Err(e)) => Err(e.clone()),
            None => Err(HintError::UncompiledPattern {
                pattern: pattern.to_string(),
            }),
        }
    }
}

/// One row of the pattern table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    pub hint: &'static str,
    pub condition: Condition,
}

impl PatternRule {
    pub const fn new(hint: &'static str, condition: Condition) -> Self {
        Self { hint, condition }
    }
}

pub const BUILTIN_PATTERN_RULES: &[PatternRule] = &[
    PatternRule::new(
        "Context Manager",
        Condition::HasMethods(&["__enter__", "__exit__"]),
    ),
    PatternRule::new(
        "Async Context Manager",
        Condition::HasMethods(&["__aenter__", "__aexit__"]),
    ),
    PatternRule::new(
        "Singleton",
        Condition::All(&[
            Condition::HasClassAttribute(&["_instance", "__instance", "_instances"]),
            Condition::HasAnyMethod(&["__new__", "get_instance", "instance", "getInstance"]),
        ]),
    ),
    PatternRule::new(
        "Iterator",
        Condition::HasMethods(&["__iter__", "__next__"]),
    ),
    PatternRule::new("Data Class", Condition::IsDataClass),
    PatternRule::new("Abstract Base Class", Condition::IsAbstract),
    PatternRule::new(
        "Factory",
        Condition::MethodNamePattern(r"^(create|make|build)_"),
    ),
    PatternRule::new(
        "Observer",
        Condition::All(&[
            Condition::HasAnyMethod(&[
                "subscribe",
                "attach",
                "add_observer",
                "add_listener",
                "register_observer",
            ]),
            Condition::HasAnyMethod(&["notify", "notify_observers", "notify_all", "emit"]),
        ]),
    ),
    PatternRule::new("Callable Object", Condition::HasMethods(&["__call__"])),
];
