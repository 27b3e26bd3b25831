//! Structural facts extracted from one source file
//!
//! A `StructuralModel` is built once by the extractor and never mutated
//! afterwards. Sequences keep source order so two runs over the same file
//! compare equal.

use super::Span;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Parameter kind (`*args` / `**kwargs` are tracked separately)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Regular,
    VarPositional,
    VarKeyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterFact {
    pub name: String,
    pub type_annotation: Option<String>,
    pub default_value: Option<String>,
    pub kind: ParameterKind,
}

impl ParameterFact {
    pub fn regular(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_annotation: None,
            default_value: None,
            kind: ParameterKind::Regular,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionFact {
    pub name: String,
    pub parameters: Vec<ParameterFact>,
    pub return_type_hint: Option<String>,
    pub is_async: bool,
    pub is_generator: bool,
    pub is_property: bool,
    pub is_static_or_class_method: bool,
    pub decorators: Vec<String>,
    pub docstring: Option<String>,
    pub complexity: u32,
    pub span: Span,
}

impl FunctionFact {
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators.iter().any(|d| decorator_matches(d, name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFact {
    pub name: String,
    pub type_annotation: Option<String>,
    pub default_value_text: Option<String>,
    pub is_class_level: bool,
    /// Naming convention only (`_name`, not `__dunder__`)
    pub is_private: bool,
}

impl AttributeFact {
    pub fn is_private_name(name: &str) -> bool {
        let dunder = name.len() > 4 && name.starts_with("__") && name.ends_with("__");
        name.starts_with('_') && !dunder
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFact {
    pub name: String,
    pub base_class_names: Vec<String>,
    pub methods: Vec<FunctionFact>,
    pub attributes: Vec<AttributeFact>,
    pub decorators: Vec<String>,
    pub docstring: Option<String>,
    pub is_abstract: bool,
    pub is_dataclass: bool,
    pub detected_patterns: Vec<PatternHint>,
    pub span: Span,
}

impl ClassFact {
    pub fn method(&self, name: &str) -> Option<&FunctionFact> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    pub fn class_attribute(&self, name: &str) -> Option<&AttributeFact> {
        self.attributes
            .iter()
            .find(|a| a.is_class_level && a.name == name)
    }

    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators.iter().any(|d| decorator_matches(d, name))
    }

    pub fn has_pattern(&self, hint: &str) -> bool {
        self.detected_patterns.iter().any(|p| p.as_str() == hint)
    }
}

/// One name brought in by an import statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedName {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFact {
    /// Dotted module path (empty for `from . import x`)
    pub module: String,
    pub imported_items: Vec<ImportedName>,
    pub is_from_style: bool,
    /// Number of leading dots for relative imports
    pub relative_level: Option<u32>,
    pub line: u32,
}

impl ImportFact {
    /// First segment of the module path (`os.path` → `os`)
    pub fn root_module(&self) -> &str {
        self.module.split('.').next().unwrap_or("")
    }

    pub fn is_star(&self) -> bool {
        self.imported_items.iter().any(|i| i.name == "*")
    }
}

/// Advisory framework tag (never authoritative)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameworkHint(pub String);

/// Advisory design-pattern tag (never authoritative)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternHint(pub String);

impl FrameworkHint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PatternHint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameworkHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PatternHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Syntax error node found in an otherwise usable tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuralModel {
    pub file_path: String,
    pub functions: Vec<FunctionFact>,
    pub classes: Vec<ClassFact>,
    pub imports: Vec<ImportFact>,
    pub global_variables: BTreeSet<String>,
    pub complexity: u32,
    pub line_count: usize,
    pub parse_errors: Vec<ParseError>,
    pub framework_hints: Vec<FrameworkHint>,
    pub uses_type_hints: bool,
    pub docstring: Option<String>,
    /// Set when content was not valid UTF-8 and a fallback decoding was used
    pub encoding: Option<String>,
    /// Extraction stopped early because the traversal budget ran out
    pub truncated: bool,
}

impl StructuralModel {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            complexity: 1,
            ..Default::default()
        }
    }

    pub fn class(&self, name: &str) -> Option<&ClassFact> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionFact> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn has_framework(&self, hint: &str) -> bool {
        self.framework_hints.iter().any(|h| h.as_str() == hint)
    }

    /// Functions plus methods
    pub fn all_functions(&self) -> impl Iterator<Item = &FunctionFact> {
        self.functions
            .iter()
            .chain(self.classes.iter().flat_map(|c| c.methods.iter()))
    }
}

/// `@functools.wraps(f)` matches `wraps`; `@app.route("/")` matches `app.route`
fn decorator_matches(decorator: &str, name: &str) -> bool {
    let head = decorator.split('(').next().unwrap_or(decorator).trim();
    head == name || head.rsplit('.').next() == Some(name)
}
