//! Tree-sitter parser implementation
//!
//! This is where the tree-sitter grammar dependency lives. Parsing runs
//! under a wall-clock deadline; a tree with error nodes is returned as-is
//! unless nothing in it is usable.

use crate::features::parsing::{AnalysisError, AnalysisResult};
use crate::shared::models::{ParseError, Span};
use std::time::Duration;
use tree_sitter::{Node, Parser as TSParser, Tree};

/// Cap on error nodes reported per file
const MAX_REPORTED_ERRORS: usize = 100;

/// A tree that may still carry error nodes
pub struct ParsedSource {
    pub tree: Tree,
    pub errors: Vec<ParseError>,
}

impl ParsedSource {
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

/// Python parser with deadline
pub struct PythonParser {
    timeout: Duration,
}

impl PythonParser {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn parse(&self, source: &str) -> AnalysisResult<ParsedSource> {
        let mut parser = TSParser::new();
        parser
            .set_language(&tree_sitter_python::language())
            .map_err(|e| AnalysisError::Parser(e.to_string()))?;
        // 0 would disable the deadline
        parser.set_timeout_micros((self.timeout.as_micros() as u64).max(1));

        // With the language set, `None` only happens when the deadline fires
        let tree = parser.parse(source, None).ok_or(AnalysisError::Timeout {
            timeout_ms: self.timeout.as_millis() as u64,
        })?;

        let errors = collect_errors(tree.root_node());
        let root = tree.root_node();
        if root.has_error() && !has_usable_statement(root) {
            let line = errors.first().map(|e| e.span.start_line).unwrap_or(1);
            return Err(AnalysisError::Syntax {
                line,
                detail: "no complete statement could be parsed".to_string(),
            });
        }

        Ok(ParsedSource { tree, errors })
    }
}

/// At least one statement parsed without error nodes
///
/// Top-level statements count, and so do statements directly inside a
/// top-level class body, so a module that is one class with a broken method
/// still yields a model. On total failure tree-sitter may hand back an ERROR
/// root whose children are bare tokens, so only statement-shaped children count.
fn has_usable_statement(root: Node) -> bool {
    if root.kind() != "module" {
        return false;
    }
    let mut cursor = root.walk();
    let usable = root
        .named_children(&mut cursor)
        .any(|child| is_clean_statement(&child) || class_body_has_clean_statement(child));
    usable
}

fn is_clean_statement(node: &Node) -> bool {
    let kind = node.kind();
    (kind.ends_with("_statement") || kind.ends_with("_definition"))
        && !node.is_extra()
        && !node.has_error()
}

fn class_body_has_clean_statement(node: Node) -> bool {
    let class = match node.kind() {
        "class_definition" => node,
        "decorated_definition" => match node.child_by_field_name("definition") {
            Some(def) if def.kind() == "class_definition" => def,
            _ => return false,
        },
        _ => return false,
    };
    let Some(body) = class.child_by_field_name("body") else {
        return false;
    };
    let mut cursor = body.walk();
    let usable = body
        .named_children(&mut cursor)
        .any(|stmt| is_clean_statement(&stmt));
    usable
}

/// ERROR / MISSING nodes, outermost first (explicit stack, only into subtrees that have errors)
fn collect_errors(root: Node) -> Vec<ParseError> {
    let mut errors = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if errors.len() >= MAX_REPORTED_ERRORS {
            break;
        }
        if node.is_error() {
            errors.push(ParseError {
                message: "unexpected token(s)".to_string(),
                span: Span::from_node(&node),
            });
            continue;
        }
        if node.is_missing() {
            errors.push(ParseError {
                message: format!("missing {}", node.kind()),
                span: Span::from_node(&node),
            });
            continue;
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                if child.has_error() || child.is_missing() {
                    stack.push(child);
                }
            }
        }
    }

    errors
}
