/*
 * Function Analysis Module
 *
 * Extracts function metadata from AST:
 * - Name, parameters (annotation, default, kind), return type hint
 * - async / generator / property / static-or-class markers
 * - Decorators, docstring, span
 * - Cyclomatic complexity of the function's own body
 */

use super::common::{extract_docstring, field_text, node_text, value_text};
use crate::features::parsing::infrastructure::budget::{walk, Descend, TraversalBudget};
use crate::shared::models::{FunctionFact, ParameterFact, ParameterKind, Span};
use tree_sitter::Node;

/// Node kinds that add one decision point
pub const DECISION_KINDS: &[&str] = &[
    "if_statement",
    "elif_clause",
    "conditional_expression",
    "for_statement",
    "while_statement",
    "except_clause",
    "boolean_operator",
    "case_clause",
    "for_in_clause",
    "if_clause",
];

pub fn is_decision_point(kind: &str) -> bool {
    DECISION_KINDS.contains(&kind)
}

/// Nested scopes whose bodies belong to someone else
fn is_nested_scope(kind: &str) -> bool {
    matches!(kind, "function_definition" | "class_definition" | "lambda")
}

/// Extract function metadata from a function_definition node
pub fn extract_function(
    node: &Node,
    decorators: Vec<String>,
    depth: usize,
    source: &str,
    budget: &mut TraversalBudget,
) -> Option<FunctionFact> {
    if node.kind() != "function_definition" {
        return None;
    }

    let name = field_text(node, "name", source)?;
    let is_async = is_async_definition(node);
    let parameters = node
        .child_by_field_name("parameters")
        .map(|p| extract_parameters(&p, source))
        .unwrap_or_default();
    let return_type_hint = field_text(node, "return_type", source);

    let body = node.child_by_field_name("body");
    let docstring = body.as_ref().and_then(|b| extract_docstring(b, source));
    let (complexity, is_generator) = match body {
        Some(body) => body_signals(body, depth + 1, budget),
        None => (1, false),
    };

    let is_property = decorators.iter().any(|d| is_property_decorator(d));
    let is_static_or_class_method = decorators
        .iter()
        .any(|d| matches!(decorator_name(d), "staticmethod" | "classmethod"));

    Some(FunctionFact {
        name,
        parameters,
        return_type_hint,
        is_async,
        is_generator,
        is_property,
        is_static_or_class_method,
        decorators,
        docstring,
        complexity,
        span: Span::from_node(node),
    })
}

/// `async def` carries an anonymous `async` token before `def`
fn is_async_definition(node: &Node) -> bool {
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            match child.kind() {
                "async" => return true,
                "def" => return false,
                _ => {}
            }
        }
    }
    false
}

/// Complexity (base 1) and generator flag, excluding nested scopes
fn body_signals(body: Node, depth: usize, budget: &mut TraversalBudget) -> (u32, bool) {
    let mut complexity = 1u32;
    let mut is_generator = false;

    walk(body, depth, budget, |node, _, _| {
        let kind = node.kind();
        if is_nested_scope(kind) {
            return Descend::Skip;
        }
        if kind == "yield" {
            is_generator = true;
        }
        if is_decision_point(kind) {
            complexity = complexity.saturating_add(1);
        }
        Descend::Into
    });

    (complexity, is_generator)
}

/// Extract parameters from a `parameters` node
pub fn extract_parameters(params: &Node, source: &str) -> Vec<ParameterFact> {
    let mut result = Vec::new();
    let mut cursor = params.walk();

    for param in params.named_children(&mut cursor) {
        let fact = match param.kind() {
            "identifier" => Some(ParameterFact::regular(node_text(&param, source))),
            "list_splat_pattern" | "dictionary_splat_pattern" => Some(splat(&param, source)),
            "default_parameter" => field_text(&param, "name", source).map(|name| ParameterFact {
                default_value: param.child_by_field_name("value").map(|v| value_text(&v, source)),
                ..ParameterFact::regular(name)
            }),
            "typed_default_parameter" => {
                field_text(&param, "name", source).map(|name| ParameterFact {
                    type_annotation: field_text(&param, "type", source),
                    default_value: param
                        .child_by_field_name("value")
                        .map(|v| value_text(&v, source)),
                    ..ParameterFact::regular(name)
                })
            }
            "typed_parameter" => {
                // name is the first named child: identifier or a splat pattern
                param.named_child(0).map(|inner| {
                    let base = match inner.kind() {
                        "list_splat_pattern" | "dictionary_splat_pattern" => splat(&inner, source),
                        _ => ParameterFact::regular(node_text(&inner, source)),
                    };
                    ParameterFact {
                        type_annotation: field_text(&param, "type", source),
                        ..base
                    }
                })
            }
            // bare `*` and `/` separators, comments
            _ => None,
        };

        if let Some(fact) = fact {
            result.push(fact);
        }
    }

    result
}

fn splat(node: &Node, source: &str) -> ParameterFact {
    let kind = if node.kind() == "list_splat_pattern" {
        ParameterKind::VarPositional
    } else {
        ParameterKind::VarKeyword
    };
    let name = node_text(node, source).trim_start_matches('*').trim().to_string();
    ParameterFact {
        kind,
        ..ParameterFact::regular(name)
    }
}

/// Decorator name without call arguments (`app.route("/")` → `app.route`)
pub fn decorator_name(decorator: &str) -> &str {
    decorator.split('(').next().unwrap_or(decorator).trim()
}

fn is_property_decorator(decorator: &str) -> bool {
    let name = decorator_name(decorator);
    let last = name.rsplit('.').next().unwrap_or(name);
    matches!(last, "property" | "cached_property" | "abstractproperty")
        || matches!(last, "setter" | "getter" | "deleter") && name.contains('.')
}
