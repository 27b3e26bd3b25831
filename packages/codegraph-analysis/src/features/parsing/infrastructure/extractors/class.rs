/*
 * Class Analysis Module
 *
 * Extracts class metadata from AST:
 * - Name, base classes (keyword arguments excluded, metaclass remembered)
 * - Methods (plain and decorated)
 * - Class-level attributes and `self.x` attributes assigned in `__init__`
 * - abstract / dataclass markers, decorators, docstring
 */

use super::common::{extract_docstring, node_text, target_names, unwrap_definition, value_text};
use super::function::{decorator_name, extract_function};
use crate::features::parsing::infrastructure::budget::{walk, Descend, TraversalBudget};
use crate::shared::models::{AttributeFact, ClassFact, Span};
use std::collections::HashSet;
use tree_sitter::Node;

/// Extract class metadata from a class_definition node
pub fn extract_class(
    node: &Node,
    decorators: Vec<String>,
    depth: usize,
    source: &str,
    budget: &mut TraversalBudget,
) -> Option<ClassFact> {
    if node.kind() != "class_definition" {
        return None;
    }

    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(&n, source).to_string())?;

    let (base_class_names, metaclass) = node
        .child_by_field_name("superclasses")
        .map(|args| extract_bases(&args, source))
        .unwrap_or_default();

    let mut class = ClassFact {
        name,
        base_class_names,
        methods: Vec::new(),
        attributes: Vec::new(),
        decorators,
        docstring: None,
        is_abstract: false,
        is_dataclass: false,
        detected_patterns: Vec::new(),
        span: Span::from_node(node),
    };

    if let Some(body) = node.child_by_field_name("body") {
        class.docstring = extract_docstring(&body, source);
        extract_body(&body, depth + 1, source, budget, &mut class);
    }

    class.is_dataclass = class
        .decorators
        .iter()
        .any(|d| last_segment(decorator_name(d)) == "dataclass");
    class.is_abstract = class
        .base_class_names
        .iter()
        .any(|b| last_segment(b) == "ABC")
        || metaclass.as_deref().map(last_segment) == Some("ABCMeta")
        || class.methods.iter().any(|m| {
            m.decorators
                .iter()
                .any(|d| last_segment(decorator_name(d)) == "abstractmethod")
        });

    Some(class)
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Positional bases plus the `metaclass=` keyword value, if any
fn extract_bases(args: &Node, source: &str) -> (Vec<String>, Option<String>) {
    let mut bases = Vec::new();
    let mut metaclass = None;
    let mut cursor = args.walk();

    for arg in args.named_children(&mut cursor) {
        match arg.kind() {
            "keyword_argument" => {
                let key = arg.child_by_field_name("name").map(|n| node_text(&n, source));
                if key == Some("metaclass") {
                    metaclass = arg
                        .child_by_field_name("value")
                        .map(|v| node_text(&v, source).to_string());
                }
            }
            "comment" | "list_splat" | "dictionary_splat" => {}
            _ => {
                let text = node_text(&arg, source).trim();
                if !text.is_empty() {
                    bases.push(text.to_string());
                }
            }
        }
    }

    (bases, metaclass)
}

/// Class-body statements, walked under the shared budget
///
/// The block is the walk root, so its statements are charged one visit each
/// and capped at `max_children` like any other fan-out.
fn extract_body(
    body: &Node,
    depth: usize,
    source: &str,
    budget: &mut TraversalBudget,
    class: &mut ClassFact,
) {
    let body_id = body.id();
    let mut seen: HashSet<String> = HashSet::new();

    walk(*body, depth, budget, |stmt, depth, budget| {
        if stmt.id() == body_id {
            return Descend::Into;
        }
        match stmt.kind() {
            "function_definition" | "decorated_definition" => {
                let (def, decorators) = unwrap_definition(stmt, source);
                if def.kind() != "function_definition" {
                    return Descend::Skip;
                }
                if let Some(method) = extract_function(&def, decorators, depth, source, budget) {
                    if method.name == "__init__" {
                        if let Some(init_body) = def.child_by_field_name("body") {
                            collect_instance_attributes(
                                init_body,
                                depth + 1,
                                source,
                                budget,
                                class,
                                &mut seen,
                            );
                        }
                    }
                    class.methods.push(method);
                }
            }
            "expression_statement" => {
                if let Some(assign) = stmt.named_child(0).filter(|n| n.kind() == "assignment") {
                    collect_class_attributes(&assign, source, class, &mut seen);
                }
            }
            _ => {}
        }
        Descend::Skip
    });
}

/// `x = 1`, `x: int = 1`, `x: int` at class level
fn collect_class_attributes(
    assign: &Node,
    source: &str,
    class: &mut ClassFact,
    seen: &mut HashSet<String>,
) {
    let Some(left) = assign.child_by_field_name("left") else {
        return;
    };
    let type_annotation = assign
        .child_by_field_name("type")
        .map(|t| node_text(&t, source).trim().to_string());
    let default_value_text = assign
        .child_by_field_name("right")
        .map(|r| value_text(&r, source));

    for name in target_names(&left, source) {
        push_attribute(
            class,
            seen,
            AttributeFact {
                is_private: AttributeFact::is_private_name(&name),
                name,
                type_annotation: type_annotation.clone(),
                default_value_text: default_value_text.clone(),
                is_class_level: true,
            },
        );
    }
}

/// `self.x = ...` anywhere in the `__init__` body, nested scopes excluded
fn collect_instance_attributes(
    init_body: Node,
    depth: usize,
    source: &str,
    budget: &mut TraversalBudget,
    class: &mut ClassFact,
    seen: &mut HashSet<String>,
) {
    let mut found: Vec<AttributeFact> = Vec::new();

    walk(init_body, depth, budget, |node, _, _| {
        match node.kind() {
            "function_definition" | "class_definition" | "lambda" => return Descend::Skip,
            "assignment" => {
                if let Some(attr) = self_attribute(&node, source) {
                    found.push(attr);
                }
            }
            _ => {}
        }
        Descend::Into
    });

    for attr in found {
        push_attribute(class, seen, attr);
    }
}

fn self_attribute(assign: &Node, source: &str) -> Option<AttributeFact> {
    let left = assign.child_by_field_name("left")?;
    if left.kind() != "attribute" {
        return None;
    }
    let object = left.child_by_field_name("object")?;
    if node_text(&object, source) != "self" {
        return None;
    }
    let name = node_text(&left.child_by_field_name("attribute")?, source).to_string();

    Some(AttributeFact {
        is_private: AttributeFact::is_private_name(&name),
        name,
        type_annotation: assign
            .child_by_field_name("type")
            .map(|t| node_text(&t, source).trim().to_string()),
        default_value_text: assign
            .child_by_field_name("right")
            .map(|r| value_text(&r, source)),
        is_class_level: false,
    })
}

/// First binding of a name wins
fn push_attribute(class: &mut ClassFact, seen: &mut HashSet<String>, attr: AttributeFact) {
    if seen.insert(attr.name.clone()) {
        class.attributes.push(attr);
    }
}
