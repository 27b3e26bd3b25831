/*
 * Shared node helpers for extractors
 *
 * - Node text (never panics on odd byte ranges)
 * - Docstrings (first string statement of a block, cleaned)
 * - Decorators (text without '@')
 * - Bounded value text for defaults
 */

use tree_sitter::Node;

/// Longest default-value text kept on a fact
const MAX_VALUE_TEXT: usize = 120;

pub fn node_text<'s>(node: &Node, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Node text cut to `MAX_VALUE_TEXT` bytes on a char boundary
pub fn value_text(node: &Node, source: &str) -> String {
    let text = node_text(node, source).trim();
    if text.len() <= MAX_VALUE_TEXT {
        return text.to_string();
    }
    let mut end = MAX_VALUE_TEXT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Field child as text
pub fn field_text(node: &Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field)
        .map(|child| node_text(&child, source).trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Docstring of a `block` (function/class body) or `module`
pub fn extract_docstring(body: &Node, source: &str) -> Option<String> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| !child.is_extra())?;

    if first.kind() != "expression_statement" {
        return None;
    }
    let expr = first.named_child(0)?;
    if expr.kind() != "string" {
        return None;
    }

    let cleaned = clean_docstring(node_text(&expr, source));
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Strip prefix/quotes and common indentation
pub fn clean_docstring(raw: &str) -> String {
    let body = raw.trim_start_matches(|c: char| "rRuUbBfF".contains(c));
    let body = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find_map(|q| body.strip_prefix(q).and_then(|b| b.strip_suffix(q)))
        .unwrap_or(body);

    let mut lines = body.lines();
    let first = lines.next().unwrap_or("").trim().to_string();
    let rest: Vec<&str> = lines.collect();

    let indent = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = vec![first];
    for line in rest {
        let cut = line.char_indices().nth(indent).map(|(i, _)| i).unwrap_or(line.len());
        let stripped = if line.trim().is_empty() { "" } else { &line[cut.min(line.len())..] };
        out.push(stripped.trim_end().to_string());
    }

    while out.last().map_or(false, |l| l.is_empty()) {
        out.pop();
    }
    while out.first().map_or(false, |l| l.is_empty()) {
        out.remove(0);
    }
    out.join("\n")
}

/// Decorator texts of a `decorated_definition`, in source order
pub fn extract_decorators(node: &Node, source: &str) -> Vec<String> {
    if node.kind() != "decorated_definition" {
        return Vec::new();
    }
    let mut cursor = node.walk();
    let decorators = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "decorator")
        .map(|d| node_text(&d, source).trim().trim_start_matches('@').trim().to_string())
        .collect();
    decorators
}

/// Unwrap `decorated_definition` to the inner definition plus its decorators
pub fn unwrap_definition<'t>(node: Node<'t>, source: &str) -> (Node<'t>, Vec<String>) {
    if node.kind() == "decorated_definition" {
        if let Some(def) = node.child_by_field_name("definition") {
            return (def, extract_decorators(&node, source));
        }
    }
    (node, Vec::new())
}

/// Identifier names bound by an assignment target
pub fn target_names(target: &Node, source: &str) -> Vec<String> {
    match target.kind() {
        "identifier" => vec![node_text(target, source).to_string()],
        "pattern_list" | "tuple_pattern" | "list_pattern" => {
            let mut cursor = target.walk();
            let names = target
                .named_children(&mut cursor)
                .filter(|c| c.kind() == "identifier")
                .map(|c| node_text(&c, source).to_string())
                .collect();
            names
        }
        _ => Vec::new(),
    }
}
