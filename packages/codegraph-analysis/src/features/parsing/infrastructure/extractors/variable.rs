//! Module-level variable names
//!
//! Names bound by plain or annotated assignment at module level (including
//! inside top-level `if`/`try`/`with` blocks). Augmented assignments rebind
//! an existing name and are not counted.

use super::common::target_names;
use tree_sitter::Node;

/// Names bound by an expression_statement, if it holds an assignment
pub fn assigned_names(stmt: &Node, source: &str) -> Vec<String> {
    if stmt.kind() != "expression_statement" {
        return Vec::new();
    }
    let Some(assign) = stmt.named_child(0).filter(|n| n.kind() == "assignment") else {
        return Vec::new();
    };

    let mut names = Vec::new();
    let mut current = Some(assign);
    // chained `a = b = 1` nests assignments on the right
    while let Some(node) = current {
        if let Some(left) = node.child_by_field_name("left") {
            names.extend(target_names(&left, source));
        }
        current = node
            .child_by_field_name("right")
            .filter(|r| r.kind() == "assignment");
    }
    names
}
