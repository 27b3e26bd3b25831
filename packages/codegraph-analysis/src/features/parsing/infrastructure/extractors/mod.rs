//! Structural fact extraction
//!
//! Two budgeted passes over the parsed tree:
//! - structure pass: module-level definitions and globals, descending only
//!   through module-level compound statements
//! - file pass: imports, decision points and type-hint usage anywhere
//!
//! Both draw from one `TraversalBudget`, so total work per file is bounded.

pub mod class;
pub mod common;
pub mod function;
pub mod import;
pub mod variable;

pub use class::extract_class;
pub use function::{extract_function, is_decision_point};
pub use import::extract_imports;

use crate::features::parsing::infrastructure::budget::{walk, Descend, TraversalBudget};
use crate::shared::models::StructuralModel;
use common::{extract_docstring, unwrap_definition};
use tree_sitter::Tree;

/// Compound statements whose blocks still count as module level
fn is_module_level_container(kind: &str) -> bool {
    matches!(
        kind,
        "module"
            | "block"
            | "if_statement"
            | "elif_clause"
            | "else_clause"
            | "try_statement"
            | "except_clause"
            | "except_group_clause"
            | "finally_clause"
            | "with_statement"
            | "for_statement"
            | "while_statement"
            | "ERROR"
    )
}

/// Build the structural model for a parsed file
pub fn extract_model(
    tree: &Tree,
    source: &str,
    file_path: &str,
    budget: &mut TraversalBudget,
) -> StructuralModel {
    let root = tree.root_node();
    let mut model = StructuralModel::new(file_path);
    model.line_count = source.lines().count();
    model.docstring = extract_docstring(&root, source);

    structure_pass(tree, source, budget, &mut model);
    file_pass(tree, source, budget, &mut model);

    model.truncated = budget.is_truncated();
    model
}

fn structure_pass(
    tree: &Tree,
    source: &str,
    budget: &mut TraversalBudget,
    model: &mut StructuralModel,
) {
    walk(tree.root_node(), 0, budget, |node, depth, budget| {
        let kind = node.kind();
        match kind {
            "function_definition" | "class_definition" | "decorated_definition" => {
                let (def, decorators) = unwrap_definition(node, source);
                match def.kind() {
                    "function_definition" => {
                        if let Some(f) = extract_function(&def, decorators, depth, source, budget) {
                            model.functions.push(f);
                        }
                    }
                    "class_definition" => {
                        if let Some(c) = extract_class(&def, decorators, depth, source, budget) {
                            model.classes.push(c);
                        }
                    }
                    _ => {}
                }
                Descend::Skip
            }
            "expression_statement" => {
                model
                    .global_variables
                    .extend(variable::assigned_names(&node, source));
                Descend::Skip
            }
            _ if is_module_level_container(kind) => Descend::Into,
            _ => Descend::Skip,
        }
    });
}

fn file_pass(tree: &Tree, source: &str, budget: &mut TraversalBudget, model: &mut StructuralModel) {
    let mut decisions = 0u32;

    walk(tree.root_node(), 0, budget, |node, _, _| {
        let kind = node.kind();
        match kind {
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                model.imports.extend(extract_imports(&node, source));
                return Descend::Skip;
            }
            "typed_parameter" | "typed_default_parameter" => model.uses_type_hints = true,
            "function_definition" if node.child_by_field_name("return_type").is_some() => {
                model.uses_type_hints = true
            }
            "assignment" if node.child_by_field_name("type").is_some() => {
                model.uses_type_hints = true
            }
            _ => {}
        }
        if is_decision_point(kind) {
            decisions = decisions.saturating_add(1);
        }
        Descend::Into
    });

    model.complexity = 1u32.saturating_add(decisions);
}
