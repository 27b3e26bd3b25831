/*
 * Import Analysis Module
 *
 * `import a.b as c`           → module "a.b", items [a.b as c]
 * `from ..pkg import x, y as z` → module "pkg", level 2, items [x, y as z]
 * `from . import x`           → module "", level 1
 * `from m import *`           → items ["*"]
 */

use super::common::node_text;
use crate::shared::models::{ImportFact, ImportedName};
use tree_sitter::Node;

/// Import facts of one import_statement / import_from_statement node
pub fn extract_imports(node: &Node, source: &str) -> Vec<ImportFact> {
    let line = node.start_position().row as u32 + 1;
    match node.kind() {
        "import_statement" => extract_plain(node, source, line),
        "import_from_statement" => extract_from(node, source, line).into_iter().collect(),
        "future_import_statement" => vec![ImportFact {
            module: "__future__".to_string(),
            imported_items: named_items(node, source),
            is_from_style: true,
            relative_level: None,
            line,
        }],
        _ => Vec::new(),
    }
}

/// One fact per imported module
fn extract_plain(node: &Node, source: &str, line: u32) -> Vec<ImportFact> {
    named_items(node, source)
        .into_iter()
        .map(|item| ImportFact {
            module: item.name.clone(),
            imported_items: vec![item],
            is_from_style: false,
            relative_level: None,
            line,
        })
        .collect()
}

fn extract_from(node: &Node, source: &str, line: u32) -> Option<ImportFact> {
    let module_node = node.child_by_field_name("module_name")?;
    let (module, relative_level) = match module_node.kind() {
        "relative_import" => {
            let text = node_text(&module_node, source).trim();
            let level = text.chars().take_while(|c| *c == '.').count() as u32;
            (text.trim_start_matches('.').trim().to_string(), Some(level))
        }
        _ => (node_text(&module_node, source).trim().to_string(), None),
    };

    let mut imported_items = named_items(node, source);
    let mut cursor = node.walk();
    let has_wildcard = node
        .named_children(&mut cursor)
        .any(|c| c.kind() == "wildcard_import");
    if has_wildcard {
        imported_items.push(ImportedName {
            name: "*".to_string(),
            alias: None,
        });
    }

    Some(ImportFact {
        module,
        imported_items,
        is_from_style: true,
        relative_level,
        line,
    })
}

/// Every `name` field: dotted_name or aliased_import
fn named_items(node: &Node, source: &str) -> Vec<ImportedName> {
    let mut cursor = node.walk();
    let items = node
        .children_by_field_name("name", &mut cursor)
        .filter_map(|child| imported_name(&child, source))
        .collect();
    items
}

fn imported_name(node: &Node, source: &str) -> Option<ImportedName> {
    match node.kind() {
        "dotted_name" | "identifier" => Some(ImportedName {
            name: node_text(node, source).trim().to_string(),
            alias: None,
        }),
        "aliased_import" => Some(ImportedName {
            name: node_text(&node.child_by_field_name("name")?, source)
                .trim()
                .to_string(),
            alias: node
                .child_by_field_name("alias")
                .map(|a| node_text(&a, source).trim().to_string()),
        }),
        _ => None,
    }
}
