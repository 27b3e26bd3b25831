//! Traversal budget and explicit-stack tree walk
//!
//! Every walk over a syntax tree goes through `walk`, which charges one unit
//! per visited node against a shared `TraversalBudget`. Nothing recurses on
//! the call stack, so a 10 000-level nested expression costs heap, not stack,
//! and the number of visits per file is bounded by `max_nodes`.

use crate::config::AnalysisConfig;
use tree_sitter::Node;

#[derive(Debug, Clone)]
pub struct TraversalBudget {
    max_depth: usize,
    max_nodes: usize,
    max_children: usize,
    visited: usize,
    truncated: bool,
}

impl TraversalBudget {
    pub fn new(max_depth: usize, max_nodes: usize, max_children: usize) -> Self {
        Self {
            max_depth,
            max_nodes,
            max_children,
            visited: 0,
            truncated: false,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.max_depth, config.max_nodes, config.max_children)
    }

    /// Take one visit; false once the node budget is spent
    fn charge(&mut self) -> bool {
        if self.visited >= self.max_nodes {
            self.truncated = true;
            return false;
        }
        self.visited += 1;
        true
    }

    pub fn visited(&self) -> usize {
        self.visited
    }

    pub fn is_exhausted(&self) -> bool {
        self.visited >= self.max_nodes
    }

    /// Some part of the tree was skipped (depth, fan-out or node budget)
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Visitor decision for the children of the current node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descend {
    Into,
    Skip,
}

/// Pre-order walk from `root` at nesting level `start_depth`
///
/// The visitor receives the budget back so it can start nested walks
/// (a function body inside the module walk) that draw from the same pool.
pub fn walk<'t, F>(root: Node<'t>, start_depth: usize, budget: &mut TraversalBudget, mut visit: F)
where
    F: FnMut(Node<'t>, usize, &mut TraversalBudget) -> Descend,
{
    let mut stack: Vec<(Node<'t>, usize)> = vec![(root, start_depth)];

    while let Some((node, depth)) = stack.pop() {
        if !budget.charge() {
            break;
        }
        if visit(node, depth, budget) == Descend::Skip {
            continue;
        }

        let count = node.child_count();
        if count == 0 {
            continue;
        }
        if depth + 1 > budget.max_depth {
            budget.truncated = true;
            continue;
        }

        let limit = count.min(budget.max_children);
        if limit < count {
            budget.truncated = true;
        }
        // reversed so children pop in source order
        for i in (0..limit).rev() {
            if let Some(child) = node.child(i) {
                stack.push((child, depth + 1));
            }
        }
    }
}
