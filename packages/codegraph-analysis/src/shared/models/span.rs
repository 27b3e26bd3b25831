//! Source positions

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tree_sitter::Node;

/// Lines are 1-based, columns are 0-based byte offsets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Placeholder for facts not tied to a node
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_node(node: &Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self::new(
            start.row as u32 + 1,
            start.column as u32,
            end.row as u32 + 1,
            end.column as u32,
        )
    }

    pub fn lines(&self) -> RangeInclusive<u32> {
        self.start_line..=self.end_line
    }

    /// Ordered and inside a file of `line_count` lines
    pub fn is_within(&self, line_count: usize) -> bool {
        let last = line_count.max(1) as u32;
        (1..=self.end_line).contains(&self.start_line) && self.end_line <= last
    }
}
