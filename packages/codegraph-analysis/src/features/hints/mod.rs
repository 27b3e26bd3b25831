//! Framework / pattern hints
//!
//! Advisory tags computed from the extracted facts by small rule tables.
//! Rules are independent: an error in one rule is a non-match for that rule
//! only.

mod engine;
mod error;
mod framework;
mod pattern;

pub use engine::HintEngine;
pub use error::{HintError, HintResult};
pub use framework::{FrameworkRule, BUILTIN_FRAMEWORK_RULES};
pub use pattern::{CompiledPatterns, Condition, PatternRule, BUILTIN_PATTERN_RULES};
