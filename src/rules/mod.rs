//! Rule compilation and line rewriting for clitheme.
//!
//! This module handles:
//! - Compiling theme rule records into regex-backed rules
//! - Applying rules to a line, scoped by command name and locale

pub mod compiler;
pub mod engine;

pub use compiler::{Compilation, Rule, RuleSet, compile_rules, error_chain};
pub use engine::{CommandContext, LineRewriter, apply};
