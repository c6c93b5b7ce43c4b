//! rule loading and evaluation for file classification
//!
//! the rule DSL is one conditional per line:
//!
//! ```text
//! IF size > 10MB THEN TAG 'large'
//! IF extension IS '.log' THEN TAG 'logfile'
//! ```
//!
//! a rule set is loaded once at startup and treated as immutable, read-only
//! configuration for a scan's lifetime; the evaluator is pure and safe to
//! share across files.

mod eval;
mod parser;
mod size;
mod types;

pub use eval::{evaluate, FileContext};
pub use parser::{load_rules, parse_line};
pub use size::{parse_size, SizeError};
pub use types::{LineOutcome, Operator, Rule, RuleSet, KNOWN_VARIABLES};
