//! rule parser - converts rules-file lines into structured rules
//!
//! grammar, one rule per line:
//!
//! ```text
//! IF <identifier> <operator> <value> THEN TAG '<tag>'
//! ```
//!
//! - `<operator>` is one of IS, >, <
//! - `<value>` is a single-quoted string, a bare word/number, or a size
//!   literal (digits immediately followed by letters)
//! - `<tag>` is always single-quoted
//!
//! lines that are blank or do not begin with IF are treated as comments and
//! skipped without diagnostic. lines that begin with IF but fail the grammar
//! are reported as malformed and dropped - a bad line never aborts a load.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use super::size::parse_size;
use super::types::{LineOutcome, Operator, Rule, RuleSet};

lazy_static! {
    /// the one-line rule grammar
    static ref RULE_RE: Regex = Regex::new(
        r"^IF\s+(\w+)\s+(IS|>|<)\s+('[^']*'|[\w.]+)\s+THEN\s+TAG\s+'([^']+)'\s*$"
    )
    .unwrap();
}

/// parse a single rules-file line
pub fn parse_line(line: &str) -> LineOutcome {
    let line = line.trim();

    if line.is_empty() || !line.starts_with("IF") {
        return LineOutcome::Comment;
    }

    let caps = match RULE_RE.captures(line) {
        Some(caps) => caps,
        None => return LineOutcome::Malformed,
    };

    let variable = caps[1].to_string();
    let operator = match Operator::parse(&caps[2]) {
        Some(op) => op,
        None => return LineOutcome::Malformed,
    };
    let value = strip_quotes(&caps[3]).to_string();
    let tag = caps[4].to_string();

    LineOutcome::Loaded(Rule::new(variable, operator, value, tag))
}

/// strip single-quote markers from a quoted value
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value)
}

/// load a rule set from a rules file
///
/// a missing file logs a warning and yields an empty rule set; scans then run
/// with no rules rather than failing. each loaded rule is reported on stderr
/// for observability, as are malformed lines (with their line number) and
/// size rules whose value will never normalize to a byte count.
pub fn load_rules(path: &Path) -> Result<RuleSet> {
    let mut rules = RuleSet::new();

    if !path.exists() {
        eprintln!(
            "warning: rules file not found: {}, continuing with no rules",
            path.display()
        );
        return Ok(rules);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file: {}", path.display()))?;

    for (idx, line) in content.lines().enumerate() {
        match parse_line(line) {
            LineOutcome::Loaded(rule) => {
                eprintln!("loaded rule: {}", rule);
                warn_if_size_unparseable(&rule, idx + 1);
                rules.push(rule);
            }
            LineOutcome::Comment => {}
            LineOutcome::Malformed => {
                eprintln!(
                    "warning: {}:{}: malformed rule line dropped: {}",
                    path.display(),
                    idx + 1,
                    line.trim()
                );
            }
        }
    }

    Ok(rules)
}

/// pre-announce size rules that can never match
///
/// evaluation itself stays pure; the rules file is the right place to point
/// at the offending line.
fn warn_if_size_unparseable(rule: &Rule, line_number: usize) {
    if rule.variable == "size" {
        if let Err(e) = parse_size(&rule.value) {
            eprintln!(
                "warning: line {}: {} - rule '{}' will never match",
                line_number, e, rule.tag
            );
        }
    }
}
