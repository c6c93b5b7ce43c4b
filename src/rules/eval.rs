//! rule evaluator
//!
//! applies every rule in a rule set to one file's context and collects the
//! matching tags. evaluation is pure: same inputs always produce the same
//! tag set, and nothing outside the returned set is touched.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use super::size::parse_size;
use super::types::{Operator, Rule, RuleSet};

/// attribute values derived from one file, used to evaluate rules
///
/// ephemeral - built per file and discarded after evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    /// file size in bytes
    pub size: u64,
    /// lowercased extension including the leading dot, empty if none
    pub extension: String,
}

/// a context attribute looked up by variable name
#[derive(Debug, Clone, Copy, PartialEq)]
enum ContextValue<'a> {
    Size(u64),
    Text(&'a str),
}

impl FileContext {
    pub fn new(size: u64, extension: impl Into<String>) -> Self {
        Self {
            size,
            extension: extension.into(),
        }
    }

    /// build the context for a file from the filesystem
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = path.metadata()?;

        let extension = match path.extension() {
            Some(ext) => format!(".{}", ext.to_string_lossy().to_lowercase()),
            None => String::new(),
        };

        Ok(Self {
            size: metadata.len(),
            extension,
        })
    }

    /// look up an attribute by variable name
    ///
    /// returns None for anything but size/extension, which keeps rules on
    /// unknown variables structurally inert.
    fn get(&self, variable: &str) -> Option<ContextValue<'_>> {
        match variable {
            "size" => Some(ContextValue::Size(self.size)),
            "extension" => Some(ContextValue::Text(&self.extension)),
            _ => None,
        }
    }
}

/// evaluate a rule set against one file's context
///
/// returns the deduplicated set of tags from every matching rule. the set
/// container makes the no-duplicate-tags invariant structural rather than a
/// post-hoc cleanup.
pub fn evaluate(rules: &RuleSet, ctx: &FileContext) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();

    for rule in rules {
        if rule_matches(rule, ctx) {
            tags.insert(rule.tag.clone());
        }
    }

    tags
}

fn rule_matches(rule: &Rule, ctx: &FileContext) -> bool {
    match ctx.get(&rule.variable) {
        Some(ContextValue::Size(actual)) => size_matches(rule, actual),
        Some(ContextValue::Text(actual)) => text_matches(rule, actual),
        // variable absent from the context: rule never matches
        None => false,
    }
}

fn size_matches(rule: &Rule, actual: u64) -> bool {
    // a value that fails normalization makes the rule inert; the rules
    // loader already warned about it
    let threshold = match parse_size(&rule.value) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    match rule.operator {
        Operator::GreaterThan => actual > threshold,
        Operator::LessThan => actual < threshold,
        Operator::Is => actual == threshold,
    }
}

fn text_matches(rule: &Rule, actual: &str) -> bool {
    // only equality is meaningful for extensions; the comparison is
    // case-insensitive with the rule value lowercased at comparison time
    rule.operator == Operator::Is && actual == rule.value.to_lowercase()
}
