//! append-only change-log records
//!
//! one JSON object per line: `{"timestamp": ..., "file": ..., "change": ...}`
//! with change one of CREATED, MODIFIED, DELETED. the watcher appends to the
//! log; analytics and export consume it. lines that fail the typed model are
//! counted and skipped, never fatal.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// kind of filesystem change observed by the watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Created => write!(f, "CREATED"),
            ChangeKind::Modified => write!(f, "MODIFIED"),
            ChangeKind::Deleted => write!(f, "DELETED"),
        }
    }
}

/// one change-log record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub file: String,
    pub change: ChangeKind,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, file: impl Into<String>, change: ChangeKind) -> Self {
        Self {
            timestamp: timestamp.into(),
            file: file.into(),
            change,
        }
    }
}

/// counts from one read of the change log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub valid: usize,
    pub invalid: usize,
}

/// read and validate every record in a change log
///
/// a missing file warns and yields no entries. invalid lines (bad JSON,
/// missing fields, unknown change kind) are skipped and counted.
pub fn read_entries(path: &Path) -> Result<(Vec<LogEntry>, LoadStats)> {
    let mut entries = Vec::new();
    let mut stats = LoadStats::default();

    if !path.exists() {
        eprintln!("warning: change log not found: {}", path.display());
        return Ok((entries, stats));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read change log: {}", path.display()))?;

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<LogEntry>(line) {
            Ok(entry) => {
                entries.push(entry);
                stats.valid += 1;
            }
            Err(_) => {
                stats.invalid += 1;
            }
        }
    }

    Ok((entries, stats))
}

/// append one record to the change log as a JSON line
pub fn append_entry(path: &Path, entry: &LogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create change log directory: {}", parent.display())
            })?;
        }
    }

    let line = serde_json::to_string(entry).context("failed to serialize change log entry")?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open change log: {}", path.display()))?;
    writeln!(file, "{}", line)
        .with_context(|| format!("failed to append to change log: {}", path.display()))?;

    Ok(())
}
