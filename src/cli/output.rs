//! output formatting utilities for scriptable CLI output
//!
//! success payloads are plain JSON objects in machine mode; human-readable
//! text otherwise. diagnostics always go to stderr so stdout stays clean for
//! piping.

use std::io::IsTerminal;
use std::path::PathBuf;

use serde::Serialize;

/// output mode determines how results are formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// human-readable text output
    Text,
    /// machine-readable JSON output
    Json,
    /// no output on success (errors still go to stderr)
    Quiet,
}

impl OutputMode {
    /// determine output mode from CLI flags and environment
    ///
    /// priority: quiet > json > no_json > auto-detect
    pub fn from_flags(json: bool, no_json: bool, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        if json {
            return Self::Json;
        }
        if no_json {
            return Self::Text;
        }
        // auto-detect: JSON when stdout is not a TTY (piped)
        if !std::io::stdout().is_terminal() {
            Self::Json
        } else {
            Self::Text
        }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Quiet)
    }
}

/// print a success payload as one JSON line to stdout
pub fn print_json<T: Serialize>(data: &T) {
    if let Ok(json) = serde_json::to_string(data) {
        println!("{}", json);
    }
}

// ============================================================================
// Result data structures for the subcommands
// ============================================================================

/// result data for a scan
#[derive(Serialize)]
pub struct ScanData {
    pub action: &'static str,
    pub files: usize,
    pub tagged: usize,
    pub skipped: usize,
    pub report: PathBuf,
}

/// result data for a single watch poll (--once)
#[derive(Serialize)]
pub struct WatchData {
    pub action: &'static str,
    pub changes: usize,
    pub log: PathBuf,
}

/// result data for the analytics aggregation
#[derive(Serialize)]
pub struct AnalyzeData {
    pub action: &'static str,
    pub entries: usize,
    pub invalid: usize,
    pub output: PathBuf,
}

/// result data for the export pipeline
#[derive(Serialize)]
pub struct ExportData {
    pub action: &'static str,
    pub entries: usize,
    pub invalid: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<PathBuf>,
}

/// per-line outcome summary for rules inspection
#[derive(Serialize)]
pub struct RulesData {
    pub action: &'static str,
    pub loaded: usize,
    pub malformed: usize,
    pub warnings: Vec<String>,
}
