//! directory scanner
//!
//! walks a target tree, builds the evaluation context for every regular
//! file, runs the rule evaluator, and assembles the aggregate report. a
//! single unreadable file never aborts the scan: per-file failures are
//! logged and the file is excluded from the report.

mod report;

pub use report::{FileRecord, ScanReport};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::rules::{evaluate, FileContext, RuleSet};

/// scan a directory tree and tag every regular file
///
/// a missing target directory is created (empty) and yields an empty report
/// rather than an error.
pub fn scan(rules: &RuleSet, target_dir: &Path) -> Result<ScanReport> {
    let mut scanner = Scanner::new(rules);
    scanner.run(target_dir)?;
    Ok(scanner.into_report())
}

/// single-scan state: the read-only rule set and the growing report
pub struct Scanner<'a> {
    rules: &'a RuleSet,
    report: ScanReport,
    files_seen: usize,
    files_skipped: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            report: ScanReport::new(),
            files_seen: 0,
            files_skipped: 0,
        }
    }

    pub fn run(&mut self, target_dir: &Path) -> Result<()> {
        if !target_dir.exists() {
            eprintln!(
                "target directory {} does not exist, creating it",
                target_dir.display()
            );
            fs::create_dir_all(target_dir).with_context(|| {
                format!("failed to create target directory: {}", target_dir.display())
            })?;
        }

        for entry in WalkDir::new(target_dir) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // traversal error on one entry, keep walking the rest
                    eprintln!("warning: failed to access entry: {}", e);
                    self.files_skipped += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            self.files_seen += 1;
            self.tag_file(entry.path());
        }

        Ok(())
    }

    /// build the context for one file and record its tags
    ///
    /// I/O failures (permissions, file vanished mid-walk) exclude the file
    /// and the scan continues.
    fn tag_file(&mut self, path: &Path) {
        let ctx = match FileContext::from_path(path) {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("warning: skipping {}: {}", path.display(), e);
                self.files_skipped += 1;
                return;
            }
        };

        let tags = evaluate(self.rules, &ctx);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.report.insert(
            name,
            FileRecord {
                path: path.to_path_buf(),
                tags,
                size_bytes: ctx.size,
            },
        );
    }

    pub fn files_seen(&self) -> usize {
        self.files_seen
    }

    pub fn files_skipped(&self) -> usize {
        self.files_skipped
    }

    pub fn into_report(self) -> ScanReport {
        self.report
    }
}
