//! change monitor
//!
//! polls the top level of a target directory and appends CREATED / MODIFIED /
//! DELETED records to the change log. modification times drive the diff; the
//! initial snapshot is seeded silently so startup does not flood the log with
//! CREATED entries for pre-existing files.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use chrono::Local;

use crate::changelog::{self, ChangeKind, LogEntry};

/// timestamp format shared with the change-log consumers
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// stateful directory monitor
pub struct Watcher {
    target_dir: PathBuf,
    log_path: PathBuf,
    records: BTreeMap<String, SystemTime>,
}

impl Watcher {
    /// create a watcher, creating the target directory if missing and
    /// seeding the initial snapshot without logging
    pub fn new(target_dir: &Path, log_path: &Path) -> Result<Self> {
        if !target_dir.exists() {
            fs::create_dir_all(target_dir).with_context(|| {
                format!("failed to create target directory: {}", target_dir.display())
            })?;
            eprintln!("created directory: {}", target_dir.display());
        }

        let mut watcher = Self {
            target_dir: target_dir.to_path_buf(),
            log_path: log_path.to_path_buf(),
            records: BTreeMap::new(),
        };
        watcher.records = watcher.snapshot()?;

        Ok(watcher)
    }

    /// top-level regular files and their modification times
    fn snapshot(&self) -> Result<BTreeMap<String, SystemTime>> {
        let mut files = BTreeMap::new();

        for entry in fs::read_dir(&self.target_dir).with_context(|| {
            format!("failed to read target directory: {}", self.target_dir.display())
        })? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(time) => time,
                Err(e) => {
                    // file vanished or mtime unavailable, catch it next poll
                    warn_io(&entry.path(), &e);
                    continue;
                }
            };

            files.insert(entry.file_name().to_string_lossy().into_owned(), modified);
        }

        Ok(files)
    }

    /// diff the directory against the previous snapshot, appending one log
    /// record per observed change
    pub fn poll_once(&mut self) -> Result<Vec<LogEntry>> {
        let current = self.snapshot()?;
        let mut changes = Vec::new();

        for (name, modified) in &current {
            match self.records.get(name) {
                None => changes.push(LogEntry::new(timestamp_now(), name, ChangeKind::Created)),
                Some(previous) if previous != modified => {
                    changes.push(LogEntry::new(timestamp_now(), name, ChangeKind::Modified));
                }
                Some(_) => {}
            }
        }

        for name in self.records.keys() {
            if !current.contains_key(name) {
                changes.push(LogEntry::new(timestamp_now(), name, ChangeKind::Deleted));
            }
        }

        for entry in &changes {
            eprintln!("[{}] {}", entry.change, entry.file);
            changelog::append_entry(&self.log_path, entry)?;
        }

        self.records = current;
        Ok(changes)
    }
}

fn warn_io(path: &Path, e: &io::Error) {
    eprintln!("warning: skipping {}: {}", path.display(), e);
}

/// monitor a directory until interrupted
///
/// transient filesystem errors during a poll are logged and the loop
/// continues. single-cycle runs (--once) drive a `Watcher` directly.
pub fn watch(target_dir: &Path, log_path: &Path, interval: Duration) -> Result<()> {
    let mut watcher = Watcher::new(target_dir, log_path)?;

    eprintln!(
        "monitoring {} for changes, logging to {}",
        target_dir.display(),
        log_path.display()
    );

    loop {
        thread::sleep(interval);

        if let Err(e) = watcher.poll_once() {
            eprintln!("warning: poll failed: {}", e);
        }
    }
}
