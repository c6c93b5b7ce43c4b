// shared utilities for integration tests

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// create a temporary workspace for one test
pub fn test_workspace() -> TempDir {
    tempfile::tempdir().expect("Failed to create test directory")
}

/// write a rules file into the workspace
pub fn write_rules(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("rules.acto");
    fs::write(&path, content).expect("Failed to write rules file");
    path
}

/// create a file of the given size in the target directory
pub fn write_file(dir: &Path, name: &str, size: usize) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, vec![b'x'; size]).expect("Failed to write test file");
    path
}

/// write a change log from (timestamp, file, change) tuples
pub fn write_change_log(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("changes_log.json");
    fs::write(&path, lines.join("\n")).expect("Failed to write change log");
    path
}
