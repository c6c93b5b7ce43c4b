//! scan report model and persistence
//!
//! the report is a mapping from file name to the file's tagging record,
//! built incrementally during a scan and written once at the end. writes are
//! atomic (temp file in the destination directory, then rename) so a failed
//! write never leaves a partial report in place.

use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// tagging result for one scanned file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    /// deduplicated by construction; serialized as a sorted array
    pub tags: BTreeSet<String>,
    pub size_bytes: u64,
}

/// aggregate per-file tagging result of one directory scan
///
/// keyed by file name, matching the consumer side of the pipeline; a later
/// file with the same name overwrites the earlier record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanReport {
    files: BTreeMap<String, FileRecord>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, record: FileRecord) {
        self.files.insert(name.into(), record);
    }

    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.files.get(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, FileRecord> {
        self.files.iter()
    }

    /// write the report as pretty JSON using an atomic replace
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("failed to serialize report")?;

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .with_context(|| format!("failed to create report directory: {}", parent.display()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent)
            .context("failed to create temporary report file")?;
        tmp.write_all(content.as_bytes())
            .context("failed to write report")?;
        tmp.persist(path)
            .with_context(|| format!("failed to write report file: {}", path.display()))?;

        Ok(())
    }

    /// read a report back from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read report file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse report file: {}", path.display()))
    }
}

impl<'a> IntoIterator for &'a ScanReport {
    type Item = (&'a String, &'a FileRecord);
    type IntoIter = btree_map::Iter<'a, String, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
