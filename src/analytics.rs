//! dashboard analytics
//!
//! aggregates the change log into extension-frequency counts and merges in
//! synthetic environment data (mock weather, current datetime) to build the
//! dashboard statistics artifact.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::changelog::LogEntry;

const WEATHER_CONDITIONS: [&str; 5] = ["Sunny", "Cloudy", "Rainy", "Stormy", "Partly Cloudy"];

/// synthetic weather reading attached to the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    pub temperature_c: i32,
    pub humidity_percent: i32,
    pub condition: String,
    pub location: String,
}

/// generate a mock weather reading
pub fn mock_weather() -> Weather {
    let mut rng = rand::thread_rng();
    Weather {
        temperature_c: rng.gen_range(20..=35),
        humidity_percent: rng.gen_range(40..=90),
        condition: WEATHER_CONDITIONS
            .choose(&mut rng)
            .unwrap_or(&WEATHER_CONDITIONS[0])
            .to_string(),
        location: "Local Server".to_string(),
    }
}

/// aggregate dashboard artifact, written as pretty JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// extension frequency over the change log
    pub frequent_analytics: BTreeMap<String, usize>,
    pub current_datetime: String,
    pub weather: Weather,
    pub status: String,
}

/// count file-extension frequency over change-log entries
///
/// extensions are lowercased with the leading dot; a file without one counts
/// under the empty string, an empty file name under "unknown".
pub fn extension_counts(entries: &[LogEntry]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();

    for entry in entries {
        let key = if entry.file.is_empty() {
            "unknown".to_string()
        } else {
            match Path::new(&entry.file).extension() {
                Some(ext) => format!(".{}", ext.to_string_lossy().to_lowercase()),
                None => String::new(),
            }
        };
        *counts.entry(key).or_insert(0) += 1;
    }

    counts
}

/// build the dashboard from change-log entries
pub fn build_dashboard(entries: &[LogEntry]) -> DashboardStats {
    DashboardStats {
        frequent_analytics: extension_counts(entries),
        current_datetime: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        weather: mock_weather(),
        status: "active".to_string(),
    }
}

/// write the dashboard as pretty JSON using an atomic replace
pub fn save_dashboard(stats: &DashboardStats, path: &Path) -> Result<()> {
    let content =
        serde_json::to_string_pretty(stats).context("failed to serialize dashboard stats")?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)
        .with_context(|| format!("failed to create output directory: {}", parent.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)
        .context("failed to create temporary dashboard file")?;
    tmp.write_all(content.as_bytes())
        .context("failed to write dashboard stats")?;
    tmp.persist(path)
        .with_context(|| format!("failed to write dashboard file: {}", path.display()))?;

    Ok(())
}
