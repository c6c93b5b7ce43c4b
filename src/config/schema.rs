use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// rules file loaded once per scan
    #[serde(default = "default_rules_file")]
    pub rules_file: PathBuf,
    /// directory tree scanned and watched
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,
    /// scan report destination
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
    /// append-only change log shared by watch, analyze, and export
    #[serde(default = "default_change_log")]
    pub change_log: PathBuf,
    /// dashboard statistics destination
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: PathBuf,
    /// directory for CSV/XML exports
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default)]
    pub watch: WatchSettings,
}

fn default_rules_file() -> PathBuf {
    PathBuf::from("rules.acto")
}

fn default_target_dir() -> PathBuf {
    PathBuf::from("target_folder")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("dat/json/metadata.json")
}

fn default_change_log() -> PathBuf {
    PathBuf::from("dat/json/changes_log.json")
}

fn default_dashboard_path() -> PathBuf {
    PathBuf::from("dat/json/dashboard_stats.json")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("dat/processed")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules_file: default_rules_file(),
            target_dir: default_target_dir(),
            report_path: default_report_path(),
            change_log: default_change_log(),
            dashboard_path: default_dashboard_path(),
            export_dir: default_export_dir(),
            watch: WatchSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchSettings {
    /// poll interval for the change monitor
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}
