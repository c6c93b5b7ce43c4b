mod schema;

pub use schema::{Config, WatchSettings, DEFAULT_POLL_INTERVAL_MS};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

const CONFIG_ENV_VAR: &str = "ACTO_CONFIG";

pub fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }

    dirs::home_dir()
        .expect("Could not find home directory")
        .join(".acto")
        .join("config.json")
}

pub fn ensure_acto_dir() -> Result<PathBuf> {
    let acto_dir = dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not find home directory"))?
        .join(".acto");

    if !acto_dir.exists() {
        fs::create_dir_all(&acto_dir)?;
    }

    Ok(acto_dir)
}

pub fn load() -> Result<Config> {
    let path = get_config_path();

    if !path.exists() {
        // ensure directory exists
        ensure_acto_dir()?;
        let config = Config::default();
        save(&config)?;
        return Ok(config);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

/// load from an explicit path when given (CLI --config), else the default
/// location
pub fn load_with_override(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path,
        None => return load(),
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn save(config: &Config) -> Result<()> {
    let path = get_config_path();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Verify a configuration file and return a list of errors
pub fn verify(path: &Path) -> Result<Vec<String>> {
    let mut errors = Vec::new();

    if !path.exists() {
        return Err(anyhow!("config file not found: {}", path.display()));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow!("invalid JSON: {}", e));
        }
    };

    if config.watch.poll_interval_ms == 0 {
        errors.push("watch.poll_interval_ms: must be greater than zero".to_string());
    }

    if config.rules_file.as_os_str().is_empty() {
        errors.push("rules_file: must not be empty".to_string());
    }
    if config.target_dir.as_os_str().is_empty() {
        errors.push("target_dir: must not be empty".to_string());
    }

    Ok(errors)
}

pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["rules_file"] => {
            config.rules_file = PathBuf::from(value);
        }
        ["target_dir"] => {
            config.target_dir = PathBuf::from(value);
        }
        ["report_path"] => {
            config.report_path = PathBuf::from(value);
        }
        ["change_log"] => {
            config.change_log = PathBuf::from(value);
        }
        ["dashboard_path"] => {
            config.dashboard_path = PathBuf::from(value);
        }
        ["export_dir"] => {
            config.export_dir = PathBuf::from(value);
        }
        ["watch", "poll_interval_ms"] => {
            let interval: u64 = value
                .parse()
                .with_context(|| format!("Invalid number: {}", value))?;
            if interval == 0 {
                return Err(anyhow!("watch.poll_interval_ms must be greater than zero"));
            }
            config.watch.poll_interval_ms = interval;
        }
        _ => {
            return Err(anyhow!("Unknown config key: {}", key));
        }
    }

    Ok(())
}
