use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreasurerError};

/// Overrides the configured data directory when set.
pub const DATA_DIR_ENV: &str = "TREASURER_DATA_DIR";

const STORE_FILE: &str = "treasurer.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("treasurer")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("treasurer")
}

fn parse_settings(content: &str) -> Settings {
    serde_json::from_str(content).unwrap_or_else(|e| {
        tracing::warn!("ignoring unreadable settings file: {e}");
        Settings::default()
    })
}

pub fn load_settings() -> Settings {
    match std::fs::read_to_string(settings_path()) {
        Ok(content) => parse_settings(&content),
        Err(_) => Settings::default(),
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    std::fs::create_dir_all(config_dir())?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TreasurerError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

fn resolve_data_dir(env_override: Option<String>, settings: &Settings) -> PathBuf {
    match env_override.filter(|v| !v.trim().is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(expand_home(&settings.data_dir)),
    }
}

pub fn get_data_dir() -> PathBuf {
    resolve_data_dir(std::env::var(DATA_DIR_ENV).ok(), &load_settings())
}

pub fn store_path_in(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE)
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}
