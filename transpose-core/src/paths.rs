//! On-disk locations. Everything lives under `<config_dir>/multi-transpose/`.

use std::path::PathBuf;

const APP_DIR: &str = "multi-transpose";

/// Directory holding the database, settings, and log file.
pub fn data_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

pub fn settings_path() -> PathBuf {
    data_dir().join("settings.json")
}

pub fn log_path() -> PathBuf {
    match dirs::config_dir() {
        Some(d) => d.join(APP_DIR).join("multi-transpose.log"),
        None => std::env::temp_dir().join("multi-transpose.log"),
    }
}
