use std::path::PathBuf;

use serde::Deserialize;

use crate::paths;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    bindings: BindingsConfig,
    #[serde(default)]
    performance: PerformanceConfig,
}

#[derive(Deserialize, Default)]
struct BindingsConfig {
    config_name: Option<String>,
    database: Option<String>,
}

#[derive(Deserialize, Default)]
struct PerformanceConfig {
    scroll_max: Option<u32>,
    volume_max: Option<f32>,
}

pub struct Config {
    bindings: BindingsConfig,
    performance: PerformanceConfig,
}

impl Config {
    pub fn load() -> Self {
        let mut base = Self::embedded_file();

        if let Some(path) = paths::user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_bindings(&mut base.bindings, user.bindings);
                            merge_performance(&mut base.performance, user.performance);
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            bindings: base.bindings,
            performance: base.performance,
        }
    }

    /// Built-in defaults only, ignoring any user file.
    pub fn embedded() -> Self {
        let base = Self::embedded_file();
        Config {
            bindings: base.bindings,
            performance: base.performance,
        }
    }

    fn embedded_file() -> ConfigFile {
        toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml")
    }

    /// Name of the keybind configuration row read at startup.
    pub fn config_name(&self) -> String {
        self.bindings
            .config_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| crate::state::DEFAULT_CONFIG_NAME.to_string())
    }

    /// Absolute path of the keybind database. Relative names resolve against the data dir.
    pub fn database_path(&self) -> PathBuf {
        let name = self.bindings.database.as_deref().unwrap_or("multi_transpose.db");
        let path = PathBuf::from(name);
        if path.is_absolute() {
            path
        } else {
            paths::data_dir().join(path)
        }
    }

    pub fn scroll_max(&self) -> u32 {
        self.performance.scroll_max.unwrap_or(200)
    }

    /// Volume ceiling, clamped to (0, 10].
    pub fn volume_max(&self) -> f32 {
        let v = self.performance.volume_max.unwrap_or(2.0);
        if v.is_finite() && v > 0.0 {
            v.min(10.0)
        } else {
            2.0
        }
    }
}

fn merge_bindings(base: &mut BindingsConfig, user: BindingsConfig) {
    if user.config_name.is_some() {
        base.config_name = user.config_name;
    }
    if user.database.is_some() {
        base.database = user.database;
    }
}

fn merge_performance(base: &mut PerformanceConfig, user: PerformanceConfig) {
    if user.scroll_max.is_some() {
        base.scroll_max = user.scroll_max;
    }
    if user.volume_max.is_some() {
        base.volume_max = user.volume_max;
    }
}
