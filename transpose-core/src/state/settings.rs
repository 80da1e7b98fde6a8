//! Output settings kept outside AppState: mute, volume, scroll amount.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_VOLUME: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PerformanceSettings {
    pub muted: bool,
    pub volume: f32,
    pub scroll_value: u32,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            muted: false,
            volume: DEFAULT_VOLUME,
            scroll_value: 0,
        }
    }
}

impl PerformanceSettings {
    /// Stored values win; missing fields take defaults; unreadable files give defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!(target: "settings", "ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!(target: "settings", "could not write {}: {}", path.display(), e);
                }
            }
            Err(e) => log::warn!(target: "settings", "could not encode settings: {}", e),
        }
    }

    /// Bring loaded values inside the configured limits.
    pub fn clamp(&mut self, volume_max: f32, scroll_max: u32) {
        self.volume = clamp_volume(self.volume, volume_max).unwrap_or(DEFAULT_VOLUME.min(volume_max));
        self.scroll_value = self.scroll_value.min(scroll_max);
    }
}

/// `None` for NaN or infinities.
pub fn clamp_volume(volume: f32, volume_max: f32) -> Option<f32> {
    volume.is_finite().then(|| volume.clamp(0.0, volume_max))
}

/// Where settings are read and written, if anywhere.
#[derive(Debug, Clone, Default)]
pub struct SettingsFile {
    path: Option<PathBuf>,
}

impl SettingsFile {
    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Settings that are never written to disk.
    pub fn detached() -> Self {
        Self { path: None }
    }

    pub fn load(&self) -> PerformanceSettings {
        self.path
            .as_deref()
            .map(PerformanceSettings::load)
            .unwrap_or_default()
    }

    pub fn save(&self, settings: &PerformanceSettings) {
        if let Some(path) = &self.path {
            settings.save(path);
        }
    }
}
