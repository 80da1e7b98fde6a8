pub mod bindings;
pub mod capture;
pub mod persistence;
pub mod settings;
pub mod transpose;

pub use bindings::{BindOutcome, BindingStore};
pub use capture::{CaptureState, Consumed, KeyCapture};
pub use settings::{PerformanceSettings, SettingsFile};
pub use transpose::{window_around, Direction, MonitorItem, MonitorWindow, TransposeSequence};

use transpose_types::SyncState;

use crate::config::Config;
use persistence::{ConfigStore, MemoryConfigStore};

/// Keybind configuration used when none is named.
pub const DEFAULT_CONFIG_NAME: &str = "default";

/// Bounds applied to performance settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub scroll_max: u32,
    pub volume_max: f32,
}

impl Default for Limits {
    fn default() -> Self {
        Self { scroll_max: 200, volume_max: 2.0 }
    }
}

impl Limits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scroll_max: config.scroll_max(),
            volume_max: config.volume_max(),
        }
    }
}

/// Authoritative controller state. Auxiliary windows only ever see [`AppState::snapshot`].
pub struct AppState {
    pub bindings: BindingStore,
    pub transposes: TransposeSequence,
    pub paused: bool,
    pub settings: PerformanceSettings,
    pub settings_file: SettingsFile,
    pub limits: Limits,
}

impl AppState {
    /// Load bindings from `storage` and settings from `settings_file`. Starts paused.
    pub fn new(
        storage: Box<dyn ConfigStore>,
        config_name: &str,
        settings_file: SettingsFile,
        limits: Limits,
    ) -> Self {
        let mut settings = settings_file.load();
        settings.clamp(limits.volume_max, limits.scroll_max);
        Self {
            bindings: BindingStore::load(storage, config_name),
            transposes: TransposeSequence::new(),
            paused: true,
            settings,
            settings_file,
            limits,
        }
    }

    /// Default bindings, no disk access.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryConfigStore::new()),
            DEFAULT_CONFIG_NAME,
            SettingsFile::detached(),
            Limits::default(),
        )
    }

    /// Derived, never stored.
    pub fn can_operate(&self) -> bool {
        self.bindings.can_operate()
    }

    pub fn snapshot(&self) -> SyncState {
        SyncState {
            bindings: self.bindings.bindings().to_vec(),
            can_operate: self.can_operate(),
            transposes: self.transposes.values().to_vec(),
            selected_index: self.transposes.selected_index(),
            paused: self.paused,
        }
    }

    pub fn save_settings(&self) {
        self.settings_file.save(&self.settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transpose_types::KeyValue;

    #[test]
    fn starts_paused_and_inoperable() {
        let state = AppState::in_memory();
        let snap = state.snapshot();
        assert!(snap.paused);
        assert!(!snap.can_operate);
        assert!(snap.transposes.is_empty());
        assert_eq!(snap.bindings.len(), 6);
    }

    #[test]
    fn snapshot_reflects_bindings() {
        let mut state = AppState::in_memory();
        state.bindings.validate_and_bind("pause", KeyValue::new("F7", 118));
        state.transposes.replace(vec![0, -3]);
        let snap = state.snapshot();
        assert!(snap.binding("pause").unwrap().holds("F7"));
        assert_eq!(snap.transposes, vec![0, -3]);
        assert_eq!(snap.current_transpose(), Some(0));
    }
}
