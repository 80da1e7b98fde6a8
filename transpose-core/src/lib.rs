//! # transpose-core
//!
//! Controller-side engine for multi-transpose: binding store with key capture,
//! transpose sequence, the authoritative `AppState`, and action dispatch.
//! Independent of any window system or native backend.
//!
//! ```rust,ignore
//! use transpose_core::config::Config;
//! use transpose_core::dispatch::{dispatch_action, startup};
//! use transpose_core::state::{AppState, Limits, SettingsFile};
//! use transpose_core::state::persistence::SqliteConfigStore;
//!
//! let config = Config::load();
//! let store = SqliteConfigStore::open(&config.database_path())?;
//! let mut state = AppState::new(Box::new(store), &config.config_name(),
//!     SettingsFile::at(paths::settings_path()), Limits::from_config(&config));
//!
//! // Backend events are collected, then sent by the caller.
//! let mut effects = Vec::new();
//! startup(&mut state, &mut effects);
//! let result = dispatch_action(&action, &mut state, &mut effects);
//! if result.state_changed { /* broadcast state.snapshot() */ }
//! ```
//!
//! ## Module Overview
//!
//! - [`state`]: `AppState`, `BindingStore`, `KeyCapture`, `TransposeSequence`,
//!   performance settings, SQLite persistence of keybind configs
//! - [`dispatch`]: `dispatch_action` and capture helpers, producing `BackendEvent`s
//! - [`config`]: TOML configuration with embedded defaults
//! - [`paths`]: on-disk locations

pub mod action;
pub mod config;
pub mod dispatch;
pub mod paths;
pub mod state;
