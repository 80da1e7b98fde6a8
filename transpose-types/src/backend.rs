//! Messages exchanged with the native key-simulation backend.
//!
//! Shapes follow the JSON records on the `backend_event`, `frontend_event`
//! and `key_consume` channels.

use serde::{Deserialize, Serialize};

/// Controller -> backend, on `backend_event`.
///
/// Serialized externally tagged, e.g. `{"pause": true}` or
/// `{"bind": {"name": "pause", "keycode": 118}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendEvent {
    Pause(bool),
    /// `keycode: None` unbinds the action in the backend (a stolen key).
    Bind { name: String, keycode: Option<u64> },
    KeyListen(bool),
    Transposes(Vec<i32>),
    SelectedIndex(usize),
    ScrollValue(u32),
    Muted(bool),
    Volume(f32),
}

/// Backend -> controller, JSON-encoded inside a [`MessagePayload`] on `frontend_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendNotice {
    Paused(bool),
    CurrentIndex(usize),
}

/// Backend -> controller, JSON-encoded inside a [`MessagePayload`] on `key_consume`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConsumed {
    pub key: String,
    pub keycode: u64,
}

/// Outer record of backend-originated events: `{message: "<json>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub message: String,
}
