//! The native key-simulation backend seam.

use std::collections::HashMap;

use crossbeam_channel::Sender;
use log::{debug, warn};

use transpose_core::state::{bindings::default_bindings, transpose::neighbor, Direction};
use transpose_sync::framing::{decode_backend_event, encode_key_consumed, encode_notice};
use transpose_sync::Envelope;
use transpose_types::{BackendEvent, BackendNotice, KeyConsumed};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend is gone.
    Closed,
    Rejected(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::Closed => write!(f, "backend closed"),
            BackendError::Rejected(e) => write!(f, "backend rejected event: {}", e),
        }
    }
}

impl std::error::Error for BackendError {}

/// Receives `backend_event` envelopes. Sends are fire-and-forget.
pub trait NativeBackend {
    fn emit(&mut self, envelope: &Envelope) -> Result<(), BackendError>;
}

/// In-process stand-in for the native backend.
///
/// Keeps the same tables the real one does and answers on `frontend_event`
/// and `key_consume` through the controller's inbox.
pub struct LoopbackBackend {
    inbox: Sender<Envelope>,
    binds: HashMap<String, u64>,
    transposes: Vec<i32>,
    selected_index: usize,
    paused: bool,
    listening: bool,
    muted: bool,
    volume: f32,
    scroll_value: u32,
}

impl LoopbackBackend {
    pub fn new(inbox: Sender<Envelope>) -> Self {
        Self {
            inbox,
            binds: HashMap::new(),
            transposes: Vec::new(),
            selected_index: 0,
            paused: true,
            listening: false,
            muted: false,
            volume: 0.0,
            scroll_value: 0,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn bound_keycode(&self, name: &str) -> Option<u64> {
        self.binds.get(name).copied()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn output(&self) -> (bool, f32, u32) {
        (self.muted, self.volume, self.scroll_value)
    }

    fn notify(&self, notice: BackendNotice) -> Result<(), BackendError> {
        let envelope = encode_notice(&notice).map_err(|e| BackendError::Rejected(e.to_string()))?;
        self.inbox.send(envelope).map_err(|_| BackendError::Closed)
    }

    fn required_bound(&self) -> bool {
        default_bindings()
            .iter()
            .filter(|b| b.required)
            .all(|b| self.binds.contains_key(&b.name))
    }

    /// Simulate a physical key press.
    pub fn press(&mut self, key: &str, keycode: u64) -> Result<(), BackendError> {
        if self.listening {
            self.listening = false;
            let consumed = KeyConsumed { key: key.to_string(), keycode };
            let envelope = encode_key_consumed(&consumed).map_err(|e| BackendError::Rejected(e.to_string()))?;
            return self.inbox.send(envelope).map_err(|_| BackendError::Closed);
        }

        let action = self
            .binds
            .iter()
            .find(|(_, code)| **code == keycode)
            .map(|(name, _)| name.clone());
        match action.as_deref() {
            Some("pause") => self.toggle_pause(),
            Some("next_transpose") => self.navigate(Direction::Next),
            Some("previous_transpose") => self.navigate(Direction::Previous),
            Some(other) => {
                debug!("loopback: '{}' pressed", other);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn toggle_pause(&mut self) -> Result<(), BackendError> {
        if !self.required_bound() {
            return Ok(());
        }
        self.paused = !self.paused;
        self.notify(BackendNotice::Paused(self.paused))
    }

    /// Circular move through the sequence. Ignored while paused.
    pub fn navigate(&mut self, direction: Direction) -> Result<(), BackendError> {
        if self.paused || self.transposes.is_empty() {
            return Ok(());
        }
        self.selected_index = neighbor(self.selected_index, self.transposes.len(), direction);
        self.notify(BackendNotice::CurrentIndex(self.selected_index))
    }
}

impl NativeBackend for LoopbackBackend {
    fn emit(&mut self, envelope: &Envelope) -> Result<(), BackendError> {
        let event = decode_backend_event(envelope).map_err(|e| BackendError::Rejected(e.to_string()))?;
        debug!("loopback <- {:?}", event);
        match event {
            BackendEvent::Pause(paused) => {
                self.paused = paused;
                self.notify(BackendNotice::Paused(paused))
            }
            BackendEvent::Bind { name, keycode } => {
                match keycode {
                    Some(code) => {
                        self.binds.insert(name, code);
                    }
                    None => {
                        self.binds.remove(&name);
                    }
                }
                Ok(())
            }
            BackendEvent::KeyListen(listen) => {
                self.listening = listen;
                Ok(())
            }
            BackendEvent::Transposes(values) => {
                self.transposes = values;
                self.selected_index = 0;
                self.notify(BackendNotice::CurrentIndex(0))
            }
            BackendEvent::SelectedIndex(index) => {
                if index >= self.transposes.len() {
                    warn!("loopback: selected index {} out of range", index);
                    return Err(BackendError::Rejected(format!("index {}", index)));
                }
                self.selected_index = index;
                self.notify(BackendNotice::CurrentIndex(index))
            }
            BackendEvent::ScrollValue(value) => {
                self.scroll_value = value;
                Ok(())
            }
            BackendEvent::Muted(muted) => {
                self.muted = muted;
                Ok(())
            }
            BackendEvent::Volume(volume) => {
                self.volume = volume;
                Ok(())
            }
        }
    }
}
