//! One-key capture session against the native backend.
//!
//! `Idle -> Listening(name) -> Resolving(name) -> Idle`. Only one session may
//! be outstanding; the backend is in listen mode exactly while `Listening`.

use transpose_types::{BackendEvent, KeyConsumed, KeyValue};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Listening { name: String },
    Resolving { name: String },
}

/// What a consumed key turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consumed {
    /// No session was listening; the event is dropped.
    Ignored,
    /// Payload could not be decoded. The session ended without a bind.
    Malformed { name: String },
    /// Validated request to hand to the binding store.
    Request { name: String, value: KeyValue },
}

#[derive(Debug, Default)]
pub struct KeyCapture {
    state: CaptureState,
}

impl KeyCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == CaptureState::Idle
    }

    pub fn listening_for(&self) -> Option<&str> {
        match &self.state {
            CaptureState::Listening { name } => Some(name),
            _ => None,
        }
    }

    /// Enter listen mode for `name`. Returns false if a session is outstanding.
    pub fn begin(&mut self, name: &str, effects: &mut Vec<BackendEvent>) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = CaptureState::Listening { name: name.to_string() };
        effects.push(BackendEvent::KeyListen(true));
        true
    }

    /// Handle the raw `key_consume` message body.
    ///
    /// Any decodable or undecodable payload ends listen mode. On success the
    /// session moves to `Resolving` until [`KeyCapture::finish`].
    pub fn consume(&mut self, message: &str, effects: &mut Vec<BackendEvent>) -> Consumed {
        let name = match &self.state {
            CaptureState::Listening { name } => name.clone(),
            _ => return Consumed::Ignored,
        };
        effects.push(BackendEvent::KeyListen(false));

        match serde_json::from_str::<KeyConsumed>(message) {
            Ok(k) if !k.key.is_empty() => {
                self.state = CaptureState::Resolving { name: name.clone() };
                Consumed::Request {
                    name,
                    value: KeyValue::new(k.key, k.keycode),
                }
            }
            Ok(_) | Err(_) => {
                log::warn!("malformed key_consume payload: {}", message);
                self.state = CaptureState::Idle;
                Consumed::Malformed { name }
            }
        }
    }

    /// Close a resolved session.
    pub fn finish(&mut self) {
        if matches!(self.state, CaptureState::Resolving { .. }) {
            self.state = CaptureState::Idle;
        }
    }

    /// Drop any session, releasing the backend if it is still listening.
    pub fn abandon(&mut self, effects: &mut Vec<BackendEvent>) {
        if matches!(self.state, CaptureState::Listening { .. }) {
            effects.push(BackendEvent::KeyListen(false));
        }
        self.state = CaptureState::Idle;
    }
}
