//! Action types for the dispatch system.
//!
//! Actions represent intents that flow through the controller's dispatch.
//! Every mutation of the authoritative AppState goes through one of these.

use serde::{Deserialize, Serialize};

use crate::backend::BackendNotice;
use crate::binding::KeyValue;

/// Top-level action dispatched on the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Binding(BindingAction),
    Transpose(TransposeAction),
    Performance(PerformanceAction),
    /// A notice pushed by the native backend on `frontend_event`.
    Backend(BackendNotice),
}

/// Binding mutations. Capture produces these once a key has been consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingAction {
    Bind { name: String, value: KeyValue },
}

/// Transpose sequence edits and selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransposeAction {
    /// Free text typed into the controller's sequence input.
    SetFromText(String),
    /// Sequence sent back by an auxiliary window on the `sheet-viewer` channel.
    WriteBack(Vec<i32>),
    /// Explicit selection from the UI (clicking an item).
    Select(usize),
}

/// Pause and output settings that the backend consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceAction {
    SetPaused(bool),
    SetMuted(bool),
    SetVolume(f32),
    SetScroll(u32),
}

/// User-facing outcome of a dispatch. The UI layer renders these as toasts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserNotice {
    /// The key is reserved for other application use.
    RestrictedKey { key: String },
    /// No binding with this name exists.
    UnknownBinding { name: String },
    /// Optional bindings cannot be captured until every required one is set.
    BindingLocked { name: String },
    /// The key_consume payload could not be decoded.
    MalformedCapture,
    /// A capture session is already outstanding.
    CaptureBusy,
    /// `key` moved to another binding; `from` is now unbound.
    KeyStolen { from: String, key: String },
    /// Some offset fell outside the accepted range; the prior sequence is kept.
    OutOfRange,
    /// Resume was requested while required bindings are missing.
    WaitingForBindings,
    /// Scroll was adjusted while the scroll binding is unbound.
    ScrollUnavailable,
}

impl std::fmt::Display for UserNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserNotice::RestrictedKey { key } => write!(f, "The key '{}' is restricted from use", key),
            UserNotice::UnknownBinding { name } => write!(f, "Unknown keybind '{}'", name),
            UserNotice::BindingLocked { name } => {
                write!(f, "Set the required keybinds before '{}'", name)
            }
            UserNotice::MalformedCapture => write!(f, "Could not read the pressed key"),
            UserNotice::CaptureBusy => write!(f, "Already listening for a key"),
            UserNotice::KeyStolen { from, key } => {
                write!(f, "'{}' was moved from '{}', rebind it", key, from)
            }
            UserNotice::OutOfRange => write!(f, "Transposes must not exceed or fall below -/+50"),
            UserNotice::WaitingForBindings => write!(f, "Waiting for keybindings"),
            UserNotice::ScrollUnavailable => write!(f, "Bind 'Scroll Down' to use scrolling"),
        }
    }
}

/// Result of dispatching an action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchResult {
    /// The broadcastable snapshot changed; auxiliary windows need a push.
    pub state_changed: bool,
    pub notices: Vec<UserNotice>,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn changed() -> Self {
        Self { state_changed: true, ..Self::default() }
    }

    pub fn with_notice(notice: UserNotice) -> Self {
        Self { notices: vec![notice], ..Self::default() }
    }

    pub fn push_notice(&mut self, notice: UserNotice) {
        self.notices.push(notice);
    }

    pub fn merge(&mut self, other: DispatchResult) {
        self.state_changed |= other.state_changed;
        self.notices.extend(other.notices);
    }
}
