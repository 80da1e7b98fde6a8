//! Channel names and message types.

use serde::{Deserialize, Serialize};
use transpose_types::{BackendNotice, SyncState};

/// Named channels. Payload shapes are fixed per channel.
pub mod channel {
    /// Controller -> native backend.
    pub const BACKEND_EVENT: &str = "backend_event";
    /// Native backend -> controller, `{message}` wrapping a notice.
    pub const FRONTEND_EVENT: &str = "frontend_event";
    /// Native backend -> controller, `{message}` wrapping the captured key.
    pub const KEY_CONSUME: &str = "key_consume";
    pub const TRANSPOSE_MONITOR_READY: &str = "transpose_monitor_ready";
    pub const SHEET_VIEWER_READY: &str = "sheet_viewer_ready";
    pub const TRANSPOSE_MONITOR_EVENT: &str = "transpose_monitor_event";
    pub const SHEET_VIEWER_EVENT: &str = "sheet_viewer_event";
    /// Viewer -> controller sequence write-back.
    pub const SHEET_VIEWER_WRITE_BACK: &str = "sheet-viewer";
    /// Auxiliary window -> controller, source label names the window.
    pub const CLOSE_REQUESTED: &str = "close_requested";
    /// Controller -> auxiliary window on shutdown.
    pub const WINDOW_CLOSE: &str = "window_close";
}

/// The auxiliary windows. At most one of each is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WindowKind {
    TransposeMonitor,
    SheetViewer,
}

impl WindowKind {
    pub const ALL: [WindowKind; 2] = [WindowKind::TransposeMonitor, WindowKind::SheetViewer];

    pub fn label(self) -> &'static str {
        match self {
            WindowKind::TransposeMonitor => "transpose-monitor",
            WindowKind::SheetViewer => "sheet-viewer",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.label() == label)
    }

    pub fn ready_channel(self) -> &'static str {
        match self {
            WindowKind::TransposeMonitor => channel::TRANSPOSE_MONITOR_READY,
            WindowKind::SheetViewer => channel::SHEET_VIEWER_READY,
        }
    }

    pub fn event_channel(self) -> &'static str {
        match self {
            WindowKind::TransposeMonitor => channel::TRANSPOSE_MONITOR_EVENT,
            WindowKind::SheetViewer => channel::SHEET_VIEWER_EVENT,
        }
    }

    /// Only the viewer may edit the sequence.
    pub fn can_write_back(self) -> bool {
        self == WindowKind::SheetViewer
    }
}

impl std::fmt::Display for WindowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One message on one named channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub channel: String,
    /// Label of the sending window, for window-originated traffic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Envelope {
    pub fn new(channel: &str, payload: serde_json::Value) -> Self {
        Self {
            channel: channel.to_string(),
            source: None,
            payload,
        }
    }

    pub fn from_window(kind: WindowKind, channel: &str, payload: serde_json::Value) -> Self {
        Self {
            channel: channel.to_string(),
            source: Some(kind.label().to_string()),
            payload,
        }
    }
}

/// Auxiliary window -> controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowMessage {
    Ready,
    CloseRequested,
    WriteBack(Vec<i32>),
}

/// Controller -> auxiliary window.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerMessage {
    State(SyncState),
    Close,
}

/// Everything the controller's inbox can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Backend(BackendNotice),
    /// Raw `{key, keycode}` text; decoding belongs to the capture session.
    KeyConsumed(String),
    Window { kind: WindowKind, message: WindowMessage },
}

/// Write-back payload on the `sheet-viewer` channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteBackPayload {
    pub transposes: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A window of this kind is already registered.
    AlreadyOpen(WindowKind),
    SpawnFailed(String),
    Codec(String),
    /// The other end of a channel is gone.
    Disconnected,
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::AlreadyOpen(kind) => write!(f, "{} is already open", kind),
            SyncError::SpawnFailed(e) => write!(f, "window spawn failed: {}", e),
            SyncError::Codec(e) => write!(f, "bad message: {}", e),
            SyncError::Disconnected => write!(f, "channel disconnected"),
        }
    }
}

impl std::error::Error for SyncError {}
