//! Auxiliary window handles owned by the controller.

use std::collections::HashMap;

use crossbeam_channel::Sender;
use log::debug;

use crate::protocol::{Envelope, SyncError, WindowKind};

/// Lifecycle of a registered window. A closed window has no handle at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    AwaitingReady,
    Ready,
}

/// Capability to message one auxiliary window.
#[derive(Debug)]
pub struct WindowHandle {
    kind: WindowKind,
    phase: WindowPhase,
    tx: Sender<Envelope>,
}

impl WindowHandle {
    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn is_ready(&self) -> bool {
        self.phase == WindowPhase::Ready
    }

    /// Non-blocking; fails only if the window's receiver is gone.
    pub fn send(&self, envelope: Envelope) -> Result<(), SyncError> {
        self.tx.send(envelope).map_err(|_| SyncError::Disconnected)
    }
}

#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<WindowKind, WindowHandle>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly spawned window in `AwaitingReady`.
    pub fn insert(&mut self, kind: WindowKind, tx: Sender<Envelope>) -> Result<(), SyncError> {
        if self.windows.contains_key(&kind) {
            return Err(SyncError::AlreadyOpen(kind));
        }
        self.windows.insert(
            kind,
            WindowHandle {
                kind,
                phase: WindowPhase::AwaitingReady,
                tx,
            },
        );
        debug!("{} registered, awaiting ready", kind);
        Ok(())
    }

    /// `AwaitingReady -> Ready`. Returns the handle only on that transition.
    pub fn mark_ready(&mut self, kind: WindowKind) -> Option<&WindowHandle> {
        let handle = self.windows.get_mut(&kind)?;
        if handle.phase == WindowPhase::Ready {
            return None;
        }
        handle.phase = WindowPhase::Ready;
        Some(handle)
    }

    pub fn remove(&mut self, kind: WindowKind) -> Option<WindowHandle> {
        self.windows.remove(&kind)
    }

    pub fn get(&self, kind: WindowKind) -> Option<&WindowHandle> {
        self.windows.get(&kind)
    }

    pub fn phase(&self, kind: WindowKind) -> Option<WindowPhase> {
        self.windows.get(&kind).map(|h| h.phase)
    }

    pub fn contains(&self, kind: WindowKind) -> bool {
        self.windows.contains_key(&kind)
    }

    pub fn ready(&self) -> impl Iterator<Item = &WindowHandle> {
        self.windows.values().filter(|h| h.is_ready())
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn drain(&mut self) -> Vec<WindowHandle> {
        self.windows.drain().map(|(_, h)| h).collect()
    }
}
