//! Controller side of the sync protocol: spawning, ready handshake, broadcast.

use crossbeam_channel::Sender;
use log::{debug, info, warn};
use transpose_types::SyncState;

use crate::framing::encode_controller;
use crate::protocol::{ControllerMessage, Envelope, SyncError, WindowKind, WindowMessage};
use crate::registry::WindowRegistry;

/// Creates auxiliary windows.
pub trait WindowSpawner {
    /// Create a window of `kind` that sends to the controller through `inbox`.
    /// Returns the sender that reaches the new window.
    fn spawn(&mut self, kind: WindowKind, inbox: Sender<Envelope>) -> Result<Sender<Envelope>, SyncError>;
}

pub struct SyncBroadcaster<S: WindowSpawner> {
    registry: WindowRegistry,
    spawner: S,
    inbox: Sender<Envelope>,
}

impl<S: WindowSpawner> SyncBroadcaster<S> {
    pub fn new(spawner: S, inbox: Sender<Envelope>) -> Self {
        Self {
            registry: WindowRegistry::new(),
            spawner,
            inbox,
        }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut S {
        &mut self.spawner
    }

    /// Spawn a window. Nothing is registered if creation fails.
    pub fn open(&mut self, kind: WindowKind) -> Result<(), SyncError> {
        if self.registry.contains(kind) {
            return Err(SyncError::AlreadyOpen(kind));
        }
        let tx = self.spawner.spawn(kind, self.inbox.clone()).map_err(|e| {
            warn!("could not open {}: {}", kind, e);
            e
        })?;
        self.registry.insert(kind, tx)?;
        info!("{} opened", kind);
        Ok(())
    }

    /// Apply window-originated traffic. Returns an accepted write-back sequence
    /// for the controller to dispatch.
    pub fn handle_window(&mut self, kind: WindowKind, message: WindowMessage, state: &SyncState) -> Option<Vec<i32>> {
        match message {
            WindowMessage::Ready => {
                self.handshake(kind, state);
                None
            }
            WindowMessage::CloseRequested => {
                if self.registry.remove(kind).is_some() {
                    info!("{} closed", kind);
                }
                None
            }
            WindowMessage::WriteBack(transposes) => {
                if !kind.can_write_back() || !self.registry.contains(kind) {
                    warn!("dropping write-back from {}", kind);
                    return None;
                }
                Some(transposes)
            }
        }
    }

    /// One snapshot to `kind` only, on its first ready signal.
    fn handshake(&mut self, kind: WindowKind, state: &SyncState) {
        let Some(handle) = self.registry.mark_ready(kind) else {
            debug!("ignoring ready from {}", kind);
            return;
        };
        let sent = encode_controller(kind, &ControllerMessage::State(state.clone()))
            .and_then(|envelope| handle.send(envelope));
        match sent {
            Ok(()) => debug!("{} ready, snapshot sent", kind),
            Err(e) => {
                warn!("handshake with {} failed: {}", kind, e);
                self.registry.remove(kind);
            }
        }
    }

    /// Push the full snapshot to every ready window. Returns how many received it.
    pub fn broadcast(&mut self, state: &SyncState) -> usize {
        let mut delivered = 0;
        let mut disconnected = Vec::new();

        for handle in self.registry.ready() {
            let sent = encode_controller(handle.kind(), &ControllerMessage::State(state.clone()))
                .and_then(|envelope| handle.send(envelope));
            match sent {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!("Failed to send to {}: {}", handle.label(), e);
                    disconnected.push(handle.kind());
                }
            }
        }

        for kind in disconnected {
            self.registry.remove(kind);
        }
        delivered
    }

    /// Controller-initiated close of one window.
    pub fn close(&mut self, kind: WindowKind) -> bool {
        match self.registry.remove(kind) {
            Some(handle) => {
                if let Ok(envelope) = encode_controller(kind, &ControllerMessage::Close) {
                    let _ = handle.send(envelope);
                }
                true
            }
            None => false,
        }
    }

    /// Close every window. Returns how many were open.
    pub fn close_all(&mut self) -> usize {
        let handles = self.registry.drain();
        for handle in &handles {
            if let Ok(envelope) = encode_controller(handle.kind(), &ControllerMessage::Close) {
                let _ = handle.send(envelope);
            }
        }
        handles.len()
    }
}
