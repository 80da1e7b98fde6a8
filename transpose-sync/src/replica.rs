//! Auxiliary window side: ready signal, read replica, write-back requests.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::debug;
use transpose_types::SyncState;

use crate::framing::{decode_controller, encode_window};
use crate::protocol::{ControllerMessage, Envelope, SyncError, WindowKind, WindowMessage};

/// What an incoming controller message did to the replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicaEvent {
    /// A new snapshot replaced the replica.
    Updated,
    /// The controller closed this window.
    Closed,
}

/// Disposable copy of the controller's state, refreshed only by snapshots.
pub struct WindowReplica {
    kind: WindowKind,
    to_controller: Sender<Envelope>,
    from_controller: Receiver<Envelope>,
    state: Option<SyncState>,
    /// Write-back sent but not yet seen in a snapshot.
    pending_edit: Option<Vec<i32>>,
    announced: bool,
    closed: bool,
}

impl WindowReplica {
    pub fn new(kind: WindowKind, to_controller: Sender<Envelope>, from_controller: Receiver<Envelope>) -> Self {
        Self {
            kind,
            to_controller,
            from_controller,
            state: None,
            pending_edit: None,
            announced: false,
            closed: false,
        }
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// `None` until the handshake snapshot arrives.
    pub fn state(&self) -> Option<&SyncState> {
        self.state.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn send(&self, message: &WindowMessage) -> Result<(), SyncError> {
        let envelope = encode_window(self.kind, message)?;
        self.to_controller.send(envelope).map_err(|_| SyncError::Disconnected)
    }

    /// Signal readiness. Only the first call sends anything.
    pub fn announce_ready(&mut self) -> Result<(), SyncError> {
        if self.announced {
            return Ok(());
        }
        self.send(&WindowMessage::Ready)?;
        self.announced = true;
        Ok(())
    }

    pub fn apply(&mut self, envelope: &Envelope) -> Result<ReplicaEvent, SyncError> {
        match decode_controller(self.kind, envelope)? {
            ControllerMessage::State(state) => {
                if self.pending_edit.as_deref() == Some(state.transposes.as_slice()) {
                    debug!("{} saw its edit echoed", self.kind);
                    self.pending_edit = None;
                }
                self.state = Some(state);
                Ok(ReplicaEvent::Updated)
            }
            ControllerMessage::Close => {
                self.closed = true;
                Ok(ReplicaEvent::Closed)
            }
        }
    }

    /// Drain everything queued without blocking.
    pub fn poll(&mut self) -> Result<Vec<ReplicaEvent>, SyncError> {
        let mut events = Vec::new();
        loop {
            match self.from_controller.try_recv() {
                Ok(envelope) => events.push(self.apply(&envelope)?),
                Err(TryRecvError::Empty) => return Ok(events),
                Err(TryRecvError::Disconnected) if !events.is_empty() => return Ok(events),
                Err(TryRecvError::Disconnected) => return Err(SyncError::Disconnected),
            }
        }
    }

    /// Block up to `timeout` for one message.
    pub fn wait(&mut self, timeout: Duration) -> Result<Option<ReplicaEvent>, SyncError> {
        match self.from_controller.recv_timeout(timeout) {
            Ok(envelope) => self.apply(&envelope).map(Some),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(SyncError::Disconnected),
        }
    }

    /// Send a sequence edit to the controller.
    ///
    /// Returns false without sending when the sequence is empty, matches the
    /// replica, or matches an edit still waiting for its echo.
    pub fn request_transposes(&mut self, transposes: Vec<i32>) -> Result<bool, SyncError> {
        if transposes.is_empty() {
            return Ok(false);
        }
        if self.state.as_ref().is_some_and(|s| s.transposes == transposes) {
            return Ok(false);
        }
        if self.pending_edit.as_ref() == Some(&transposes) {
            return Ok(false);
        }
        self.send(&WindowMessage::WriteBack(transposes.clone()))?;
        self.pending_edit = Some(transposes);
        Ok(true)
    }

    /// The user closed this window.
    pub fn request_close(&mut self) -> Result<(), SyncError> {
        self.closed = true;
        self.send(&WindowMessage::CloseRequested)
    }
}
