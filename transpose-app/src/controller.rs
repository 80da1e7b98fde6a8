//! The controller: owns AppState and wires it to the backend and windows.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, info, warn};

use transpose_core::dispatch::{begin_capture, complete_capture, dispatch_action, startup};
use transpose_core::state::{AppState, KeyCapture};
use transpose_sync::framing::{decode_inbound, encode_backend_event};
use transpose_sync::{Envelope, Inbound, SyncBroadcaster, SyncError, WindowKind, WindowSpawner};
use transpose_types::{Action, BackendEvent, DispatchResult, SyncState, TransposeAction, UserNotice};

use crate::backend::NativeBackend;

pub struct Controller<B: NativeBackend, S: WindowSpawner> {
    state: AppState,
    capture: KeyCapture,
    backend: B,
    sync: SyncBroadcaster<S>,
    inbox: Receiver<Envelope>,
}

impl<B: NativeBackend, S: WindowSpawner> Controller<B, S> {
    /// `inbox_tx` and `inbox` are the two ends of the controller's single inbox;
    /// the backend and every window send into it.
    pub fn new(state: AppState, backend: B, spawner: S, inbox_tx: Sender<Envelope>, inbox: Receiver<Envelope>) -> Self {
        Self {
            state,
            capture: KeyCapture::new(),
            backend,
            sync: SyncBroadcaster::new(spawner, inbox_tx),
            inbox,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn snapshot(&self) -> SyncState {
        self.state.snapshot()
    }

    pub fn capture(&self) -> &KeyCapture {
        &self.capture
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn sync(&self) -> &SyncBroadcaster<S> {
        &self.sync
    }

    pub fn spawner_mut(&mut self) -> &mut S {
        self.sync.spawner_mut()
    }

    /// Announce loaded bindings and settings to the backend.
    pub fn start(&mut self) {
        let mut effects = Vec::new();
        let result = startup(&mut self.state, &mut effects);
        info!(
            "controller started: {} bindings, can_operate={}",
            self.state.bindings.bindings().len(),
            self.state.can_operate()
        );
        self.finish(result, effects);
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<UserNotice> {
        let mut effects = Vec::new();
        let result = dispatch_action(&action, &mut self.state, &mut effects);
        self.finish(result, effects)
    }

    pub fn begin_capture(&mut self, name: &str) -> Vec<UserNotice> {
        let mut effects = Vec::new();
        let result = begin_capture(name, &self.state, &mut self.capture, &mut effects);
        self.finish(result, effects)
    }

    pub fn open_window(&mut self, kind: WindowKind) -> Result<(), SyncError> {
        self.sync.open(kind)
    }

    pub fn close_window(&mut self, kind: WindowKind) -> bool {
        self.sync.close(kind)
    }

    /// Handle one inbox message.
    pub fn handle_envelope(&mut self, envelope: &Envelope) -> Vec<UserNotice> {
        let inbound = match decode_inbound(envelope) {
            Ok(inbound) => inbound,
            Err(e) => {
                warn!("dropping message on '{}': {}", envelope.channel, e);
                return Vec::new();
            }
        };
        match inbound {
            Inbound::Backend(notice) => self.dispatch(Action::Backend(notice)),
            Inbound::KeyConsumed(message) => {
                let mut effects = Vec::new();
                let result = complete_capture(&message, &mut self.state, &mut self.capture, &mut effects);
                self.finish(result, effects)
            }
            Inbound::Window { kind, message } => {
                let snapshot = self.state.snapshot();
                match self.sync.handle_window(kind, message, &snapshot) {
                    Some(transposes) => self.dispatch(Action::Transpose(TransposeAction::WriteBack(transposes))),
                    None => Vec::new(),
                }
            }
        }
    }

    /// Drain everything already queued.
    pub fn process_inbox(&mut self) -> Vec<UserNotice> {
        let mut notices = Vec::new();
        while let Ok(envelope) = self.inbox.try_recv() {
            notices.extend(self.handle_envelope(&envelope));
        }
        notices
    }

    /// Keep handling messages until none arrives for `quiet`.
    pub fn settle(&mut self, quiet: Duration) -> Vec<UserNotice> {
        let mut notices = Vec::new();
        loop {
            match self.inbox.recv_timeout(quiet) {
                Ok(envelope) => notices.extend(self.handle_envelope(&envelope)),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => return notices,
            }
        }
    }

    /// Close every window and leave the backend out of listen mode.
    pub fn shutdown(&mut self) {
        let mut effects = Vec::new();
        self.capture.abandon(&mut effects);
        self.send_effects(effects);
        let closed = self.sync.close_all();
        info!("controller shut down, closed {} window(s)", closed);
    }

    fn finish(&mut self, result: DispatchResult, effects: Vec<BackendEvent>) -> Vec<UserNotice> {
        self.send_effects(effects);
        if result.state_changed {
            let reached = self.sync.broadcast(&self.state.snapshot());
            debug!("state broadcast to {} window(s)", reached);
        }
        for notice in &result.notices {
            info!("notice: {}", notice);
        }
        result.notices
    }

    fn send_effects(&mut self, effects: Vec<BackendEvent>) {
        for event in effects {
            let sent = encode_backend_event(&event)
                .map_err(|e| e.to_string())
                .and_then(|envelope| self.backend.emit(&envelope).map_err(|e| e.to_string()));
            if let Err(e) = sent {
                warn!("backend event {:?} not delivered: {}", event, e);
            }
        }
    }
}
