#![allow(dead_code)]
//! Test harness for controller integration tests.

use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};

use transpose_app::{BackendError, Controller, NativeBackend, ThreadSpawner};
use transpose_core::state::persistence::ConfigStore;
use transpose_core::state::{AppState, Limits, SettingsFile};
use transpose_sync::framing::{decode_backend_event, encode_key_consumed, encode_notice};
use transpose_sync::{Envelope, SyncError, WindowKind, WindowReplica, WindowSpawner};
use transpose_types::{BackendEvent, BackendNotice, KeyConsumed};

/// Backend that records every event it is sent.
#[derive(Default)]
pub struct RecordingBackend {
    pub events: Vec<BackendEvent>,
    pub fail: bool,
}

impl RecordingBackend {
    pub fn take(&mut self) -> Vec<BackendEvent> {
        std::mem::take(&mut self.events)
    }
}

impl NativeBackend for RecordingBackend {
    fn emit(&mut self, envelope: &Envelope) -> Result<(), BackendError> {
        if self.fail {
            return Err(BackendError::Closed);
        }
        let event = decode_backend_event(envelope).map_err(|e| BackendError::Rejected(e.to_string()))?;
        self.events.push(event);
        Ok(())
    }
}

/// Windows as in-process replicas the test drives by hand.
#[derive(Default)]
pub struct ChannelSpawner {
    replicas: HashMap<WindowKind, WindowReplica>,
}

impl ChannelSpawner {
    pub fn take(&mut self, kind: WindowKind) -> WindowReplica {
        self.replicas
            .remove(&kind)
            .unwrap_or_else(|| panic!("{} was never spawned", kind))
    }
}

impl WindowSpawner for ChannelSpawner {
    fn spawn(&mut self, kind: WindowKind, inbox: Sender<Envelope>) -> Result<Sender<Envelope>, SyncError> {
        let (tx, rx) = unbounded();
        self.replicas.insert(kind, WindowReplica::new(kind, inbox, rx));
        Ok(tx)
    }
}

pub type TestController = Controller<RecordingBackend, ChannelSpawner>;

pub struct Harness {
    pub controller: TestController,
    /// Stands in for the native backend's side of the inbox.
    pub backend_tx: Sender<Envelope>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_state(AppState::in_memory())
    }

    pub fn with_store(storage: Box<dyn ConfigStore>) -> Self {
        Self::with_state(AppState::new(storage, "default", SettingsFile::detached(), Limits::default()))
    }

    pub fn with_state(state: AppState) -> Self {
        let (inbox_tx, inbox) = unbounded();
        let controller = Controller::new(
            state,
            RecordingBackend::default(),
            ChannelSpawner::default(),
            inbox_tx.clone(),
            inbox,
        );
        Self { controller, backend_tx: inbox_tx }
    }

    pub fn events(&mut self) -> Vec<BackendEvent> {
        self.controller.backend_mut().take()
    }

    /// Open a window, let it signal ready, and hand its replica back.
    pub fn open_ready(&mut self, kind: WindowKind) -> WindowReplica {
        self.controller.open_window(kind).unwrap();
        let mut replica = self.controller.spawner_mut().take(kind);
        replica.announce_ready().unwrap();
        self.controller.process_inbox();
        replica
    }

    /// Capture `key` for `name` the way the native backend would report it.
    pub fn capture(&mut self, name: &str, key: &str, keycode: u64) -> Vec<transpose_types::UserNotice> {
        let mut notices = self.controller.begin_capture(name);
        let envelope = encode_key_consumed(&KeyConsumed { key: key.to_string(), keycode }).unwrap();
        self.backend_tx.send(envelope).unwrap();
        notices.extend(self.controller.process_inbox());
        notices
    }

    pub fn notify(&mut self, notice: BackendNotice) {
        self.backend_tx.send(encode_notice(&notice).unwrap()).unwrap();
        self.controller.process_inbox();
    }

    /// Bind every required binding to F1..F5.
    pub fn bind_required(&mut self) {
        let names = ["pause", "transpose_up", "transpose_down", "next_transpose", "previous_transpose"];
        for (i, name) in names.iter().enumerate() {
            self.capture(name, &format!("F{}", i + 1), 112 + i as u64);
        }
    }
}

pub type ThreadedController = Controller<RecordingBackend, ThreadSpawner>;

/// Controller with real window threads; rendered lines come out of the receiver.
pub fn threaded() -> (ThreadedController, Receiver<String>) {
    let (inbox_tx, inbox) = unbounded();
    let (display_tx, display_rx) = unbounded();
    let controller = Controller::new(
        AppState::in_memory(),
        RecordingBackend::default(),
        ThreadSpawner::new(Some(display_tx)),
        inbox_tx,
        inbox,
    );
    (controller, display_rx)
}
