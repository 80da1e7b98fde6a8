#![allow(dead_code)]
//! Test harness for transpose-sync integration tests.

use std::collections::HashMap;

use crossbeam_channel::{unbounded, Receiver, Sender};

use transpose_sync::framing::decode_inbound;
use transpose_sync::protocol::{Envelope, Inbound, SyncError, WindowKind};
use transpose_sync::{SyncBroadcaster, WindowReplica, WindowSpawner};
use transpose_types::{Binding, SyncState};

/// Spawns windows as in-process replicas the test drives by hand.
#[derive(Default)]
pub struct ChannelSpawner {
    replicas: HashMap<WindowKind, WindowReplica>,
    pub fail_next: bool,
    pub spawned: usize,
}

impl ChannelSpawner {
    /// Take ownership of the replica for `kind`.
    pub fn take(&mut self, kind: WindowKind) -> WindowReplica {
        self.replicas
            .remove(&kind)
            .unwrap_or_else(|| panic!("{} was never spawned", kind))
    }
}

impl WindowSpawner for ChannelSpawner {
    fn spawn(&mut self, kind: WindowKind, inbox: Sender<Envelope>) -> Result<Sender<Envelope>, SyncError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(SyncError::SpawnFailed("refused by test".into()));
        }
        let (tx, rx) = unbounded();
        self.replicas.insert(kind, WindowReplica::new(kind, inbox, rx));
        self.spawned += 1;
        Ok(tx)
    }
}

pub struct Harness {
    pub broadcaster: SyncBroadcaster<ChannelSpawner>,
    pub inbox: Receiver<Envelope>,
}

impl Harness {
    pub fn new() -> Self {
        let (tx, inbox) = unbounded();
        Self {
            broadcaster: SyncBroadcaster::new(ChannelSpawner::default(), tx),
            inbox,
        }
    }

    /// Open a window and hand its replica to the test.
    pub fn open(&mut self, kind: WindowKind) -> WindowReplica {
        self.broadcaster.open(kind).unwrap();
        self.broadcaster.spawner_mut().take(kind)
    }

    /// Process every queued inbox message; returns accepted write-backs.
    pub fn pump(&mut self, state: &SyncState) -> Vec<Vec<i32>> {
        let mut write_backs = Vec::new();
        while let Ok(envelope) = self.inbox.try_recv() {
            match decode_inbound(&envelope).unwrap() {
                Inbound::Window { kind, message } => {
                    if let Some(seq) = self.broadcaster.handle_window(kind, message, state) {
                        write_backs.push(seq);
                    }
                }
                other => panic!("unexpected backend traffic {:?}", other),
            }
        }
        write_backs
    }
}

pub fn make_state(transposes: Vec<i32>) -> SyncState {
    SyncState {
        bindings: vec![Binding::new("pause", "Pause All Binds", true)],
        can_operate: false,
        transposes,
        selected_index: 0,
        paused: true,
    }
}
