//! Auxiliary windows as threads, each holding a read replica.

use std::collections::HashMap;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, warn};

use transpose_core::state::transpose::parse;
use transpose_core::state::window_around;
use transpose_sync::{Envelope, ReplicaEvent, SyncError, WindowKind, WindowReplica, WindowSpawner};
use transpose_types::SyncState;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// User input delivered to a window thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowCommand {
    /// Text typed into the viewer's sequence field.
    Edit(String),
    /// The user closed the window.
    Close,
}

/// Spawns each window on its own thread. Rendered lines go to `display`.
pub struct ThreadSpawner {
    display: Option<Sender<String>>,
    commands: HashMap<WindowKind, Sender<WindowCommand>>,
    threads: Vec<JoinHandle<()>>,
}

impl ThreadSpawner {
    pub fn new(display: Option<Sender<String>>) -> Self {
        Self {
            display,
            commands: HashMap::new(),
            threads: Vec::new(),
        }
    }

    /// Deliver user input to a window. False if it is not running.
    pub fn send(&mut self, kind: WindowKind, command: WindowCommand) -> bool {
        let delivered = self
            .commands
            .get(&kind)
            .is_some_and(|tx| tx.send(command).is_ok());
        if !delivered {
            self.commands.remove(&kind);
        }
        delivered
    }

    /// Wait for every window thread to exit.
    pub fn join_all(&mut self) {
        self.commands.clear();
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                warn!("window thread panicked");
            }
        }
    }
}

impl WindowSpawner for ThreadSpawner {
    fn spawn(&mut self, kind: WindowKind, inbox: Sender<Envelope>) -> Result<Sender<Envelope>, SyncError> {
        let (to_window, from_controller) = unbounded();
        let (command_tx, command_rx) = unbounded();
        let display = self.display.clone();
        let replica = WindowReplica::new(kind, inbox, from_controller);

        let handle = thread::Builder::new()
            .name(kind.label().to_string())
            .spawn(move || run_window(replica, command_rx, display))
            .map_err(|e| SyncError::SpawnFailed(e.to_string()))?;

        self.threads.retain(|t| !t.is_finished());
        self.threads.push(handle);
        self.commands.insert(kind, command_tx);
        Ok(to_window)
    }
}

fn run_window(mut replica: WindowReplica, commands: Receiver<WindowCommand>, display: Option<Sender<String>>) {
    let kind = replica.kind();
    if let Err(e) = replica.announce_ready() {
        warn!("{} could not signal ready: {}", kind, e);
        return;
    }

    loop {
        while let Ok(command) = commands.try_recv() {
            match command {
                WindowCommand::Edit(text) => edit(&mut replica, &text),
                WindowCommand::Close => {
                    let _ = replica.request_close();
                    info!("{} closed by user", kind);
                    return;
                }
            }
        }

        match replica.wait(POLL_INTERVAL) {
            Ok(Some(ReplicaEvent::Updated)) => {
                if let (Some(state), Some(display)) = (replica.state(), &display) {
                    let _ = display.send(render(kind, state));
                }
            }
            Ok(Some(ReplicaEvent::Closed)) => {
                debug!("{} closed by controller", kind);
                return;
            }
            Ok(None) => {}
            Err(_) => return,
        }
    }
}

fn edit(replica: &mut WindowReplica, text: &str) {
    let kind = replica.kind();
    if !kind.can_write_back() {
        warn!("{} cannot edit the sequence", kind);
        return;
    }
    // Range checks happen on the controller, which reports them to the user.
    match replica.request_transposes(parse(text)) {
        Ok(true) => debug!("{} sent an edit", kind),
        Ok(false) => {}
        Err(e) => warn!("{} edit failed: {}", kind, e),
    }
}

/// One line describing what the window shows.
pub fn render(kind: WindowKind, state: &SyncState) -> String {
    let status = if state.paused { " (paused)" } else { "" };
    match kind {
        WindowKind::TransposeMonitor => {
            let index = state.selected_index.min(state.transposes.len().saturating_sub(1));
            let w = window_around(&state.transposes, index);
            let show = |item: Option<transpose_core::state::MonitorItem>| {
                item.map_or_else(|| "-".to_string(), |i| format!("{:+}", i.transpose))
            };
            format!(
                "{}: {} [{}] {}{}",
                kind,
                show(w.previous),
                show(w.current),
                show(w.next),
                status
            )
        }
        WindowKind::SheetViewer => {
            let values: Vec<String> = state.transposes.iter().map(|t| t.to_string()).collect();
            format!(
                "{}: [{}] at {}{}",
                kind,
                values.join(" "),
                state.selected_index,
                status
            )
        }
    }
}
