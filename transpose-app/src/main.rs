use std::io::{self, BufRead, Write};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver};

use transpose_app::cli::{Args, Command};
use transpose_app::logging::{init_logging, install_panic_hook};
use transpose_app::{Controller, LoopbackBackend, ThreadSpawner, WindowCommand};
use transpose_core::config::Config;
use transpose_core::paths;
use transpose_core::state::persistence::{ConfigStore, MemoryConfigStore, SqliteConfigStore};
use transpose_core::state::{AppState, Direction, Limits, SettingsFile};
use transpose_sync::WindowKind;
use transpose_types::{Action, PerformanceAction, TransposeAction, UserNotice};

/// How long to wait for backend and window replies after each command.
const SETTLE: Duration = Duration::from_millis(60);

type App = Controller<LoopbackBackend, ThreadSpawner>;

fn main() -> io::Result<()> {
    let raw: Vec<String> = std::env::args().collect();
    let args = Args::parse(&raw);
    init_logging(args.verbose)?;
    install_panic_hook();

    let config = Config::load();
    let config_name = args.config_name.clone().unwrap_or_else(|| config.config_name());
    let db_path = args.database.clone().unwrap_or_else(|| config.database_path());

    let storage: Box<dyn ConfigStore> = match SqliteConfigStore::open(&db_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!(target: "persistence", "{} unavailable, keybinds will not be saved: {}", db_path.display(), e);
            Box::new(MemoryConfigStore::new())
        }
    };
    let state = AppState::new(
        storage,
        &config_name,
        SettingsFile::at(paths::settings_path()),
        Limits::from_config(&config),
    );

    let (inbox_tx, inbox) = unbounded();
    let (display_tx, display_rx) = unbounded();
    let backend = LoopbackBackend::new(inbox_tx.clone());
    let mut controller = Controller::new(state, backend, ThreadSpawner::new(Some(display_tx)), inbox_tx, inbox);
    controller.start();

    let mut out = io::stdout();
    let notices = controller.settle(SETTLE);
    report(&mut out, &notices, &display_rx)?;
    describe(&mut out, &controller)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        let mut notices = run(&mut controller, command, &mut out)?;
        notices.extend(controller.settle(SETTLE));
        report(&mut out, &notices, &display_rx)?;
    }

    controller.shutdown();
    controller.spawner_mut().join_all();
    Ok(())
}

fn run(controller: &mut App, command: Command, out: &mut impl Write) -> io::Result<Vec<UserNotice>> {
    let notices = match command {
        Command::Listen(name) => controller.begin_capture(&name),
        Command::Key { key, keycode } => {
            if let Err(e) = controller.backend_mut().press(&key, keycode) {
                writeln!(out, "error: {}", e)?;
            }
            Vec::new()
        }
        Command::Transposes(text) => controller.dispatch(Action::Transpose(TransposeAction::SetFromText(text))),
        Command::Select(index) => controller.dispatch(Action::Transpose(TransposeAction::Select(index))),
        Command::Next => navigate(controller, Direction::Next, out)?,
        Command::Prev => navigate(controller, Direction::Previous, out)?,
        Command::Pause => controller.dispatch(Action::Performance(PerformanceAction::SetPaused(true))),
        Command::Resume => controller.dispatch(Action::Performance(PerformanceAction::SetPaused(false))),
        Command::Mute => controller.dispatch(Action::Performance(PerformanceAction::SetMuted(true))),
        Command::Unmute => controller.dispatch(Action::Performance(PerformanceAction::SetMuted(false))),
        Command::Volume(v) => controller.dispatch(Action::Performance(PerformanceAction::SetVolume(v))),
        Command::Scroll(n) => controller.dispatch(Action::Performance(PerformanceAction::SetScroll(n))),
        Command::Open(kind) => {
            if let Err(e) = controller.open_window(kind) {
                writeln!(out, "error: {}", e)?;
            }
            Vec::new()
        }
        Command::ViewerEdit(text) => {
            if !controller.spawner_mut().send(WindowKind::SheetViewer, WindowCommand::Edit(text)) {
                writeln!(out, "error: viewer is not open")?;
            }
            Vec::new()
        }
        Command::Close(kind) => {
            // A window whose thread is gone cannot ask to close; drop its handle here.
            if !controller.spawner_mut().send(kind, WindowCommand::Close) && !controller.close_window(kind) {
                writeln!(out, "error: {} is not open", kind)?;
            }
            Vec::new()
        }
        Command::State => {
            describe(out, controller)?;
            Vec::new()
        }
        Command::Quit => Vec::new(),
    };
    Ok(notices)
}

/// Simulate a press of the next/previous key on the backend.
fn navigate(controller: &mut App, direction: Direction, out: &mut impl Write) -> io::Result<Vec<UserNotice>> {
    if let Err(e) = controller.backend_mut().navigate(direction) {
        writeln!(out, "error: {}", e)?;
    }
    Ok(Vec::new())
}

fn report(out: &mut impl Write, notices: &[UserNotice], display: &Receiver<String>) -> io::Result<()> {
    for notice in notices {
        writeln!(out, "! {}", notice)?;
    }
    while let Ok(line) = display.try_recv() {
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

fn describe(out: &mut impl Write, controller: &App) -> io::Result<()> {
    let state = controller.state();
    let snapshot = state.snapshot();
    writeln!(
        out,
        "config '{}': {}, {}",
        state.bindings.config_name(),
        if snapshot.can_operate { "ready" } else { "waiting for keybindings" },
        if snapshot.paused { "paused" } else { "running" }
    )?;
    for binding in state.bindings.capturable_bindings() {
        let key = binding.key.as_deref().unwrap_or("-");
        let required = if binding.required { "" } else { " (optional)" };
        writeln!(out, "  {:<20} {:<12} {}{}", binding.name, key, binding.purpose, required)?;
    }
    let values: Vec<String> = snapshot.transposes.iter().map(|t| t.to_string()).collect();
    writeln!(out, "transposes: [{}] selected {}", values.join(" "), snapshot.selected_index)?;
    let (muted, volume, scroll_value) = controller.backend().output();
    writeln!(
        out,
        "output: {} volume {:.2} scroll {}",
        if muted { "muted" } else { "unmuted" },
        volume,
        scroll_value
    )?;
    let capture = match controller.capture().listening_for() {
        Some(name) => format!("listening for '{}'", name),
        None => "idle".to_string(),
    };
    let backend = if controller.backend().is_listening() { "listen mode" } else { "simulating" };
    writeln!(out, "capture: {} (backend {})", capture, backend)
}
