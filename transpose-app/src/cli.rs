//! Command-line flags and the line-oriented command set.

use std::path::PathBuf;

use transpose_sync::WindowKind;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub verbose: bool,
    pub config_name: Option<String>,
    pub database: Option<PathBuf>,
}

impl Args {
    pub fn parse(args: &[String]) -> Self {
        let value_of = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|i| args.get(i + 1).cloned())
        };
        Self {
            verbose: args.iter().any(|a| a == "--verbose" || a == "-v"),
            config_name: value_of("--config"),
            database: value_of("--db").map(PathBuf::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Listen(String),
    Key { key: String, keycode: u64 },
    Transposes(String),
    Select(usize),
    Next,
    Prev,
    Pause,
    Resume,
    Mute,
    Unmute,
    Volume(f32),
    Scroll(u32),
    Open(WindowKind),
    ViewerEdit(String),
    Close(WindowKind),
    State,
    Quit,
}

fn window(name: &str) -> Result<WindowKind, String> {
    match name {
        "monitor" => Ok(WindowKind::TransposeMonitor),
        "viewer" => Ok(WindowKind::SheetViewer),
        other => Err(format!("unknown window '{}'", other)),
    }
}

fn number<T: std::str::FromStr>(word: &str, what: &str) -> Result<T, String> {
    word.parse().map_err(|_| format!("{} expects a number, got '{}'", what, word))
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        let needs = |what: &str| -> Result<(), String> {
            if rest.is_empty() {
                Err(format!("{} needs an argument", what))
            } else {
                Ok(())
            }
        };

        match head {
            "listen" => needs("listen").map(|_| Command::Listen(rest.to_string())),
            "key" => {
                let mut words = rest.split_whitespace();
                match (words.next(), words.next()) {
                    (Some(key), Some(code)) => Ok(Command::Key {
                        key: key.to_string(),
                        keycode: number(code, "key")?,
                    }),
                    _ => Err("usage: key <key> <keycode>".to_string()),
                }
            }
            "transposes" => Ok(Command::Transposes(rest.to_string())),
            "select" => number(rest, "select").map(Command::Select),
            "next" => Ok(Command::Next),
            "prev" => Ok(Command::Prev),
            "pause" => Ok(Command::Pause),
            "resume" => Ok(Command::Resume),
            "mute" => Ok(Command::Mute),
            "unmute" => Ok(Command::Unmute),
            "volume" => number(rest, "volume").map(Command::Volume),
            "scroll" => number(rest, "scroll").map(Command::Scroll),
            "monitor" => Ok(Command::Open(WindowKind::TransposeMonitor)),
            "viewer" => Ok(Command::Open(WindowKind::SheetViewer)),
            "viewer-edit" => Ok(Command::ViewerEdit(rest.to_string())),
            "close" => window(rest).map(Command::Close),
            "state" => Ok(Command::State),
            "quit" | "exit" => Ok(Command::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}
