use std::fs::File;
use std::io;

use simplelog::{Config, LevelFilter, WriteLogger};

use transpose_core::paths;

pub fn init_logging(verbose: bool) -> io::Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = paths::log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(_) => File::create(std::env::temp_dir().join("multi-transpose.log"))?,
    };

    WriteLogger::init(log_level, Config::default(), log_file)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    log::info!("multi-transpose starting (log level: {:?})", log_level);
    Ok(())
}

/// Log panics with their location before the default hook runs.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let message = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "Unknown location".to_string());
        log::error!("Thread panicked at {}: {}", location, message);
        default_hook(info);
    }));
}
