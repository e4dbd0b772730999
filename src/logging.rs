use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log filter
pub const LOG_ENV: &str = "DAYBOOK_LOG";

/// Install a file-backed tracing subscriber.
///
/// Logs never go to the terminal: the TUI owns it. Returns the log file path,
/// or `None` when the file could not be opened or a subscriber was already set.
pub fn init(log_dir: &Path, default_level: &str) -> Option<PathBuf> {
    if fs::create_dir_all(log_dir).is_err() {
        return None;
    }
    let path = log_dir.join("daybook.log");
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .ok()?;

    Some(path)
}
