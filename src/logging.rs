//! Log file setup
//!
//! The terminal is owned by the UI, so tracing output goes to a file: the one
//! given on the command line, or `cityweather.log` in the cache directory.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "cityweather=info";

/// Log file name inside the cache directory
const LOG_FILE_NAME: &str = "cityweather.log";

/// Returns the default log location (`~/.cache/cityweather/cityweather.log` on Linux)
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "cityweather")?;
    Some(project_dirs.cache_dir().join(LOG_FILE_NAME))
}

/// Opens a log file for appending, creating parent directories as needed
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global tracing subscriber writing to a file.
///
/// Returns the path being logged to, or `None` when no file could be opened
/// or a subscriber was already installed. Logging is then simply off.
pub fn init(log_file: Option<&Path>) -> Option<PathBuf> {
    let path = log_file.map(Path::to_path_buf).or_else(default_log_path)?;
    let file = open_log_file(&path).ok()?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .ok()?;

    tracing::info!(path = %path.display(), "cityweather v{} starting", env!("CARGO_PKG_VERSION"));
    Some(path)
}
