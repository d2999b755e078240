//! Library log file.
//!
//! The terminal belongs to the render loop, so `tracing` output goes to a
//! per-run file through a non-blocking writer. When the file cannot be
//! created, output is discarded rather than written over the UI.

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "chatline_app=info,chatline_tui=info";
const DEBUG_FILTER: &str = "chatline_app=debug,chatline_tui=debug";

/// Installed log sink. Keep alive until exit so buffered lines are flushed.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    _guard: WorkerGuard,
}

impl LogFile {
    /// Path the log was meant to be written to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Install the global subscriber writing to `chatline_<name>_<unix-secs>.log`.
///
/// `RUST_LOG` overrides the default filter.
pub fn init(name: &str, dir: Option<&Path>, debug: bool) -> LogFile {
    let started = chrono::Utc::now().timestamp();
    let path = dir.unwrap_or_else(|| Path::new(".")).join(file_name(name, started));

    let (writer, guard) = match File::create(&path) {
        Ok(file) => tracing_appender::non_blocking(file),
        Err(_) => tracing_appender::non_blocking(io::sink()),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { DEBUG_FILTER } else { DEFAULT_FILTER }));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(false))
        .try_init();
    // An earlier subscriber keeps receiving events; this file stays empty
    if let Err(e) = installed {
        tracing::warn!(error = %e, path = %path.display(), "log subscriber already installed");
    }

    LogFile { path, _guard: guard }
}

/// Log file name for `name`, keeping only file-name-safe characters.
fn file_name(name: &str, started: i64) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("chatline_{safe}_{started}.log")
}
