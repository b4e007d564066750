//! Tracing setup for redpen.
//!
//! The terminal belongs to the TUI (stderr) and to the exported document
//! (stdout), so log events go to a file through a non-blocking appender. The
//! returned guard must live until exit or buffered lines are lost.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::xdg_dir;

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV: &str = "REDPEN_LOG";

const DEFAULT_FILTER: &str = "redpen=info,redpen_core=info";

/// Default log location: `$XDG_STATE_HOME/redpen/redpen.log`.
pub fn default_log_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state").join("redpen").join("redpen.log")
}

/// Installs the global subscriber writing to `path`.
///
/// # Errors
///
/// Returns `Err` if the log directory cannot be created.
pub fn init(path: &Path) -> std::io::Result<WorkerGuard> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path.file_name().unwrap_or("redpen.log".as_ref());
    std::fs::create_dir_all(dir)?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(guard)
}
