//! Tracing setup for the roster binary.
//!
//! Events go to stdout and are appended to a log file (`logs/student-roster.log` unless
//! `ROSTER_LOG_FILE` says otherwise). A file that cannot be opened only disables the file layer.
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Log file used when no override is configured.
pub const DEFAULT_LOG_PATH: &str = "logs/student-roster.log";

/// Install the global subscriber: `RUST_LOG` filter (default `info`), compact stdout, and the
/// file layer when the log file is writable.
pub fn init_tracing(log_file: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    let path = resolve_log_path(log_file);
    match open_log_file(&path) {
        Ok(file) => {
            registry.with(file_layer(file)).init();
        }
        Err(err) => {
            registry.init();
            tracing::warn!(path = %path.display(), error = %err, "File logging disabled");
        }
    }
}

fn file_layer<S>(file: File) -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let writer: NonBlocking = {
        let (writer, guard) = tracing_appender::non_blocking(file);
        let _ = LOG_GUARD.set(guard);
        writer
    };
    fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .compact()
}

fn resolve_log_path(log_file: Option<&Path>) -> PathBuf {
    log_file.map_or_else(|| PathBuf::from(DEFAULT_LOG_PATH), Path::to_path_buf)
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
