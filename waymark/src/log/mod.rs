//! File logging setup.
//!
//! The interactive shell owns the terminal, so log output goes to a daily
//! rolling file under the platform state directory instead of stderr. The
//! `RUST_LOG` environment variable overrides the configured level.

use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::EnvFilter;

/// Errors from setting up logging.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("log directory error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to install log subscriber: {0}")]
    Init(String),
}

/// Directory the log files are written to.
pub fn log_file_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("waymark")
}

/// Install the global subscriber writing to a daily rolling log file.
///
/// Returns a guard that flushes buffered log lines; drop it only on
/// shutdown. Timestamps use the local offset when it can be determined at
/// startup and UTC otherwise.
pub fn init_file_logging(level: &str) -> Result<WorkerGuard, LogError> {
    let dir = log_file_dir();
    std::fs::create_dir_all(&dir)?;

    let appender = tracing_appender::rolling::daily(&dir, "waymark.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let init_result = match OffsetTime::local_rfc_3339() {
        Ok(timer) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .with_timer(timer)
            .try_init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .try_init(),
    };
    init_result.map_err(|e| LogError::Init(e.to_string()))?;

    Ok(guard)
}
