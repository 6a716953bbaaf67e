//! Application bootstrap implementation.
//!
//! `WaymarkApp` owns the pieces every frontend needs before any location
//! work can start: the file logging subscriber and the Tokio runtime the
//! location pipeline runs on. Command handlers create one and then build
//! sources and binders against its runtime handle.

use tokio::runtime::{Handle, Runtime};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use super::error::AppError;
use crate::config::ConfigFile;
use crate::log::init_file_logging;
use crate::VERSION;

/// Shared application bootstrap.
///
/// The runtime lives as long as the app instance, so tasks spawned on
/// [`handle`](Self::handle) keep running until the instance is dropped.
pub struct WaymarkApp {
    runtime: Runtime,

    /// Keeps buffered log lines flowing to disk until shutdown.
    _log_guard: Option<WorkerGuard>,
}

impl WaymarkApp {
    /// Start the application: install file logging, then create the runtime.
    pub fn start(config: &ConfigFile) -> Result<Self, AppError> {
        let log_guard = init_file_logging(&config.log.level)?;
        let app = Self::with_log_guard(Some(log_guard))?;
        info!(version = VERSION, "application started");
        Ok(app)
    }

    /// Start without touching the global log subscriber.
    ///
    /// For hosts that install their own subscriber before handing control
    /// over.
    pub fn start_without_logging() -> Result<Self, AppError> {
        Self::with_log_guard(None)
    }

    fn with_log_guard(log_guard: Option<WorkerGuard>) -> Result<Self, AppError> {
        let runtime = Runtime::new().map_err(|e| AppError::RuntimeCreation(e.to_string()))?;
        Ok(Self {
            runtime,
            _log_guard: log_guard,
        })
    }

    /// Handle to the application runtime.
    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }

    /// Run a future to completion on the application runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_provides_a_working_runtime() {
        let app = WaymarkApp::start_without_logging().unwrap();

        let value = app.block_on(async { 41 + 1 });
        assert_eq!(value, 42);
    }

    #[test]
    fn test_handle_supports_spawning() {
        let app = WaymarkApp::start_without_logging().unwrap();

        let task = app.handle().spawn(async { "done" });
        assert_eq!(app.block_on(task).unwrap(), "done");
    }
}
