//! Shared bootstrap for CLI commands.
//!
//! Every command that needs the full application (configuration, logging,
//! async runtime) goes through [`CliRunner`] so startup behaves the same
//! everywhere.

use tokio::runtime::Handle;

use waymark::app::WaymarkApp;
use waymark::config::ConfigFile;

use crate::error::CliError;

/// Loaded configuration plus a started application.
pub struct CliRunner {
    config: ConfigFile,
    app: WaymarkApp,
}

impl CliRunner {
    /// Load configuration and start the application.
    ///
    /// A missing or unreadable config file falls back to defaults so the
    /// CLI stays usable on a fresh machine.
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load().unwrap_or_default();
        let app = WaymarkApp::start(&config)?;
        Ok(Self { config, app })
    }

    /// Record which command is running, with the version for log correlation.
    pub fn log_startup(&self, command: &str) {
        tracing::info!(command, version = waymark::VERSION, "command invoked");
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Handle to the application runtime.
    pub fn handle(&self) -> &Handle {
        self.app.handle()
    }
}
