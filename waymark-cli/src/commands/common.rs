//! Shared helpers for CLI commands.

use clap::ValueEnum;

use waymark::config::ConfigFile;

/// Location backend selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendType {
    /// UDP feed of XGPS position sentences (default)
    Udp,
    /// Built-in route replay, no external feed required
    Demo,
}

impl BackendType {
    /// Parse a backend name from a config file value.
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "udp" => Some(BackendType::Udp),
            "demo" => Some(BackendType::Demo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::Udp => "udp",
            BackendType::Demo => "demo",
        }
    }
}

/// Resolve the backend to use: CLI flag wins, then config, then UDP.
pub fn resolve_backend(cli_backend: Option<BackendType>, config: &ConfigFile) -> BackendType {
    if let Some(backend) = cli_backend {
        return backend;
    }
    match BackendType::from_config_str(&config.location.backend) {
        Some(backend) => backend,
        None => {
            tracing::warn!(
                configured = %config.location.backend,
                "unknown backend in config, falling back to udp"
            );
            BackendType::Udp
        }
    }
}

/// Resolve the region span in degrees: CLI flag wins, then config.
pub fn resolve_span(cli_span: Option<f64>, config: &ConfigFile) -> f64 {
    cli_span.unwrap_or(config.map.span_deg)
}
