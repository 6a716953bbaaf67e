//! Start command - run the map shell against a location backend.
//!
//! Resolves settings from CLI arguments and config, builds the selected
//! backend, and hands off to the TUI shell (or the headless position log
//! when stdout is not a terminal).

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use waymark::coord::CoordSpan;
use waymark::location::{
    LocationBackend, Route, RouteBackend, RouteConfig, UdpFeedBackend, UdpFeedConfig,
};

use super::common::{resolve_backend, resolve_span, BackendType};
use crate::error::CliError;
use crate::runner::CliRunner;
use crate::tui_app::{self, ShellConfig};

/// Arguments for the start command.
pub struct StartArgs {
    pub backend: Option<BackendType>,
    pub bind: Option<String>,
    pub route: Option<PathBuf>,
    pub span: Option<f64>,
    pub no_animate: bool,
    pub headless: bool,
}

/// Run the start command.
pub fn run(args: StartArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("start");
    let config = runner.config();

    // Resolve settings: CLI arguments win over config values
    let backend_type = resolve_backend(args.backend, config);
    let span_deg = resolve_span(args.span, config);
    if !span_deg.is_finite() || span_deg <= 0.0 {
        return Err(CliError::Config(format!(
            "Invalid span: {} (must be a positive number of degrees)",
            span_deg
        )));
    }
    let animate = !args.no_animate && config.map.animate;

    let backend = build_backend(backend_type, &args, config)?;

    println!("Waymark v{}", waymark::VERSION);
    println!("==============");
    println!();
    println!("Backend: {}", backend.name());
    println!("Span:    {} deg", span_deg);
    println!();

    // Signal handler for graceful shutdown
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    // The location pipeline spawns onto the application runtime
    let _guard = runner.handle().enter();

    let shell_config = ShellConfig {
        backend,
        span: CoordSpan::square(span_deg),
        animate,
        shutdown,
    };

    if args.headless || !atty::is(atty::Stream::Stdout) {
        tui_app::run_headless(shell_config)?;
    } else {
        tui_app::run_tui(shell_config)?;
    }

    println!("Stopped.");
    Ok(())
}

fn build_backend(
    backend_type: BackendType,
    args: &StartArgs,
    config: &waymark::config::ConfigFile,
) -> Result<Box<dyn LocationBackend>, CliError> {
    match backend_type {
        BackendType::Udp => {
            let bind_addr = args
                .bind
                .clone()
                .unwrap_or_else(|| config.location.udp_bind.clone());
            tracing::info!(%bind_addr, "using udp feed backend");
            Ok(Box::new(UdpFeedBackend::new(UdpFeedConfig {
                bind_addr,
                enabled: config.location.enabled,
            })))
        }
        BackendType::Demo => {
            let route = match args.route.as_ref().or(config.route.file.as_ref()) {
                Some(path) => Route::from_file(path).map_err(|e| CliError::Config(e.to_string()))?,
                None => Route::default_walk(),
            };
            tracing::info!(route = %route.name, "using demo route backend");
            let route_config = RouteConfig::default()
                .with_interval(Duration::from_millis(config.route.interval_ms))
                .with_loop(config.route.loop_route);
            Ok(Box::new(RouteBackend::new(route, route_config)))
        }
    }
}
