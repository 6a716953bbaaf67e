//! Waymark CLI - command-line interface for the live position map.

mod commands;
mod error;
mod runner;
mod tui_app;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::BackendType;
use commands::config::ConfigCommands;
use commands::start::StartArgs;

#[derive(Parser)]
#[command(name = "waymark")]
#[command(version)]
#[command(about = "A live map that follows your position", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the map shell
    Start {
        /// Location backend to follow
        #[arg(long, value_enum)]
        backend: Option<BackendType>,

        /// Bind address for the UDP position feed (e.g. 0.0.0.0:49002)
        #[arg(long)]
        bind: Option<String>,

        /// Route file for the demo backend
        #[arg(long)]
        route: Option<PathBuf>,

        /// Span of the displayed region in degrees
        #[arg(long)]
        span: Option<f64>,

        /// Jump to new positions instead of animating
        #[arg(long)]
        no_animate: bool,

        /// Log positions to stdout instead of drawing the map
        #[arg(long)]
        headless: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Create the configuration file with default settings
    Init,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Start {
            backend,
            bind,
            route,
            span,
            no_animate,
            headless,
        } => commands::start::run(StartArgs {
            backend,
            bind,
            route,
            span,
            no_animate,
            headless,
        }),
        Commands::Config { command } => commands::config::run(command),
        Commands::Init => commands::init::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
