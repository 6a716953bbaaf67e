//! Config command - inspect and edit configuration settings.

use clap::Subcommand;

use waymark::config::{config_file_path, ConfigFile, ConfigKey};

use crate::error::CliError;

/// Subcommands for config management.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., "location.backend")
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "location.backend")
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
    /// Show the configuration file path
    Path,
}

/// Run the config command.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key),
        ConfigCommands::Set { key, value } => run_set(&key, &value),
        ConfigCommands::List => run_list(),
        ConfigCommands::Path => run_path(),
    }
}

fn run_get(key: &str) -> Result<(), CliError> {
    let config_key: ConfigKey = key.parse()?;
    let config = ConfigFile::load().unwrap_or_default();

    let value = config_key.get(&config);
    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }
    Ok(())
}

fn run_set(key: &str, value: &str) -> Result<(), CliError> {
    let config_key: ConfigKey = key.parse()?;
    let mut config = ConfigFile::load().unwrap_or_default();

    config_key.set(&mut config, value)?;
    config.save()?;

    println!("Set {} = {}", config_key.name(), value);
    Ok(())
}

fn run_list() -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();

    let mut current_section = "";
    for key in ConfigKey::all() {
        if key.section() != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", key.section());
            current_section = key.section();
        }

        let value = config_key_display(key, &config);
        println!("  {} = {}", key.key_name(), value);
    }
    Ok(())
}

fn config_key_display(key: &ConfigKey, config: &ConfigFile) -> String {
    let value = key.get(config);
    if value.is_empty() {
        "(not set)".to_string()
    } else {
        value
    }
}

fn run_path() -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() {
        println!("{}", path.display());
    } else {
        println!("{} (not created yet)", path.display());
    }
    Ok(())
}
