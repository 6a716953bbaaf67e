//! Init command - create the configuration file.

use std::io::{self, Write};
use std::path::Path;

use waymark::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();

    if path.exists() && !confirm_overwrite(&path) {
        println!("Keeping existing configuration.");
        return Ok(());
    }

    ConfigFile::default().save()?;

    println!("Configuration file created:");
    println!("  {}", path.display());
    println!();
    println!("Edit this file to customize Waymark settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

fn confirm_overwrite(path: &Path) -> bool {
    println!("Configuration already exists:");
    println!("  {}", path.display());
    println!();
    print!("Overwrite with defaults? [y/N]: ");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
