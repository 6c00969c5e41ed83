//! Configuration management CLI commands.

use clap::Subcommand;
use jobmill::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init { force } => run_init(force),
    }
}

fn run_show() -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let path = config_file_path();

    println!("Configuration ({})", path.display());
    if !path.exists() {
        println!("  (file not found, showing defaults)");
    }
    println!();
    println!("[manager]");
    println!("  max_workers           = {}", config.manager.max_workers);
    println!(
        "  dedicated_max_workers = {}",
        config.manager.dedicated_max_workers
    );
    println!(
        "  idle_timeout_secs     = {}",
        config.manager.idle_timeout_secs
    );
    println!();
    println!("[logging]");
    println!("  directory = {}", config.logging.directory.display());
    println!("  file      = {}", config.logging.file);
    Ok(())
}

fn run_init(force: bool) -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() && !force {
        println!("Config file already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    if force {
        ConfigFile::default().save_to(&path)?;
    } else {
        ConfigFile::ensure_exists()?;
    }
    println!("Wrote default config to {}", path.display());
    Ok(())
}
