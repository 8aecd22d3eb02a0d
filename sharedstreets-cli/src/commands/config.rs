//! Configuration management CLI commands.
//!
//! Provides `config path`, `config init` and `config show`.

use clap::Subcommand;

use sharedstreets::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::{load_config, GlobalArgs};

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Write a default config.ini if none exists
    Init,

    /// Print the effective settings, after command-line overrides
    Show,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, global: &GlobalArgs) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            let path = global.config.clone().unwrap_or_else(config_file_path);
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Init => run_init(global),
        ConfigCommands::Show => run_show(global),
    }
}

fn run_init(global: &GlobalArgs) -> Result<(), CliError> {
    let path = match &global.config {
        Some(path) if path.exists() => path.clone(),
        Some(path) => {
            ConfigFile::default().save_to(path)?;
            path.clone()
        }
        None => ConfigFile::ensure_exists()?,
    };
    println!("Configuration file: {}", path.display());
    Ok(())
}

fn run_show(global: &GlobalArgs) -> Result<(), CliError> {
    let config = load_config(global)?;
    let source = config.to_source_config()?;

    println!("[source]");
    println!("url_template = {}", source.url_template());
    println!("reference_zoom = {}", source.reference_zoom());
    println!("fetch_timeout = {}", source.fetch_timeout().as_secs());
    println!("request_timeout = {}", source.request_timeout().as_secs());
    println!("max_concurrent_tiles = {}", source.max_concurrent_tiles());
    println!("max_covering_tiles = {}", source.max_covering_tiles());
    println!();
    println!("[logging]");
    println!("file = {}", config.logging.file.display());
    Ok(())
}
