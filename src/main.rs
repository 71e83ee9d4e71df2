//! RinkClock command-line driver
//!
//! Loads a hockey annotation project, derives intervals, the official game
//! clock and player shifts, and writes the result back.
//!
//! # Usage
//!
//! ```bash
//! rinkclock derive game.hkt --duration 4210.5
//! rinkclock official game.hkt --time 05:00
//! rinkclock summary game.hkt --format json
//! rinkclock report game.hkt --team "Sokol"
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use rinkclock::cli::{commands, Cli, Commands};
use rinkclock::config::initialize_configuration;
use rinkclock::utils::logging::init_logging;

/// Main entry point for the RinkClock CLI application
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = initialize_configuration(cli.config.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;
    init_logging(&config.logging);

    info!("Starting RinkClock");
    debug!(?config, "Effective configuration");

    match cli.command {
        Commands::Derive(args) => commands::derive(args, &config)?,
        Commands::Official(args) => commands::official(args, &config)?,
        Commands::Summary(args) => commands::summary(args, &config)?,
        Commands::Report(args) => commands::report(args, &config)?,
    }

    info!("RinkClock completed successfully");
    Ok(())
}
