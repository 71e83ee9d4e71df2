//! CLI module for RinkClock
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ConfigOverrides;

pub mod args;
pub mod commands;

/// RinkClock
///
/// Derives periods, clean playing time, score and numeric-strength windows
/// from annotated hockey footage, and maps raw video time onto the official
/// game clock.
#[derive(Parser, Debug)]
#[command(name = "rinkclock")]
#[command(about = "RinkClock - official game clock and player shifts from annotated hockey video")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "RINKCLOCK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Command-line values that override file and environment configuration
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recalculate intervals and shifts of one project or a directory of projects
    Derive(args::DeriveArgs),
    /// Convert a raw video time to the official game clock
    Official(args::OfficialArgs),
    /// Show periods and official time on ice
    Summary(args::SummaryArgs),
    /// Extract team report data
    Report(args::ReportArgs),
}
