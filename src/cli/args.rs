//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// Output format of read-only commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    Json,
    Yaml,
}

/// Arguments for the derive command
#[derive(Args, Debug)]
pub struct DeriveArgs {
    /// Project file, or a directory searched recursively for .hkt files
    pub path: PathBuf,

    /// Video duration in seconds (default: video_duration from the project)
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Write the result here instead of updating the project in place
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Recalculate and report without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the official command
#[derive(Args, Debug)]
pub struct OfficialArgs {
    /// Project file
    pub path: PathBuf,

    /// Raw video time (HH:MM:SS.s, MM:SS.s, or seconds)
    #[arg(short, long)]
    pub time: String,
}

/// Arguments for the summary command
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Project file
    pub path: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the report command
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Project file
    pub path: PathBuf,

    /// Team display name as stored in the project
    #[arg(long)]
    pub team: String,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
