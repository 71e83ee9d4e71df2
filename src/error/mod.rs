//! Error handling module for RinkClock
//!
//! The derivation engine itself never fails on malformed labels; these errors
//! cover the outer layers: project files, configuration and report extraction.

use thiserror::Error;

/// Main error type for RinkClock operations
#[derive(Error, Debug)]
pub enum RinkError {
    /// Project file not found or inaccessible
    #[error("Project file not found: {path}")]
    ProjectNotFound { path: String },

    /// Project file exists but its content is unusable
    #[error("Invalid project file {path}: {message}")]
    InvalidProject { path: String, message: String },

    /// Video duration is required for derivation but was not supplied
    #[error("Video duration is unknown: pass --duration or set video_duration in the project")]
    MissingDuration,

    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS.s, MM:SS.s, or seconds")]
    InvalidTimeFormat { time: String },

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    /// Configuration value out of range
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    /// Requested team is not part of the match
    #[error("Team not found in project: {team}")]
    TeamNotFound { team: String },

    /// Team has no usable roster
    #[error("Roster for team {team_key} is missing or has no players with an id")]
    RosterMissing { team_key: String },

    /// No roster player has an official-time shift
    #[error("No official-time shifts found for players of team {team_key}")]
    NoShifts { team_key: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for RinkClock operations
pub type RinkResult<T> = std::result::Result<T, RinkError>;
