//! Configuration hierarchy: CLI > environment > file > defaults

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::model::TeamSide;
use crate::error::{RinkError, RinkResult};
use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};

/// Files probed, in order, when no explicit config path is given
pub const DEFAULT_CONFIG_PATHS: &[&str] = &["rinkclock.toml", "config/rinkclock.toml"];

/// Tunables of the derivation engine and the official-time mapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Nominal clean-play length of a regulation period, in seconds
    pub period_target_secs: f64,
    /// Skaters per side at even strength, goalie excluded
    pub skaters_per_side: u32,
    /// Period names containing this marker are not rescaled
    pub overtime_marker: String,
    /// When set, periods numbered above this are named as overtime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulation_periods: Option<u32>,
    pub home_team_key: String,
    pub away_team_key: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            period_target_secs: 1200.0,
            skaters_per_side: 5,
            overtime_marker: "Overtime".to_string(),
            regulation_periods: None,
            home_team_key: "f-team".to_string(),
            away_team_key: "s-team".to_string(),
        }
    }
}

impl TimelineConfig {
    /// Resolve a team key from a label context
    pub fn side_of(&self, team_key: &str) -> Option<TeamSide> {
        if team_key == self.home_team_key {
            Some(TeamSide::Home)
        } else if team_key == self.away_team_key {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    pub fn team_key(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::Home => &self.home_team_key,
            TeamSide::Away => &self.away_team_key,
        }
    }

    pub fn is_overtime(&self, period_name: &str) -> bool {
        !self.overtime_marker.is_empty() && period_name.contains(&self.overtime_marker)
    }

    /// Display name of the period with the given 1-based number
    pub fn period_name(&self, number: usize) -> String {
        match self.regulation_periods {
            Some(regulation) if number > regulation as usize => {
                format!("Period {} ({})", number, self.overtime_marker)
            }
            _ => format!("Period {}", number),
        }
    }

    pub fn validate(&self) -> RinkResult<()> {
        if !(self.period_target_secs.is_finite() && self.period_target_secs > 0.0) {
            return Err(invalid("timeline.period_target_secs", "must be a positive number"));
        }
        if self.skaters_per_side == 0 {
            return Err(invalid("timeline.skaters_per_side", "must be at least 1"));
        }
        if self.overtime_marker.trim().is_empty() {
            return Err(invalid("timeline.overtime_marker", "must not be empty"));
        }
        if self.home_team_key.is_empty() || self.home_team_key == self.away_team_key {
            return Err(invalid("timeline.home_team_key", "team keys must be distinct and non-empty"));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> RinkError {
    RinkError::InvalidConfig {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub timeline: TimelineConfig,
    pub logging: LoggingConfig,
}

/// Values given on the command line; they win over everything else
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

impl AppConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> RinkResult<Self> {
        toml::from_str(content).map_err(|e| RinkError::ConfigParse {
            message: e.to_string(),
        })
    }

    pub fn to_toml_string(&self) -> RinkResult<String> {
        toml::to_string_pretty(self).map_err(|e| RinkError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML file
    pub fn load_file(path: &Path) -> RinkResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Explicit path must exist; otherwise the default locations are probed
    /// and missing files fall back to defaults.
    pub fn discover(explicit: Option<&Path>) -> RinkResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(RinkError::ConfigParse {
                    message: format!("Config file does not exist: {}", path.display()),
                });
            }
            return Self::load_file(path);
        }

        for candidate in DEFAULT_CONFIG_PATHS {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_file(path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Apply `RINKCLOCK_*` environment overrides
    pub fn apply_env(&mut self) -> RinkResult<usize> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup; returns how many applied
    pub fn apply_env_from<F>(&mut self, lookup: F) -> RinkResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        if let Some(value) = lookup("RINKCLOCK_LOG_LEVEL") {
            self.logging.level = LogLevel::parse(&value)?;
            applied += 1;
        }
        if let Some(value) = lookup("RINKCLOCK_LOG_FORMAT") {
            self.logging.format = LogFormat::parse(&value)?;
            applied += 1;
        }
        if let Some(value) = lookup("RINKCLOCK_PERIOD_TARGET_SECS") {
            self.timeline.period_target_secs = value
                .trim()
                .parse()
                .map_err(|_| invalid("timeline.period_target_secs", "not a number"))?;
            applied += 1;
        }
        if let Some(value) = lookup("RINKCLOCK_SKATERS_PER_SIDE") {
            self.timeline.skaters_per_side = value
                .trim()
                .parse()
                .map_err(|_| invalid("timeline.skaters_per_side", "not a whole number"))?;
            applied += 1;
        }
        if let Some(value) = lookup("RINKCLOCK_OVERTIME_MARKER") {
            self.timeline.overtime_marker = value;
            applied += 1;
        }
        if let Some(value) = lookup("RINKCLOCK_REGULATION_PERIODS") {
            self.timeline.regulation_periods = Some(
                value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("timeline.regulation_periods", "not a whole number"))?,
            );
            applied += 1;
        }

        if applied > 0 {
            info!("Applied {} environment variable overrides", applied);
        }
        Ok(applied)
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> RinkResult<()> {
        if let Some(level) = &overrides.log_level {
            self.logging.level = LogLevel::parse(level)?;
        }
        if let Some(format) = &overrides.log_format {
            self.logging.format = LogFormat::parse(format)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> RinkResult<()> {
        self.timeline.validate()
    }
}

/// Build the effective configuration following the precedence chain
pub fn initialize_configuration(
    explicit_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> RinkResult<AppConfig> {
    let mut config = AppConfig::discover(explicit_path)?;
    config.apply_env()?;
    config.apply_overrides(overrides)?;
    config.validate()?;
    Ok(config)
}
