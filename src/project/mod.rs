//! Project document persistence and recalculation

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::TimelineConfig;
use crate::domain::model::{of_kind, Interval, IntervalKind, Label, RosterPlayer, ShiftMap};
use crate::error::{RinkError, RinkResult};
use crate::intervals::{derive_with, tag_periods};
use crate::official::OfficialTimeMap;
use crate::shifts::{reconstruct_official, reconstruct_raw};

/// Document format version written by this crate
pub const PROJECT_VERSION: &str = "4.0";

/// Extension of project documents picked up by directory walks
pub const PROJECT_EXTENSION: &str = "hkt";

fn default_version() -> String {
    PROJECT_VERSION.to_string()
}

/// Top-level project document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub video_path: Option<String>,
    /// Video length in seconds, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(rename = "match", default)]
    pub match_data: Match,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            version: default_version(),
            video_path: None,
            video_duration: None,
            saved_at: None,
            match_data: Match::default(),
        }
    }
}

/// Labels, rosters and derived state of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub match_id: Option<String>,
    /// Team key -> display name
    #[serde(default)]
    pub teams: BTreeMap<String, Value>,
    #[serde(default)]
    pub rosters: BTreeMap<String, Vec<RosterPlayer>>,
    #[serde(default)]
    pub generic_labels: Vec<Label>,
    #[serde(default)]
    pub calculated_ranges: Vec<Interval>,
    #[serde(default)]
    pub player_shifts: ShiftMap,
    #[serde(default)]
    pub player_shifts_official_timer: ShiftMap,
    /// Protocol events from the league feed, kept verbatim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Value>,
}

impl Default for Match {
    fn default() -> Self {
        Self {
            match_id: Some(Uuid::new_v4().to_string()),
            teams: BTreeMap::new(),
            rosters: BTreeMap::new(),
            generic_labels: Vec::new(),
            calculated_ranges: Vec::new(),
            player_shifts: ShiftMap::new(),
            player_shifts_official_timer: ShiftMap::new(),
            events: Vec::new(),
        }
    }
}

/// Counts reported after a recalculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecalcSummary {
    pub intervals: usize,
    pub periods: usize,
    pub clean_play: usize,
    pub players: usize,
    pub raw_shifts: usize,
    pub official_shifts: usize,
    pub official_duration: f64,
}

fn count_shifts(shifts: &ShiftMap) -> usize {
    shifts.values().map(|info| info.shifts.len()).sum()
}

impl Match {
    /// Rebuild all derived state from the labels.
    ///
    /// The new state is assembled completely before it replaces the old one.
    pub fn recalculate(&mut self, total_duration: f64, config: &TimelineConfig) -> RecalcSummary {
        let intervals = derive_with(&self.generic_labels, total_duration, config);

        let mut labels = self.generic_labels.clone();
        tag_periods(&mut labels, &intervals);

        let map = OfficialTimeMap::build_with(&intervals, config);
        let raw = reconstruct_raw(&labels, &intervals, total_duration);
        let official = reconstruct_official(&raw, &map);

        let summary = RecalcSummary {
            intervals: intervals.len(),
            periods: of_kind(&intervals, IntervalKind::Period).count(),
            clean_play: of_kind(&intervals, IntervalKind::CleanPlay).count(),
            players: raw.len(),
            raw_shifts: count_shifts(&raw),
            official_shifts: count_shifts(&official),
            official_duration: map.total_official_duration(),
        };

        self.generic_labels = labels;
        self.calculated_ranges = intervals;
        self.player_shifts = raw;
        self.player_shifts_official_timer = official;

        info!(
            periods = summary.periods,
            players = summary.players,
            "Recalculated {} intervals",
            summary.intervals
        );
        summary
    }

    /// Official time map of the stored intervals
    pub fn official_time_map(&self, config: &TimelineConfig) -> OfficialTimeMap {
        OfficialTimeMap::build_with(&self.calculated_ranges, config)
    }

    pub fn to_official(&self, time: f64, config: &TimelineConfig) -> Option<f64> {
        self.official_time_map(config).to_official(time)
    }

    pub fn team_name(&self, team_key: &str) -> Option<&str> {
        self.teams.get(team_key).and_then(Value::as_str)
    }

    /// Key of the team with the given display name
    pub fn team_key_by_name(&self, name: &str) -> Option<&str> {
        self.teams
            .iter()
            .find(|(_, value)| value.as_str() == Some(name))
            .map(|(key, _)| key.as_str())
    }
}

impl Project {
    pub fn new(video_path: impl Into<String>) -> Self {
        Self {
            video_path: Some(video_path.into()),
            ..Self::default()
        }
    }

    /// Load a project document
    pub fn load(path: &Path) -> RinkResult<Self> {
        if !path.exists() {
            return Err(RinkError::ProjectNotFound {
                path: path.display().to_string(),
            });
        }

        let reader = BufReader::new(File::open(path)?);
        let project: Project =
            serde_json::from_reader(reader).map_err(|e| RinkError::InvalidProject {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        debug!(
            labels = project.match_data.generic_labels.len(),
            version = %project.version,
            "Loaded project from {}",
            path.display()
        );
        Ok(project)
    }

    /// Save as pretty JSON through a temporary file in the target directory
    pub fn save(&mut self, path: &Path) -> RinkResult<()> {
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !directory.exists() {
            std::fs::create_dir_all(directory)?;
        }

        self.saved_at = Some(Utc::now());

        let mut temp = tempfile::NamedTempFile::new_in(directory)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, &*self)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.persist(path).map_err(|e| e.error)?;

        info!("Saved project to {}", path.display());
        Ok(())
    }

    /// Duration from an explicit value or the document
    pub fn resolve_duration(&self, explicit: Option<f64>) -> RinkResult<f64> {
        explicit
            .or(self.video_duration)
            .ok_or(RinkError::MissingDuration)
    }
}

/// Whether the path carries the project document extension
pub fn is_project_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION))
        .unwrap_or(false)
}
