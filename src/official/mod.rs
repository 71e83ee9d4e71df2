//! Raw video time to official game-clock mapping
//!
//! Clean play of each period is stretched or compressed so that a regulation
//! period lasts exactly the configured target. Stoppages and the gaps between
//! periods have no official time at all.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TimelineConfig;
use crate::domain::model::{of_kind, Interval, IntervalKind};
use crate::utils::time::round_tenth;

/// One clean-play interval placed on the official clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSegment {
    pub global_start: f64,
    pub global_end: f64,
    /// Official time accumulated before this segment
    pub official_start: f64,
    /// Scaled length on the official clock
    pub duration: f64,
    /// Coefficient of the owning period
    pub coefficient: f64,
}

impl MapSegment {
    pub fn contains(&self, time: f64) -> bool {
        self.global_start <= time && time <= self.global_end
    }

    /// Unrounded official time of a raw instant inside this segment
    pub fn project(&self, time: f64) -> f64 {
        self.official_start + (time - self.global_start) / self.coefficient
    }
}

/// Scaling information of one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodInfo {
    pub name: String,
    pub start_sec: f64,
    pub end_sec: f64,
    pub total_clean_duration: f64,
    pub target_duration: f64,
    /// Raw clean seconds per official second
    pub coefficient: f64,
}

impl PeriodInfo {
    fn contains(&self, time: f64) -> bool {
        self.start_sec <= time && time <= self.end_sec
    }
}

/// Piecewise-linear map from raw time onto the official clock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfficialTimeMap {
    periods: Vec<PeriodInfo>,
    segments: Vec<MapSegment>,
}

impl OfficialTimeMap {
    /// Build with the default timeline settings
    pub fn build(intervals: &[Interval]) -> Self {
        Self::build_with(intervals, &TimelineConfig::default())
    }

    pub fn build_with(intervals: &[Interval], config: &TimelineConfig) -> Self {
        let periods: Vec<&Interval> = of_kind(intervals, IntervalKind::Period).collect();
        let clean_play: Vec<&Interval> = of_kind(intervals, IntervalKind::CleanPlay).collect();

        let mut clean_by_period = vec![0.0f64; periods.len()];
        for clean in &clean_play {
            if let Some(index) = periods
                .iter()
                .position(|period| period.contains_span(clean.start_time, clean.end_time))
            {
                clean_by_period[index] += clean.duration();
            }
        }

        let period_infos: Vec<PeriodInfo> = periods
            .iter()
            .zip(clean_by_period)
            .map(|(period, total_clean_duration)| {
                let target_duration = if config.is_overtime(&period.name) {
                    total_clean_duration
                } else {
                    config.period_target_secs
                };
                let coefficient = if target_duration > 0.0 {
                    total_clean_duration / target_duration
                } else {
                    1.0
                };
                PeriodInfo {
                    name: period.name.clone(),
                    start_sec: period.start_time,
                    end_sec: period.end_time,
                    total_clean_duration,
                    target_duration,
                    coefficient,
                }
            })
            .collect();

        let mut sorted = clean_play;
        sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let mut segments = Vec::with_capacity(sorted.len());
        let mut running = 0.0;
        for clean in sorted {
            let Some(period) = period_infos.iter().find(|p| p.contains(clean.start_time)) else {
                warn!(
                    start = clean.start_time,
                    end = clean.end_time,
                    "Clean play outside every period, skipped"
                );
                continue;
            };
            let duration = clean.duration() / period.coefficient;
            segments.push(MapSegment {
                global_start: clean.start_time,
                global_end: clean.end_time,
                official_start: running,
                duration,
                coefficient: period.coefficient,
            });
            running += duration;
        }

        debug!(
            periods = period_infos.len(),
            segments = segments.len(),
            official_total = running,
            "Official time map built"
        );

        Self {
            periods: period_infos,
            segments,
        }
    }

    /// Official time of a raw instant, `None` outside clean play
    pub fn to_official(&self, time: f64) -> Option<f64> {
        self.segments
            .iter()
            .find(|segment| segment.contains(time))
            .map(|segment| round_tenth(segment.project(time)))
    }

    pub fn periods(&self) -> &[PeriodInfo] {
        &self.periods
    }

    pub fn segments(&self) -> &[MapSegment] {
        &self.segments
    }

    /// First period whose closed span contains the raw instant
    pub fn period_for(&self, time: f64) -> Option<&PeriodInfo> {
        self.periods.iter().find(|period| period.contains(time))
    }

    pub fn total_official_duration(&self) -> f64 {
        self.segments.iter().map(|segment| segment.duration).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests;
