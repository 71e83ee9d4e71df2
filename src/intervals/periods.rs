//! Periods, stoppages and clean-play segments

use tracing::warn;

use super::sorted_pairs;
use crate::config::TimelineConfig;
use crate::domain::model::{Interval, IntervalKind, Label, LabelKind};

/// Stoppage inside a period; never part of the output
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Stoppage {
    pub start_time: f64,
    pub end_time: f64,
}

pub(super) fn period_intervals(labels: &[Label], config: &TimelineConfig) -> Vec<Interval> {
    let segments = labels
        .iter()
        .filter(|label| matches!(label.kind, LabelKind::Segment(_)))
        .collect();

    let mut periods = Vec::new();
    for (start, end) in sorted_pairs(segments, "Segment") {
        if end.time <= start.time {
            warn!(
                start_id = %start.id,
                end_id = %end.id,
                "Segment pair has no duration, skipped"
            );
            continue;
        }
        let name = config.period_name(periods.len() + 1);
        periods.push(
            Interval::new(name, IntervalKind::Period, start.time, end.time)
                .with_sources(vec![start.id.clone(), end.id.clone()]),
        );
    }
    periods
}

/// Stoppages grouped by owning period, index-aligned with `periods`
pub(super) fn stoppages_by_period(labels: &[Label], periods: &[Interval]) -> Vec<Vec<Stoppage>> {
    let mut grouped: Vec<Vec<Stoppage>> = vec![Vec::new(); periods.len()];
    if periods.is_empty() {
        return grouped;
    }

    let stoppages = labels
        .iter()
        .filter(|label| matches!(label.kind, LabelKind::Stoppage(_)))
        .collect();

    for (start, end) in sorted_pairs(stoppages, "Stoppage") {
        if end.time <= start.time {
            warn!(
                start_id = %start.id,
                end_id = %end.id,
                "Stoppage pair has no duration, skipped"
            );
            continue;
        }
        match periods
            .iter()
            .position(|period| period.contains_span(start.time, end.time))
        {
            Some(index) => grouped[index].push(Stoppage {
                start_time: start.time,
                end_time: end.time,
            }),
            None => warn!(
                start = start.time,
                end = end.time,
                "Stoppage is not inside a single period, ignored"
            ),
        }
    }
    grouped
}

/// Subtract each period's stoppages from its span
pub(super) fn clean_play_intervals(periods: &[Interval], stoppages: &[Vec<Stoppage>]) -> Vec<Interval> {
    let mut clean_play = Vec::new();

    for (period, period_stoppages) in periods.iter().zip(stoppages) {
        let mut sorted: Vec<&Stoppage> = period_stoppages.iter().collect();
        sorted.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let mut remainders = Vec::new();
        let mut current_start = period.start_time;
        for stoppage in sorted {
            if stoppage.start_time > current_start {
                remainders.push((current_start, stoppage.start_time));
            }
            current_start = current_start.max(stoppage.end_time);
        }
        if current_start < period.end_time {
            remainders.push((current_start, period.end_time));
        }

        for (number, (start, end)) in remainders.into_iter().enumerate() {
            clean_play.push(
                Interval::new(
                    format!("{}. CleanPlay #{}", period.name, number + 1),
                    IntervalKind::CleanPlay,
                    start,
                    end,
                )
                .with_sources(period.source_label_ids.clone()),
            );
        }
    }
    clean_play
}
