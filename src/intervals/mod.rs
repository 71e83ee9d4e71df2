//! Interval derivation from operator labels
//!
//! Every run regenerates the full interval set from the current labels.
//! Derivation never fails: labels that cannot take part in an interval are
//! logged and skipped.

use tracing::{debug, info};

use crate::config::TimelineConfig;
use crate::domain::model::{kind, of_kind, Interval, IntervalKind, Label};

mod penalties;
mod periods;
mod score;

/// Name of the interval spanning the whole recording
pub const WHOLE_VIDEO_NAME: &str = "Whole video";

/// Derive intervals with the default timeline settings
pub fn derive(labels: &[Label], total_duration: f64) -> Vec<Interval> {
    derive_with(labels, total_duration, &TimelineConfig::default())
}

/// Derive the complete interval set.
///
/// Output order: whole video, penalties, periods, clean play, score,
/// numeric strength.
pub fn derive_with(labels: &[Label], total_duration: f64, config: &TimelineConfig) -> Vec<Interval> {
    let whole = Interval::new(WHOLE_VIDEO_NAME, IntervalKind::WholeVideo, 0.0, total_duration);

    let penalties = penalties::penalty_intervals(labels);
    let periods = periods::period_intervals(labels, config);
    let stoppages = periods::stoppages_by_period(labels, &periods);
    let clean_play = periods::clean_play_intervals(&periods, &stoppages);
    let scores = score::score_intervals(labels, &periods, config);
    let strength = penalties::numeric_strength_intervals(&periods, &penalties, config);

    debug!(
        penalties = penalties.len(),
        periods = periods.len(),
        stoppages = stoppages.iter().map(Vec::len).sum::<usize>(),
        clean_play = clean_play.len(),
        scores = scores.len(),
        strength = strength.len(),
        "Derivation steps finished"
    );

    let mut intervals = Vec::with_capacity(
        1 + penalties.len() + periods.len() + clean_play.len() + scores.len() + strength.len(),
    );
    intervals.push(whole);
    intervals.extend(penalties);
    intervals.extend(periods);
    intervals.extend(clean_play);
    intervals.extend(scores);
    intervals.extend(strength);

    info!("Derived {} intervals from {} labels", intervals.len(), labels.len());
    intervals
}

/// Re-tag Stoppage and ShiftChange labels with the name of the first period
/// whose closed span contains them. Labels outside every period lose their tag.
pub fn tag_periods(labels: &mut [Label], intervals: &[Interval]) {
    let periods: Vec<&Interval> = of_kind(intervals, IntervalKind::Period).collect();
    let mut tagged = 0usize;

    for label in labels
        .iter_mut()
        .filter(|label| matches!(label.kind_name(), kind::STOPPAGE | kind::SHIFT_CHANGE))
    {
        label.period_name = periods
            .iter()
            .find(|period| period.contains(label.time))
            .map(|period| period.name.clone());
        if label.period_name.is_some() {
            tagged += 1;
        }
    }

    debug!("Tagged {} labels with their period", tagged);
}

/// Sort by time and pair consecutive labels; an unmatched trailing label is dropped
fn sorted_pairs<'a>(mut labels: Vec<&'a Label>, what: &str) -> Vec<(&'a Label, &'a Label)> {
    labels.sort_by(|a, b| a.time.total_cmp(&b.time));
    if labels.len() % 2 == 1 {
        if let Some(last) = labels.last() {
            debug!(label_id = %last.id, time = last.time, "Unpaired trailing {} label ignored", what);
        }
    }
    labels
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}
