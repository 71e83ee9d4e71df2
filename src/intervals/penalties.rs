//! Penalty intervals and numeric-strength windows

use tracing::warn;

use super::sorted_pairs;
use crate::config::TimelineConfig;
use crate::domain::model::{
    ActivePenalty, Interval, IntervalContext, IntervalKind, Label, LabelKind, PenaltyContext,
    TeamSide,
};

impl From<&PenaltyContext> for ActivePenalty {
    fn from(context: &PenaltyContext) -> Self {
        let or = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };
        ActivePenalty {
            team: or(&context.team, "unknown"),
            player_name: or(&context.player_name, "Unknown Player"),
            player_id: or(&context.player_id, "unknown_id"),
            violation_type: or(&context.violation_type, "Unknown Violation"),
        }
    }
}

/// Pair Penalty labels that share an identical context
pub(super) fn penalty_intervals(labels: &[Label]) -> Vec<Interval> {
    let mut groups: Vec<(&PenaltyContext, Vec<&Label>)> = Vec::new();

    for label in labels {
        let LabelKind::Penalty(context) = &label.kind else {
            continue;
        };
        if context.is_empty() {
            warn!(label_id = %label.id, "Penalty label without context ignored");
            continue;
        }
        match groups.iter_mut().find(|(key, _)| *key == context) {
            Some((_, members)) => members.push(label),
            None => groups.push((context, vec![label])),
        }
    }

    let mut intervals = Vec::new();
    for (context, members) in groups {
        for (start, end) in sorted_pairs(members, "Penalty") {
            if end.time <= start.time {
                warn!(start_id = %start.id, end_id = %end.id, "Penalty pair has no duration, skipped");
                continue;
            }
            let name = format!(
                "Penalty {} ({})",
                context.player_name.as_deref().unwrap_or("Unknown"),
                context.violation_type.as_deref().unwrap_or("Unknown"),
            );
            intervals.push(
                Interval::new(name, IntervalKind::Penalty, start.time, end.time)
                    .with_sources(vec![start.id.clone(), end.id.clone()])
                    .with_context(IntervalContext::Penalty(context.clone())),
            );
        }
    }
    intervals
}

enum EventKind {
    Start,
    End,
    Boundary,
}

struct StrengthEvent<'a> {
    time: f64,
    kind: EventKind,
    penalty: Option<&'a Interval>,
}

/// Partition every period into windows of constant on-ice strength
pub(super) fn numeric_strength_intervals(
    periods: &[Interval],
    penalties: &[Interval],
    config: &TimelineConfig,
) -> Vec<Interval> {
    let mut intervals = Vec::new();

    for period in periods {
        let (start, end) = (period.start_time, period.end_time);

        let mut events = Vec::new();
        for penalty in penalties.iter().filter(|p| p.overlaps(start, end)) {
            events.push(StrengthEvent {
                time: penalty.start_time.max(start),
                kind: EventKind::Start,
                penalty: Some(penalty),
            });
            events.push(StrengthEvent {
                time: penalty.end_time.min(end),
                kind: EventKind::End,
                penalty: Some(penalty),
            });
        }
        for time in [start, end] {
            events.push(StrengthEvent {
                time,
                kind: EventKind::Boundary,
                penalty: None,
            });
        }
        events.sort_by(|a, b| a.time.total_cmp(&b.time));

        // Activation order is kept; removal is by interval id
        let mut active: Vec<&Interval> = Vec::new();
        let mut current = start;
        for event in events {
            if event.time > current {
                intervals.push(strength_window(current, event.time, &active, config));
            }
            match (event.kind, event.penalty) {
                (EventKind::Start, Some(penalty)) => active.push(penalty),
                (EventKind::End, Some(penalty)) => active.retain(|p| p.id != penalty.id),
                _ => {}
            }
            current = event.time;
        }
    }
    intervals
}

fn strength_window(start: f64, end: f64, active: &[&Interval], config: &TimelineConfig) -> Interval {
    let active_penalties: Vec<ActivePenalty> = active
        .iter()
        .filter_map(|interval| interval.penalty_context())
        .map(ActivePenalty::from)
        .collect();

    let count = |side: TeamSide| {
        let key = config.team_key(side);
        active_penalties.iter().filter(|p| p.team == key).count() as i64
    };
    let skaters = config.skaters_per_side as i64;
    let name = format!(
        "{} на {}",
        skaters - count(TeamSide::Home),
        skaters - count(TeamSide::Away)
    );

    Interval::new(name, IntervalKind::NumericStrength, start, end)
        .with_context(IntervalContext::Strength { active_penalties })
}
