//! Running game score per period

use tracing::warn;

use crate::config::TimelineConfig;
use crate::domain::model::{Interval, IntervalKind, Label, LabelKind, TeamSide};

struct Goal<'a> {
    id: &'a str,
    time: f64,
    team: &'a str,
}

fn score_name(home: u32, away: u32) -> String {
    format!("{}:{}", home, away)
}

/// Split each period at its goals; the score carries over between periods
pub(super) fn score_intervals(labels: &[Label], periods: &[Interval], config: &TimelineConfig) -> Vec<Interval> {
    let mut goals: Vec<Goal> = labels
        .iter()
        .filter_map(|label| match &label.kind {
            LabelKind::Goal(context) => match context.team.as_deref() {
                Some(team) => Some(Goal {
                    id: &label.id,
                    time: label.time,
                    team,
                }),
                None => {
                    warn!(label_id = %label.id, "Goal label without team ignored");
                    None
                }
            },
            _ => None,
        })
        .collect();
    goals.sort_by(|a, b| a.time.total_cmp(&b.time));

    let (mut home, mut away) = (0u32, 0u32);
    let mut intervals = Vec::new();

    for period in periods {
        let mut previous = period.start_time;
        let mut previous_goal: Option<&str> = None;

        for goal in goals.iter().filter(|goal| period.contains(goal.time)) {
            if goal.time > previous {
                let sources = previous_goal.into_iter().chain([goal.id]).map(str::to_owned).collect();
                intervals.push(
                    Interval::new(score_name(home, away), IntervalKind::Score, previous, goal.time)
                        .with_sources(sources),
                );
            }

            match config.side_of(goal.team) {
                Some(TeamSide::Home) => home += 1,
                Some(TeamSide::Away) => away += 1,
                None => warn!(label_id = goal.id, team = goal.team, "Goal for unknown team not counted"),
            }
            previous = goal.time;
            previous_goal = Some(goal.id);
        }

        if period.end_time > previous {
            let sources = previous_goal.into_iter().map(str::to_owned).collect();
            intervals.push(
                Interval::new(score_name(home, away), IntervalKind::Score, previous, period.end_time)
                    .with_sources(sources),
            );
        }
    }
    intervals
}
