//! Report data in official time
//!
//! Collects the tables a team report renderer consumes. Rendering itself is
//! left to the caller.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::TimelineConfig;
use crate::domain::model::{
    of_kind, Context, IntervalKind, LabelKind, PlayerShift, RosterPlayer, ShiftMap,
};
use crate::error::{RinkError, RinkResult};
use crate::project::Match;

/// Roster player with official-time shifts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPlayer {
    pub player_id: String,
    pub number: String,
    /// "Surname I." form
    pub name: String,
    pub role: String,
    pub lineup_group: String,
    pub lineup_position: String,
    pub shifts: Vec<PlayerShift>,
}

impl ReportPlayer {
    pub fn is_goalie(&self) -> bool {
        is_goalie_role(&self.role)
    }

    pub fn first_shift_start(&self) -> Option<f64> {
        self.shifts.first().map(|shift| shift.start_time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPeriod {
    pub name: String,
    pub official_start: f64,
    pub official_end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportGoal {
    pub official_time: f64,
    pub team: Option<String>,
    /// Remaining goal details such as scorer and assists
    pub details: Context,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPenalty {
    pub official_start: f64,
    pub official_end: f64,
    pub player_name: String,
    pub player_id: String,
    pub violation_type: String,
}

/// Everything a team report needs, in official time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportData {
    pub team_key: String,
    pub team_name: String,
    pub players: Vec<ReportPlayer>,
    pub periods: Vec<ReportPeriod>,
    pub goals: Vec<ReportGoal>,
    pub penalties: Vec<ReportPenalty>,
}

fn is_goalie_role(role: &str) -> bool {
    let role = role.trim().to_lowercase();
    role.starts_with("goal") || role.starts_with("вратарь")
}

/// "Ivanov Petr" -> "Ivanov P."; single-word names are kept as is
pub fn short_name(full_name: &str) -> String {
    match full_name.split_once(' ') {
        Some((surname, rest)) => match rest.trim_start().chars().next() {
            Some(initial) => format!("{} {}.", surname, initial),
            None => surname.to_string(),
        },
        None => full_name.to_string(),
    }
}

/// Ordering within equal first-shift times: C, LW, RW, then LD, RD
fn position_priority(player: &ReportPlayer) -> u32 {
    let group = player.lineup_group.to_lowercase();
    let position = player.lineup_position.to_lowercase();

    let forward_line = group.contains("тро") || group.contains("line") || group.contains("trio");
    let defence_pair = group.contains("пар") || group.contains("pair");

    let center = position.contains("центр") || position.contains("center") || position == "ц" || position == "c";
    let left = position.contains("лев") || position.contains("left");
    let right = position.contains("прав") || position.contains("right");

    if forward_line {
        if center {
            0
        } else if left {
            1
        } else if right {
            2
        } else {
            999
        }
    } else if defence_pair {
        if left {
            3
        } else if right {
            4
        } else {
            999
        }
    } else {
        999
    }
}

fn compare_players(a: &ReportPlayer, b: &ReportPlayer) -> Ordering {
    let first_shift = |p: &ReportPlayer| p.first_shift_start().unwrap_or(f64::INFINITY);
    let position = |p: &ReportPlayer| if p.is_goalie() { 999 } else { position_priority(p) };
    let number = |p: &ReportPlayer| {
        let parsed = p.number.trim().parse::<u32>().ok();
        (parsed.is_none(), parsed.unwrap_or(0))
    };

    b.is_goalie()
        .cmp(&a.is_goalie())
        .then_with(|| first_shift(a).total_cmp(&first_shift(b)))
        .then_with(|| position(a).cmp(&position(b)))
        .then_with(|| number(a).cmp(&number(b)))
}

impl ReportData {
    /// Extract report data for the team with the given display name
    pub fn extract(game: &Match, team_name: &str, config: &TimelineConfig) -> RinkResult<Self> {
        let team_key = game
            .team_key_by_name(team_name)
            .ok_or_else(|| RinkError::TeamNotFound {
                team: team_name.to_string(),
            })?
            .to_string();

        let players = Self::roster_players(game, &team_key)?;
        let map = game.official_time_map(config);

        let mut periods: Vec<_> = of_kind(&game.calculated_ranges, IntervalKind::Period).collect();
        periods.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        let periods: Vec<ReportPeriod> = periods
            .into_iter()
            .filter_map(|period| {
                match (map.to_official(period.start_time), map.to_official(period.end_time)) {
                    (Some(official_start), Some(official_end)) => Some(ReportPeriod {
                        name: period.name.clone(),
                        official_start,
                        official_end,
                    }),
                    _ => {
                        warn!(period = %period.name, "Period bounds are not in clean play, skipped");
                        None
                    }
                }
            })
            .collect();

        let mut goals: Vec<ReportGoal> = game
            .generic_labels
            .iter()
            .filter_map(|label| {
                let LabelKind::Goal(context) = &label.kind else {
                    return None;
                };
                match map.to_official(label.time) {
                    Some(official_time) => Some(ReportGoal {
                        official_time,
                        team: context.team.clone(),
                        details: context.extra.clone(),
                    }),
                    None => {
                        warn!(label_id = %label.id, "Goal outside clean play, skipped");
                        None
                    }
                }
            })
            .collect();
        goals.sort_by(|a, b| a.official_time.total_cmp(&b.official_time));

        let mut penalties = Vec::new();
        for window in of_kind(&game.calculated_ranges, IntervalKind::NumericStrength) {
            for active in window.active_penalties().iter().filter(|p| p.team == team_key) {
                match (map.to_official(window.start_time), map.to_official(window.end_time)) {
                    (Some(official_start), Some(official_end)) => penalties.push(ReportPenalty {
                        official_start,
                        official_end,
                        player_name: active.player_name.clone(),
                        player_id: active.player_id.clone(),
                        violation_type: active.violation_type.clone(),
                    }),
                    _ => warn!(
                        player_id = %active.player_id,
                        "Penalty window outside clean play, skipped"
                    ),
                }
            }
        }
        penalties.sort_by(|a, b| a.official_start.total_cmp(&b.official_start));

        let players = Self::attach_shifts(players, &game.player_shifts_official_timer, &team_key)?;

        debug!(
            players = players.len(),
            periods = periods.len(),
            goals = goals.len(),
            penalties = penalties.len(),
            "Report data extracted for {}",
            team_key
        );

        Ok(Self {
            team_key,
            team_name: team_name.to_string(),
            players,
            periods,
            goals,
            penalties,
        })
    }

    fn roster_players(game: &Match, team_key: &str) -> RinkResult<Vec<ReportPlayer>> {
        let roster: &[RosterPlayer] = game.rosters.get(team_key).map(Vec::as_slice).unwrap_or(&[]);

        let players: Vec<ReportPlayer> = roster
            .iter()
            .filter_map(|entry| match entry.id.as_deref().filter(|id| !id.is_empty()) {
                Some(id) => Some(ReportPlayer {
                    player_id: id.to_string(),
                    number: entry.number.clone(),
                    name: short_name(&entry.name),
                    role: entry.role.clone(),
                    lineup_group: entry.lineup_group.clone(),
                    lineup_position: entry.lineup_position.clone(),
                    shifts: Vec::new(),
                }),
                None => {
                    warn!(team_key, name = %entry.name, "Roster entry without id skipped");
                    None
                }
            })
            .collect();

        if players.is_empty() {
            return Err(RinkError::RosterMissing {
                team_key: team_key.to_string(),
            });
        }
        Ok(players)
    }

    fn attach_shifts(
        mut players: Vec<ReportPlayer>,
        official: &ShiftMap,
        team_key: &str,
    ) -> RinkResult<Vec<ReportPlayer>> {
        for player in &mut players {
            if let Some(info) = official.get(&player.player_id) {
                player.shifts = info.shifts.clone();
                player
                    .shifts
                    .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
            }
        }

        if players.iter().all(|player| player.shifts.is_empty()) {
            return Err(RinkError::NoShifts {
                team_key: team_key.to_string(),
            });
        }

        players.sort_by(compare_players);
        Ok(players)
    }
}

/// Official time on ice of one player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IceTime {
    pub player_id: String,
    pub name: String,
    pub shift_count: usize,
    pub total_secs: f64,
    pub average_secs: f64,
}

/// Per-player time on ice, longest first
pub fn ice_time_summary(shifts: &ShiftMap) -> Vec<IceTime> {
    let mut summary: Vec<IceTime> = shifts
        .values()
        .map(|info| {
            let total_secs = info.total_time();
            let shift_count = info.shifts.len();
            IceTime {
                player_id: info.player_id.clone(),
                name: info.name.clone(),
                shift_count,
                total_secs,
                average_secs: if shift_count > 0 {
                    total_secs / shift_count as f64
                } else {
                    0.0
                },
            }
        })
        .collect();
    summary.sort_by(|a, b| b.total_secs.total_cmp(&a.total_secs));
    summary
}

#[cfg(test)]
mod tests;
