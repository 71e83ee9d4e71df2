//! Player shift reconstruction from on-ice snapshots

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::domain::model::{
    of_kind, Interval, IntervalKind, Label, LabelKind, PlayerRef, PlayerShift, PlayerShiftInfo,
    ShiftMap,
};

mod official;

pub use official::reconstruct_official;

/// ShiftChange snapshots sorted by time. An empty `players_on_ice` means
/// nobody is on the ice; a list with only unreadable entries is skipped.
fn snapshots(labels: &[Label]) -> Vec<(&Label, Vec<&PlayerRef>)> {
    let mut snapshots: Vec<(&Label, Vec<&PlayerRef>)> = labels
        .iter()
        .filter_map(|label| {
            let LabelKind::ShiftChange(context) = &label.kind else {
                return None;
            };
            for entry in context.malformed() {
                warn!(label_id = %label.id, entry = %entry, "Unreadable on-ice entry ignored");
            }
            let players: Vec<&PlayerRef> = context.valid_players().collect();
            if players.is_empty() && !context.players_on_ice.is_empty() {
                warn!(label_id = %label.id, "ShiftChange without readable players skipped");
                return None;
            }
            Some((label, players))
        })
        .collect();
    snapshots.sort_by(|a, b| a.0.time.total_cmp(&b.0.time));
    snapshots
}

fn close_shift(info: &mut PlayerShiftInfo, start_time: f64, end_time: f64) {
    let number = info.shifts.len() as u32 + 1;
    info.shifts.push(PlayerShift {
        number,
        start_time,
        end_time,
    });
}

/// Rebuild raw-time shifts by diffing consecutive on-ice snapshots.
///
/// A player still on ice after the last snapshot leaves at the end of the
/// period containing the entry, or at `total_duration` outside every period.
pub fn reconstruct_raw(labels: &[Label], intervals: &[Interval], total_duration: f64) -> ShiftMap {
    let periods: Vec<&Interval> = of_kind(intervals, IntervalKind::Period).collect();

    let mut shifts = ShiftMap::new();
    let mut on_ice: BTreeMap<&str, &str> = BTreeMap::new();
    let mut entry_times: BTreeMap<&str, f64> = BTreeMap::new();

    for (label, players) in snapshots(labels) {
        let mut after: BTreeMap<&str, &str> = BTreeMap::new();
        for player in players {
            after.entry(player.id.as_str()).or_insert(player.name.as_str());
        }

        for player_id in on_ice.keys().filter(|id| !after.contains_key(*id)) {
            match entry_times.remove(player_id) {
                Some(entry) => {
                    let info = shifts
                        .entry(player_id.to_string())
                        .or_insert_with(|| PlayerShiftInfo::new(*player_id, "Unknown Player"));
                    close_shift(info, entry, label.time);
                }
                None => warn!(
                    player_id = *player_id,
                    label_id = %label.id,
                    "Player left the ice without a recorded entry"
                ),
            }
        }

        for (player_id, name) in after.iter().filter(|(id, _)| !on_ice.contains_key(*id)) {
            entry_times.insert(*player_id, label.time);
            shifts
                .entry(player_id.to_string())
                .or_insert_with(|| PlayerShiftInfo::new(*player_id, *name));
        }

        on_ice = after;
    }

    for (player_id, entry) in entry_times {
        let end_time = match periods.iter().find(|period| period.contains(entry)) {
            Some(period) => period.end_time,
            None => {
                warn!(player_id, entry, "Open shift outside every period, closed at video end");
                total_duration
            }
        };
        let info = shifts
            .entry(player_id.to_string())
            .or_insert_with(|| PlayerShiftInfo::new(player_id, "Unknown Player"));
        close_shift(info, entry, end_time);
    }

    info!(
        "Reconstructed {} shifts for {} players",
        shifts.values().map(|info| info.shifts.len()).sum::<usize>(),
        shifts.len()
    );
    shifts
}
