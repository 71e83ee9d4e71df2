//! Shifts projected onto the official clock

use tracing::warn;

use crate::domain::model::{PlayerShift, PlayerShiftInfo, ShiftMap};
use crate::official::OfficialTimeMap;

/// Map every shift onto the official clock. Shifts with an endpoint outside
/// clean play are dropped; every player is kept.
pub fn reconstruct_official(raw: &ShiftMap, map: &OfficialTimeMap) -> ShiftMap {
    raw.iter()
        .map(|(player_id, info)| {
            let mut official = PlayerShiftInfo::new(info.player_id.as_str(), info.name.as_str());
            for shift in &info.shifts {
                match (map.to_official(shift.start_time), map.to_official(shift.end_time)) {
                    (Some(start_time), Some(end_time)) => official.shifts.push(PlayerShift {
                        number: shift.number,
                        start_time,
                        end_time,
                    }),
                    _ => warn!(
                        player_id = %player_id,
                        shift = shift.number,
                        start = shift.start_time,
                        end = shift.end_time,
                        "Shift boundary outside clean play, not mapped"
                    ),
                }
            }
            (player_id.clone(), official)
        })
        .collect()
}
