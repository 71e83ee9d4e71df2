// Unit tests for report data extraction

use super::*;
use crate::domain::model::{Label, PenaltyContext, PlayerShiftInfo};
use serde_json::json;

fn roster_player(id: Option<&str>, number: &str, name: &str, role: &str, group: &str, position: &str) -> RosterPlayer {
    RosterPlayer {
        id: id.map(str::to_string),
        name: name.to_string(),
        number: number.to_string(),
        role: role.to_string(),
        lineup_group: group.to_string(),
        lineup_position: position.to_string(),
        extra: Context::new(),
    }
}

fn sample_match() -> Match {
    let mut game = Match::default();
    game.teams.insert("f-team".to_string(), json!("Sokol"));
    game.teams.insert("s-team".to_string(), json!("Molot"));
    game.rosters.insert(
        "f-team".to_string(),
        vec![
            roster_player(Some("rd"), "5", "Orlov Denis", "Defender", "Pair 1", "Right"),
            roster_player(Some("rw"), "19", "Belov Roman", "Forward", "Line 1", "Right wing"),
            roster_player(Some("x"), "99", "Reserve Player", "Forward", "", ""),
            roster_player(Some("c"), "10", "Ivanov Petr", "Forward", "Line 1", "Center"),
            roster_player(None, "0", "Ghost", "Forward", "", ""),
            roster_player(Some("g"), "30", "Petrov Ivan", "Goalie", "", ""),
            roster_player(Some("ld"), "4", "Lebedev Oleg", "Defender", "Pair 1", "Left"),
            roster_player(Some("lw"), "17", "Volkov Anton", "Forward", "Line 1", "Left wing"),
        ],
    );
    game.generic_labels = vec![
        Label::segment(0.0),
        Label::segment(1200.0),
        Label::shift_change(
            0.0,
            &[
                ("g", "Petrov Ivan"),
                ("c", "Ivanov Petr"),
                ("lw", "Volkov Anton"),
                ("rw", "Belov Roman"),
                ("ld", "Lebedev Oleg"),
                ("rd", "Orlov Denis"),
            ],
        ),
        Label::penalty(100.0, PenaltyContext::new("f-team", "c", "Ivanov Petr", "Hooking")),
        Label::penalty(220.0, PenaltyContext::new("f-team", "c", "Ivanov Petr", "Hooking")),
        Label::penalty(300.0, PenaltyContext::new("s-team", "z", "Other Guy", "Tripping")),
        Label::penalty(420.0, PenaltyContext::new("s-team", "z", "Other Guy", "Tripping")),
        Label::goal(500.0, "s-team"),
    ];
    game.recalculate(1200.0, &TimelineConfig::default());
    game
}

#[test]
fn test_short_name() {
    assert_eq!(short_name("Petrov Ivan"), "Petrov I.");
    assert_eq!(short_name("Арнаут Иван"), "Арнаут И.");
    assert_eq!(short_name("Pele"), "Pele");
}

#[test]
fn test_extract_orders_players() {
    let report = ReportData::extract(&sample_match(), "Sokol", &TimelineConfig::default()).unwrap();

    assert_eq!(report.team_key, "f-team");
    let order: Vec<&str> = report.players.iter().map(|p| p.player_id.as_str()).collect();
    assert_eq!(order, vec!["g", "c", "lw", "rw", "ld", "rd", "x"]);
    assert_eq!(report.players[0].name, "Petrov I.");
    assert!(report.players[6].shifts.is_empty());
}

#[test]
fn test_extract_periods_goals_and_penalties() {
    let report = ReportData::extract(&sample_match(), "Sokol", &TimelineConfig::default()).unwrap();

    assert_eq!(report.periods.len(), 1);
    assert_eq!(report.periods[0].official_start, 0.0);
    assert_eq!(report.periods[0].official_end, 1200.0);

    assert_eq!(report.goals.len(), 1);
    assert_eq!(report.goals[0].official_time, 500.0);
    assert_eq!(report.goals[0].team.as_deref(), Some("s-team"));

    // Only this team's penalties
    assert_eq!(report.penalties.len(), 1);
    let penalty = &report.penalties[0];
    assert_eq!((penalty.official_start, penalty.official_end), (100.0, 220.0));
    assert_eq!(penalty.player_id, "c");
}

#[test]
fn test_extract_errors() {
    let game = sample_match();
    let config = TimelineConfig::default();

    assert!(matches!(
        ReportData::extract(&game, "Nobody", &config),
        Err(RinkError::TeamNotFound { .. })
    ));
    assert!(matches!(
        ReportData::extract(&game, "Molot", &config),
        Err(RinkError::RosterMissing { .. })
    ));

    let mut no_shifts = game.clone();
    no_shifts.player_shifts_official_timer.clear();
    assert!(matches!(
        ReportData::extract(&no_shifts, "Sokol", &config),
        Err(RinkError::NoShifts { .. })
    ));
}

#[test]
fn test_jersey_number_breaks_ties() {
    let player = |id: &str, number: &str| ReportPlayer {
        player_id: id.to_string(),
        number: number.to_string(),
        name: id.to_string(),
        role: "Forward".to_string(),
        lineup_group: String::new(),
        lineup_position: String::new(),
        shifts: vec![PlayerShift { number: 1, start_time: 10.0, end_time: 20.0 }],
    };
    let mut players = vec![player("a", "A1"), player("b", "12"), player("c", "7")];
    players.sort_by(compare_players);
    let order: Vec<&str> = players.iter().map(|p| p.player_id.as_str()).collect();
    assert_eq!(order, vec!["c", "b", "a"]);
}

#[test]
fn test_ice_time_summary() {
    let mut shifts = ShiftMap::new();
    let mut a = PlayerShiftInfo::new("a", "Alpha");
    a.shifts.push(PlayerShift { number: 1, start_time: 0.0, end_time: 30.0 });
    a.shifts.push(PlayerShift { number: 2, start_time: 60.0, end_time: 90.0 });
    let mut b = PlayerShiftInfo::new("b", "Bravo");
    b.shifts.push(PlayerShift { number: 1, start_time: 0.0, end_time: 100.0 });
    shifts.insert("a".to_string(), a);
    shifts.insert("b".to_string(), b);
    shifts.insert("c".to_string(), PlayerShiftInfo::new("c", "Charlie"));

    let summary = ice_time_summary(&shifts);
    let order: Vec<&str> = summary.iter().map(|s| s.player_id.as_str()).collect();
    assert_eq!(order, vec!["b", "a", "c"]);
    assert_eq!(summary[1].shift_count, 2);
    assert_eq!(summary[1].average_secs, 30.0);
    assert_eq!(summary[2].average_secs, 0.0);
}
