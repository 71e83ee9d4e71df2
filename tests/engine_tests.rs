//! Integration tests for the derivation engine, the official clock and shifts

use rinkclock::domain::model::{of_kind, Interval, IntervalKind, Label, PenaltyContext};
use rinkclock::intervals::{derive, derive_with};
use rinkclock::official::OfficialTimeMap;
use rinkclock::shifts::{reconstruct_official, reconstruct_raw};
use rinkclock::TimelineConfig;

const EPS: f64 = 1e-9;
const DURATION: f64 = 5400.0;

// Test utilities

fn penalty(time: f64, team: &str, id: &str, name: &str) -> Label {
    Label::penalty(time, PenaltyContext::new(team, id, name, "Slashing"))
}

/// Three periods with stoppages, penalties, goals and rotating lines
fn game_labels() -> Vec<Label> {
    let mut labels = Vec::new();
    for time in [100.0, 1700.0, 1900.0, 3500.0, 3700.0, 5300.0] {
        labels.push(Label::segment(time));
    }
    for time in [
        400.0, 460.0, 900.0, 990.0, 1650.0, 1750.0, 2200.0, 2300.0, 4000.0, 4030.0, 4500.0, 4600.0,
    ] {
        labels.push(Label::stoppage(time));
    }
    labels.extend([
        penalty(500.0, "f-team", "7", "Seven"),
        penalty(640.0, "f-team", "7", "Seven"),
        penalty(2250.0, "s-team", "21", "Twenty-one"),
        penalty(2400.0, "s-team", "21", "Twenty-one"),
        penalty(3400.0, "f-team", "8", "Eight"),
        penalty(3800.0, "f-team", "8", "Eight"),
    ]);
    labels.extend([
        Label::goal(700.0, "f-team"),
        Label::goal(2500.0, "s-team"),
        Label::goal(4100.0, "s-team"),
    ]);

    let lines: [&[(&str, &str)]; 2] = [
        &[("1", "One"), ("2", "Two"), ("3", "Three")],
        &[("4", "Four"), ("5", "Five"), ("6", "Six")],
    ];
    let mut time = 100.0;
    let mut line = 0;
    while time < 5300.0 {
        labels.push(Label::shift_change(time, lines[line % 2]));
        time += 45.0;
        line += 1;
    }
    labels
}

fn periods(intervals: &[Interval]) -> Vec<&Interval> {
    of_kind(intervals, IntervalKind::Period).collect()
}

#[test]
fn test_whole_video_is_first_and_unique() {
    let intervals = derive(&game_labels(), DURATION);
    assert_eq!(intervals[0].kind, IntervalKind::WholeVideo);
    assert_eq!(intervals[0].start_time, 0.0);
    assert_eq!(intervals[0].end_time, DURATION);
    assert_eq!(of_kind(&intervals, IntervalKind::WholeVideo).count(), 1);
}

#[test]
fn test_pairing_law() {
    let intervals = derive(&game_labels(), DURATION);
    let periods = periods(&intervals);
    assert_eq!(periods.len(), 3);
    for pair in periods.windows(2) {
        assert!(pair[0].end_time <= pair[1].start_time);
    }
    for (index, period) in periods.iter().enumerate() {
        assert_eq!(period.name, format!("Period {}", index + 1));
        assert!(period.end_time > period.start_time);
    }

    let penalties: Vec<&Interval> = of_kind(&intervals, IntervalKind::Penalty).collect();
    assert_eq!(penalties.len(), 3);
    assert!(penalties.iter().all(|p| p.end_time > p.start_time));
}

#[test]
fn test_clean_play_partition_law() {
    let intervals = derive(&game_labels(), DURATION);
    let clean: Vec<&Interval> = of_kind(&intervals, IntervalKind::CleanPlay).collect();

    for period in periods(&intervals) {
        let inside: Vec<&&Interval> = clean
            .iter()
            .filter(|c| period.contains_span(c.start_time, c.end_time))
            .collect();
        assert!(!inside.is_empty());
        for pair in inside.windows(2) {
            assert!(pair[0].end_time <= pair[1].start_time);
        }
        assert!(inside.iter().all(|c| c.name.starts_with(&period.name)));
    }
    // Every clean play interval belongs to exactly one period
    for c in &clean {
        let owners = periods(&intervals)
            .iter()
            .filter(|p| p.contains_span(c.start_time, c.end_time))
            .count();
        assert_eq!(owners, 1);
    }

    // Period 1 loses its two stoppages; the straddling one is ignored
    let first: f64 = clean
        .iter()
        .filter(|c| c.name.starts_with("Period 1."))
        .map(|c| c.duration())
        .sum();
    assert!((first - (1600.0 - 60.0 - 90.0)).abs() < EPS);
}

#[test]
fn test_numeric_strength_partition_law() {
    let intervals = derive(&game_labels(), DURATION);
    let windows: Vec<&Interval> = of_kind(&intervals, IntervalKind::NumericStrength).collect();

    for period in periods(&intervals) {
        let inside: Vec<&&Interval> = windows
            .iter()
            .filter(|w| period.contains_span(w.start_time, w.end_time))
            .collect();
        assert_eq!(inside.first().map(|w| w.start_time), Some(period.start_time));
        assert_eq!(inside.last().map(|w| w.end_time), Some(period.end_time));
        for pair in inside.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
        let covered: f64 = inside.iter().map(|w| w.duration()).sum();
        assert!((covered - period.duration()).abs() < EPS);
    }

    // Penalty crossing into the intermission continues in period 3
    let third_start: Vec<&str> = windows
        .iter()
        .filter(|w| w.start_time == 3700.0)
        .map(|w| w.name.as_str())
        .collect();
    assert_eq!(third_start, vec!["4 на 5"]);
}

#[test]
fn test_score_stays_within_periods() {
    let intervals = derive(&game_labels(), DURATION);
    let periods = periods(&intervals);
    let scores: Vec<&Interval> = of_kind(&intervals, IntervalKind::Score).collect();
    for score in &scores {
        assert!(periods
            .iter()
            .any(|p| p.contains_span(score.start_time, score.end_time)));
    }
    assert_eq!(scores.last().map(|s| s.name.as_str()), Some("1:2"));
}

#[test]
fn test_mapping_monotonicity_and_totality() {
    let intervals = derive(&game_labels(), DURATION);
    let map = OfficialTimeMap::build(&intervals);

    let mut previous = f64::NEG_INFINITY;
    let mut time = 0.0;
    while time <= DURATION {
        if let Some(official) = map.to_official(time) {
            assert!(official >= previous, "official clock went backwards at {}", time);
            previous = official;
        }
        time += 7.3;
    }

    for clean in of_kind(&intervals, IntervalKind::CleanPlay) {
        let mid = (clean.start_time + clean.end_time) / 2.0;
        for t in [clean.start_time, mid, clean.end_time] {
            assert!(map.to_official(t).is_some(), "clean play time {} not mapped", t);
        }
    }

    // Three regulation periods always add up to sixty minutes
    assert!((map.total_official_duration() - 3600.0).abs() < 1e-6);
    assert_eq!(map.to_official(5300.0), Some(3600.0));
}

#[test]
fn test_shift_closure_and_official_subset() {
    let labels = game_labels();
    let intervals = derive(&labels, DURATION);
    let map = OfficialTimeMap::build(&intervals);
    let raw = reconstruct_raw(&labels, &intervals, DURATION);
    let official = reconstruct_official(&raw, &map);

    assert_eq!(raw.len(), 6);
    for info in raw.values() {
        for (index, shift) in info.shifts.iter().enumerate() {
            assert_eq!(shift.number as usize, index + 1);
            assert!(shift.end_time >= shift.start_time);
        }
    }

    assert_eq!(official.len(), raw.len());
    for (player_id, info) in &official {
        let raw_numbers: Vec<u32> = raw[player_id].shifts.iter().map(|s| s.number).collect();
        for shift in &info.shifts {
            assert!(raw_numbers.contains(&shift.number));
            assert!(shift.end_time >= shift.start_time);
        }
        assert!(info.shifts.len() <= raw[player_id].shifts.len());
    }
}

#[test]
fn test_worked_scenario_single_period() {
    let labels = vec![
        Label::segment(0.0),
        Label::segment(1200.0),
        Label::stoppage(300.0),
        Label::stoppage(360.0),
    ];
    let intervals = derive(&labels, 1500.0);
    let map = OfficialTimeMap::build(&intervals);

    assert!((map.periods()[0].coefficient - 0.95).abs() < 1e-12);
    assert_eq!(map.to_official(300.0), Some(315.8));
    assert_eq!(map.to_official(330.0), None);
    let expected = ((300.0 / 0.95 + 240.0 / 0.95) * 10.0_f64).round() / 10.0;
    assert_eq!(map.to_official(600.0), Some(expected));
}

#[test]
fn test_worked_scenario_single_shift() {
    let labels = vec![
        Label::segment(0.0),
        Label::segment(1200.0),
        Label::shift_change(10.0, &[("A", "Alpha")]),
        Label::shift_change(50.0, &[]),
    ];
    let intervals = derive(&labels, 1200.0);
    let shifts = reconstruct_raw(&labels, &intervals, 1200.0);
    assert_eq!(shifts.len(), 1);
    let a = &shifts["A"].shifts;
    assert_eq!(a.len(), 1);
    assert_eq!((a[0].number, a[0].start_time, a[0].end_time), (1, 10.0, 50.0));
}

#[test]
fn test_custom_target_and_skaters() {
    let config = TimelineConfig {
        period_target_secs: 900.0,
        skaters_per_side: 4,
        ..TimelineConfig::default()
    };
    let labels = vec![
        Label::segment(0.0),
        Label::segment(1000.0),
        penalty(100.0, "s-team", "2", "Two"),
        penalty(200.0, "s-team", "2", "Two"),
    ];
    let intervals = derive_with(&labels, 1000.0, &config);
    let names: Vec<&str> = of_kind(&intervals, IntervalKind::NumericStrength)
        .map(|w| w.name.as_str())
        .collect();
    assert_eq!(names, vec!["4 на 4", "4 на 3", "4 на 4"]);

    let map = OfficialTimeMap::build_with(&intervals, &config);
    assert_eq!(map.to_official(1000.0), Some(900.0));
}
