// Unit tests for the official time map

use super::*;
use crate::domain::model::Label;
use crate::intervals::{derive, derive_with};

fn one_period_with_stoppage() -> Vec<Interval> {
    let labels = vec![
        Label::segment(0.0),
        Label::segment(1200.0),
        Label::stoppage(300.0),
        Label::stoppage(360.0),
    ];
    derive(&labels, 1500.0)
}

#[test]
fn test_single_period_coefficient() {
    let map = OfficialTimeMap::build(&one_period_with_stoppage());

    assert_eq!(map.periods().len(), 1);
    let period = &map.periods()[0];
    assert_eq!(period.name, "Period 1");
    assert_eq!(period.total_clean_duration, 1140.0);
    assert_eq!(period.target_duration, 1200.0);
    assert!((period.coefficient - 0.95).abs() < 1e-12);
    assert_eq!(map.segments().len(), 2);
}

#[test]
fn test_to_official_worked_values() {
    let map = OfficialTimeMap::build(&one_period_with_stoppage());

    assert_eq!(map.to_official(0.0), Some(0.0));
    assert_eq!(map.to_official(300.0), Some(315.8));
    assert_eq!(map.to_official(330.0), None);
    assert_eq!(map.to_official(600.0), Some(round_tenth(300.0 / 0.95 + 240.0 / 0.95)));
    assert_eq!(map.to_official(1200.0), Some(1200.0));
    assert_eq!(map.to_official(1300.0), None);
}

#[test]
fn test_stoppage_end_maps_to_next_segment_start() {
    let map = OfficialTimeMap::build(&one_period_with_stoppage());
    let second = map.segments()[1];
    assert_eq!(second.global_start, 360.0);
    assert_eq!(map.to_official(360.0), Some(round_tenth(second.official_start)));
}

#[test]
fn test_total_duration_of_regulation_periods() {
    let labels = vec![
        Label::segment(0.0),
        Label::segment(1500.0),
        Label::segment(2000.0),
        Label::segment(3000.0),
        Label::stoppage(100.0),
        Label::stoppage(400.0),
    ];
    let map = OfficialTimeMap::build(&derive(&labels, 3000.0));
    assert!((map.total_official_duration() - 2400.0).abs() < 1e-9);
    assert_eq!(map.to_official(3000.0), Some(2400.0));
}

#[test]
fn test_overtime_is_not_rescaled() {
    let config = TimelineConfig {
        regulation_periods: Some(1),
        ..TimelineConfig::default()
    };
    let labels = vec![
        Label::segment(0.0),
        Label::segment(1000.0),
        Label::segment(1100.0),
        Label::segment(1400.0),
    ];
    let map = OfficialTimeMap::build_with(&derive_with(&labels, 1500.0, &config), &config);

    let overtime = &map.periods()[1];
    assert_eq!(overtime.name, "Period 2 (Overtime)");
    assert_eq!(overtime.coefficient, 1.0);
    assert_eq!(overtime.target_duration, 300.0);
    assert_eq!(map.to_official(1250.0), Some(1350.0));
}

#[test]
fn test_period_lookup_and_empty_map() {
    let map = OfficialTimeMap::build(&one_period_with_stoppage());
    assert_eq!(map.period_for(330.0).map(|p| p.name.as_str()), Some("Period 1"));
    assert!(map.period_for(1300.0).is_none());

    let empty = OfficialTimeMap::build(&derive(&[], 100.0));
    assert!(empty.is_empty());
    assert_eq!(empty.to_official(10.0), None);
    assert_eq!(empty.total_official_duration(), 0.0);
}

#[test]
fn test_clean_play_outside_periods_is_skipped() {
    let mut intervals = one_period_with_stoppage();
    intervals.push(Interval::new("stray", IntervalKind::CleanPlay, 1300.0, 1400.0));
    let map = OfficialTimeMap::build(&intervals);
    assert_eq!(map.segments().len(), 2);
    assert_eq!(map.to_official(1350.0), None);
}
