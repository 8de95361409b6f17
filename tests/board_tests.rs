//! Layout and update phases against the in-memory surface.

use chrono::{Locale, TimeZone, Utc};
use dialclock::config::{Config, DialSpec, Marker};
use dialclock::core::board::DialBoard;
use dialclock::core::dial::{ClockFields, Dial, DialKind};
use dialclock::core::rotation::AngleLedger;
use dialclock::surface::DialSurface;
use dialclock::surface::headless::HeadlessSurface;

const EPSILON: f64 = 1e-9;

fn fields_at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> ClockFields {
    ClockFields::from_datetime(&Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
}

fn spec(kind: &str) -> DialSpec {
    DialSpec {
        kind: Some(kind.into()),
        ..Default::default()
    }
}

fn board_of(kinds: &[DialKind]) -> DialBoard {
    let dials = kinds
        .iter()
        .map(|kind| Dial::new(kind.as_str(), *kind))
        .collect();
    DialBoard::new(dials, Locale::en_US, 2)
}

#[test]
fn test_unknown_kind_leaves_other_dials_working() {
    let config = Config {
        locale: Some("en_US".to_string()),
        dials: vec![spec("fortnights"), spec("seconds"), spec("month")],
        ..Default::default()
    };
    let mut board = DialBoard::from_config(&config);
    let mut ledger = AngleLedger::new();
    let mut surface = HeadlessSurface::new();
    let fields = fields_at(2026, 3, 14, 15, 9, 26);

    board.layout(&fields, &mut ledger, &mut surface).unwrap();
    let readings = board.update(&fields, &mut ledger, &mut surface).unwrap();

    assert_eq!(surface.ring_count(), 2);
    assert!(surface.ring("fortnights").is_none());
    assert_eq!(readings.len(), 2);
    assert_eq!(surface.ring("seconds").unwrap().active_label(), Some("26"));
    assert_eq!(surface.ring("month").unwrap().active_label(), Some("March"));
}

#[test]
fn test_seconds_wrap_continues_forward() {
    let mut board = board_of(&[DialKind::Seconds]);
    let mut ledger = AngleLedger::new();
    let mut surface = HeadlessSurface::new();

    let start = fields_at(2026, 12, 31, 23, 59, 58);
    board.layout(&start, &mut ledger, &mut surface).unwrap();

    let mut angles = Vec::new();
    for (mi, s) in [(59, 58), (59, 59), (0, 0), (0, 1)] {
        let (h, d, mo, y) = if mi == 0 { (0, 1, 1, 2027) } else { (23, 31, 12, 2026) };
        let fields = fields_at(y, mo, d, h, mi, s);
        board.update(&fields, &mut ledger, &mut surface).unwrap();
        angles.push(surface.ring("seconds").unwrap().rotation);
    }

    // 58 starts from the zero baseline and goes backwards
    assert!((angles[0] - -12.0).abs() < EPSILON);
    assert!((angles[1] - -6.0).abs() < EPSILON);
    assert!((angles[2] - 0.0).abs() < EPSILON);
    assert!((angles[3] - 6.0).abs() < EPSILON);
    assert_eq!(surface.ring("seconds").unwrap().active_label(), Some("01"));
}

#[test]
fn test_active_marker_moves_with_value() {
    let mut board = board_of(&[DialKind::Weekday]);
    let mut ledger = AngleLedger::new();
    let mut surface = HeadlessSurface::new();

    // Saturday, then Sunday
    let saturday = fields_at(2021, 7, 3, 12, 0, 0);
    board.layout(&saturday, &mut ledger, &mut surface).unwrap();
    board.update(&saturday, &mut ledger, &mut surface).unwrap();
    assert_eq!(surface.ring("weekday").unwrap().active_label(), Some("Saturday"));

    let sunday = fields_at(2021, 7, 4, 12, 0, 0);
    board.update(&sunday, &mut ledger, &mut surface).unwrap();
    let ring = surface.ring("weekday").unwrap();
    assert_eq!(ring.active.len(), 1);
    assert_eq!(ring.active_label(), Some("Sunday"));

    // Saturday sat one step behind the baseline, Sunday is back on it
    assert!(ring.rotation.abs() < EPSILON);
}

#[test]
fn test_day_dial_relayout_on_month_change() {
    let mut board = board_of(&[DialKind::DayOfMonth, DialKind::Seconds]);
    let mut ledger = AngleLedger::new();
    let mut surface = HeadlessSurface::new();

    let end_of_feb = fields_at(2027, 2, 28, 23, 59, 59);
    board.layout(&end_of_feb, &mut ledger, &mut surface).unwrap();
    board.update(&end_of_feb, &mut ledger, &mut surface).unwrap();
    assert_eq!(surface.ring("day-of-month").unwrap().placements.len(), 28);
    let mounts_before = surface.mount_count();
    let angle_before = ledger.get("day-of-month").angle;

    let march = fields_at(2027, 3, 1, 0, 0, 0);
    let readings = board.update(&march, &mut ledger, &mut surface).unwrap();

    // Only the day ring is mounted again
    assert_eq!(surface.mount_count(), mounts_before + 1);
    let ring = surface.ring("day-of-month").unwrap();
    assert_eq!(ring.placements.len(), 31);
    assert_eq!(ring.active_label(), Some("1"));
    assert_eq!(readings[0].label, "1");

    // 27/28 of a turn to 0 keeps going forward
    let step = 360.0 / 28.0;
    assert!((angle_before - -step).abs() < EPSILON);
    assert!((ledger.get("day-of-month").angle - 0.0).abs() < EPSILON);
}

#[test]
fn test_declared_divisions_fix_the_day_ring() {
    let config = Config {
        dials: vec![DialSpec {
            divisions: Some(Marker::Count(31)),
            ..spec("days")
        }],
        ..Default::default()
    };
    let mut board = DialBoard::from_config(&config);
    let mut ledger = AngleLedger::new();
    let mut surface = HeadlessSurface::new();

    let feb = fields_at(2027, 2, 14, 0, 0, 0);
    board.layout(&feb, &mut ledger, &mut surface).unwrap();
    let readings = board.update(&feb, &mut ledger, &mut surface).unwrap();

    assert_eq!(readings[0].divisions, 31);
    assert!((readings[0].rotation.target - 13.0 * 360.0 / 31.0).abs() < EPSILON);
    // 28 labels on a ring with 31 slots
    assert_eq!(surface.ring("days").unwrap().placements.len(), 28);
}

#[test]
fn test_layout_again_keeps_angles() {
    let mut board = board_of(&[DialKind::Minutes]);
    let mut ledger = AngleLedger::new();
    let mut surface = HeadlessSurface::new();

    let fields = fields_at(2026, 6, 1, 10, 45, 0);
    board.layout(&fields, &mut ledger, &mut surface).unwrap();
    board.update(&fields, &mut ledger, &mut surface).unwrap();
    let angle = ledger.get("minutes").angle;

    // A reload lays everything out again from a cleared surface
    surface.clear().unwrap();
    board.layout(&fields, &mut ledger, &mut surface).unwrap();
    board.update(&fields, &mut ledger, &mut surface).unwrap();

    let ring = surface.ring("minutes").unwrap();
    assert!((ring.rotation - angle).abs() < EPSILON);
    assert_eq!(ring.active_label(), Some("45"));
}
