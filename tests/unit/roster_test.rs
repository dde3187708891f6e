//! Tests for roster loading

use std::time::Duration;

use festival_scheduler::config::Roster;
use festival_scheduler::core::{Role, SchedulerError, StageAffinity};

const FESTIVAL: &str = "\
# name instrument arrival
Tanvi p 0
Sudhansh s 1
Kajol v 2

Vatsal b 2.5
Ishaan g 4
";

#[test]
fn test_roster_assigns_ids_in_order() {
    let roster = Roster::parse(FESTIVAL).unwrap();
    let names: Vec<&str> = roster.performers().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Tanvi", "Sudhansh", "Kajol", "Vatsal", "Ishaan"]);
    for (idx, performer) in roster.performers().iter().enumerate() {
        assert_eq!(performer.id as usize, idx + 1);
    }
}

#[test]
fn test_roster_maps_instruments() {
    let roster = Roster::parse(FESTIVAL).unwrap();
    let sudhansh = roster.get(2).unwrap();
    assert_eq!(sudhansh.role, Role::Singer);
    assert_eq!(roster.get(3).unwrap().affinity, StageAffinity::AcousticOnly);
    assert_eq!(roster.get(4).unwrap().affinity, StageAffinity::ElectricOnly);
    assert_eq!(roster.get(5).unwrap().affinity, StageAffinity::Either);
    assert_eq!(roster.get(4).unwrap().arrival, Duration::from_millis(2500));
}

#[test]
fn test_roster_rejects_empty_text() {
    let err = Roster::parse("# nobody\n\n").unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidConfig(_)));
}

#[test]
fn test_roster_rejects_bad_arrival() {
    let err = Roster::parse("Tanvi p 0\nSudhansh s soon\n").unwrap_err();
    match err {
        SchedulerError::Roster { line, reason } => {
            assert_eq!(line, 2);
            assert!(reason.contains("soon"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_roster_rejects_extra_fields() {
    let err = Roster::parse("Tanvi p 0 extra\n").unwrap_err();
    assert!(matches!(err, SchedulerError::Roster { line: 1, .. }));
}

#[test]
fn test_json_roster_matches_text_roster() {
    let json = r#"[
        {"name": "Tanvi", "instrument": "p", "arrival_secs": 0},
        {"name": "Sudhansh", "instrument": "s", "arrival_secs": 1},
        {"name": "Kajol", "instrument": "v", "arrival_secs": 2},
        {"name": "Vatsal", "instrument": "b", "arrival_secs": 2.5},
        {"name": "Ishaan", "instrument": "g", "arrival_secs": 4}
    ]"#;
    assert_eq!(Roster::from_json_str(json).unwrap(), Roster::parse(FESTIVAL).unwrap());
}

#[test]
fn test_json_roster_rejects_malformed_input() {
    assert!(matches!(
        Roster::from_json_str("[{\"name\": 1}]"),
        Err(SchedulerError::InvalidConfig(_))
    ));
    assert!(matches!(
        Roster::from_json_str("[]"),
        Err(SchedulerError::InvalidConfig(_))
    ));
}
