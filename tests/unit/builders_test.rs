//! Tests for builder modules

use std::sync::Arc;
use std::time::Duration;

use festival_scheduler::builders::{build_festival, FestivalBuilder};
use festival_scheduler::config::{FestivalConfig, Roster};
use festival_scheduler::core::{
    FestivalEvent, FixedDecisions, InMemoryEventSink, Outcome, PerformerStatus, SchedulerError,
    StageKind, Tallies,
};

fn quick_config() -> FestivalConfig {
    FestivalConfig {
        acoustic_stages: 1,
        electric_stages: 1,
        coordinators: 1,
        min_performance_ms: 5,
        max_performance_ms: 5,
        max_wait_ms: 50,
        join_bonus_ms: 5,
        collection_ms: 0,
    }
}

#[test]
fn test_builder_carries_config_into_limits() {
    let roster = Roster::parse("A p 0\n").unwrap();
    let festival = build_festival(&quick_config(), &roster).unwrap();
    assert_eq!(festival.limits().total_stages(), 2);
    assert_eq!(festival.limits().max_wait, Duration::from_millis(50));
    assert_eq!(festival.gate().capacity(), 1);
    assert_eq!(
        festival.snapshot(),
        Tallies {
            free_stages: 2,
            ..Tallies::default()
        }
    );
}

#[test]
fn test_builder_rejects_invalid_config() {
    let roster = Roster::parse("A p 0\n").unwrap();
    let cfg = FestivalConfig {
        coordinators: 0,
        ..quick_config()
    };
    let err = FestivalBuilder::new(cfg).build(&roster).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidConfig(msg) if msg.contains("coordinators")));
}

#[test]
fn test_builder_uses_injected_decisions_and_sink() {
    let roster = Roster::parse("Pianist p 0\n").unwrap();
    let sink = InMemoryEventSink::new(32);
    let festival = FestivalBuilder::new(quick_config())
        .with_decisions(FixedDecisions::new(StageKind::Electric, true))
        .with_event_sink(Arc::new(sink.clone()))
        .build(&roster)
        .unwrap();

    let report = festival.run(&roster).unwrap();
    match report.outcome(1) {
        Some(Outcome::Solo { stage, partner }) => {
            assert_eq!(stage.kind, StageKind::Electric);
            assert_eq!(stage.id, 2);
            assert_eq!(partner, None);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(report.run_id, festival.run_id());
    assert_eq!(festival.status(1).unwrap(), PerformerStatus::NotPerforming);
    assert!(festival.status(2).is_err());
    assert!(matches!(
        sink.events().first(),
        Some(FestivalEvent::Arrived { performer: 1, .. })
    ));
}
