//! Tests for event sinks

use std::sync::Arc;
use std::time::Duration;

use festival_scheduler::core::{
    AbandonReason, EventRecord, EventSink, FestivalEvent, InMemoryEventSink, MultiEventSink, Stage,
    StageKind, TracingEventSink,
};

fn record(event: FestivalEvent) -> EventRecord {
    EventRecord {
        at: Duration::from_millis(10),
        event,
    }
}

#[test]
fn test_event_subject() {
    let stage = Stage {
        id: 3,
        kind: StageKind::Electric,
    };
    let joined = FestivalEvent::SingerJoined {
        singer: 4,
        musician: 1,
        stage,
        bonus: Duration::from_secs(2),
    };
    assert_eq!(joined.performer(), 4);
    let finished = FestivalEvent::PerformanceFinished {
        performer: 1,
        stage,
        partner: Some(4),
    };
    assert_eq!(finished.performer(), 1);
}

#[test]
fn test_event_json_shape() {
    let event = FestivalEvent::Abandoned {
        performer: 2,
        reason: AbandonReason::NoVenue,
    };
    let value = serde_json::to_value(record(event)).unwrap();
    assert_eq!(value["event"]["event"], "abandoned");
    assert_eq!(value["event"]["performer"], 2);
    assert_eq!(value["event"]["reason"], "no_venue");
}

#[test]
fn test_tracing_sink_accepts_every_event() {
    let sink = TracingEventSink;
    let stage = Stage {
        id: 1,
        kind: StageKind::Acoustic,
    };
    for event in [
        FestivalEvent::StageAcquired { performer: 1, stage },
        FestivalEvent::JoinRequested { singer: 2 },
        FestivalEvent::GateEntered { performer: 1 },
        FestivalEvent::GateExited { performer: 1 },
    ] {
        sink.record(record(event));
    }
}

#[test]
fn test_multi_sink_keeps_order_per_sink() {
    let memory = InMemoryEventSink::new(8);
    let multi = MultiEventSink::new()
        .with(Arc::new(memory.clone()))
        .with(Arc::new(TracingEventSink));
    multi.record(record(FestivalEvent::GateEntered { performer: 1 }));
    multi.record(record(FestivalEvent::GateExited { performer: 1 }));
    assert_eq!(
        memory.events(),
        vec![
            FestivalEvent::GateEntered { performer: 1 },
            FestivalEvent::GateExited { performer: 1 }
        ]
    );
}
