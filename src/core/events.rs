//! Structured lifecycle events and the sinks that receive them.
//!
//! The scheduler never formats narration itself; it emits one
//! [`FestivalEvent`] per transition and leaves presentation to the sink.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;

use crate::core::{AbandonReason, PerformerId, Role, Stage};
use crate::Mutex;

/// One lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FestivalEvent {
    /// Performer reached the venue and started its patience timer.
    Arrived {
        /// Who.
        performer: PerformerId,
        /// Singer or musician.
        role: Role,
    },
    /// Performer took a stage.
    StageAcquired {
        /// Who.
        performer: PerformerId,
        /// Which stage.
        stage: Stage,
    },
    /// Performer left without performing.
    Abandoned {
        /// Who.
        performer: PerformerId,
        /// Why.
        reason: AbandonReason,
    },
    /// Solo performance began.
    PerformanceStarted {
        /// Who.
        performer: PerformerId,
        /// Where.
        stage: Stage,
        /// Planned length, before any join bonus.
        duration: Duration,
    },
    /// A singer published itself to be picked up by a musician.
    JoinRequested {
        /// The singer.
        singer: PerformerId,
    },
    /// A musician claimed a singer and extended its performance.
    SingerJoined {
        /// The singer.
        singer: PerformerId,
        /// The host musician.
        musician: PerformerId,
        /// The host's stage.
        stage: Stage,
        /// Extra performance time granted.
        bonus: Duration,
    },
    /// A performance ended and its stage was released.
    PerformanceFinished {
        /// Stage holder.
        performer: PerformerId,
        /// Released stage.
        stage: Stage,
        /// Singer that performed alongside, if any.
        partner: Option<PerformerId>,
    },
    /// Performer entered the coordinator gate.
    GateEntered {
        /// Who.
        performer: PerformerId,
    },
    /// Performer left the coordinator gate.
    GateExited {
        /// Who.
        performer: PerformerId,
    },
}

impl FestivalEvent {
    /// The performer the event is primarily about.
    #[must_use]
    pub const fn performer(&self) -> PerformerId {
        match self {
            Self::Arrived { performer, .. }
            | Self::StageAcquired { performer, .. }
            | Self::Abandoned { performer, .. }
            | Self::PerformanceStarted { performer, .. }
            | Self::PerformanceFinished { performer, .. }
            | Self::GateEntered { performer }
            | Self::GateExited { performer } => *performer,
            Self::JoinRequested { singer } | Self::SingerJoined { singer, .. } => *singer,
        }
    }
}

/// An event stamped with its offset from festival start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Time since festival start.
    pub at: Duration,
    /// What happened.
    pub event: FestivalEvent,
}

/// Event sink abstraction. Called from performer threads, possibly while
/// the allocation lock is held, so implementations must not block on the
/// festival.
pub trait EventSink: Send + Sync {
    /// Record an event.
    fn record(&self, record: EventRecord);
}

/// Bounded in-memory sink. Clones share the same buffer.
#[derive(Debug, Clone)]
pub struct InMemoryEventSink {
    events: Arc<Mutex<VecDeque<EventRecord>>>,
    max_events: usize,
}

impl InMemoryEventSink {
    /// Create a sink keeping the most recent `max_events` records.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(4096)))),
            max_events,
        }
    }

    /// Snapshot of stored records, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<EventRecord> {
        self.events.lock().iter().cloned().collect()
    }

    /// Snapshot of stored events without timestamps.
    #[must_use]
    pub fn events(&self) -> Vec<FestivalEvent> {
        self.events.lock().iter().map(|r| r.event.clone()).collect()
    }
}

impl EventSink for InMemoryEventSink {
    fn record(&self, record: EventRecord) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(record);
    }
}

/// Forwards every event to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, record: EventRecord) {
        let at_ms = record.at.as_millis();
        match record.event {
            FestivalEvent::Arrived { performer, role } => {
                tracing::info!(at_ms, performer, %role, "arrived");
            }
            FestivalEvent::StageAcquired { performer, stage } => {
                tracing::info!(at_ms, performer, stage = stage.id, kind = %stage.kind, "stage acquired");
            }
            FestivalEvent::Abandoned { performer, reason } => {
                tracing::info!(at_ms, performer, %reason, "left without performing");
            }
            FestivalEvent::PerformanceStarted { performer, stage, duration } => {
                tracing::info!(
                    at_ms,
                    performer,
                    stage = stage.id,
                    kind = %stage.kind,
                    duration_ms = duration.as_millis(),
                    "performance started"
                );
            }
            FestivalEvent::JoinRequested { singer } => {
                tracing::info!(at_ms, singer, "singer waiting to join a musician");
            }
            FestivalEvent::SingerJoined { singer, musician, stage, bonus } => {
                tracing::info!(
                    at_ms,
                    singer,
                    musician,
                    stage = stage.id,
                    bonus_ms = bonus.as_millis(),
                    "singer joined performance"
                );
            }
            FestivalEvent::PerformanceFinished { performer, stage, partner } => {
                tracing::info!(at_ms, performer, stage = stage.id, ?partner, "performance finished");
            }
            FestivalEvent::GateEntered { performer } => {
                tracing::info!(at_ms, performer, "entered coordinator gate");
            }
            FestivalEvent::GateExited { performer } => {
                tracing::info!(at_ms, performer, "left coordinator gate");
            }
        }
    }
}

/// Streams events to a consumer thread over a channel.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: Sender<EventRecord>,
}

impl ChannelEventSink {
    /// Sink plus the receiving end.
    #[must_use]
    pub fn unbounded() -> (Self, Receiver<EventRecord>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn record(&self, record: EventRecord) {
        if self.tx.send(record).is_err() {
            tracing::debug!("event receiver dropped; discarding event");
        }
    }
}

/// Fans one event out to several sinks.
#[derive(Clone, Default)]
pub struct MultiEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl MultiEventSink {
    /// Empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    #[must_use]
    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl EventSink for MultiEventSink {
    fn record(&self, record: EventRecord) {
        for sink in &self.sinks {
            sink.record(record.clone());
        }
    }
}
