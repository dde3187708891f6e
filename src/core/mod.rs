//! Stage allocation, pairing, gating and the performer lifecycle.

pub mod decisions;
pub mod error;
pub mod events;
pub mod festival;
pub mod gate;
pub mod impatience;
pub mod performer;
pub mod rendezvous;
pub mod stage_pool;

pub use decisions::{DecisionSource, FixedDecisions, RandomDecisions};
pub use error::{AppResult, SchedulerError};
pub use events::{
    ChannelEventSink, EventRecord, EventSink, FestivalEvent, InMemoryEventSink, MultiEventSink,
    TracingEventSink,
};
pub use festival::{singer_path, Festival, FestivalLimits, FestivalReport, SingerPath, Tallies};
pub use gate::{CoordinatorGate, GatePass};
pub use impatience::{wait_until_ready, Deadline, ImpatienceTimer, WaitOutcome};
pub use performer::{
    AbandonReason, Instrument, Outcome, Performer, PerformerId, PerformerStatus, Role,
    StageAffinity,
};
pub use rendezvous::RendezvousQueue;
pub use stage_pool::{choose_kind, Stage, StageId, StageKind, StagePool};
