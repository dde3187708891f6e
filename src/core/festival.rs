//! The performer scheduler.
//!
//! Three independent synchronization domains:
//!
//! - the **allocation lock** (`venue`): stage pool, performer status table and
//!   the derived tallies, with one condvar per thing a performer can wait for;
//! - the **rendezvous queue**: its own lock and condvar;
//! - the **coordinator gate**: its own lock and condvar.
//!
//! No thread ever holds two of these at once. A joining singer marks itself
//! under the allocation lock, releases it, and only then publishes to the
//! queue; a musician pops from the queue, releases it, and only then confirms
//! the claim under the allocation lock.
//!
//! A singer may join only while there are more receptive musicians (performing,
//! not yet hosting anyone) than unclaimed joined singers. When a musician
//! leaves and that stops being true, the newest unclaimed singers are released
//! in the same critical section. So a joined singer always has a live host or
//! a way out, and the number of joined singers never exceeds the number of
//! performing musicians.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::Roster;
use crate::core::decisions::DecisionSource;
use crate::core::events::{EventRecord, EventSink, FestivalEvent};
use crate::core::gate::CoordinatorGate;
use crate::core::impatience::{Deadline, ImpatienceTimer, WaitOutcome};
use crate::core::performer::{
    AbandonReason, Outcome, Performer, PerformerId, PerformerStatus, Role,
};
use crate::core::rendezvous::RendezvousQueue;
use crate::core::stage_pool::{Stage, StageKind, StagePool};
use crate::core::SchedulerError;
use crate::util::clock::{now_ms, FestivalClock};
use crate::{Condvar, Mutex};

/// Duration-typed runtime limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FestivalLimits {
    /// Acoustic stage count.
    pub acoustic_stages: u32,
    /// Electric stage count.
    pub electric_stages: u32,
    /// Coordinator gate capacity.
    pub coordinators: usize,
    /// Shortest performance.
    pub min_performance: Duration,
    /// Longest performance.
    pub max_performance: Duration,
    /// Patience of every performer, from arrival.
    pub max_wait: Duration,
    /// Extension a musician gets when a singer joins.
    pub join_bonus: Duration,
    /// Time spent inside the coordinator gate.
    pub collection: Duration,
}

impl FestivalLimits {
    /// Stages of both kinds.
    #[must_use]
    pub const fn total_stages(&self) -> u32 {
        self.acoustic_stages.saturating_add(self.electric_stages)
    }
}

/// Counters derived from the status table and stage pool. Recomputed inside
/// the allocation lock after every mutation, never maintained on their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tallies {
    /// Free stages of both kinds.
    pub free_stages: usize,
    /// Singers performing solo or joined.
    pub singers_active: usize,
    /// Musicians holding a stage.
    pub musicians_performing: usize,
    /// Singers in `JoinedAsSinger`.
    pub joined: usize,
    /// Joined singers no musician has claimed yet.
    pub unclaimed_joined: usize,
    /// Performing musicians not yet hosting a singer.
    pub receptive_musicians: usize,
}

impl Tallies {
    fn derive(stages: &StagePool, seats: &[Seat]) -> Self {
        let mut tallies = Self {
            free_stages: stages.free_total(),
            ..Self::default()
        };
        for seat in seats {
            match (seat.role, seat.status) {
                (Role::Singer, PerformerStatus::PerformingSolo(_)) => tallies.singers_active += 1,
                (Role::Singer, PerformerStatus::JoinedAsSinger { host, .. }) => {
                    tallies.singers_active += 1;
                    tallies.joined += 1;
                    if host.is_none() {
                        tallies.unclaimed_joined += 1;
                    }
                }
                (Role::Musician, PerformerStatus::PerformingSolo(_)) => {
                    tallies.musicians_performing += 1;
                    if seat.partner.is_none() {
                        tallies.receptive_musicians += 1;
                    }
                }
                _ => {}
            }
        }
        tallies
    }

    /// Whether one more singer may join without risking an unserved wait.
    #[must_use]
    pub const fn can_host_singer(&self) -> bool {
        self.unclaimed_joined < self.receptive_musicians
    }
}

/// What a singer does once admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingerPath {
    /// Take a stage of its own.
    Solo,
    /// Publish itself to be picked up by a musician.
    Join,
}

/// Singer branch: the preferred option if possible, otherwise the other one,
/// otherwise nothing.
#[must_use]
pub const fn singer_path(prefer_solo: bool, free_stages: usize, can_join: bool) -> Option<SingerPath> {
    let solo = free_stages > 0;
    match (prefer_solo, solo, can_join) {
        (true, true, _) | (false, true, false) => Some(SingerPath::Solo),
        (true, false, true) | (false, _, true) => Some(SingerPath::Join),
        (_, false, false) => None,
    }
}

#[derive(Debug, Clone, Copy)]
struct Seat {
    role: Role,
    status: PerformerStatus,
    /// Musician: singer it hosts this performance. Singer: its host, kept
    /// after release so the singer can read it back.
    partner: Option<PerformerId>,
    scheduled: bool,
}

#[derive(Debug)]
struct Venue {
    stages: StagePool,
    seats: Vec<Seat>,
    tallies: Tallies,
    next_ticket: u64,
}

impl Venue {
    fn index(&self, id: PerformerId) -> Result<usize, SchedulerError> {
        id.checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .filter(|&i| i < self.seats.len())
            .ok_or_else(|| SchedulerError::invariant(format!("unknown performer {id}")))
    }

    fn seat(&self, id: PerformerId) -> Result<&Seat, SchedulerError> {
        let idx = self.index(id)?;
        Ok(&self.seats[idx])
    }

    fn seat_mut(&mut self, id: PerformerId) -> Result<&mut Seat, SchedulerError> {
        let idx = self.index(id)?;
        Ok(&mut self.seats[idx])
    }

    fn recount(&mut self) {
        self.tallies = Tallies::derive(&self.stages, &self.seats);
    }

    fn is_waiting_to_join(&self, id: PerformerId) -> bool {
        self.seat(id)
            .is_ok_and(|seat| matches!(seat.status, PerformerStatus::JoinedAsSinger { .. }))
    }

    fn set_status(&mut self, id: PerformerId, status: PerformerStatus) -> Result<(), SchedulerError> {
        self.seat_mut(id)?.status = status;
        self.recount();
        Ok(())
    }

    /// Confirm a popped queue entry. `Ok(false)` means the entry was stale.
    fn claim(&mut self, musician: PerformerId, singer: PerformerId) -> Result<bool, SchedulerError> {
        let host = self.seat(musician)?;
        if host.role != Role::Musician
            || !matches!(host.status, PerformerStatus::PerformingSolo(_))
            || host.partner.is_some()
        {
            return Err(SchedulerError::invariant(format!(
                "performer {musician} cannot host: {:?}",
                host.status
            )));
        }
        let guest = self.seat_mut(singer)?;
        if guest.role != Role::Singer {
            return Err(SchedulerError::invariant(format!(
                "performer {singer} in rendezvous queue is not a singer"
            )));
        }
        let PerformerStatus::JoinedAsSinger { host: None, ticket } = guest.status else {
            return Ok(false);
        };
        guest.status = PerformerStatus::JoinedAsSinger {
            host: Some(musician),
            ticket,
        };
        guest.partner = Some(musician);
        self.seat_mut(musician)?.partner = Some(singer);
        self.recount();
        Ok(true)
    }

    /// End the pairing of `singer` with `musician`.
    fn finish_hosting(&mut self, musician: PerformerId, singer: PerformerId) -> Result<(), SchedulerError> {
        let guest = self.seat_mut(singer)?;
        let hosted = matches!(
            guest.status,
            PerformerStatus::JoinedAsSinger { host: Some(host), .. } if host == musician
        );
        if !hosted {
            return Err(SchedulerError::invariant(format!(
                "singer {singer} hosted by {musician} has status {:?}",
                guest.status
            )));
        }
        guest.status = PerformerStatus::NotPerforming;
        Ok(())
    }

    /// Release the newest unclaimed joined singers until every remaining one
    /// has a receptive musician. Returns the released ids.
    fn release_unhostable(&mut self) -> Vec<PerformerId> {
        let mut released = Vec::new();
        while self.tallies.unclaimed_joined > self.tallies.receptive_musicians {
            let newest = self
                .seats
                .iter()
                .zip(1..)
                .filter_map(|(seat, id)| match seat.status {
                    PerformerStatus::JoinedAsSinger { host: None, ticket } => Some((ticket, id)),
                    _ => None,
                })
                .max();
            let Some((_, id)) = newest else { break };
            if let Ok(seat) = self.seat_mut(id) {
                seat.status = PerformerStatus::NotPerforming;
                seat.partner = None;
            }
            self.recount();
            released.push(id);
        }
        released
    }

    fn check(&self) -> Result<(), SchedulerError> {
        self.stages.check()?;
        let fresh = Tallies::derive(&self.stages, &self.seats);
        if fresh != self.tallies {
            return Err(SchedulerError::invariant(format!(
                "tallies diverged: stored {:?}, derived {fresh:?}",
                self.tallies
            )));
        }
        if self.tallies.joined > self.tallies.musicians_performing {
            return Err(SchedulerError::invariant(format!(
                "{} joined singers but only {} performing musicians",
                self.tallies.joined, self.tallies.musicians_performing
            )));
        }
        let mut on_stage = Vec::new();
        for seat in &self.seats {
            if let PerformerStatus::PerformingSolo(stage) = seat.status {
                if !self.stages.is_held(stage.id) {
                    return Err(SchedulerError::invariant(format!(
                        "stage {} occupied but marked free",
                        stage.id
                    )));
                }
                if on_stage.contains(&stage.id) {
                    return Err(SchedulerError::invariant(format!(
                        "stage {} held by two performers",
                        stage.id
                    )));
                }
                on_stage.push(stage.id);
            }
        }
        let held = [StageKind::Acoustic, StageKind::Electric]
            .iter()
            .map(|&kind| self.stages.occupied(kind))
            .sum::<usize>();
        if held != on_stage.len() {
            return Err(SchedulerError::invariant(format!(
                "{held} stages held but {} performers on stage",
                on_stage.len()
            )));
        }
        Ok(())
    }
}

/// Aggregate result of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct FestivalReport {
    /// Identifier of this run, also attached to log lines.
    pub run_id: Uuid,
    /// Wall-clock start, milliseconds since the Unix epoch.
    pub started_at_ms: u128,
    /// Terminal outcome per performer, in roster order.
    pub outcomes: Vec<(PerformerId, Outcome)>,
    /// Highest simultaneous coordinator gate occupancy.
    pub peak_gate_occupancy: usize,
}

impl FestivalReport {
    /// Outcome of one performer.
    #[must_use]
    pub fn outcome(&self, id: PerformerId) -> Option<Outcome> {
        self.outcomes
            .iter()
            .find(|(pid, _)| *pid == id)
            .map(|(_, outcome)| *outcome)
    }

    /// Performers that performed.
    #[must_use]
    pub fn performed(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.performed()).count()
    }

    /// Performers that left without performing.
    #[must_use]
    pub fn abandoned(&self) -> usize {
        self.outcomes.len() - self.performed()
    }
}

/// Stage allocation, rendezvous pairing and coordinator gate for one roster.
pub struct Festival {
    run_id: Uuid,
    limits: FestivalLimits,
    clock: FestivalClock,
    started_at_ms: u128,
    venue: Mutex<Venue>,
    any_stage_freed: Condvar,
    acoustic_freed: Condvar,
    electric_freed: Condvar,
    singer_slot_freed: Condvar,
    singer_released: Condvar,
    rendezvous: RendezvousQueue,
    gate: CoordinatorGate,
    decisions: Arc<dyn DecisionSource>,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for Festival {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Festival")
            .field("run_id", &self.run_id)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl Festival {
    /// Create a festival for `roster`. Arrival offsets are measured from
    /// this call.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an empty roster, zero stages, zero coordinators or
    /// an inverted performance range.
    pub fn new(
        limits: FestivalLimits,
        roster: &Roster,
        decisions: Arc<dyn DecisionSource>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, SchedulerError> {
        if roster.is_empty() {
            return Err(SchedulerError::InvalidConfig("roster is empty".into()));
        }
        if limits
            .acoustic_stages
            .checked_add(limits.electric_stages)
            .is_none()
        {
            return Err(SchedulerError::InvalidConfig(
                "stage counts overflow the stage numbering".into(),
            ));
        }
        if limits.total_stages() == 0 {
            return Err(SchedulerError::InvalidConfig(
                "at least one stage is required".into(),
            ));
        }
        if limits.min_performance > limits.max_performance {
            return Err(SchedulerError::InvalidConfig(
                "min_performance exceeds max_performance".into(),
            ));
        }
        let gate = CoordinatorGate::new(limits.coordinators)?;
        let stages = StagePool::new(limits.acoustic_stages, limits.electric_stages);
        let seats: Vec<Seat> = roster
            .performers()
            .iter()
            .map(|p| Seat {
                role: p.role,
                status: PerformerStatus::NotPerforming,
                partner: None,
                scheduled: false,
            })
            .collect();
        let tallies = Tallies::derive(&stages, &seats);
        let run_id = Uuid::new_v4();

        info!(
            %run_id,
            performers = roster.len(),
            acoustic = limits.acoustic_stages,
            electric = limits.electric_stages,
            coordinators = limits.coordinators,
            "festival initialized"
        );

        Ok(Self {
            run_id,
            clock: FestivalClock::start(),
            started_at_ms: now_ms(),
            venue: Mutex::new(Venue {
                stages,
                seats,
                tallies,
                next_ticket: 0,
            }),
            any_stage_freed: Condvar::new(),
            acoustic_freed: Condvar::new(),
            electric_freed: Condvar::new(),
            singer_slot_freed: Condvar::new(),
            singer_released: Condvar::new(),
            rendezvous: RendezvousQueue::new(),
            gate,
            limits,
            decisions,
            events,
        })
    }

    /// Run identifier.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Configured limits.
    #[must_use]
    pub const fn limits(&self) -> &FestivalLimits {
        &self.limits
    }

    /// Current derived counters.
    #[must_use]
    pub fn snapshot(&self) -> Tallies {
        self.venue.lock().tallies
    }

    /// Current status of a performer.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` for an id outside the roster.
    pub fn status(&self, id: PerformerId) -> Result<PerformerStatus, SchedulerError> {
        Ok(self.venue.lock().seat(id)?.status)
    }

    /// Coordinator gate, for occupancy inspection.
    #[must_use]
    pub const fn gate(&self) -> &CoordinatorGate {
        &self.gate
    }

    /// Verify every cross-structure invariant under the allocation lock.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` describing the first broken rule.
    pub fn check_invariants(&self) -> Result<(), SchedulerError> {
        self.venue.lock().check()
    }

    /// Run every performer on its own thread and wait for all of them.
    ///
    /// # Errors
    ///
    /// The first invariant violation or panic among the performers; all
    /// threads are joined before returning.
    pub fn run(&self, roster: &Roster) -> Result<FestivalReport, SchedulerError> {
        let outcomes = crate::runtime::threads::run_performers(self, roster)?;
        Ok(FestivalReport {
            run_id: self.run_id,
            started_at_ms: self.started_at_ms,
            outcomes,
            peak_gate_occupancy: self.gate.peak(),
        })
    }

    /// Take one performer from arrival to a terminal state. Blocks the
    /// calling thread for the whole lifecycle.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if the performer is unknown, was already
    /// scheduled, or shared state is found corrupted.
    pub fn perform(&self, performer: &Performer) -> Result<Outcome, SchedulerError> {
        self.admit(performer)?;

        Deadline::at(self.clock.instant_at(performer.arrival)).sleep_until();
        let timer = ImpatienceTimer::starting_now(self.limits.max_wait);
        self.emit(FestivalEvent::Arrived {
            performer: performer.id,
            role: performer.role,
        });
        info!(run_id = %self.run_id, performer = performer.id, name = %performer.name, role = %performer.role, "arrived");

        let outcome = match performer.role {
            Role::Musician => self.run_musician(performer, &timer),
            Role::Singer => self.run_singer(performer, &timer),
        };
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(performer = performer.id, error = %err, "performer aborted");
                return Err(err);
            }
        };

        match outcome {
            Outcome::Abandoned(reason) => {
                self.emit(FestivalEvent::Abandoned {
                    performer: performer.id,
                    reason,
                });
                info!(performer = performer.id, %reason, waited_ms = timer.waited().as_millis(), "left without performing");
            }
            _ => self.pass_gate(performer),
        }
        Ok(outcome)
    }

    fn admit(&self, performer: &Performer) -> Result<(), SchedulerError> {
        let mut venue = self.venue.lock();
        let seat = venue.seat_mut(performer.id)?;
        if seat.role != performer.role {
            return Err(SchedulerError::invariant(format!(
                "performer {} is registered as {} but arrived as {}",
                performer.id, seat.role, performer.role
            )));
        }
        if seat.scheduled {
            return Err(SchedulerError::invariant(format!(
                "performer {} scheduled twice",
                performer.id
            )));
        }
        seat.scheduled = true;
        Ok(())
    }

    fn run_musician(&self, performer: &Performer, timer: &ImpatienceTimer) -> Result<Outcome, SchedulerError> {
        let required = performer.affinity.required_kind();
        let mut venue = self.venue.lock();
        let waited = timer.wait(self.stage_condvar(required), &mut venue, |v| {
            v.stages.free_matching(required) > 0
        });
        if waited == WaitOutcome::TimedOut {
            return Ok(Outcome::Abandoned(AbandonReason::Impatience));
        }
        let stage = match required {
            Some(kind) => venue.stages.acquire_typed(kind),
            None => venue.stages.acquire(self.decisions.preferred_kind()),
        }
        .ok_or_else(|| {
            SchedulerError::invariant(format!(
                "no free stage for performer {} after a successful wait",
                performer.id
            ))
        })?;
        venue.set_status(performer.id, PerformerStatus::PerformingSolo(stage))?;
        drop(venue);

        let duration = self
            .decisions
            .performance_time(self.limits.min_performance, self.limits.max_performance);
        self.announce_start(performer, stage, duration);

        let mut finish = Deadline::after(Instant::now(), duration);
        let partner = match self.await_singer(performer, stage, finish) {
            Ok(partner) => partner,
            Err(err) => {
                // Give the stage back so nobody parks on it forever.
                if let Err(cleanup) = self.end_musician_performance(performer, stage, None) {
                    warn!(performer = performer.id, error = %cleanup, "stage cleanup failed");
                }
                return Err(err);
            }
        };
        if partner.is_some() {
            finish = finish.extended_by(self.limits.join_bonus);
        }
        finish.sleep_until();

        self.end_musician_performance(performer, stage, partner)?;
        Ok(Outcome::Solo { stage, partner })
    }

    /// Race the rendezvous queue against the performance timer. At most one
    /// singer is claimed.
    fn await_singer(
        &self,
        performer: &Performer,
        stage: Stage,
        finish: Deadline,
    ) -> Result<Option<PerformerId>, SchedulerError> {
        while let Some(singer) = self.rendezvous.claim_until(finish) {
            let claimed = self.venue.lock().claim(performer.id, singer)?;
            if claimed {
                self.emit(FestivalEvent::SingerJoined {
                    singer,
                    musician: performer.id,
                    stage,
                    bonus: self.limits.join_bonus,
                });
                info!(
                    singer,
                    musician = performer.id,
                    bonus_ms = self.limits.join_bonus.as_millis(),
                    "singer joined; performance extended"
                );
                return Ok(Some(singer));
            }
            debug!(singer, musician = performer.id, "discarded stale rendezvous entry");
        }
        Ok(None)
    }

    fn end_musician_performance(
        &self,
        performer: &Performer,
        stage: Stage,
        partner: Option<PerformerId>,
    ) -> Result<(), SchedulerError> {
        // The seat table is always settled and waiters always woken, even
        // when a check below fails.
        let mut venue = self.venue.lock();
        let mut result = venue.stages.release(stage);
        if let Ok(seat) = venue.seat_mut(performer.id) {
            seat.status = PerformerStatus::NotPerforming;
            seat.partner = None;
        }
        if let Some(singer) = partner {
            result = result.and(venue.finish_hosting(performer.id, singer));
        }
        venue.recount();
        let released = venue.release_unhostable();
        if result.is_ok() {
            // Recorded before the partner can observe its release.
            self.emit(FestivalEvent::PerformanceFinished {
                performer: performer.id,
                stage,
                partner,
            });
        }
        drop(venue);

        self.notify_stage_freed(stage.kind);
        self.singer_released.notify_all();
        for singer in &released {
            warn!(singer, musician = performer.id, "no musician left to host singer; releasing");
        }
        result?;
        info!(performer = performer.id, stage = stage.id, ?partner, "performance finished");
        Ok(())
    }

    fn run_singer(&self, performer: &Performer, timer: &ImpatienceTimer) -> Result<Outcome, SchedulerError> {
        let total = usize::try_from(self.limits.total_stages()).unwrap_or(usize::MAX);
        let mut venue = self.venue.lock();
        let waited = timer.wait(&self.singer_slot_freed, &mut venue, |v| {
            v.tallies.singers_active < total
        });
        if waited == WaitOutcome::TimedOut {
            return Ok(Outcome::Abandoned(AbandonReason::Impatience));
        }

        let path = singer_path(
            self.decisions.prefer_solo(),
            venue.tallies.free_stages,
            venue.tallies.can_host_singer(),
        );
        match path {
            None => Ok(Outcome::Abandoned(AbandonReason::NoVenue)),
            Some(SingerPath::Solo) => {
                let stage = venue
                    .stages
                    .acquire(self.decisions.preferred_kind())
                    .ok_or_else(|| {
                        SchedulerError::invariant(format!(
                            "free stage vanished under the lock for singer {}",
                            performer.id
                        ))
                    })?;
                venue.set_status(performer.id, PerformerStatus::PerformingSolo(stage))?;
                drop(venue);
                self.sing_solo(performer, stage)
            }
            Some(SingerPath::Join) => {
                let ticket = venue.next_ticket;
                venue.next_ticket += 1;
                venue.set_status(
                    performer.id,
                    PerformerStatus::JoinedAsSinger { host: None, ticket },
                )?;
                drop(venue);
                self.join_musician(performer)
            }
        }
    }

    fn sing_solo(&self, performer: &Performer, stage: Stage) -> Result<Outcome, SchedulerError> {
        let duration = self
            .decisions
            .performance_time(self.limits.min_performance, self.limits.max_performance);
        self.announce_start(performer, stage, duration);
        thread::sleep(duration);

        let mut venue = self.venue.lock();
        venue.stages.release(stage)?;
        venue.set_status(performer.id, PerformerStatus::NotPerforming)?;
        // Recorded before the next holder can acquire the stage.
        self.emit(FestivalEvent::PerformanceFinished {
            performer: performer.id,
            stage,
            partner: None,
        });
        drop(venue);
        self.notify_stage_freed(stage.kind);

        info!(performer = performer.id, stage = stage.id, "solo performance finished");
        Ok(Outcome::Solo {
            stage,
            partner: None,
        })
    }

    fn join_musician(&self, performer: &Performer) -> Result<Outcome, SchedulerError> {
        self.rendezvous.publish(performer.id);
        self.emit(FestivalEvent::JoinRequested {
            singer: performer.id,
        });
        debug!(singer = performer.id, "published to rendezvous queue");

        let mut venue = self.venue.lock();
        self.singer_released
            .wait_while(&mut venue, |v| v.is_waiting_to_join(performer.id));
        let host = venue.seat_mut(performer.id)?.partner.take();
        drop(venue);

        match host {
            Some(host) => Ok(Outcome::Joined { host }),
            None => {
                self.rendezvous.withdraw(performer.id);
                Ok(Outcome::Abandoned(AbandonReason::Unpaired))
            }
        }
    }

    fn pass_gate(&self, performer: &Performer) {
        let pass = self.gate.enter();
        self.emit(FestivalEvent::GateEntered {
            performer: performer.id,
        });
        debug!(performer = performer.id, occupancy = self.gate.occupancy(), "entered coordinator gate");
        if !self.limits.collection.is_zero() {
            thread::sleep(self.limits.collection);
        }
        self.emit(FestivalEvent::GateExited {
            performer: performer.id,
        });
        drop(pass);
        info!(performer = performer.id, "left the festival");
    }

    fn announce_start(&self, performer: &Performer, stage: Stage, duration: Duration) {
        self.emit(FestivalEvent::StageAcquired {
            performer: performer.id,
            stage,
        });
        self.emit(FestivalEvent::PerformanceStarted {
            performer: performer.id,
            stage,
            duration,
        });
        info!(
            performer = performer.id,
            role = %performer.role,
            stage = stage.id,
            kind = %stage.kind,
            duration_ms = duration.as_millis(),
            "performance started"
        );
    }

    const fn stage_condvar(&self, kind: Option<StageKind>) -> &Condvar {
        match kind {
            Some(StageKind::Acoustic) => &self.acoustic_freed,
            Some(StageKind::Electric) => &self.electric_freed,
            None => &self.any_stage_freed,
        }
    }

    fn notify_stage_freed(&self, kind: StageKind) {
        self.stage_condvar(Some(kind)).notify_all();
        self.any_stage_freed.notify_all();
        // Singers waiting for a slot may now have a stage to pick.
        self.singer_slot_freed.notify_all();
    }

    fn emit(&self, event: FestivalEvent) {
        self.events.record(EventRecord {
            at: self.clock.elapsed(),
            event,
        });
    }
}
