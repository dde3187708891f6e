//! Deadline-bounded waiting.
//!
//! A performer computes its deadline once, at arrival, and every later wait
//! is measured against that absolute instant. The wait loop re-checks its
//! condition after every wakeup, spurious or not, and once more after the
//! timer fires: a resource that is available at that moment wins over the
//! timeout.

use std::time::{Duration, Instant};

use crate::{Condvar, MutexGuard};

/// An absolute point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline at a fixed instant.
    #[must_use]
    pub const fn at(at: Instant) -> Self {
        Self { at }
    }

    /// `start + span`, saturating far in the future on overflow.
    #[must_use]
    pub fn after(start: Instant, span: Duration) -> Self {
        let at = start
            .checked_add(span)
            .unwrap_or_else(|| start + Duration::from_secs(60 * 60 * 24 * 365));
        Self { at }
    }

    /// The instant itself.
    #[must_use]
    pub const fn instant(&self) -> Instant {
        self.at
    }

    /// Time left, zero once passed.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Whether the deadline has been reached.
    #[must_use]
    pub fn has_passed(&self) -> bool {
        Instant::now() >= self.at
    }

    /// The same deadline pushed back by `extra`.
    #[must_use]
    pub fn extended_by(&self, extra: Duration) -> Self {
        Self::after(self.at, extra)
    }

    /// Sleep the current thread until the deadline.
    pub fn sleep_until(&self) {
        let left = self.remaining();
        if !left.is_zero() {
            std::thread::sleep(left);
        }
    }
}

/// Result of a deadline-bounded wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The condition held; the caller still owns the lock and may act on it.
    Ready,
    /// The deadline elapsed with the condition still false.
    TimedOut,
}

/// Wait on `condvar` until `ready` holds or `deadline` passes.
///
/// The caller's guard is held on return in both cases, so a `Ready` result
/// can be followed by the acquisition inside the same critical section.
pub fn wait_until_ready<T, F>(
    condvar: &Condvar,
    guard: &mut MutexGuard<'_, T>,
    deadline: Deadline,
    mut ready: F,
) -> WaitOutcome
where
    F: FnMut(&T) -> bool,
{
    loop {
        if ready(&**guard) {
            return WaitOutcome::Ready;
        }
        if condvar.wait_until(guard, deadline.instant()).timed_out() {
            return if ready(&**guard) {
                WaitOutcome::Ready
            } else {
                WaitOutcome::TimedOut
            };
        }
    }
}

/// A performer's patience, fixed at arrival.
#[derive(Debug, Clone, Copy)]
pub struct ImpatienceTimer {
    arrived_at: Instant,
    deadline: Deadline,
}

impl ImpatienceTimer {
    /// Start the timer at `arrived_at` with `patience` to spare.
    #[must_use]
    pub fn new(arrived_at: Instant, patience: Duration) -> Self {
        Self {
            arrived_at,
            deadline: Deadline::after(arrived_at, patience),
        }
    }

    /// Start the timer now.
    #[must_use]
    pub fn starting_now(patience: Duration) -> Self {
        Self::new(Instant::now(), patience)
    }

    /// When the performer arrived.
    #[must_use]
    pub const fn arrived_at(&self) -> Instant {
        self.arrived_at
    }

    /// When the performer gives up.
    #[must_use]
    pub const fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// How long the performer has waited so far.
    #[must_use]
    pub fn waited(&self) -> Duration {
        self.arrived_at.elapsed()
    }

    /// Wait for `ready` against this timer's deadline.
    pub fn wait<T, F>(&self, condvar: &Condvar, guard: &mut MutexGuard<'_, T>, ready: F) -> WaitOutcome
    where
        F: FnMut(&T) -> bool,
    {
        wait_until_ready(condvar, guard, self.deadline, ready)
    }
}
