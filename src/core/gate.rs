//! Bounded-concurrency gate for the post-performance activity.

use crate::core::SchedulerError;
use crate::{Condvar, Mutex};

#[derive(Debug, Default)]
struct GateState {
    holders: usize,
    peak: usize,
}

/// Counting gate of fixed capacity. Independent of stage allocation; no
/// ordering among waiters.
#[derive(Debug)]
pub struct CoordinatorGate {
    capacity: usize,
    state: Mutex<GateState>,
    freed: Condvar,
}

/// A held gate slot. Dropping it exits the gate.
#[derive(Debug)]
#[must_use = "dropping the pass exits the gate immediately"]
pub struct GatePass<'a> {
    gate: &'a CoordinatorGate,
}

impl CoordinatorGate {
    /// Gate admitting at most `capacity` holders at once.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, SchedulerError> {
        if capacity == 0 {
            return Err(SchedulerError::InvalidConfig(
                "coordinator gate capacity must be greater than 0".into(),
            ));
        }
        Ok(Self {
            capacity,
            state: Mutex::new(GateState::default()),
            freed: Condvar::new(),
        })
    }

    /// Block until a slot is free, then take it.
    pub fn enter(&self) -> GatePass<'_> {
        let mut state = self.state.lock();
        self.freed
            .wait_while(&mut state, |state| state.holders >= self.capacity);
        state.holders += 1;
        state.peak = state.peak.max(state.holders);
        GatePass { gate: self }
    }

    /// Take a slot only if one is free right now.
    pub fn try_enter(&self) -> Option<GatePass<'_>> {
        let mut state = self.state.lock();
        if state.holders >= self.capacity {
            return None;
        }
        state.holders += 1;
        state.peak = state.peak.max(state.holders);
        Some(GatePass { gate: self })
    }

    fn exit(&self) {
        {
            let mut state = self.state.lock();
            state.holders = state.holders.saturating_sub(1);
        }
        self.freed.notify_one();
    }

    /// Configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current holders.
    #[must_use]
    pub fn occupancy(&self) -> usize {
        self.state.lock().holders
    }

    /// Highest simultaneous occupancy observed.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.state.lock().peak
    }
}

impl Drop for GatePass<'_> {
    fn drop(&mut self) {
        self.gate.exit();
    }
}
