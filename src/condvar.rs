//! Condition variable with absolute-deadline waits.
//!
//! Every blocking point in the festival (free stage, singer slot, rendezvous
//! claim, joined-singer release, coordinator slot) parks on one of these. The
//! wrapper keeps `parking_lot`'s no-poisoning semantics and adds the
//! deadline-based waits the impatience logic is written against.

use std::time::Instant;

use crate::MutexGuard;

pub use parking_lot::WaitTimeoutResult;

/// A condition variable paired with a [`crate::Mutex`].
///
/// Unlike `std::sync::Condvar`, this type does not implement poisoning.
///
/// # Examples
///
/// ```
/// use festival_scheduler::{Condvar, Mutex};
/// use std::sync::Arc;
/// use std::thread;
///
/// let pair = Arc::new((Mutex::new(false), Condvar::new()));
/// let pair2 = Arc::clone(&pair);
///
/// thread::spawn(move || {
///     let (lock, cvar) = &*pair2;
///     *lock.lock() = true;
///     cvar.notify_all();
/// });
///
/// let (lock, cvar) = &*pair;
/// let mut ready = lock.lock();
/// cvar.wait_while(&mut ready, |ready| !*ready);
/// assert!(*ready);
/// ```
#[derive(Debug, Default)]
pub struct Condvar {
    inner: parking_lot::Condvar,
}

impl Condvar {
    /// Creates a new condition variable.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: parking_lot::Condvar::new(),
        }
    }

    /// Blocks until notified. The lock is released while parked and
    /// re-acquired before returning; spurious wakeups are possible.
    #[inline]
    pub fn wait<T>(&self, guard: &mut MutexGuard<'_, T>) {
        self.inner.wait(guard);
    }

    /// Blocks while `condition` returns `true`.
    #[inline]
    pub fn wait_while<T, F>(&self, guard: &mut MutexGuard<'_, T>, condition: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        self.inner.wait_while(guard, condition);
    }

    /// Blocks until notified or until `deadline` is reached.
    ///
    /// A deadline already in the past returns immediately with
    /// `timed_out() == true`.
    #[inline]
    pub fn wait_until<T>(&self, guard: &mut MutexGuard<'_, T>, deadline: Instant) -> WaitTimeoutResult {
        self.inner.wait_until(guard, deadline)
    }

    /// Wakes one parked thread, if any.
    #[inline]
    pub fn notify_one(&self) {
        self.inner.notify_one();
    }

    /// Wakes every parked thread.
    #[inline]
    pub fn notify_all(&self) {
        self.inner.notify_all();
    }
}
