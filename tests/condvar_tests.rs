//! Integration tests for Condvar and deadline-bounded waits
//!
//! These exercise the waiting primitives the way performer threads use them.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use festival_scheduler::core::{wait_until_ready, Deadline, ImpatienceTimer, WaitOutcome};
use festival_scheduler::{Condvar, Mutex};

/// Free stages handed from releasing threads to waiting threads.
#[test]
fn test_stage_handoff_between_threads() {
    const WAITERS: usize = 6;

    let state = Arc::new((Mutex::new(0_usize), Condvar::new()));
    let mut handles = vec![];

    for _ in 0..WAITERS {
        let state = Arc::clone(&state);
        handles.push(thread::spawn(move || {
            let (lock, cvar) = &*state;
            let mut free = lock.lock();
            let timer = ImpatienceTimer::starting_now(Duration::from_secs(5));
            let outcome = timer.wait(cvar, &mut free, |free| *free > 0);
            if outcome == WaitOutcome::Ready {
                *free -= 1;
            }
            outcome
        }));
    }

    for _ in 0..WAITERS {
        thread::sleep(Duration::from_millis(5));
        let (lock, cvar) = &*state;
        *lock.lock() += 1;
        cvar.notify_all();
    }

    for handle in handles {
        assert_eq!(handle.join().unwrap(), WaitOutcome::Ready);
    }
    assert_eq!(*state.0.lock(), 0);
}

/// More waiters than releases: the surplus times out.
#[test]
fn test_surplus_waiters_time_out() {
    let state = Arc::new((Mutex::new(1_usize), Condvar::new()));
    let deadline = Deadline::after(Instant::now(), Duration::from_millis(60));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                let (lock, cvar) = &*state;
                let mut free = lock.lock();
                let outcome = wait_until_ready(cvar, &mut free, deadline, |free| *free > 0);
                if outcome == WaitOutcome::Ready {
                    *free -= 1;
                }
                outcome
            })
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let ready = outcomes.iter().filter(|o| **o == WaitOutcome::Ready).count();
    assert_eq!(ready, 1);
    assert!(deadline.has_passed());
}

/// The lock is released while a waiter is parked.
#[test]
fn test_wait_releases_lock() {
    let pair = Arc::new((Mutex::new(0), Condvar::new()));
    let pair2 = Arc::clone(&pair);

    let handle = thread::spawn(move || {
        let (lock, cvar) = &*pair2;
        let mut guard = lock.lock();
        cvar.wait_while(&mut guard, |value| *value == 0);
        *guard
    });

    thread::sleep(Duration::from_millis(20));
    {
        let (lock, cvar) = &*pair;
        *lock.lock() = 42;
        cvar.notify_one();
    }

    assert_eq!(handle.join().unwrap(), 42);
}

/// One deadline spans several waits.
#[test]
fn test_deadline_is_absolute_across_waits() {
    let mutex = Mutex::new(());
    let condvar = Condvar::new();
    let timer = ImpatienceTimer::starting_now(Duration::from_millis(40));

    let mut guard = mutex.lock();
    assert_eq!(timer.wait(&condvar, &mut guard, |_| false), WaitOutcome::TimedOut);
    let first = timer.waited();
    // A second wait on the same timer returns at once.
    assert_eq!(timer.wait(&condvar, &mut guard, |_| false), WaitOutcome::TimedOut);
    assert!(timer.waited() - first < Duration::from_millis(20));
    assert!(first >= Duration::from_millis(40));
}
