//! Singer-to-musician handoff queue.
//!
//! Singers publish their id; any musician performing solo may claim the head.
//! The queue has its own lock and condvar and is never locked while the
//! allocation lock is held. A claimed id is only a candidate: the claimer
//! confirms it against the status table afterwards, and entries whose singer
//! has already been withdrawn are discarded there.

use std::collections::VecDeque;

use crate::core::impatience::{wait_until_ready, Deadline, WaitOutcome};
use crate::core::PerformerId;
use crate::{Condvar, Mutex};

/// FIFO of singers waiting for a host.
#[derive(Debug, Default)]
pub struct RendezvousQueue {
    waiting: Mutex<VecDeque<PerformerId>>,
    available: Condvar,
}

impl RendezvousQueue {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a singer and wake every waiting claimer; only one of them
    /// will get it.
    pub fn publish(&self, singer: PerformerId) {
        self.waiting.lock().push_back(singer);
        self.available.notify_all();
    }

    /// Pop the oldest singer, waiting until `deadline` for one to appear.
    pub fn claim_until(&self, deadline: Deadline) -> Option<PerformerId> {
        let mut waiting = self.waiting.lock();
        match wait_until_ready(&self.available, &mut waiting, deadline, |q| !q.is_empty()) {
            WaitOutcome::Ready => waiting.pop_front(),
            WaitOutcome::TimedOut => None,
        }
    }

    /// Pop the oldest singer without waiting.
    pub fn try_claim(&self) -> Option<PerformerId> {
        self.waiting.lock().pop_front()
    }

    /// Remove a singer's entry if it is still queued.
    pub fn withdraw(&self, singer: PerformerId) -> bool {
        let mut waiting = self.waiting.lock();
        let before = waiting.len();
        waiting.retain(|&queued| queued != singer);
        waiting.len() != before
    }

    /// Queued entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waiting.lock().len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waiting.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn soon(ms: u64) -> Deadline {
        Deadline::after(Instant::now(), Duration::from_millis(ms))
    }

    #[test]
    fn test_fifo_order() {
        let queue = RendezvousQueue::new();
        queue.publish(4);
        queue.publish(2);
        queue.publish(9);
        assert_eq!(queue.claim_until(soon(10)), Some(4));
        assert_eq!(queue.try_claim(), Some(2));
        assert_eq!(queue.claim_until(soon(10)), Some(9));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_claim_times_out_when_empty() {
        let queue = RendezvousQueue::new();
        let started = Instant::now();
        assert_eq!(queue.claim_until(soon(30)), None);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_claim_wakes_on_publish() {
        let queue = Arc::new(RendezvousQueue::new());
        let producer = Arc::clone(&queue);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            producer.publish(7);
        });
        assert_eq!(queue.claim_until(soon(2_000)), Some(7));
    }

    #[test]
    fn test_single_consumption_across_racing_claimers() {
        let queue = Arc::new(RendezvousQueue::new());
        let mut claimers = Vec::new();
        for _ in 0..4 {
            let queue = Arc::clone(&queue);
            claimers.push(thread::spawn(move || queue.claim_until(soon(200))));
        }
        thread::sleep(Duration::from_millis(20));
        queue.publish(1);

        let winners: Vec<_> = claimers
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(winners, vec![1]);
    }

    #[test]
    fn test_withdraw() {
        let queue = RendezvousQueue::new();
        queue.publish(1);
        queue.publish(2);
        assert!(queue.withdraw(1));
        assert!(!queue.withdraw(1));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.try_claim(), Some(2));
    }
}
