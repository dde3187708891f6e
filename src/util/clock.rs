//! Time helpers.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, zero if the system clock is before it.
#[must_use]
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

/// Monotonic reference point for arrival offsets and event timestamps.
#[derive(Debug, Clone, Copy)]
pub struct FestivalClock {
    start: Instant,
}

impl FestivalClock {
    /// Clock starting now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// The start instant.
    #[must_use]
    pub const fn started_at(&self) -> Instant {
        self.start
    }

    /// Time since start.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Instant `offset` after start.
    #[must_use]
    pub fn instant_at(&self, offset: Duration) -> Instant {
        self.start.checked_add(offset).unwrap_or(self.start)
    }
}
