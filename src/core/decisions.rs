//! Sources of the scheduler's random choices.
//!
//! The festival asks for three things: which stage kind to try first, whether
//! a singer prefers a stage of its own over joining, and how long a
//! performance lasts. Keeping these behind a trait lets tests pin them.

use std::time::Duration;

use rand::Rng;

use crate::core::StageKind;

/// Supplies the festival's probabilistic decisions.
pub trait DecisionSource: Send + Sync {
    /// Stage kind to try first when either is acceptable.
    fn preferred_kind(&self) -> StageKind;
    /// Whether a singer tries a stage of its own before joining a musician.
    fn prefer_solo(&self) -> bool;
    /// Performance length in `[min, max]`.
    fn performance_time(&self, min: Duration, max: Duration) -> Duration;
}

/// Fair coin flips and uniform durations from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDecisions;

impl DecisionSource for RandomDecisions {
    fn preferred_kind(&self) -> StageKind {
        if rand::rng().random_bool(0.5) {
            StageKind::Acoustic
        } else {
            StageKind::Electric
        }
    }

    fn prefer_solo(&self) -> bool {
        rand::rng().random_bool(0.5)
    }

    fn performance_time(&self, min: Duration, max: Duration) -> Duration {
        if max <= min {
            return min;
        }
        let lo = u64::try_from(min.as_millis()).unwrap_or(u64::MAX);
        let hi = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(rand::rng().random_range(lo..=hi))
    }
}

/// The same answers every time.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecisions {
    preferred_kind: StageKind,
    prefer_solo: bool,
    performance: Option<Duration>,
}

impl FixedDecisions {
    /// Fixed stage preference and singer preference; performances last the
    /// configured minimum unless overridden.
    #[must_use]
    pub const fn new(preferred_kind: StageKind, prefer_solo: bool) -> Self {
        Self {
            preferred_kind,
            prefer_solo,
            performance: None,
        }
    }

    /// Every performance lasts exactly `performance`, clamped to the
    /// configured range.
    #[must_use]
    pub fn with_performance(mut self, performance: Duration) -> Self {
        self.performance = Some(performance);
        self
    }
}

impl DecisionSource for FixedDecisions {
    fn preferred_kind(&self) -> StageKind {
        self.preferred_kind
    }

    fn prefer_solo(&self) -> bool {
        self.prefer_solo
    }

    fn performance_time(&self, min: Duration, max: Duration) -> Duration {
        self.performance.map_or(min, |d| d.clamp(min, max.max(min)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_duration_within_range() {
        let source = RandomDecisions;
        let min = Duration::from_millis(20);
        let max = Duration::from_millis(40);
        for _ in 0..200 {
            let d = source.performance_time(min, max);
            assert!(d >= min && d <= max, "{d:?} outside range");
        }
        assert_eq!(source.performance_time(max, min), max);
    }

    #[test]
    fn test_fixed_decisions() {
        let source = FixedDecisions::new(StageKind::Electric, false)
            .with_performance(Duration::from_millis(500));
        assert_eq!(source.preferred_kind(), StageKind::Electric);
        assert!(!source.prefer_solo());
        assert_eq!(
            source.performance_time(Duration::from_millis(100), Duration::from_secs(1)),
            Duration::from_millis(500)
        );
        assert_eq!(
            source.performance_time(Duration::from_millis(100), Duration::from_millis(200)),
            Duration::from_millis(200)
        );
    }
}
