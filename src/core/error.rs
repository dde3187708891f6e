//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// Running out of patience is not an error; it is reported as
/// [`crate::core::Outcome::Abandoned`].
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Shared state contradicts itself (double release, unknown stage,
    /// counters out of step). Indicates a locking bug.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// Configuration rejected before scheduling begins.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A roster line could not be parsed.
    #[error("roster line {line}: {reason}")]
    Roster {
        /// 1-based line number in the roster text.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// A performer thread panicked before reaching a terminal state.
    #[error("performer panicked: {0}")]
    PerformerPanicked(String),
    /// Thread or runtime plumbing failed.
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl SchedulerError {
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
