//! Async entry points for drivers running on tokio.
//!
//! Performers block on condvars, so both adapters move the work onto the
//! blocking pool with `spawn_blocking`.

use std::sync::Arc;

use crate::config::Roster;
use crate::core::{Festival, FestivalReport, Outcome, Performer, SchedulerError};

/// Run one performer on tokio's blocking pool.
///
/// # Errors
///
/// The performer's own error, or `Runtime` if the blocking task failed.
pub async fn perform_async(
    festival: Arc<Festival>,
    performer: Performer,
) -> Result<Outcome, SchedulerError> {
    tokio::task::spawn_blocking(move || festival.perform(&performer))
        .await
        .map_err(|e| SchedulerError::Runtime(format!("performer task failed: {e}")))?
}

/// Run a whole roster on tokio's blocking pool.
///
/// # Errors
///
/// As [`Festival::run`], or `Runtime` if the blocking task failed.
pub async fn run_async(
    festival: Arc<Festival>,
    roster: Roster,
) -> Result<FestivalReport, SchedulerError> {
    tokio::task::spawn_blocking(move || festival.run(&roster))
        .await
        .map_err(|e| SchedulerError::Runtime(format!("festival task failed: {e}")))?
}
