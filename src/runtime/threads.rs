//! One OS thread per performer, and the join point.

use std::any::Any;
use std::thread;

use tracing::{error, info};

use crate::config::Roster;
use crate::core::{Festival, Outcome, PerformerId, SchedulerError};

/// Spawn a named thread per performer, wait for every one of them and
/// collect outcomes in roster order.
///
/// # Errors
///
/// The first failure in roster order: a performer's own error, a panic, or a
/// thread that could not be spawned. Every spawned thread is joined first.
pub fn run_performers(
    festival: &Festival,
    roster: &Roster,
) -> Result<Vec<(PerformerId, Outcome)>, SchedulerError> {
    let results = thread::scope(|scope| {
        let handles: Vec<_> = roster
            .performers()
            .iter()
            .map(|performer| {
                let handle = thread::Builder::new()
                    .name(format!("performer-{}", performer.id))
                    .spawn_scoped(scope, move || festival.perform(performer));
                (performer.id, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(id, handle)| {
                let outcome = match handle {
                    Ok(handle) => handle
                        .join()
                        .unwrap_or_else(|payload| Err(panicked(id, payload.as_ref()))),
                    Err(e) => Err(SchedulerError::Runtime(format!(
                        "failed to spawn thread for performer {id}: {e}"
                    ))),
                };
                (id, outcome)
            })
            .collect::<Vec<_>>()
    });

    let mut outcomes = Vec::with_capacity(results.len());
    let mut first_error = None;
    for (id, result) in results {
        match result {
            Ok(outcome) => outcomes.push((id, outcome)),
            Err(err) => {
                error!(performer = id, error = %err, "performer failed");
                first_error.get_or_insert(err);
            }
        }
    }
    if let Some(err) = first_error {
        return Err(err);
    }

    info!(
        run_id = %festival.run_id(),
        performers = outcomes.len(),
        performed = outcomes.iter().filter(|(_, o)| o.performed()).count(),
        "all performers finished"
    );
    Ok(outcomes)
}

fn panicked(id: PerformerId, payload: &(dyn Any + Send)) -> SchedulerError {
    let message = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    SchedulerError::PerformerPanicked(format!("performer {id}: {message}"))
}
