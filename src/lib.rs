//! # Festival Scheduler
//!
//! Concurrent scheduling of performers over a fixed set of stages.
//!
//! Each performer arrives at its own offset, waits a bounded time for a
//! stage, performs, and then passes through a small pool of coordinators
//! before leaving. Two kinds of performers compete for two kinds of stages:
//!
//! - **Musicians** perform solo. Some instruments are restricted to acoustic
//!   or electric stages; the rest take whichever kind is free, trying a
//!   randomly preferred kind first.
//! - **Singers** either take a stage of their own or join a musician who is
//!   already performing, extending that musician's act by a fixed bonus.
//!
//! A performer that cannot start before its patience runs out leaves
//! without performing. Nobody busy-waits: every wait is a condition
//! variable wait bounded by an absolute deadline.
//!
//! ## Synchronization domains
//!
//! | Domain | Protects | Lock |
//! |---|---|---|
//! | Allocation | stage pool, performer statuses, derived tallies | `Festival` venue mutex |
//! | Rendezvous | queue of singers waiting to join | [`core::RendezvousQueue`] |
//! | Coordinators | gate occupancy | [`core::CoordinatorGate`] |
//!
//! No thread holds two of these locks at once.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use festival_scheduler::builders::FestivalBuilder;
//! use festival_scheduler::config::{FestivalConfig, Roster};
//! use festival_scheduler::util::init_tracing;
//!
//! # fn main() -> festival_scheduler::core::AppResult<()> {
//! init_tracing();
//! let config = FestivalConfig::from_env().map_err(anyhow::Error::msg)?;
//! let roster = Roster::parse("Tanvi p 0\nSudhansh s 1\nKajol v 2\n")?;
//! let festival = FestivalBuilder::new(config).build(&roster)?;
//! let report = festival.run(&roster)?;
//! println!("{} performed, {} left early", report.performed(), report.abandoned());
//! # Ok(())
//! # }
//! ```
//!
//! For complete scenarios, see `tests/festival_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Condition variable with absolute-deadline waits.
pub mod condvar;
/// Stage allocation, pairing, gating and the performer lifecycle.
pub mod core;
/// Festival configuration and performer rosters.
pub mod config;
/// Builders to construct a festival from configuration.
pub mod builders;
/// Performer threads and async entry points.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use condvar::Condvar;
pub use parking_lot::{Mutex, MutexGuard};

pub use crate::core::{Festival, FestivalReport, Outcome, Performer, SchedulerError};
