//! Festival configuration and performer rosters.

pub mod festival;
pub mod roster;

pub use festival::FestivalConfig;
pub use roster::{Roster, RosterEntry};
