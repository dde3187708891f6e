//! Builders to construct a festival from configuration.

pub mod festival_builder;

pub use festival_builder::{build_festival, FestivalBuilder};
