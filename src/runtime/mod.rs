//! Runtime adapters: performer threads and async entry points.

pub mod threads;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_bridge;

pub use threads::run_performers;
#[cfg(feature = "tokio-runtime")]
pub use tokio_bridge::{perform_async, run_async};
