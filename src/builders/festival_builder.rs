//! Build a [`Festival`] from configuration.

use std::sync::Arc;

use crate::config::{FestivalConfig, Roster};
use crate::core::{
    DecisionSource, EventSink, Festival, RandomDecisions, SchedulerError, TracingEventSink,
};

/// Assembles a festival; defaults to random decisions and tracing output.
pub struct FestivalBuilder {
    config: FestivalConfig,
    decisions: Arc<dyn DecisionSource>,
    events: Arc<dyn EventSink>,
}

impl FestivalBuilder {
    /// Start from a configuration.
    #[must_use]
    pub fn new(config: FestivalConfig) -> Self {
        Self {
            config,
            decisions: Arc::new(RandomDecisions),
            events: Arc::new(TracingEventSink),
        }
    }

    /// Replace the decision source.
    #[must_use]
    pub fn with_decisions(mut self, decisions: impl DecisionSource + 'static) -> Self {
        self.decisions = Arc::new(decisions);
        self
    }

    /// Replace the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Validate the configuration and create the festival.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the configuration or roster is rejected.
    pub fn build(self, roster: &Roster) -> Result<Festival, SchedulerError> {
        self.config
            .validate()
            .map_err(|e| SchedulerError::InvalidConfig(format!("config invalid: {e}")))?;
        Festival::new(self.config.limits(), roster, self.decisions, self.events)
    }
}

/// Festival with default decisions and tracing output.
///
/// # Errors
///
/// `InvalidConfig` if the configuration or roster is rejected.
pub fn build_festival(cfg: &FestivalConfig, roster: &Roster) -> Result<Festival, SchedulerError> {
    FestivalBuilder::new(cfg.clone()).build(roster)
}
