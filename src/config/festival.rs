//! Festival limits and timings.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::FestivalLimits;

const fn default_join_bonus_ms() -> u64 {
    2_000
}

const fn default_collection_ms() -> u64 {
    2_000
}

/// Stage counts, gate capacity and timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FestivalConfig {
    /// Acoustic stage count.
    pub acoustic_stages: u32,
    /// Electric stage count.
    pub electric_stages: u32,
    /// Coordinators available for the post-performance activity.
    pub coordinators: usize,
    /// Shortest performance.
    pub min_performance_ms: u64,
    /// Longest performance.
    pub max_performance_ms: u64,
    /// How long a performer waits before leaving.
    pub max_wait_ms: u64,
    /// Extension a musician gets when a singer joins.
    #[serde(default = "default_join_bonus_ms")]
    pub join_bonus_ms: u64,
    /// Time spent with a coordinator after performing.
    #[serde(default = "default_collection_ms")]
    pub collection_ms: u64,
}

impl Default for FestivalConfig {
    fn default() -> Self {
        Self {
            acoustic_stages: 1,
            electric_stages: 1,
            coordinators: 1,
            min_performance_ms: 2_000,
            max_performance_ms: 5_000,
            max_wait_ms: 5_000,
            join_bonus_ms: default_join_bonus_ms(),
            collection_ms: default_collection_ms(),
        }
    }
}

impl FestivalConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.acoustic_stages == 0 && self.electric_stages == 0 {
            return Err("at least one acoustic or electric stage is required".into());
        }
        if self.acoustic_stages.checked_add(self.electric_stages).is_none() {
            return Err(format!(
                "acoustic_stages ({}) plus electric_stages ({}) overflows the stage numbering",
                self.acoustic_stages, self.electric_stages
            ));
        }
        if self.coordinators == 0 {
            return Err("coordinators must be greater than 0".into());
        }
        if self.max_wait_ms == 0 {
            return Err("max_wait_ms must be greater than 0".into());
        }
        if self.max_performance_ms == 0 {
            return Err("max_performance_ms must be greater than 0".into());
        }
        if self.min_performance_ms > self.max_performance_ms {
            return Err(format!(
                "min_performance_ms ({}) exceeds max_performance_ms ({})",
                self.min_performance_ms, self.max_performance_ms
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `.env` if present, then read `FESTIVAL_*` variables over the
    /// defaults and validate.
    ///
    /// Recognized: `FESTIVAL_ACOUSTIC_STAGES`, `FESTIVAL_ELECTRIC_STAGES`,
    /// `FESTIVAL_COORDINATORS`, `FESTIVAL_MIN_PERFORMANCE_MS`,
    /// `FESTIVAL_MAX_PERFORMANCE_MS`, `FESTIVAL_MAX_WAIT_MS`,
    /// `FESTIVAL_JOIN_BONUS_MS`, `FESTIVAL_COLLECTION_MS`.
    pub fn from_env() -> Result<Self, String> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();
        let base = Self::default();
        let cfg = Self {
            acoustic_stages: env_or("FESTIVAL_ACOUSTIC_STAGES", base.acoustic_stages)?,
            electric_stages: env_or("FESTIVAL_ELECTRIC_STAGES", base.electric_stages)?,
            coordinators: env_or("FESTIVAL_COORDINATORS", base.coordinators)?,
            min_performance_ms: env_or("FESTIVAL_MIN_PERFORMANCE_MS", base.min_performance_ms)?,
            max_performance_ms: env_or("FESTIVAL_MAX_PERFORMANCE_MS", base.max_performance_ms)?,
            max_wait_ms: env_or("FESTIVAL_MAX_WAIT_MS", base.max_wait_ms)?,
            join_bonus_ms: env_or("FESTIVAL_JOIN_BONUS_MS", base.join_bonus_ms)?,
            collection_ms: env_or("FESTIVAL_COLLECTION_MS", base.collection_ms)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Runtime view with `Duration` fields.
    #[must_use]
    pub const fn limits(&self) -> FestivalLimits {
        FestivalLimits {
            acoustic_stages: self.acoustic_stages,
            electric_stages: self.electric_stages,
            coordinators: self.coordinators,
            min_performance: Duration::from_millis(self.min_performance_ms),
            max_performance: Duration::from_millis(self.max_performance_ms),
            max_wait: Duration::from_millis(self.max_wait_ms),
            join_bonus: Duration::from_millis(self.join_bonus_ms),
            collection: Duration::from_millis(self.collection_ms),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, fallback: T) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{key}={raw:?} is invalid: {e}")),
        Err(_) => Ok(fallback),
    }
}
