//! Performer identity, roles, status and terminal outcomes.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::stage_pool::{Stage, StageKind};

/// Performer identifier, 1-based in roster order.
pub type PerformerId = u32;

/// What a performer does on stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May perform solo or join a performing musician.
    Singer,
    /// Performs solo and may host one singer per performance.
    Musician,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Singer => "singer",
            Self::Musician => "musician",
        })
    }
}

/// Which stages a musician can play on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageAffinity {
    /// Acoustic stages only.
    AcousticOnly,
    /// Electric stages only.
    ElectricOnly,
    /// Any stage, chosen by randomized preference.
    Either,
}

impl StageAffinity {
    /// The single kind this affinity is restricted to, if any.
    #[must_use]
    pub const fn required_kind(self) -> Option<StageKind> {
        match self {
            Self::AcousticOnly => Some(StageKind::Acoustic),
            Self::ElectricOnly => Some(StageKind::Electric),
            Self::Either => None,
        }
    }
}

/// Instrument code as written in a roster: `s` singer, `v` violin
/// (acoustic only), `b` bass (electric only), anything else plays on either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument(pub char);

impl Instrument {
    /// Role implied by the instrument.
    #[must_use]
    pub const fn role(self) -> Role {
        match self.0 {
            's' => Role::Singer,
            _ => Role::Musician,
        }
    }

    /// Stage affinity implied by the instrument. Singers report `Either`;
    /// they pick a stage kind per request.
    #[must_use]
    pub const fn affinity(self) -> StageAffinity {
        match self.0 {
            'v' => StageAffinity::AcousticOnly,
            'b' => StageAffinity::ElectricOnly,
            _ => StageAffinity::Either,
        }
    }
}

/// One actor in the festival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    /// Identifier.
    pub id: PerformerId,
    /// Display name.
    pub name: String,
    /// Singer or musician.
    pub role: Role,
    /// Stage restriction (musicians only).
    pub affinity: StageAffinity,
    /// Arrival offset from festival start.
    pub arrival: Duration,
}

impl Performer {
    /// A singer.
    pub fn singer(id: PerformerId, name: impl Into<String>, arrival: Duration) -> Self {
        Self {
            id,
            name: name.into(),
            role: Role::Singer,
            affinity: StageAffinity::Either,
            arrival,
        }
    }

    /// A musician with the given stage affinity.
    pub fn musician(
        id: PerformerId,
        name: impl Into<String>,
        affinity: StageAffinity,
        arrival: Duration,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role: Role::Musician,
            affinity,
            arrival,
        }
    }

    /// Build from a roster instrument code.
    pub fn from_instrument(
        id: PerformerId,
        name: impl Into<String>,
        instrument: Instrument,
        arrival: Duration,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            role: instrument.role(),
            affinity: instrument.affinity(),
            arrival,
        }
    }
}

/// Shared, lock-guarded status of a performer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformerStatus {
    /// Not on a stage and not attached to anyone.
    NotPerforming,
    /// Holding a stage.
    PerformingSolo(Stage),
    /// A singer waiting for, or attached to, a host musician.
    JoinedAsSinger {
        /// The musician that claimed this singer, once claimed.
        host: Option<PerformerId>,
        /// Join order; larger is newer.
        ticket: u64,
    },
}

/// Why a performer left without performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbandonReason {
    /// Patience ran out while waiting.
    Impatience,
    /// A singer found neither a free stage nor a musician able to host.
    NoVenue,
    /// A joined singer was released because no musician remained to claim it.
    Unpaired,
}

impl fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Impatience => "impatience",
            Self::NoVenue => "no stage or host available",
            Self::Unpaired => "no musician claimed the singer",
        })
    }
}

/// Terminal result of one performer's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Left without performing; skipped the coordinator gate.
    Abandoned(AbandonReason),
    /// Performed on its own stage; a musician may have hosted a singer.
    Solo {
        /// The stage used.
        stage: Stage,
        /// Singer that joined (musicians only).
        partner: Option<PerformerId>,
    },
    /// A singer that performed alongside a host musician.
    Joined {
        /// The host musician.
        host: PerformerId,
    },
}

impl Outcome {
    /// Whether the performer performed (and therefore passed the gate).
    #[must_use]
    pub const fn performed(&self) -> bool {
        !matches!(self, Self::Abandoned(_))
    }
}
