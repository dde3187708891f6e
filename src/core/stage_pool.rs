//! Typed stage pool: two ordered free-lists and the holder bookkeeping.
//!
//! The pool itself is not synchronized. It lives inside the festival's
//! allocation lock together with the performer status table, so every
//! check-then-take sequence is a single critical section.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

/// Stage identifier. Acoustic stages are numbered `1..=a`, electric stages
/// `a+1..=a+e`.
pub type StageId = u32;

/// The two kinds of stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Acoustic stage.
    Acoustic,
    /// Electric stage.
    Electric,
}

impl StageKind {
    /// The opposite kind, used for fallback.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Acoustic => Self::Electric,
            Self::Electric => Self::Acoustic,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acoustic => "acoustic",
            Self::Electric => "electric",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage handed out by the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stage {
    /// Stage number.
    pub id: StageId,
    /// Stage kind.
    pub kind: StageKind,
}

/// Preference with fallback: take `preferred` if it has a free stage,
/// else the other kind if that has one, else `None`.
///
/// Independent of any random source so callers can inject the preference.
#[must_use]
pub const fn choose_kind(
    preferred: StageKind,
    free_acoustic: usize,
    free_electric: usize,
) -> Option<StageKind> {
    let (first, second) = match preferred {
        StageKind::Acoustic => (free_acoustic, free_electric),
        StageKind::Electric => (free_electric, free_acoustic),
    };
    if first > 0 {
        Some(preferred)
    } else if second > 0 {
        Some(preferred.other())
    } else {
        None
    }
}

/// Free/occupied accounting for every stage.
///
/// A stage id is either in exactly one free-list or held, never both.
#[derive(Debug, Clone)]
pub struct StagePool {
    acoustic: VecDeque<StageId>,
    electric: VecDeque<StageId>,
    total_acoustic: usize,
    total_electric: usize,
    /// Indexed by `id - 1`.
    held: Vec<bool>,
}

impl StagePool {
    /// Create a pool with `acoustic` acoustic and `electric` electric stages,
    /// all free. Electric ids that would not fit in a `StageId` are dropped.
    #[must_use]
    pub fn new(acoustic: u32, electric: u32) -> Self {
        let acoustic_ids: VecDeque<StageId> = (1..=acoustic).collect();
        let electric_ids: VecDeque<StageId> = (1..=electric)
            .map_while(|n| acoustic.checked_add(n))
            .collect();
        Self {
            total_acoustic: acoustic_ids.len(),
            total_electric: electric_ids.len(),
            held: vec![false; acoustic_ids.len() + electric_ids.len()],
            acoustic: acoustic_ids,
            electric: electric_ids,
        }
    }

    /// Acquire a stage, trying `preferred` first and falling back to the
    /// other kind. `None` means both kinds are exhausted.
    pub fn acquire(&mut self, preferred: StageKind) -> Option<Stage> {
        let kind = choose_kind(preferred, self.acoustic.len(), self.electric.len())?;
        self.acquire_typed(kind)
    }

    /// Acquire strictly from one kind; no fallback.
    pub fn acquire_typed(&mut self, kind: StageKind) -> Option<Stage> {
        let id = self.free_list_mut(kind).pop_front()?;
        if let Some(slot) = self.slot(id) {
            self.held[slot] = true;
        }
        Some(Stage { id, kind })
    }

    /// Return a held stage to the back of its free-list.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` if the stage is unknown, its kind does not match,
    /// or it is not currently held.
    pub fn release(&mut self, stage: Stage) -> Result<(), SchedulerError> {
        let slot = self
            .slot(stage.id)
            .ok_or_else(|| SchedulerError::invariant(format!("unknown stage {}", stage.id)))?;
        if self.kind_of(stage.id) != Some(stage.kind) {
            return Err(SchedulerError::invariant(format!(
                "stage {} released as {} but is {:?}",
                stage.id,
                stage.kind,
                self.kind_of(stage.id)
            )));
        }
        if !self.held[slot] {
            return Err(SchedulerError::invariant(format!(
                "stage {} released while already free",
                stage.id
            )));
        }
        self.held[slot] = false;
        self.free_list_mut(stage.kind).push_back(stage.id);
        Ok(())
    }

    /// Kind of a stage id, if it exists.
    #[must_use]
    pub fn kind_of(&self, id: StageId) -> Option<StageKind> {
        let acoustic = u32::try_from(self.total_acoustic).ok()?;
        let total = u32::try_from(self.held.len()).ok()?;
        match id {
            0 => None,
            id if id <= acoustic => Some(StageKind::Acoustic),
            id if id <= total => Some(StageKind::Electric),
            _ => None,
        }
    }

    /// Free stages of one kind.
    #[must_use]
    pub fn free(&self, kind: StageKind) -> usize {
        match kind {
            StageKind::Acoustic => self.acoustic.len(),
            StageKind::Electric => self.electric.len(),
        }
    }

    /// Free stages matching an optional kind filter (`None` = any kind).
    #[must_use]
    pub fn free_matching(&self, kind: Option<StageKind>) -> usize {
        kind.map_or_else(|| self.free_total(), |kind| self.free(kind))
    }

    /// Free stages of both kinds.
    #[must_use]
    pub fn free_total(&self) -> usize {
        self.acoustic.len() + self.electric.len()
    }

    /// Configured stages of one kind.
    #[must_use]
    pub const fn total(&self, kind: StageKind) -> usize {
        match kind {
            StageKind::Acoustic => self.total_acoustic,
            StageKind::Electric => self.total_electric,
        }
    }

    /// Configured stages of both kinds.
    #[must_use]
    pub fn total_stages(&self) -> usize {
        self.held.len()
    }

    /// Stages of one kind currently held.
    #[must_use]
    pub fn occupied(&self, kind: StageKind) -> usize {
        self.held
            .iter()
            .zip(1..)
            .filter(|(held, id)| **held && self.kind_of(*id) == Some(kind))
            .count()
    }

    /// Whether a stage is currently held by a performer.
    #[must_use]
    pub fn is_held(&self, id: StageId) -> bool {
        self.slot(id).is_some_and(|slot| self.held[slot])
    }

    /// Verify the conservation law: per kind, `free + occupied == total`,
    /// no id is duplicated, and no free id is marked held.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` describing the first broken rule.
    pub fn check(&self) -> Result<(), SchedulerError> {
        let mut seen = vec![false; self.held.len()];
        for kind in [StageKind::Acoustic, StageKind::Electric] {
            let list = match kind {
                StageKind::Acoustic => &self.acoustic,
                StageKind::Electric => &self.electric,
            };
            for &id in list {
                let slot = self.slot(id).ok_or_else(|| {
                    SchedulerError::invariant(format!("free-list holds unknown stage {id}"))
                })?;
                if self.kind_of(id) != Some(kind) {
                    return Err(SchedulerError::invariant(format!(
                        "stage {id} is on the {kind} free-list"
                    )));
                }
                if seen[slot] {
                    return Err(SchedulerError::invariant(format!("stage {id} listed twice")));
                }
                if self.held[slot] {
                    return Err(SchedulerError::invariant(format!(
                        "stage {id} is both free and held"
                    )));
                }
                seen[slot] = true;
            }
            if self.free(kind) + self.occupied(kind) != self.total(kind) {
                return Err(SchedulerError::invariant(format!(
                    "{kind} stages: free {} + occupied {} != total {}",
                    self.free(kind),
                    self.occupied(kind),
                    self.total(kind)
                )));
            }
        }
        Ok(())
    }

    fn slot(&self, id: StageId) -> Option<usize> {
        let slot = usize::try_from(id.checked_sub(1)?).ok()?;
        (slot < self.held.len()).then_some(slot)
    }

    fn free_list_mut(&mut self, kind: StageKind) -> &mut VecDeque<StageId> {
        match kind {
            StageKind::Acoustic => &mut self.acoustic,
            StageKind::Electric => &mut self.electric,
        }
    }
}
