//! Performer rosters.
//!
//! Text form, one performer per line:
//!
//! ```text
//! # name instrument arrival_secs
//! Tanvi p 0
//! Sudhansh s 1
//! Kajol v 3.5
//! ```
//!
//! Ids are assigned 1, 2, ... in line order, skipping blank and `#` lines.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Instrument, Performer, SchedulerError};

/// One roster entry as written in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Display name.
    pub name: String,
    /// Instrument code (`s`, `v`, `b`, ...).
    pub instrument: char,
    /// Arrival offset from festival start.
    pub arrival_secs: f64,
}

/// The performers of one festival, ids `1..=len` in order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Roster {
    performers: Vec<Performer>,
}

impl Roster {
    /// Wrap an already-built list.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the list is empty or ids are not `1..=len` in order.
    pub fn new(performers: Vec<Performer>) -> Result<Self, SchedulerError> {
        if performers.is_empty() {
            return Err(SchedulerError::InvalidConfig("roster is empty".into()));
        }
        for (expected, performer) in (1..).zip(&performers) {
            if performer.id != expected {
                return Err(SchedulerError::InvalidConfig(format!(
                    "performer `{}` has id {}, expected {expected}",
                    performer.name, performer.id
                )));
            }
        }
        Ok(Self { performers })
    }

    /// Parse the text form.
    ///
    /// # Errors
    ///
    /// `Roster { line, .. }` for a malformed line, `InvalidConfig` if no
    /// performers remain.
    pub fn parse(text: &str) -> Result<Self, SchedulerError> {
        let mut performers = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fail = |reason: String| SchedulerError::Roster {
                line: idx + 1,
                reason,
            };
            let fields: Vec<&str> = line.split_whitespace().collect();
            let [name, instrument, arrival] = fields.as_slice() else {
                return Err(fail(format!(
                    "expected `name instrument arrival_secs`, got {} fields",
                    fields.len()
                )));
            };
            let instrument = single_char(instrument).ok_or_else(|| {
                fail(format!("instrument `{instrument}` must be one character"))
            })?;
            let arrival_secs: f64 = arrival
                .parse()
                .map_err(|e| fail(format!("arrival `{arrival}`: {e}")))?;
            let arrival = arrival_from_secs(arrival_secs).map_err(fail)?;
            let id = next_id(performers.len())?;
            performers.push(Performer::from_instrument(
                id,
                *name,
                Instrument(instrument),
                arrival,
            ));
        }
        Self::new(performers)
    }

    /// Parse a JSON array of [`RosterEntry`].
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on malformed JSON, `Roster { line, .. }` (entry index,
    /// 1-based) on a bad arrival, or an empty list.
    pub fn from_json_str(input: &str) -> Result<Self, SchedulerError> {
        let entries: Vec<RosterEntry> = serde_json::from_str(input)
            .map_err(|e| SchedulerError::InvalidConfig(format!("roster parse error: {e}")))?;
        let mut performers = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.into_iter().enumerate() {
            let arrival = arrival_from_secs(entry.arrival_secs).map_err(|reason| {
                SchedulerError::Roster {
                    line: idx + 1,
                    reason,
                }
            })?;
            let id = next_id(performers.len())?;
            performers.push(Performer::from_instrument(
                id,
                entry.name,
                Instrument(entry.instrument),
                arrival,
            ));
        }
        Self::new(performers)
    }

    /// All performers in id order.
    #[must_use]
    pub fn performers(&self) -> &[Performer] {
        &self.performers
    }

    /// Performer by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Performer> {
        let idx = usize::try_from(id.checked_sub(1)?).ok()?;
        self.performers.get(idx)
    }

    /// Number of performers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.performers.len()
    }

    /// Whether there are no performers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.performers.is_empty()
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

fn arrival_from_secs(secs: f64) -> Result<Duration, String> {
    Duration::try_from_secs_f64(secs).map_err(|e| format!("arrival {secs}: {e}"))
}

fn next_id(count: usize) -> Result<u32, SchedulerError> {
    u32::try_from(count + 1)
        .map_err(|_| SchedulerError::InvalidConfig("too many performers".into()))
}
