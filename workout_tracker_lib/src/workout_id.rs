use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ids keep the shape of the last 10 digits of a millisecond timestamp.
const ID_MODULUS: u64 = 10_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkoutId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for WorkoutId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Hands out strictly increasing numeric ids.
///
/// The candidate id is taken from the clock, but never goes below one past the largest
/// id seen so far, so two ids from the same generator never collide, even within the
/// same millisecond or after the truncated timestamp wraps around.
#[derive(Debug, Clone, Default)]
pub struct WorkoutIdGenerator {
    last: Option<u64>,
}

impl WorkoutIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the generator aware of an existing id. Ids that are not numbers below
    /// `ID_MODULUS` are never produced from the clock and are ignored.
    pub fn observe(&mut self, id: &WorkoutId) {
        match id.as_str().parse::<u64>() {
            Ok(value) if value < ID_MODULUS => {
                self.last = Some(self.last.map_or(value, |last| last.max(value)));
            }
            _ => {}
        }
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> WorkoutId {
        let candidate = now.timestamp_millis().rem_euclid(ID_MODULUS as i64) as u64;
        let value = match self.last {
            Some(last) => candidate.max(last.saturating_add(1)),
            None => candidate,
        };
        self.last = Some(value);
        WorkoutId(format!("{value:010}"))
    }
}
