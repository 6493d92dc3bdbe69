use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

pub type TeamId = u32;

pub const MIN_TEAMS: usize = 2;
pub const MAX_TEAMS: usize = 5;

/// Non-negative point total. Every constructor and update goes through the clamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Score(f64);

impl Score {
    pub const ZERO: Score = Score(0.0);

    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Score(value)
        } else {
            Score::ZERO
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn plus(self, delta: f64) -> Self {
        Score::new(self.0 + delta)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub score: Score,
    pub color_index: u32,
}

impl Team {
    /// Returns `None` when the trimmed name is empty.
    pub fn new(id: TeamId, name: &str, color_index: u32) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            id,
            name: name.to_string(),
            score: Score::ZERO,
            color_index,
        })
    }

    pub fn rename(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.name = name.to_string();
        true
    }
}

/// The roster a fresh install starts with.
pub fn default_teams() -> Vec<Team> {
    (0..MIN_TEAMS as u32)
        .filter_map(|i| Team::new(i + 1, &format!("Team {}", i + 1), i))
        .collect()
}
