use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{ActiveTurnState, Score, WordResult};

/// Match phase. Payload always matches the tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "phase")]
#[ts(export)]
pub enum GamePhase {
    #[default]
    Setup,
    ReadyCheck,
    ActiveTurn { turn: ActiveTurnState },
    Review { words: Vec<WordResult> },
    Scoreboard { summary: TurnSummary },
}

impl GamePhase {
    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::Setup => "setup",
            GamePhase::ReadyCheck => "ready_check",
            GamePhase::ActiveTurn { .. } => "active_turn",
            GamePhase::Review { .. } => "review",
            GamePhase::Scoreboard { .. } => "scoreboard",
        }
    }

    pub fn active_turn(&self) -> Option<&ActiveTurnState> {
        match self {
            GamePhase::ActiveTurn { turn } => Some(turn),
            _ => None,
        }
    }

    pub fn is_active_turn(&self) -> bool {
        self.active_turn().is_some()
    }
}

/// What the scoreboard shows about the turn that just finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TurnSummary {
    pub team_index: usize,
    pub round: u32,
    pub points: Score,
    pub got_it: u32,
    pub second_chance: u32,
    pub skipped: u32,
}
