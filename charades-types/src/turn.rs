use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DeckItem, Limit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum WordStatus {
    GotIt,
    Skipped,
    SecondChance, // recovered after the timer, partial credit
    Recovered,    // legacy spelling of SecondChance
    Unplayed,
}

impl WordStatus {
    /// Statuses a team may assign while reviewing its turn
    pub fn is_reviewable(self) -> bool {
        matches!(
            self,
            WordStatus::GotIt | WordStatus::Skipped | WordStatus::SecondChance
        )
    }

    pub fn is_partial_credit(self) -> bool {
        matches!(self, WordStatus::SecondChance | WordStatus::Recovered)
    }

    /// Whether the card leaves play for the rest of the deck cycle once scored.
    pub fn retires_card(self) -> bool {
        self == WordStatus::GotIt || self.is_partial_credit()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WordResult {
    pub word: String,
    pub status: WordStatus,
    pub original_item: Option<DeckItem>,
}

impl WordResult {
    pub fn from_item(item: DeckItem, status: WordStatus) -> Self {
        Self {
            word: item.word.clone(),
            status,
            original_item: Some(item),
        }
    }

    /// The card this result came from, rebuilt from the word when the link is missing.
    pub fn into_deck_item(self) -> DeckItem {
        self.original_item.unwrap_or_else(|| DeckItem::new(&self.word))
    }
}

/// Sub-phases of a team's turn, each holding only what it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "sub_phase")]
#[ts(export)]
pub enum ActiveTurnState {
    Countdown {
        lead_in_remaining: u32,
        time_remaining: u32,
        skips_remaining: Limit,
    },
    Playing {
        time_remaining: u32,
        skips_remaining: Limit,
        current_word: Option<DeckItem>,
        words: Vec<WordResult>,
    },
    SecondChance {
        words: Vec<WordResult>,
        queue: Vec<usize>, // indices into `words`, in skip order
        cursor: usize,
    },
}

impl ActiveTurnState {
    pub fn name(&self) -> &'static str {
        match self {
            ActiveTurnState::Countdown { .. } => "countdown",
            ActiveTurnState::Playing { .. } => "playing",
            ActiveTurnState::SecondChance { .. } => "second_chance",
        }
    }

    pub fn words(&self) -> &[WordResult] {
        match self {
            ActiveTurnState::Countdown { .. } => &[],
            ActiveTurnState::Playing { words, .. } | ActiveTurnState::SecondChance { words, .. } => {
                words
            }
        }
    }

    pub fn current_word(&self) -> Option<&DeckItem> {
        match self {
            ActiveTurnState::Playing { current_word, .. } => current_word.as_ref(),
            _ => None,
        }
    }

    /// Seconds left on whichever clock this sub-phase runs, if any.
    pub fn clock_remaining(&self) -> Option<u32> {
        match self {
            ActiveTurnState::Countdown {
                lead_in_remaining, ..
            } => Some(*lead_in_remaining),
            ActiveTurnState::Playing { time_remaining, .. } => Some(*time_remaining),
            ActiveTurnState::SecondChance { .. } => None,
        }
    }

    /// The word awaiting a second-chance verdict.
    pub fn pending_recovery(&self) -> Option<&WordResult> {
        match self {
            ActiveTurnState::SecondChance {
                words,
                queue,
                cursor,
            } => queue.get(*cursor).and_then(|&index| words.get(index)),
            _ => None,
        }
    }
}
