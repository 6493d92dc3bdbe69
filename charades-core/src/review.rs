use charades_types::{GamePhase, WordResult, WordStatus};
use std::mem;
use tracing::info;

use crate::game_state::deck_items;
use crate::{Game, GameEvent, ScoringEngine};

impl Game {
    /// The turn history under review, if the game is in REVIEW.
    pub fn review_words(&self) -> Option<&[WordResult]> {
        match &self.phase {
            GamePhase::Review { words } => Some(words),
            _ => None,
        }
    }

    /// Reclassify one reviewed word as GotIt, Skipped or SecondChance.
    /// Any number of edits, in any order, until scores are applied.
    pub fn update_review_word(&mut self, index: usize, status: WordStatus) -> bool {
        if !status.is_reviewable() {
            return false;
        }
        let GamePhase::Review { words } = &mut self.phase else {
            return false;
        };

        match words.get_mut(index) {
            Some(word) => {
                word.status = status;
                true
            }
            None => false,
        }
    }

    /// REVIEW -> SCOREBOARD. Adds the turn's points to the active team, retires
    /// scored cards to the used pile and shuffles the rest back into the draw pile.
    /// The only path that raises a score during play.
    pub fn apply_review_scores(&mut self) -> bool {
        let GamePhase::Review { words } = &mut self.phase else {
            return false;
        };
        let words = mem::take(words);

        let summary = ScoringEngine::summarize(
            &words,
            &self.settings,
            self.current_team_index,
            self.current_round,
        );
        let total = match self.teams.get_mut(self.current_team_index) {
            Some(team) => {
                team.score = team.score.plus(summary.points.value());
                team.score
            }
            None => summary.points,
        };

        let (retired, returned) = deck_items(words);
        for item in retired {
            self.deck.retire(item);
        }
        self.deck.return_to_available(returned);

        info!(
            "Team {} scored {} (total {})",
            self.current_team_index, summary.points, total
        );
        self.event_bus.publish(GameEvent::ScoresApplied {
            team_index: self.current_team_index,
            points: summary.points,
            total,
        });
        self.phase = GamePhase::Scoreboard { summary };
        true
    }
}
