use charades_types::{GameSettings, Score, Team, TurnSummary, WordResult, WordStatus};

pub struct ScoringEngine;

impl ScoringEngine {
    /// Points a single word is worth under the match settings
    pub fn word_points(status: WordStatus, settings: &GameSettings) -> f64 {
        let base = f64::from(settings.points_per_word);
        match status {
            WordStatus::GotIt => base,
            WordStatus::SecondChance | WordStatus::Recovered => {
                base * settings.second_chance_value.value()
            }
            WordStatus::Skipped | WordStatus::Unplayed => 0.0,
        }
    }

    /// Full credit for every GotIt plus the multiplier's share for every recovery
    pub fn turn_points(words: &[WordResult], settings: &GameSettings) -> f64 {
        words
            .iter()
            .map(|word| Self::word_points(word.status, settings))
            .sum()
    }

    pub fn summarize(
        words: &[WordResult],
        settings: &GameSettings,
        team_index: usize,
        round: u32,
    ) -> TurnSummary {
        let count = |pred: fn(WordStatus) -> bool| {
            words.iter().filter(|w| pred(w.status)).count() as u32
        };

        TurnSummary {
            team_index,
            round,
            points: Score::new(Self::turn_points(words, settings)),
            got_it: count(|s| s == WordStatus::GotIt),
            second_chance: count(WordStatus::is_partial_credit),
            skipped: count(|s| !s.retires_card()),
        }
    }

    /// Teams ordered by score, highest first. Equal scores keep roster order.
    /// Display only; turn order always follows the roster.
    pub fn standings(teams: &[Team]) -> Vec<Team> {
        let mut ranked = teams.to_vec();
        ranked.sort_by(|a, b| b.score.value().total_cmp(&a.score.value()));
        ranked
    }

    /// The single highest scorer, or `None` on a tie for first or an empty roster.
    pub fn winner(teams: &[Team]) -> Option<&Team> {
        let top = teams
            .iter()
            .max_by(|a, b| a.score.value().total_cmp(&b.score.value()))?;
        let tied = teams.iter().filter(|t| t.score == top.score).count();
        (tied == 1).then_some(top)
    }
}
