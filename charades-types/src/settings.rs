use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_DECK: &str = "classic";
pub const DEFAULT_ROUND_DURATION: u32 = 60;
pub const MIN_ROUND_DURATION: u32 = 10;
pub const MAX_ROUND_DURATION: u32 = 300;

/// A budget that can be switched off: skips per turn, rounds per match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Limit {
    Finite(u32),
    Unlimited,
}

impl Limit {
    /// Flip between finite and unlimited. Going back to finite restores `last_finite`.
    pub fn toggled(self, last_finite: u32) -> Self {
        match self {
            Limit::Finite(_) => Limit::Unlimited,
            Limit::Unlimited => Limit::Finite(last_finite),
        }
    }

    /// Spend one unit. Finite budgets floor at zero.
    pub fn consume(self) -> Self {
        match self {
            Limit::Finite(n) => Limit::Finite(n.saturating_sub(1)),
            Limit::Unlimited => Limit::Unlimited,
        }
    }

    pub fn is_exhausted(self) -> bool {
        matches!(self, Limit::Finite(0))
    }

    pub fn is_exceeded_by(self, value: u32) -> bool {
        matches!(self, Limit::Finite(cap) if value > cap)
    }
}

/// Share of a word's points granted for a second-chance recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SecondChanceMultiplier {
    Zero,
    Half,
    Full,
}

impl SecondChanceMultiplier {
    pub fn value(self) -> f64 {
        match self {
            SecondChanceMultiplier::Zero => 0.0,
            SecondChanceMultiplier::Half => 0.5,
            SecondChanceMultiplier::Full => 1.0,
        }
    }

    pub fn from_value(value: f64) -> Option<Self> {
        [Self::Zero, Self::Half, Self::Full]
            .into_iter()
            .find(|m| (m.value() - value).abs() < f64::EPSILON)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct GameSettings {
    pub round_duration: u32, // seconds per turn
    pub skips_per_turn: Limit,
    pub last_finite_skips: u32,
    pub points_per_word: u32,
    pub total_rounds: Limit,
    pub last_finite_rounds: u32,
    pub selected_deck: String,
    pub custom_words: Vec<String>,
    pub second_chance_enabled: bool,
    pub second_chance_value: SecondChanceMultiplier,
    pub hints_enabled: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            round_duration: DEFAULT_ROUND_DURATION,
            skips_per_turn: Limit::Finite(3),
            last_finite_skips: 3,
            points_per_word: 1,
            total_rounds: Limit::Finite(3),
            last_finite_rounds: 3,
            selected_deck: DEFAULT_DECK.to_string(),
            custom_words: Vec::new(),
            second_chance_enabled: true,
            second_chance_value: SecondChanceMultiplier::Half,
            hints_enabled: true,
        }
    }
}

impl GameSettings {
    pub fn set_round_duration(&mut self, seconds: u32) {
        self.round_duration = seconds.clamp(MIN_ROUND_DURATION, MAX_ROUND_DURATION);
    }

    pub fn set_points_per_word(&mut self, points: u32) {
        self.points_per_word = points.max(1);
    }

    pub fn set_skips_per_turn(&mut self, skips: Limit) {
        if let Limit::Finite(n) = skips {
            self.last_finite_skips = n;
        }
        self.skips_per_turn = skips;
    }

    pub fn set_total_rounds(&mut self, rounds: Limit) {
        let rounds = match rounds {
            Limit::Finite(n) => Limit::Finite(n.max(1)),
            Limit::Unlimited => Limit::Unlimited,
        };
        if let Limit::Finite(n) = rounds {
            self.last_finite_rounds = n;
        }
        self.total_rounds = rounds;
    }

    pub fn toggle_unlimited_skips(&mut self) {
        if let Limit::Finite(n) = self.skips_per_turn {
            self.last_finite_skips = n;
        }
        self.skips_per_turn = self.skips_per_turn.toggled(self.last_finite_skips);
    }

    pub fn toggle_unlimited_rounds(&mut self) {
        if let Limit::Finite(n) = self.total_rounds {
            self.last_finite_rounds = n;
        }
        self.total_rounds = self.total_rounds.toggled(self.last_finite_rounds.max(1));
    }

    pub fn set_second_chance(&mut self, enabled: bool, multiplier: SecondChanceMultiplier) {
        self.second_chance_enabled = enabled;
        self.second_chance_value = multiplier;
    }
}
