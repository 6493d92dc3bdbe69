use charades_types::{Score, Team, WordStatus};
use serde::Serialize;

/// Observable transitions. Audio, haptics and rendering subscribe to these;
/// the engine never waits on a handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        teams: usize,
        deck_size: usize,
    },
    TurnStarted {
        team_index: usize,
        round: u32,
    },
    CountdownTick {
        remaining: u32,
    },
    PlayStarted {
        team_index: usize,
    },
    WordMarked {
        word: String,
        status: WordStatus,
    },
    TimeWarning {
        seconds_remaining: u32,
    },
    TurnEnded {
        team_index: usize,
        words_played: usize,
    },
    SecondChanceStarted {
        queued: usize,
    },
    SecondChanceResolved {
        word: String,
        recovered: bool,
    },
    ScoresApplied {
        team_index: usize,
        points: Score,
        total: Score,
    },
    RoundStarted {
        round: u32,
    },
    GameCompleted {
        standings: Vec<Team>,
    },
    GameReset,
    PauseChanged {
        paused: bool,
    },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::TurnStarted { .. } => "turn_started",
            GameEvent::CountdownTick { .. } => "countdown_tick",
            GameEvent::PlayStarted { .. } => "play_started",
            GameEvent::WordMarked { .. } => "word_marked",
            GameEvent::TimeWarning { .. } => "time_warning",
            GameEvent::TurnEnded { .. } => "turn_ended",
            GameEvent::SecondChanceStarted { .. } => "second_chance_started",
            GameEvent::SecondChanceResolved { .. } => "second_chance_resolved",
            GameEvent::ScoresApplied { .. } => "scores_applied",
            GameEvent::RoundStarted { .. } => "round_started",
            GameEvent::GameCompleted { .. } => "game_completed",
            GameEvent::GameReset => "game_reset",
            GameEvent::PauseChanged { .. } => "pause_changed",
        }
    }
}

/// Event handler trait for processing game events
pub trait GameEventHandler {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}
