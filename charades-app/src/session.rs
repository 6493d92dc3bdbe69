use charades_core::{ClockTick, Game, GameEvent, GameEventHandler, PersistedState};
use charades_persistence::{GameStorage, StateStorage};
use charades_types::{Limit, SecondChanceMultiplier, TeamId, WordStatus};
use serde::{Deserialize, Serialize};
use std::mem;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, warn};

/// One line of input from the host UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    StartGame,
    StartTurn,
    FinishCountdown,
    MarkWord { status: WordStatus },
    EndTurn,
    ResolveSecondChance { recovered: bool },
    UpdateReviewWord { index: usize, status: WordStatus },
    ApplyReviewScores,
    NextTeam,
    TogglePause,
    /// The host went to the background. Pauses a running turn; never unpauses.
    FocusLost,
    ResetGame,
    AddTeam { name: String },
    RemoveTeam { id: TeamId },
    RenameTeam { id: TeamId, name: String },
    SetRoundDuration { seconds: u32 },
    SetSkipsPerTurn { skips: Limit },
    ToggleUnlimitedSkips,
    SetPointsPerWord { points: u32 },
    SetTotalRounds { rounds: Limit },
    ToggleUnlimitedRounds,
    SetSecondChance {
        enabled: bool,
        multiplier: SecondChanceMultiplier,
    },
    SetHints { enabled: bool },
    SelectDeck { name: String },
    SetDeckConfig {
        name: String,
        custom_words: Vec<String>,
    },
    AddCustomWord { word: String },
    RemoveCustomWord { word: String },
    Snapshot,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("could not parse command: {0}")]
    Parse(String),
    #[error("command not allowed right now")]
    Rejected,
}

/// What the host gets back after every command or clock tick
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Update {
        accepted: bool,
        events: Vec<GameEvent>,
        state: Box<PersistedState>,
    },
    Error {
        reason: String,
    },
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, SessionError> {
        serde_json::from_str(line).map_err(|e| SessionError::Parse(e.to_string()))
    }
}

#[derive(Clone, Default)]
struct EventBuffer {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventBuffer {
    fn drain(&self) -> Vec<GameEvent> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        mem::take(&mut *events)
    }
}

impl GameEventHandler for EventBuffer {
    fn handle_event(&mut self, event: GameEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// A running game bound to its save slot. Every accepted change is written back
/// before the reply goes out.
pub struct Session<S> {
    game: Game,
    storage: GameStorage<S>,
    events: EventBuffer,
}

impl<S: StateStorage> Session<S> {
    pub fn new(mut game: Game, storage: GameStorage<S>) -> Self {
        let events = EventBuffer::default();
        game.add_event_handler(Box::new(events.clone()));
        Self {
            game,
            storage,
            events,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn storage(&self) -> &GameStorage<S> {
        &self.storage
    }

    /// Parse and run one input line.
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        match Command::parse(line) {
            Ok(command) => self.handle(command).await,
            Err(e) => {
                warn!("{}", e);
                Reply::Error {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub async fn handle(&mut self, command: Command) -> Reply {
        debug!("Handling {:?}", command);
        let accepted = self.apply(&command).is_ok();
        if !accepted {
            debug!("Rejected {:?}", command);
        }
        self.finish(accepted).await
    }

    pub async fn clock_tick(&mut self, tick: ClockTick) -> Reply {
        self.game.clock_tick(tick);
        self.finish(true).await
    }

    /// The host lost the foreground.
    pub async fn focus_lost(&mut self) -> Reply {
        self.game.handle_focus_lost();
        self.finish(true).await
    }

    fn apply(&mut self, command: &Command) -> Result<(), SessionError> {
        let game = &mut self.game;
        let accepted = match command {
            Command::StartGame => game.start_game(),
            Command::StartTurn => game.start_turn(),
            Command::FinishCountdown => game.finish_countdown(),
            Command::MarkWord { status } => {
                // the engine floors the budget; the host refuses the skip
                if *status == WordStatus::Skipped && !game.can_skip() {
                    return Err(SessionError::Rejected);
                }
                game.mark_word(*status)
            }
            Command::EndTurn => game.end_turn(),
            Command::ResolveSecondChance { recovered } => game.resolve_second_chance(*recovered),
            Command::UpdateReviewWord { index, status } => {
                game.update_review_word(*index, *status)
            }
            Command::ApplyReviewScores => game.apply_review_scores(),
            Command::NextTeam => game.next_team(),
            Command::TogglePause => game.toggle_pause(),
            Command::FocusLost => {
                game.handle_focus_lost();
                true
            }
            Command::ResetGame => {
                game.reset_game();
                true
            }
            Command::AddTeam { name } => game.add_team(name).is_some(),
            Command::RemoveTeam { id } => game.remove_team(*id),
            Command::RenameTeam { id, name } => game.rename_team(*id, name),
            Command::SetRoundDuration { seconds } => {
                game.update_settings(|s| s.set_round_duration(*seconds));
                true
            }
            Command::SetSkipsPerTurn { skips } => {
                game.update_settings(|s| s.set_skips_per_turn(*skips));
                true
            }
            Command::ToggleUnlimitedSkips => {
                game.toggle_unlimited_skips();
                true
            }
            Command::SetPointsPerWord { points } => {
                game.update_settings(|s| s.set_points_per_word(*points));
                true
            }
            Command::SetTotalRounds { rounds } => {
                game.update_settings(|s| s.set_total_rounds(*rounds));
                true
            }
            Command::ToggleUnlimitedRounds => {
                game.toggle_unlimited_rounds();
                true
            }
            Command::SetSecondChance {
                enabled,
                multiplier,
            } => {
                game.update_settings(|s| s.set_second_chance(*enabled, *multiplier));
                true
            }
            Command::SetHints { enabled } => {
                game.update_settings(|s| s.hints_enabled = *enabled);
                true
            }
            Command::SelectDeck { name } => {
                if game.deck().library().deck(name).is_none() {
                    return Err(SessionError::Rejected);
                }
                let custom_words = game.settings().custom_words.clone();
                game.set_deck_config(name, custom_words);
                true
            }
            Command::SetDeckConfig { name, custom_words } => {
                if game.deck().library().deck(name).is_none() {
                    return Err(SessionError::Rejected);
                }
                game.set_deck_config(name, custom_words.clone());
                true
            }
            Command::AddCustomWord { word } => game.add_custom_word(word),
            Command::RemoveCustomWord { word } => game.remove_custom_word(word),
            Command::Snapshot => true,
        };

        if accepted {
            Ok(())
        } else {
            Err(SessionError::Rejected)
        }
    }

    async fn finish(&mut self, accepted: bool) -> Reply {
        let state = self.game.snapshot();
        if let Err(e) = self.storage.save(&state).await {
            warn!("Failed to save game: {}", e);
        }
        Reply::Update {
            accepted,
            events: self.events.drain(),
            state: Box::new(state),
        }
    }
}
