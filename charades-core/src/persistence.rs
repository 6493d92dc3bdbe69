//! What a save looks like, independent of when or where it is written.
//!
//! A saved game is a JSON envelope `{"version": N, "state": {...}}` stored under
//! [`STORAGE_KEY`]. Records from any other schema version are discarded whole.

use charades_types::{ActiveTurnState, DeckItem, GamePhase, GameSettings, Team, default_teams};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub const SCHEMA_VERSION: u32 = 2;
pub const STORAGE_KEY: &str = "charades-game-state";

/// Everything needed to rebuild a [`crate::Game`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub teams: Vec<Team>,
    pub settings: GameSettings,
    pub phase: GamePhase,
    pub current_team_index: usize,
    pub current_round: u32,
    pub is_paused: bool,
    pub is_game_over: bool,
    pub available_words: Vec<DeckItem>,
    pub used_words: Vec<DeckItem>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            teams: default_teams(),
            settings: GameSettings::default(),
            phase: GamePhase::Setup,
            current_team_index: 0,
            current_round: 1,
            is_paused: false,
            is_game_over: false,
            available_words: Vec::new(),
            used_words: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    state: T,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("saved game is not valid json: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("saved game has schema version {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("saved game state does not match the schema: {0}")]
    InvalidState(#[source] serde_json::Error),
    #[error("failed to encode game state: {0}")]
    Encode(#[source] serde_json::Error),
}

pub fn encode(state: &PersistedState) -> Result<String, CodecError> {
    serde_json::to_string(&Envelope {
        version: SCHEMA_VERSION,
        state,
    })
    .map_err(CodecError::Encode)
}

/// Unwrap the envelope, passing the raw state on only for the current version.
pub fn version_gate(raw: &str) -> Result<Value, CodecError> {
    let envelope: Envelope<Value> = serde_json::from_str(raw).map_err(CodecError::Malformed)?;
    if envelope.version != SCHEMA_VERSION {
        return Err(CodecError::VersionMismatch {
            found: envelope.version,
            expected: SCHEMA_VERSION,
        });
    }
    Ok(envelope.state)
}

pub fn decode(raw: &str) -> Result<PersistedState, CodecError> {
    let state = version_gate(raw)?;
    serde_json::from_value(state).map_err(CodecError::InvalidState)
}

/// Repairs applied to every loaded record: an interrupted turn always comes back
/// paused, and indices are pulled back into range.
pub fn normalize_on_load(mut state: PersistedState) -> PersistedState {
    if state.phase.is_active_turn() {
        state.is_paused = true;
    }
    if state.current_team_index >= state.teams.len() {
        state.current_team_index = state.teams.len().saturating_sub(1);
    }
    state.current_round = state.current_round.max(1);
    if let GamePhase::ActiveTurn {
        turn:
            ActiveTurnState::SecondChance {
                words,
                queue,
                cursor,
            },
    } = &mut state.phase
    {
        queue.retain(|&index| index < words.len());
        *cursor = (*cursor).min(queue.len());
    }
    state
}

/// Turn whatever storage returned into a usable state. Missing, stale or broken
/// records all mean "start fresh".
pub fn rehydrate(raw: Option<&str>) -> PersistedState {
    let state = match raw.map(decode) {
        Some(Ok(state)) => state,
        Some(Err(e)) => {
            warn!("Discarding saved game: {}", e);
            PersistedState::default()
        }
        None => PersistedState::default(),
    };
    normalize_on_load(state)
}
