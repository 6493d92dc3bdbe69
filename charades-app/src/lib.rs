pub mod clock;
pub mod config;
pub mod session;

use anyhow::Result;
use charades_core::{ClockTick, DeckEngine, DeckLibrary, Game};
use charades_persistence::{DatabaseManager, GameStorage, StateRepository};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tracing::info;

use crate::clock::TokioClock;
use crate::config::Config;
use crate::session::{Reply, Session};

/// Connect storage, load the saved game and wire it to a live clock.
pub async fn build_session(
    config: &Config,
) -> Result<(Session<StateRepository>, mpsc::UnboundedReceiver<ClockTick>)> {
    let db = DatabaseManager::connect(&config.database_url).await?;
    let storage = GameStorage::with_key(db.state_repository(), &config.storage_key);
    let state = storage.load().await;
    info!(
        "Loaded game in phase {} (paused: {})",
        state.phase.name(),
        state.is_paused
    );

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let deck = DeckEngine::new(DeckLibrary::builtin(), rng);
    let (clock, ticks) = TokioClock::new();
    let game = Game::restore(state, deck, Box::new(config.premium), Box::new(clock));

    Ok((Session::new(game, storage), ticks))
}

/// One JSON object per line.
pub fn encode_reply(reply: &Reply) -> String {
    serde_json::to_string(reply).unwrap_or_else(|e| {
        format!(r#"{{"type":"error","reason":"failed to encode reply: {}"}}"#, e)
    })
}
