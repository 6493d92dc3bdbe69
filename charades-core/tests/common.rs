#![allow(dead_code)]

use charades_core::{
    DeckEngine, DeckLibrary, Game, GameEvent, GameEventHandler, ManualClock, PersistedState,
};
use charades_types::{DEFAULT_DECK, GamePhase, WordStatus};
use std::sync::{Arc, Mutex};

/// The A/B/C/D... deck used by scenario tests
pub const LETTER_DECK: &str = "A\nB\nC\nD\nE\nF\nG\nH";

/// Creates a library whose default deck is `words`
pub fn create_test_library(words: &str) -> DeckLibrary {
    let mut library = DeckLibrary::new();
    library.add_deck(DEFAULT_DECK, words);
    library
}

/// Creates a premium game on a manual clock, returning a handle to the clock
pub fn create_test_game(words: &str, seed: u64) -> (Game, ManualClock) {
    let clock = ManualClock::new();
    let game = Game::new(
        DeckEngine::with_seed(create_test_library(words), seed),
        Box::new(true),
        Box::new(clock.clone()),
    );
    (game, clock)
}

/// Rebuilds a game from a saved record on a fresh manual clock
pub fn restore_test_game(state: PersistedState, words: &str) -> (Game, ManualClock) {
    let clock = ManualClock::new();
    let game = Game::restore(
        state,
        DeckEngine::with_seed(create_test_library(words), 1),
        Box::new(true),
        Box::new(clock.clone()),
    );
    (game, clock)
}

/// Delivers up to `ticks` ticks from the clock to the game
pub fn run_clock(game: &mut Game, clock: &ManualClock, ticks: u32) {
    for _ in 0..ticks {
        match clock.tick() {
            Some(tick) => game.clock_tick(tick),
            None => break,
        }
    }
}

/// Plays one whole turn: marks each status in order, lets the clock run out,
/// discards every second chance and applies the review.
pub fn play_turn(game: &mut Game, marks: &[WordStatus]) {
    game.start_turn();
    game.finish_countdown();
    for status in marks {
        game.mark_word(*status);
    }
    game.end_turn();
    while game.resolve_second_chance(false) {}
    game.apply_review_scores();
}

/// Asserts that the game is in the named phase
pub fn assert_phase(game: &Game, expected: &str) {
    assert_eq!(
        game.phase().name(),
        expected,
        "Expected phase {}, got {:?}",
        expected,
        game.phase()
    );
}

/// Asserts that every card of the effective deck is accounted for
pub fn assert_conserved(game: &Game) {
    assert_eq!(
        game.cards_in_play(),
        game.deck().deck_size(),
        "cards lost or duplicated in phase {:?}",
        game.phase()
    );
}

pub fn review_statuses(game: &Game) -> Vec<(String, WordStatus)> {
    match game.phase() {
        GamePhase::Review { words } => words.iter().map(|w| (w.word.clone(), w.status)).collect(),
        other => panic!("expected review, got {:?}", other),
    }
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.name() == name)
            .count()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}
