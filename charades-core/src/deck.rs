use charades_types::{DEFAULT_DECK, DeckItem, GameSettings, normalize_word};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::DeckLibrary;

/// Cards of the default deck playable without the premium unlock.
pub const FREE_WORD_LIMIT: usize = 20;

/// Answers "is the full word content unlocked" at the moment it is asked.
pub trait Entitlement {
    fn is_premium(&self) -> bool;
}

impl Entitlement for bool {
    fn is_premium(&self) -> bool {
        *self
    }
}

/// Owns the draw pile and the used pile.
///
/// Every card of the effective deck is in exactly one place: `available`,
/// `used`, or out on the table (the active word or a turn's history).
#[derive(Debug)]
pub struct DeckEngine {
    library: DeckLibrary,
    available: Vec<DeckItem>,
    used: Vec<DeckItem>,
    deck_size: usize,
    rng: StdRng,
}

impl DeckEngine {
    pub fn new(library: DeckLibrary, rng: StdRng) -> Self {
        Self {
            library,
            available: Vec::new(),
            used: Vec::new(),
            deck_size: 0,
            rng,
        }
    }

    pub fn with_seed(library: DeckLibrary, seed: u64) -> Self {
        Self::new(library, StdRng::seed_from_u64(seed))
    }

    pub fn library(&self) -> &DeckLibrary {
        &self.library
    }

    pub fn available(&self) -> &[DeckItem] {
        &self.available
    }

    pub fn used(&self) -> &[DeckItem] {
        &self.used
    }

    /// Size of the effective deck as of the last initialize or restore.
    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    /// The cards a match would play with, before shuffling.
    ///
    /// Free tier: the first [`FREE_WORD_LIMIT`] cards of the default deck and no
    /// custom words. Premium: the selected deck plus every custom word that does
    /// not collide with a card already in it.
    pub fn effective_words(&self, settings: &GameSettings, premium: bool) -> Vec<DeckItem> {
        if !premium {
            return self
                .library
                .deck_or_default(DEFAULT_DECK)
                .iter()
                .take(FREE_WORD_LIMIT)
                .cloned()
                .collect();
        }

        let mut words: Vec<DeckItem> = self
            .library
            .deck_or_default(&settings.selected_deck)
            .to_vec();
        let mut seen: HashSet<String> = words.iter().map(DeckItem::key).collect();

        for custom in &settings.custom_words {
            let item = DeckItem::new(custom);
            if !item.word.is_empty() && seen.insert(item.key()) {
                words.push(item);
            }
        }

        words
    }

    /// Rebuild and shuffle the draw pile, emptying the used pile.
    /// Entitlement is read now, never cached.
    pub fn initialize(&mut self, settings: &GameSettings, entitlement: &dyn Entitlement) -> usize {
        let premium = entitlement.is_premium();
        let mut words = self.effective_words(settings, premium);
        words.shuffle(&mut self.rng);

        self.deck_size = words.len();
        self.available = words;
        self.used.clear();

        info!(
            "Deck initialized with {} cards (deck: {}, premium: {})",
            self.deck_size, settings.selected_deck, premium
        );
        self.deck_size
    }

    /// Take the next card. An empty draw pile is refilled from the used pile first,
    /// so this only returns `None` when neither pile holds a card.
    pub fn draw_next_card(&mut self) -> Option<DeckItem> {
        if self.available.is_empty() && !self.used.is_empty() {
            debug!("Draw pile empty, recycling {} used cards", self.used.len());
            self.available.append(&mut self.used);
            self.available.shuffle(&mut self.rng);
        }
        self.available.pop()
    }

    /// Retire a scored card for the rest of this cycle.
    pub fn retire(&mut self, item: DeckItem) {
        self.used.push(item);
    }

    /// Shuffle unscored cards back into the draw pile.
    pub fn return_to_available(&mut self, items: Vec<DeckItem>) {
        if items.is_empty() {
            return;
        }
        self.available.extend(items);
        self.available.shuffle(&mut self.rng);
    }

    /// Reinstate piles loaded from storage. `in_play` counts cards currently out on
    /// the table so the deck size still covers them.
    pub fn restore(&mut self, available: Vec<DeckItem>, used: Vec<DeckItem>, in_play: usize) {
        self.deck_size = available.len() + used.len() + in_play;
        self.available = available;
        self.used = used;
    }

    /// The trimmed word if it may be added as a custom word, `None` if it is blank
    /// or would duplicate a playable word.
    pub fn accept_custom_word(&self, settings: &GameSettings, word: &str) -> Option<String> {
        let word = word.trim();
        if word.is_empty() {
            return None;
        }

        let key = normalize_word(word);
        let duplicate_custom = settings
            .custom_words
            .iter()
            .any(|existing| normalize_word(existing) == key);

        if duplicate_custom || self.library.contains_word(&settings.selected_deck, word) {
            debug!("Rejected duplicate custom word '{}'", word);
            return None;
        }

        Some(word.to_string())
    }
}
