use charades_types::{DEFAULT_DECK, DeckItem, normalize_word};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

const CLASSIC_WORDS: &str = "\
# name | hint
Elephant | Big, grey, never forgets
Pizza | Cheesy slices
Astronaut | Works above the sky
Guitar | Six strings
Volcano | Mountain with a temper
Penguin | Dressed for dinner, lives on ice
Birthday | Candles and cake
Rainbow | After the storm
Dentist | Open wide
Ice Cream | Cold dessert in a cone
Skateboard | Four wheels, no engine
Lighthouse | Keeps ships off the rocks
Vampire | Avoids garlic
Snowman | Carrot nose
Treasure | X marks the spot
Kangaroo | Pocket on the front
Tornado | Spinning wind
Magician | Rabbit from a hat
Pirate | Arr
Sandcastle | Built at low tide
Helicopter | Rotor on top
Jellyfish | Don't touch the tentacles
Library | Quiet please
Fireworks | New Year's sky
Robot | Beep boop
Octopus | Eight arms
Scarecrow | Guards the field
Waterfall | River falls off a cliff
Camping | Tent and marshmallows
Detective | Follows the clues
";

const MOVIE_WORDS: &str = "\
Titanic | Iceberg ahead
Jaws | Bigger boat
Frozen | Let it go
Star Wars | A galaxy far away
The Lion King | Circle of life
Jurassic Park | Life finds a way
Toy Story | To infinity
Back to the Future | 88 miles per hour
Finding Nemo | Just keep swimming
The Matrix | Red pill or blue pill
Ghostbusters | Who you gonna call
Shrek | Ogres have layers
";

/// Named built-in decks, each free of duplicate words.
#[derive(Debug, Clone)]
pub struct DeckLibrary {
    decks: BTreeMap<String, Vec<DeckItem>>,
}

impl DeckLibrary {
    /// An empty library
    pub fn new() -> Self {
        Self {
            decks: BTreeMap::new(),
        }
    }

    /// The decks that ship with the game
    pub fn builtin() -> Self {
        let mut library = Self::new();
        library.add_deck(DEFAULT_DECK, CLASSIC_WORDS);
        library.add_deck("movies", MOVIE_WORDS);
        library
    }

    /// Parse a `word | hint` list into a deck, replacing any deck of the same name.
    /// Returns the number of cards kept.
    pub fn add_deck(&mut self, name: &str, word_list: &str) -> usize {
        let items = Self::parse_word_list(word_list);
        let count = items.len();
        self.decks.insert(name.to_string(), items);
        count
    }

    /// Comments and blank lines are skipped; later duplicates of a word are dropped.
    pub fn parse_word_list(word_list: &str) -> Vec<DeckItem> {
        let mut seen = HashSet::new();
        word_list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| match line.split_once('|') {
                Some((word, hint)) => DeckItem::with_hint(word, hint),
                None => DeckItem::new(line),
            })
            .filter(|item| !item.word.is_empty())
            .filter(|item| {
                let fresh = seen.insert(item.key());
                if !fresh {
                    debug!("Dropped duplicate word '{}'", item.word);
                }
                fresh
            })
            .collect()
    }

    pub fn deck(&self, name: &str) -> Option<&[DeckItem]> {
        self.decks.get(name).map(Vec::as_slice)
    }

    /// The named deck, or the default deck when the name is unknown.
    pub fn deck_or_default(&self, name: &str) -> &[DeckItem] {
        self.deck(name)
            .or_else(|| self.deck(DEFAULT_DECK))
            .unwrap_or(&[])
    }

    /// Whether `word` normalizes to a card already in the named deck.
    pub fn contains_word(&self, deck: &str, word: &str) -> bool {
        let key = normalize_word(word);
        self.deck_or_default(deck).iter().any(|item| item.key() == key)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decks.keys().map(String::as_str)
    }
}

impl Default for DeckLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}
