pub mod deck;
pub mod game_events;
pub mod game_state;
pub mod persistence;
pub mod review;
pub mod scoring;
pub mod timer;
pub mod turn;
pub mod word_decks;

// Re-export main components
pub use deck::*;
pub use game_events::*;
pub use game_state::*;
pub use persistence::*;
pub use scoring::*;
pub use timer::*;
pub use turn::*;
pub use word_decks::*;
