pub mod deck;
pub mod game;
pub mod settings;
pub mod team;
pub mod turn;

// Re-export all types
pub use deck::*;
pub use game::*;
pub use settings::*;
pub use team::*;
pub use turn::*;
