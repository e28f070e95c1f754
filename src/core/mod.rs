//! Core data model: cards, the deck and its pure transformations, RNG.

pub mod card;
pub mod deck;
pub mod rng;

pub use card::{Card, CardId, PairKey};
pub use deck::{Deck, DeckError};
pub use rng::GameRng;
