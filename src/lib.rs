//! # memory-pairs
//!
//! A memory-matching ("pairs") card game engine: a shuffled deck of paired
//! cards is revealed two at a time; matches stay revealed, misses flip back
//! after a short delay, and the game ends when every pair is found.
//!
//! ## Design Principles
//!
//! 1. **Pure transformations**: every deck update returns a new deck
//!    (`im` persistent vectors make this cheap), so previous and next
//!    session states never alias.
//!
//! 2. **Single-owner state machine**: `GameSession` owns all mutable state
//!    and exposes named transitions; callers render what comes back.
//!
//! 3. **Caller-driven time**: operations take a millisecond timestamp and
//!    the mismatch delay is a stored deadline polled via `tick`. No threads,
//!    no runtime, deterministic under test.
//!
//! ## Modules
//!
//! - `core`: cards, the deck and its pure transformations, RNG
//! - `session`: the game state machine and turn resolution
//! - `timer`: elapsed-time formatting
//!
//! ## Example
//!
//! ```
//! use memory_pairs::{Card, CardId, Deck, GamePhase, GameRng, GameSession, PairKey, SessionConfig};
//!
//! let deck = Deck::new(vec![
//!     Card::new(CardId::new(1), PairKey::new(0), "cat"),
//!     Card::new(CardId::new(2), PairKey::new(0), "cat"),
//! ]).unwrap();
//!
//! let mut session = GameSession::with(deck, SessionConfig::default(), GameRng::new(42), 0);
//! session.flip_card(CardId::new(1), 100);
//! session.flip_card(CardId::new(2), 200);
//!
//! // The outcome applies once the delay elapses
//! session.tick(1_000);
//! assert_eq!(session.phase(), GamePhase::Finished);
//! ```

pub mod core;
pub mod session;
pub mod timer;

// Re-export commonly used types
pub use crate::core::{Card, CardId, Deck, DeckError, GameRng, PairKey};
pub use crate::session::{
    GamePhase, GameSession, Selection, SessionConfig, TurnRecord, DEFAULT_RESOLVE_DELAY_MS,
};
pub use crate::timer::{format_duration, now_ms};
