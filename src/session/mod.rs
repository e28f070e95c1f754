//! Game session: the state machine that owns a running game.

pub mod config;
pub mod machine;

pub use config::{SessionConfig, DEFAULT_RESOLVE_DELAY_MS};
pub use machine::{GamePhase, GameSession, Selection, TurnRecord};
