//! Card identity and pairing.
//!
//! Every card has a unique `CardId` and a `PairKey` shared with exactly one
//! other card in the deck. The display content is opaque to the engine: the
//! presentation layer decides what the string means (image path, emoji, ...).

use serde::{Deserialize, Serialize};

/// Unique identifier for a card within a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a card ID from a raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Key linking exactly two cards as a matching pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey(pub u32);

impl PairKey {
    /// Create a pair key from a raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw key value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A single card: identity, pairing, display content, and reveal state.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier within the deck.
    pub id: CardId,

    /// Shared by exactly two cards in a valid deck.
    pub pair_key: PairKey,

    /// Opaque display reference. Never interpreted by the engine.
    pub content: String,

    /// Permanently revealed: set once the card's pair has been matched.
    pub flipped: bool,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub fn new(id: CardId, pair_key: PairKey, content: impl Into<String>) -> Self {
        Self {
            id,
            pair_key,
            content: content.into(),
            flipped: false,
        }
    }
}
