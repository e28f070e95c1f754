//! Deck: the ordered card collection and its pure transformations.
//!
//! Sequence order is display order. Every transformation returns a new
//! `Deck` and leaves the input untouched; `im::Vector` makes those copies
//! cheap via structural sharing, which keeps "previous" and "next" session
//! states free of aliasing.
//!
//! ## Validation
//!
//! Construction is fail-fast: a deck with a duplicate card ID, or with a
//! pair key shared by anything other than exactly two cards, is rejected
//! with a `DeckError`. Lookups on a validated deck cannot dangle, so the
//! in-play utilities absorb absent IDs (not-flipped / `None`) instead of
//! erroring.

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::card::{Card, CardId, PairKey};
use super::rng::GameRng;

/// Deck construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("duplicate card id {0}")]
    DuplicateCardId(u32),
    #[error("pair key {key} is shared by {count} cards, expected exactly 2")]
    UnbalancedPair { key: u32, count: usize },
}

/// An ordered sequence of cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// Build a deck, validating the pairing invariant.
    ///
    /// Card IDs must be unique and every pair key must be shared by exactly
    /// two cards.
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Result<Self, DeckError> {
        let cards: Vector<Card> = cards.into_iter().collect();

        let mut seen: FxHashSet<CardId> = FxHashSet::default();
        let mut pair_counts: FxHashMap<PairKey, usize> = FxHashMap::default();
        for card in &cards {
            if !seen.insert(card.id) {
                return Err(DeckError::DuplicateCardId(card.id.raw()));
            }
            *pair_counts.entry(card.pair_key).or_insert(0) += 1;
        }
        for (key, count) in pair_counts {
            if count != 2 {
                return Err(DeckError::UnbalancedPair {
                    key: key.raw(),
                    count,
                });
            }
        }

        Ok(Self { cards })
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the deck is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate cards in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Look up a card by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Check whether the card with the given ID is permanently revealed.
    ///
    /// Absent IDs read as not flipped.
    #[must_use]
    pub fn is_flipped(&self, id: CardId) -> bool {
        self.get(id).map_or(false, |card| card.flipped)
    }

    /// Pair keys for the given selection, in selection order.
    ///
    /// Yields `None` for an ID that matches no card.
    #[must_use]
    pub fn pair_keys(&self, selection: &[CardId]) -> SmallVec<[Option<PairKey>; 2]> {
        selection
            .iter()
            .map(|&id| self.get(id).map(|card| card.pair_key))
            .collect()
    }

    /// New deck with every card of the given pair permanently revealed.
    #[must_use]
    pub fn flip_pair(&self, key: PairKey) -> Self {
        self.map_cards(|card| {
            if card.pair_key == key {
                Card {
                    flipped: true,
                    ..card.clone()
                }
            } else {
                card.clone()
            }
        })
    }

    /// New deck with the selected cards forced face-down.
    ///
    /// Used to un-reveal a failed pair after the resolution delay. Callers
    /// keep matched cards out of the selection by construction.
    #[must_use]
    pub fn reset_selected(&self, selection: &[CardId]) -> Self {
        self.map_cards(|card| {
            if selection.contains(&card.id) {
                Card {
                    flipped: false,
                    ..card.clone()
                }
            } else {
                card.clone()
            }
        })
    }

    /// New deck with every card face-down. Idempotent.
    #[must_use]
    pub fn reset_all(&self) -> Self {
        self.map_cards(|card| Card {
            flipped: false,
            ..card.clone()
        })
    }

    /// Win condition: every card permanently revealed.
    #[must_use]
    pub fn all_flipped(&self) -> bool {
        self.cards.iter().all(|card| card.flipped)
    }

    /// Uniformly random permutation of the deck; the input is untouched.
    ///
    /// Fisher-Yates, iterating last to first and swapping each position with
    /// a uniformly chosen position at or before it. Decks of length 0 or 1
    /// come back unchanged.
    #[must_use]
    pub fn shuffled(&self, rng: &mut GameRng) -> Self {
        let mut cards: Vec<Card> = self.cards.iter().cloned().collect();
        for i in (1..cards.len()).rev() {
            let j = rng.gen_range_usize(0..i + 1);
            cards.swap(i, j);
        }
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    fn map_cards(&self, f: impl Fn(&Card) -> Card) -> Self {
        Self {
            cards: self.cards.iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Four cards, pairs (1,2)="a" and (3,4)="b"; card 3 starts flipped.
    fn sample_deck() -> Deck {
        let mut cards = vec![
            Card::new(CardId::new(1), PairKey::new(0), "a1"),
            Card::new(CardId::new(2), PairKey::new(0), "a2"),
            Card::new(CardId::new(3), PairKey::new(1), "b1"),
            Card::new(CardId::new(4), PairKey::new(1), "b2"),
        ];
        cards[2].flipped = true;
        Deck::new(cards).unwrap()
    }

    #[test]
    fn test_new_rejects_duplicate_id() {
        let cards = vec![
            Card::new(CardId::new(1), PairKey::new(0), "a1"),
            Card::new(CardId::new(1), PairKey::new(0), "a2"),
        ];

        assert_eq!(Deck::new(cards), Err(DeckError::DuplicateCardId(1)));
    }

    #[test]
    fn test_new_rejects_unbalanced_pair() {
        let cards = vec![
            Card::new(CardId::new(1), PairKey::new(0), "a1"),
            Card::new(CardId::new(2), PairKey::new(0), "a2"),
            Card::new(CardId::new(3), PairKey::new(0), "a3"),
        ];

        assert_eq!(
            Deck::new(cards),
            Err(DeckError::UnbalancedPair { key: 0, count: 3 })
        );

        let lonely = vec![Card::new(CardId::new(1), PairKey::new(5), "x")];
        assert_eq!(
            Deck::new(lonely),
            Err(DeckError::UnbalancedPair { key: 5, count: 1 })
        );
    }

    #[test]
    fn test_empty_deck_is_valid() {
        let deck = Deck::new(Vec::new()).unwrap();
        assert!(deck.is_empty());
    }

    #[test]
    fn test_is_flipped() {
        let deck = sample_deck();

        assert!(deck.is_flipped(CardId::new(3)));
        assert!(!deck.is_flipped(CardId::new(1)));
        // Absent ID reads as not flipped, not an error
        assert!(!deck.is_flipped(CardId::new(99)));
    }

    #[test]
    fn test_pair_keys_in_selection_order() {
        let deck = sample_deck();

        let keys = deck.pair_keys(&[CardId::new(1), CardId::new(2)]);
        assert_eq!(keys.as_slice(), &[Some(PairKey::new(0)), Some(PairKey::new(0))]);

        let keys = deck.pair_keys(&[CardId::new(4), CardId::new(1)]);
        assert_eq!(keys.as_slice(), &[Some(PairKey::new(1)), Some(PairKey::new(0))]);

        let keys = deck.pair_keys(&[CardId::new(1), CardId::new(99)]);
        assert_eq!(keys.as_slice(), &[Some(PairKey::new(0)), None]);
    }

    #[test]
    fn test_flip_pair_targets_only_that_pair() {
        let deck = sample_deck();
        let updated = deck.flip_pair(PairKey::new(0));

        assert!(updated.is_flipped(CardId::new(1)));
        assert!(updated.is_flipped(CardId::new(2)));
        assert!(updated.is_flipped(CardId::new(3))); // was already flipped
        assert!(!updated.is_flipped(CardId::new(4)));

        // Input untouched
        assert!(!deck.is_flipped(CardId::new(1)));
    }

    #[test]
    fn test_reset_selected() {
        let deck = sample_deck().flip_pair(PairKey::new(0));
        let updated = deck.reset_selected(&[CardId::new(1), CardId::new(2)]);

        assert!(!updated.is_flipped(CardId::new(1)));
        assert!(!updated.is_flipped(CardId::new(2)));
        assert!(updated.is_flipped(CardId::new(3)));
    }

    #[test]
    fn test_reset_all_is_idempotent() {
        let deck = sample_deck();
        let once = deck.reset_all();
        let twice = once.reset_all();

        assert!(once.iter().all(|card| !card.flipped));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_all_flipped() {
        let deck = sample_deck();
        assert!(!deck.all_flipped());

        let done = deck.flip_pair(PairKey::new(0)).flip_pair(PairKey::new(1));
        assert!(done.all_flipped());
    }

    #[test]
    fn test_shuffled_preserves_cards() {
        let deck = sample_deck();
        let mut rng = GameRng::new(42);
        let shuffled = deck.shuffled(&mut rng);

        assert_eq!(shuffled.len(), deck.len());

        let mut before: Vec<u32> = deck.iter().map(|card| card.id.raw()).collect();
        let mut after: Vec<u32> = shuffled.iter().map(|card| card.id.raw()).collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn test_shuffled_is_seed_deterministic() {
        let deck = sample_deck();

        let a = deck.shuffled(&mut GameRng::new(7));
        let b = deck.shuffled(&mut GameRng::new(7));

        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffled_changes_order_eventually() {
        let deck = sample_deck();
        let original: Vec<u32> = deck.iter().map(|card| card.id.raw()).collect();

        let mut rng = GameRng::new(42);
        let moved = (0..50).any(|_| {
            let order: Vec<u32> = deck
                .shuffled(&mut rng)
                .iter()
                .map(|card| card.id.raw())
                .collect();
            order != original
        });

        assert!(moved);
    }

    #[test]
    fn test_shuffled_tiny_decks_unchanged() {
        let mut rng = GameRng::new(1);

        let empty = Deck::new(Vec::new()).unwrap();
        assert_eq!(empty.shuffled(&mut rng), empty);
    }

    #[test]
    fn test_deck_serialization() {
        let deck = sample_deck();

        let json = serde_json::to_string(&deck).unwrap();
        let deserialized: Deck = serde_json::from_str(&json).unwrap();

        assert_eq!(deck, deserialized);
    }
}
