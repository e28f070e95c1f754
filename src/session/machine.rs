//! The game state machine.
//!
//! A `GameSession` exclusively owns the running game: deck, current
//! selection, phase, timestamps, and the pending turn resolution. Callers
//! never touch the fields; they invoke the named transitions and render
//! whatever state comes back.
//!
//! ## Turn lifecycle
//!
//! `Playing` -(second card selected)-> `Resolving` -(delay elapses, via
//! `tick`)-> `Playing`, or `Finished` when the match completed the deck.
//! `reset` returns to `Playing` from any phase with a fresh shuffle.
//!
//! ## Deferred resolution
//!
//! Selecting the second card schedules the outcome rather than applying it:
//! the session stores a deadline plus a snapshot of the selection it was
//! scheduled against. The caller drives time by polling `tick(now_ms)`;
//! nothing here blocks or spawns. A reset cancels the pending entry, and the
//! snapshot check neutralizes any transition that would otherwise fire
//! against a state it was not scheduled for.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CardId, Deck, GameRng};

use super::config::SessionConfig;

/// Phase of a running game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Awaiting the first or second selection of a turn.
    Playing,
    /// Second card selected; the outcome is scheduled and input is locked.
    Resolving,
    /// All cards matched. Terminal until `reset`.
    Finished,
}

/// Up to two card IDs chosen this turn, in selection order.
pub type Selection = SmallVec<[CardId; 2]>;

/// Outcome of a resolved turn, kept for history and debugging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// First card selected.
    pub first: CardId,
    /// Second card selected.
    pub second: CardId,
    /// Whether the two cards shared a pair key.
    pub matched: bool,
    /// When the outcome was applied, in milliseconds.
    pub resolved_at_ms: u64,
}

/// A scheduled resolution: fires at `deadline_ms`, but only if the live
/// selection still matches the snapshot it was scheduled against.
#[derive(Clone, Debug)]
struct PendingResolve {
    deadline_ms: u64,
    snapshot: Selection,
}

/// A running game of pairs.
#[derive(Clone, Debug)]
pub struct GameSession {
    deck: Deck,
    selection: Selection,
    phase: GamePhase,
    start_ms: u64,
    end_ms: Option<u64>,
    pending: Option<PendingResolve>,
    config: SessionConfig,
    rng: GameRng,
    history: Vector<TurnRecord>,
}

impl GameSession {
    /// Start a session with defaults: entropy-seeded shuffle, 600 ms delay.
    #[must_use]
    pub fn new(deck: Deck, now_ms: u64) -> Self {
        Self::with(deck, SessionConfig::default(), GameRng::from_entropy(), now_ms)
    }

    /// Start a session with explicit config and RNG.
    ///
    /// The supplied deck is shuffled immediately and the clock starts at
    /// `now_ms`.
    #[must_use]
    pub fn with(deck: Deck, config: SessionConfig, mut rng: GameRng, now_ms: u64) -> Self {
        let deck = deck.shuffled(&mut rng);
        Self {
            deck,
            selection: Selection::new(),
            phase: GamePhase::Playing,
            start_ms: now_ms,
            end_ms: None,
            pending: None,
            config,
            rng,
            history: Vector::new(),
        }
    }

    // === Observable state ===

    /// Current deck, in display order.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The current turn's selection, in selection order.
    #[must_use]
    pub fn selection(&self) -> &[CardId] {
        &self.selection
    }

    /// Session start, in milliseconds.
    #[must_use]
    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    /// Session end, set when the last pair is matched. `None` while running.
    #[must_use]
    pub fn end_ms(&self) -> Option<u64> {
        self.end_ms
    }

    /// Check whether a card is part of the current selection.
    #[must_use]
    pub fn is_selected(&self, id: CardId) -> bool {
        self.selection.contains(&id)
    }

    /// Check whether a card should be shown face-up: permanently flipped, or
    /// transiently revealed as part of the current selection.
    #[must_use]
    pub fn is_revealed(&self, id: CardId) -> bool {
        self.deck.is_flipped(id) || self.is_selected(id)
    }

    /// Deadline of the outstanding resolution, if a turn is being resolved.
    ///
    /// Tells the caller when the next `tick` is worth making.
    #[must_use]
    pub fn resolve_deadline_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|pending| pending.deadline_ms)
    }

    /// Resolved turns so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<TurnRecord> {
        &self.history
    }

    /// Number of turns resolved this game.
    #[must_use]
    pub fn turns_taken(&self) -> usize {
        self.history.len()
    }

    /// Number of successful matches this game.
    #[must_use]
    pub fn matches_found(&self) -> usize {
        self.history.iter().filter(|turn| turn.matched).count()
    }

    // === Transitions ===

    /// Select a card for the current turn.
    ///
    /// Rejected selections are absorbed silently and return `false`:
    /// - phase is `Resolving` or `Finished`,
    /// - the card is already selected this turn,
    /// - the card is already permanently flipped,
    /// - no card in the deck has this ID.
    ///
    /// Selecting the second card locks input and schedules the resolution
    /// `resolve_delay_ms` after `now_ms`.
    pub fn flip_card(&mut self, id: CardId, now_ms: u64) -> bool {
        if !self.admits(id) {
            return false;
        }

        self.selection.push(id);
        if self.selection.len() == 2 {
            self.phase = GamePhase::Resolving;
            self.pending = Some(PendingResolve {
                deadline_ms: now_ms + self.config.resolve_delay_ms,
                snapshot: self.selection.clone(),
            });
        }
        true
    }

    /// Drive the deferred resolution.
    ///
    /// Call with the current time whenever convenient; the scheduled outcome
    /// is applied once its deadline has passed. Returns `true` if a
    /// transition fired. Safe to call in any phase.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let Some(pending) = self.pending.clone() else {
            return false;
        };
        if now_ms < pending.deadline_ms {
            return false;
        }
        // Staleness guard: anything that rewrote the selection since
        // scheduling (a reset, a recovered turn) invalidates the outcome.
        if self.phase != GamePhase::Resolving || self.selection != pending.snapshot {
            self.pending = None;
            return false;
        }
        self.resolve(now_ms)
    }

    /// Start a new game: all cards face-down, fresh shuffle, clock restarted.
    ///
    /// Callable from any phase; an in-flight turn is abandoned and its
    /// scheduled resolution cancelled.
    pub fn reset(&mut self, now_ms: u64) {
        self.pending = None;
        self.selection.clear();
        self.deck = self.deck.reset_all().shuffled(&mut self.rng);
        self.phase = GamePhase::Playing;
        self.start_ms = now_ms;
        self.end_ms = None;
        self.history.clear();
    }

    /// Admission policy for `flip_card`.
    fn admits(&self, id: CardId) -> bool {
        self.phase == GamePhase::Playing
            && !self.selection.contains(&id)
            && !self.deck.is_flipped(id)
            && self.deck.get(id).is_some()
    }

    /// Apply the outcome of the current turn.
    fn resolve(&mut self, now_ms: u64) -> bool {
        let keys = self.deck.pair_keys(&self.selection);
        let (first_key, second_key) = match (
            keys.first().copied().flatten(),
            keys.get(1).copied().flatten(),
        ) {
            (Some(first), Some(second)) => (first, second),
            // Unreachable for a validated deck (admission checks membership);
            // recover to Playing rather than wedge in Resolving.
            _ => {
                self.selection.clear();
                self.pending = None;
                self.phase = GamePhase::Playing;
                return false;
            }
        };

        let matched = first_key == second_key;
        let (first, second) = (self.selection[0], self.selection[1]);

        self.deck = if matched {
            self.deck.flip_pair(first_key)
        } else {
            self.deck.reset_selected(&self.selection)
        };

        self.history.push_back(TurnRecord {
            first,
            second,
            matched,
            resolved_at_ms: now_ms,
        });
        self.selection.clear();
        self.pending = None;

        if matched && self.deck.all_flipped() {
            self.phase = GamePhase::Finished;
            self.end_ms = Some(now_ms);
        } else {
            self.phase = GamePhase::Playing;
        }
        true
    }
}
