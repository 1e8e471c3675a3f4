//! Deck manager for the player's card piles.
//!
//! The four piles live on [`GameState`]; a `DeckManager` borrows them for
//! one operation and handles every movement between them:
//! - Drawing from the draw end of the deck, reshuffling the discard pile
//!   in when the deck runs out
//! - Discarding the hand
//! - Placing played cards in discard or exile
//! - Gathering piles at combat boundaries
//!
//! Every card moves, nothing is created or dropped, so the multiset of
//! owned cards is unchanged by any operation here.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{CardKey, GameRng, GameState};

/// One of the player's card piles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    /// Draw pile. The last element is the top.
    Deck,
    Hand,
    Discard,
    /// Removed for the rest of the encounter.
    Exile,
}

impl Pile {
    /// All piles.
    pub const ALL: [Pile; 4] = [Pile::Deck, Pile::Hand, Pile::Discard, Pile::Exile];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Pile::Deck => "deck",
            Pile::Hand => "hand",
            Pile::Discard => "discard",
            Pile::Exile => "exile",
        }
    }
}

/// Outcome of a draw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Cards moved to the hand, in draw order.
    pub drawn: Vec<CardKey>,
    /// Number of times the discard pile was shuffled into the deck.
    pub reshuffles: u32,
}

/// Card movement over the piles of a [`GameState`].
///
/// ## Usage
///
/// ```
/// use spellbound::core::{EngineConfig, GameRng, GameState};
/// use spellbound::zones::{DeckManager, Pile};
///
/// let mut state = GameState::new(&EngineConfig::default());
/// let mut rng = GameRng::new(42);
///
/// let report = DeckManager::new(&mut state).draw(5, &mut rng);
/// assert_eq!(report.drawn.len(), 5);
/// assert_eq!(state.hand.len(), 5);
///
/// DeckManager::new(&mut state).discard_hand();
/// assert_eq!(state.discard_pile.len(), 5);
/// ```
pub struct DeckManager<'a> {
    state: &'a mut GameState,
}

impl<'a> DeckManager<'a> {
    /// Borrow the piles of `state`.
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    /// Cards in a pile, in order.
    #[must_use]
    pub fn pile(&self, pile: Pile) -> &[CardKey] {
        match pile {
            Pile::Deck => &self.state.deck,
            Pile::Hand => &self.state.hand,
            Pile::Discard => &self.state.discard_pile,
            Pile::Exile => &self.state.exiled_pile,
        }
    }

    fn pile_mut(&mut self, pile: Pile) -> &mut Vec<CardKey> {
        match pile {
            Pile::Deck => &mut self.state.deck,
            Pile::Hand => &mut self.state.hand,
            Pile::Discard => &mut self.state.discard_pile,
            Pile::Exile => &mut self.state.exiled_pile,
        }
    }

    /// Draw up to `count` cards into the hand.
    ///
    /// When the deck is empty and the discard pile is not, the discard
    /// pile is shuffled to become the deck. When both are empty, drawing
    /// stops without error.
    pub fn draw(&mut self, count: usize, rng: &mut GameRng) -> DrawReport {
        let mut report = DrawReport::default();

        while report.drawn.len() < count {
            if self.state.deck.is_empty() {
                if self.state.discard_pile.is_empty() {
                    debug!(drawn = report.drawn.len(), requested = count, "deck and discard exhausted");
                    break;
                }
                self.reshuffle_discard(rng);
                report.reshuffles += 1;
            }

            let Some(card) = self.state.deck.pop() else {
                break;
            };
            self.state.hand.push(card.clone());
            report.drawn.push(card);
        }

        debug!(drawn = ?report.drawn, reshuffles = report.reshuffles, "draw");
        report
    }

    /// Shuffle the whole discard pile into the deck.
    fn reshuffle_discard(&mut self, rng: &mut GameRng) {
        let mut cards = std::mem::take(&mut self.state.discard_pile);
        rng.shuffle(&mut cards);
        debug!(count = cards.len(), "reshuffled discard into deck");
        self.state.deck.extend(cards);
    }

    /// Move every card in hand to the discard pile.
    pub fn discard_hand(&mut self) {
        let hand = std::mem::take(&mut self.state.hand);
        debug!(count = hand.len(), "discarded hand");
        self.state.discard_pile.extend(hand);
    }

    /// Take the card at `index` out of the hand.
    ///
    /// The caller must place it with [`Self::place_played`].
    pub fn take_from_hand(&mut self, index: usize) -> Option<CardKey> {
        (index < self.state.hand.len()).then(|| self.state.hand.remove(index))
    }

    /// Put a played card on the discard pile, or exile it.
    pub fn place_played(&mut self, card: CardKey, exile: bool) -> Pile {
        let pile = if exile { Pile::Exile } else { Pile::Discard };
        debug!(%card, pile = pile.name(), "card resolved");
        self.pile_mut(pile).push(card);
        pile
    }

    /// Collect every pile into the discard pile (combat entry).
    pub fn gather_into_discard(&mut self) {
        self.gather_into(Pile::Discard);
    }

    /// Collect every pile into the deck (combat resolution).
    pub fn gather_into_deck(&mut self) {
        self.gather_into(Pile::Deck);
    }

    fn gather_into(&mut self, target: Pile) {
        for pile in Pile::ALL {
            if pile == target {
                continue;
            }
            let cards = std::mem::take(self.pile_mut(pile));
            self.pile_mut(target).extend(cards);
        }
        debug!(target = target.name(), count = self.pile(target).len(), "gathered piles");
    }
}
