//! Engine configuration.
//!
//! `EngineConfig` holds the starting values for a new run and the sizing
//! knobs of the engine (hand size, number of save slots). Hosts build it
//! with the builder methods or load it from JSON; anything missing from the
//! JSON falls back to [`EngineConfig::default`].

use serde::{Deserialize, Serialize};

use super::error::ContentError;
use super::ids::{CardKey, ChapterId, StoryPieceId};

/// Number of regular save slots.
pub const DEFAULT_SAVE_SLOTS: usize = 10;

/// Cards drawn at the start of every player turn.
pub const DEFAULT_HAND_SIZE: usize = 5;

/// Starting values and engine sizing.
///
/// ## Example
///
/// ```
/// use spellbound::core::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_starting_health(30)
///     .with_seed(7);
///
/// assert_eq!(config.starting_health, 30);
/// assert_eq!(config.starting_max_health, 30);
/// assert_eq!(config.hand_size, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Health at the start of a run.
    pub starting_health: u32,

    /// Maximum health at the start of a run.
    pub starting_max_health: u32,

    /// Mana refilled at the start of each player turn.
    pub starting_max_mana: u32,

    /// Gold at the start of a run.
    pub starting_gold: u32,

    /// Card keys of the starting deck, in draw order (top = last).
    pub starting_deck: Vec<CardKey>,

    /// Cards drawn per turn.
    pub hand_size: usize,

    /// Number of numbered save slots.
    pub save_slot_count: usize,

    /// Chapter a new run starts in.
    pub starting_chapter: ChapterId,

    /// Story piece shown once the city is chosen.
    pub start_piece: StoryPieceId,

    /// Seed for the run RNG.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut starting_deck = vec![CardKey::new("Fireball"); 5];
        starting_deck.push(CardKey::new("Flame Strike"));
        starting_deck.extend(std::iter::repeat(CardKey::new("Staff Guard")).take(4));

        Self {
            starting_health: 20,
            starting_max_health: 20,
            starting_max_mana: 3,
            starting_gold: 10,
            starting_deck,
            hand_size: DEFAULT_HAND_SIZE,
            save_slot_count: DEFAULT_SAVE_SLOTS,
            starting_chapter: ChapterId::new(1),
            start_piece: StoryPieceId::new("start"),
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take default values.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set both starting and maximum health.
    #[must_use]
    pub fn with_starting_health(mut self, health: u32) -> Self {
        self.starting_health = health;
        self.starting_max_health = health;
        self
    }

    /// Set the per-turn mana pool.
    #[must_use]
    pub fn with_max_mana(mut self, mana: u32) -> Self {
        self.starting_max_mana = mana;
        self
    }

    /// Set starting gold.
    #[must_use]
    pub fn with_starting_gold(mut self, gold: u32) -> Self {
        self.starting_gold = gold;
        self
    }

    /// Replace the starting deck.
    #[must_use]
    pub fn with_starting_deck(mut self, deck: impl IntoIterator<Item = CardKey>) -> Self {
        self.starting_deck = deck.into_iter().collect();
        self
    }

    /// Set the number of cards drawn per turn.
    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    /// Set the number of save slots.
    #[must_use]
    pub fn with_save_slots(mut self, count: usize) -> Self {
        self.save_slot_count = count;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that every starting card exists in the given lookup.
    pub fn validate_deck(&self, has_card: impl Fn(&CardKey) -> bool) -> Result<(), ContentError> {
        match self.starting_deck.iter().find(|key| !has_card(key)) {
            Some(missing) => Err(ContentError::UnknownCard(missing.clone())),
            None => Ok(()),
        }
    }
}
