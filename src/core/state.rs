//! Game state: the single aggregate owned by the state machine.
//!
//! ## GameState
//!
//! Everything that makes up a run:
//! - Progress (run, chapter, story piece, city, character choices)
//! - Player stats (health, mana, block, gold)
//! - Card piles (deck, hand, discard, exile)
//! - Combat-scoped enemies and player statuses
//! - Inventory
//! - The last narration shown, for save fidelity
//!
//! Stats are unsigned, so the lower bounds hold by construction. Upper
//! bounds (`health <= max_health`, `mana <= max_mana`) are kept by the
//! mutators on this type; callers never write `health` past `max_health`.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::EngineConfig;
use super::ids::{CardKey, ChapterId, CityKey, EnemyKey, ItemInstanceId, StoryPieceId};
use crate::effects::StatusSet;
use crate::enemies::EnemyInstance;
use crate::items::InventoryItem;
use crate::machine::{GameMode, OptionRoute};

/// Player character gender, chosen during setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Lowercase label used in prompts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Complete state of one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    // === Progress ===
    /// Run counter, incremented when a started run is reset.
    pub run: u32,

    /// Current chapter.
    pub chapter: ChapterId,

    /// Story piece currently (or most recently) shown.
    pub current_story_piece: Option<StoryPieceId>,

    /// Chosen gender.
    pub gender: Option<Gender>,

    /// City chosen at setup.
    pub starting_city: Option<CityKey>,

    /// City the player is in now.
    pub current_city: Option<CityKey>,

    /// Story pieces visited, for narrative context.
    pub completed_story_beats: BTreeSet<StoryPieceId>,

    // === Player Stats ===
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub block: u32,
    pub gold: u32,

    // === Piles (draw end = last element) ===
    pub deck: Vec<CardKey>,
    pub hand: Vec<CardKey>,
    pub discard_pile: Vec<CardKey>,
    pub exiled_pile: Vec<CardKey>,

    // === Combat ===
    /// Enemies of the active encounter. Empty outside combat.
    pub current_enemies: Vec<EnemyInstance>,

    /// Statuses on the player (combat-scoped).
    #[serde(default)]
    pub player_statuses: StatusSet,

    /// Enemies of the most recent encounter, for "retry the battle".
    #[serde(default)]
    pub last_encounter: Vec<EnemyKey>,

    // === Mode ===
    pub mode: GameMode,

    // === Inventory ===
    pub inventory: Vec<InventoryItem>,

    // === Presentation snapshot ===
    /// Narration currently shown.
    pub last_narrative_text: Option<String>,

    /// Option labels currently shown.
    pub last_options: Vec<String>,

    /// What choosing a shown option does.
    #[serde(default)]
    pub route: OptionRoute,

    // === Persistence ===
    /// When this state was last written to a save slot.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_saved: Option<DateTime<Utc>>,

    /// Next inventory instance ID to allocate.
    next_instance_id: u32,
}

impl GameState {
    /// Create the state of a fresh run from configuration.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            run: 1,
            chapter: config.starting_chapter,
            current_story_piece: None,
            gender: None,
            starting_city: None,
            current_city: None,
            completed_story_beats: BTreeSet::new(),
            health: config.starting_health.min(config.starting_max_health),
            max_health: config.starting_max_health,
            mana: config.starting_max_mana,
            max_mana: config.starting_max_mana,
            block: 0,
            gold: config.starting_gold,
            deck: config.starting_deck.clone(),
            hand: Vec::new(),
            discard_pile: Vec::new(),
            exiled_pile: Vec::new(),
            current_enemies: Vec::new(),
            player_statuses: StatusSet::default(),
            last_encounter: Vec::new(),
            mode: GameMode::MainMenu,
            inventory: Vec::new(),
            last_narrative_text: None,
            last_options: Vec::new(),
            route: OptionRoute::FromPiece,
            last_saved: None,
            next_instance_id: 1,
        }
    }

    /// Allocate a fresh inventory instance ID.
    pub fn alloc_instance_id(&mut self) -> ItemInstanceId {
        let id = ItemInstanceId::new(self.next_instance_id);
        self.next_instance_id += 1;
        id
    }

    // === Stats ===

    /// Restore health, clamped to max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    /// Restore health to max.
    pub fn heal_full(&mut self) {
        self.health = self.max_health;
    }

    /// Spend mana. Returns `false` (and spends nothing) if there isn't enough.
    pub fn spend_mana(&mut self, cost: u32) -> bool {
        if cost > self.mana {
            return false;
        }
        self.mana -= cost;
        true
    }

    /// Refill mana to max.
    pub fn refill_mana(&mut self) {
        self.mana = self.max_mana;
    }

    /// Add gold.
    pub fn gain_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Check if the player is out of health.
    #[must_use]
    pub fn is_player_defeated(&self) -> bool {
        self.health == 0
    }

    // === Combat ===

    /// Check if an encounter is active.
    #[must_use]
    pub fn in_combat(&self) -> bool {
        !self.current_enemies.is_empty()
    }

    /// Indices of enemies still standing, in encounter order.
    pub fn living_enemy_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.current_enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_alive())
            .map(|(i, _)| i)
    }

    // === Piles ===

    /// Total number of cards across all four piles.
    #[must_use]
    pub fn owned_card_count(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard_pile.len() + self.exiled_pile.len()
    }

    /// Every owned card, sorted. Useful for checking pile conservation.
    #[must_use]
    pub fn owned_cards_sorted(&self) -> Vec<CardKey> {
        let mut all: Vec<CardKey> = self
            .deck
            .iter()
            .chain(&self.hand)
            .chain(&self.discard_pile)
            .chain(&self.exiled_pile)
            .cloned()
            .collect();
        all.sort();
        all
    }

    /// Check the numeric invariants.
    #[must_use]
    pub fn stats_in_bounds(&self) -> bool {
        self.health <= self.max_health && self.mana <= self.max_mana
    }
}
