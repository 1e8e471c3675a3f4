//! Enemy definitions - static enemy data.
//!
//! An `EnemyDefinition` describes an enemy type: its health, the fixed
//! cycle of moves it performs, and its loot table. Per-combat mutable
//! state lives in [`EnemyInstance`](super::EnemyInstance).

use serde::{Deserialize, Serialize};

use crate::core::{CardKey, EnemyKey, ItemKey};
use crate::effects::StatusApplication;

/// Kind of enemy move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    /// Damages the player (block first).
    Attack,
    /// Adds block to the enemy itself.
    Defend,
    /// Applies a status to the player.
    Utility,
}

/// One move in an enemy's cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyMove {
    pub name: String,
    pub kind: MoveKind,
    /// Damage per hit for attacks, block gained for defends.
    #[serde(default)]
    pub value: u32,
    /// Number of separate hits for attacks.
    #[serde(default = "one")]
    pub hits: u32,
    /// Status applied to the player by utility moves.
    #[serde(default)]
    pub status: Option<StatusApplication>,
    #[serde(default)]
    pub description: String,
}

fn one() -> u32 {
    1
}

impl EnemyMove {
    /// Single-hit attack.
    #[must_use]
    pub fn attack(name: impl Into<String>, damage: u32) -> Self {
        Self {
            name: name.into(),
            kind: MoveKind::Attack,
            value: damage,
            hits: 1,
            status: None,
            description: String::new(),
        }
    }

    /// Block-gaining move.
    #[must_use]
    pub fn defend(name: impl Into<String>, block: u32) -> Self {
        Self {
            kind: MoveKind::Defend,
            ..Self::attack(name, block)
        }
    }

    /// Status-applying move.
    #[must_use]
    pub fn utility(name: impl Into<String>, status: StatusApplication) -> Self {
        Self {
            kind: MoveKind::Utility,
            status: Some(status),
            ..Self::attack(name, 0)
        }
    }

    /// Set the number of hits (builder pattern).
    #[must_use]
    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = hits;
        self
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// What a loot entry grants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum LootReward {
    Gold(u32),
    Item(ItemKey),
    Card(CardKey),
}

/// One independent roll in a loot table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub reward: LootReward,
    /// Probability in `[0, 1]`.
    pub chance: f64,
}

impl LootEntry {
    #[must_use]
    pub fn new(reward: LootReward, chance: f64) -> Self {
        Self {
            reward,
            chance: chance.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn gold(amount: u32, chance: f64) -> Self {
        Self::new(LootReward::Gold(amount), chance)
    }

    #[must_use]
    pub fn item(key: impl Into<String>, chance: f64) -> Self {
        Self::new(LootReward::Item(ItemKey::new(key)), chance)
    }

    #[must_use]
    pub fn card(key: impl Into<String>, chance: f64) -> Self {
        Self::new(LootReward::Card(CardKey::new(key)), chance)
    }
}

/// Static enemy definition.
///
/// ## Example
///
/// ```
/// use spellbound::enemies::{EnemyDefinition, EnemyMove, LootEntry};
///
/// let bruiser = EnemyDefinition::new("banditBruiser", "Bandit Bruiser", 25)
///     .with_move(EnemyMove::attack("Smash", 7))
///     .with_move(EnemyMove::defend("Guard Up", 5))
///     .with_loot(LootEntry::gold(10, 1.0));
///
/// assert_eq!(bruiser.moves.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyDefinition {
    pub key: EnemyKey,
    pub name: String,
    pub max_health: u32,
    pub moves: Vec<EnemyMove>,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
}

impl EnemyDefinition {
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, max_health: u32) -> Self {
        Self {
            key: EnemyKey::new(key),
            name: name.into(),
            max_health,
            moves: Vec::new(),
            loot: Vec::new(),
        }
    }

    /// Append a move to the cycle (builder pattern).
    #[must_use]
    pub fn with_move(mut self, enemy_move: EnemyMove) -> Self {
        self.moves.push(enemy_move);
        self
    }

    /// Append a loot entry (builder pattern).
    #[must_use]
    pub fn with_loot(mut self, entry: LootEntry) -> Self {
        self.loot.push(entry);
        self
    }
}
