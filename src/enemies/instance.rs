//! Enemy instances - per-combat enemy state.
//!
//! An `EnemyInstance` is created from an [`EnemyDefinition`] when an
//! encounter starts and dropped when it ends. It carries the key of the
//! definition it came from, so loot is always resolved from that key.

use serde::{Deserialize, Serialize};

use super::definition::{EnemyDefinition, EnemyMove, MoveKind};
use crate::core::EnemyKey;
use crate::effects::StatusSet;

/// An enemy in the current encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyInstance {
    /// Definition this instance was spawned from.
    pub definition: EnemyKey,
    pub name: String,
    pub max_health: u32,
    pub health: u32,
    pub block: u32,
    /// Copied from the definition at spawn.
    pub moves: Vec<EnemyMove>,
    /// Index of the next move; advances modulo `moves.len()`.
    pub move_cursor: usize,
    #[serde(default)]
    pub statuses: StatusSet,
}

impl EnemyInstance {
    /// Spawn a fresh instance at full health with no block.
    #[must_use]
    pub fn spawn(definition: &EnemyDefinition) -> Self {
        Self {
            definition: definition.key.clone(),
            name: definition.name.clone(),
            max_health: definition.max_health,
            health: definition.max_health,
            block: 0,
            moves: definition.moves.clone(),
            move_cursor: 0,
            statuses: StatusSet::default(),
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// The move this enemy will perform on its next turn.
    ///
    /// `None` only for an enemy defined without moves.
    #[must_use]
    pub fn intent(&self) -> Option<&EnemyMove> {
        if self.moves.is_empty() {
            return None;
        }
        self.moves.get(self.move_cursor % self.moves.len())
    }

    /// Human-readable intent, e.g. `"Pummel (Attack: 5) - A crude but forceful strike."`.
    #[must_use]
    pub fn intent_text(&self) -> String {
        let Some(next) = self.intent() else {
            return "No moves defined!".to_string();
        };

        let mut text = next.name.clone();
        match next.kind {
            MoveKind::Attack if next.hits > 1 => {
                text.push_str(&format!(" (Attack: {}x{})", next.value, next.hits));
            }
            MoveKind::Attack => text.push_str(&format!(" (Attack: {})", next.value)),
            MoveKind::Defend => text.push_str(&format!(" (Defend: {})", next.value)),
            MoveKind::Utility => {}
        }
        if !next.description.is_empty() {
            text.push_str(" - ");
            text.push_str(&next.description);
        }
        text
    }

    /// Advance to the next move in the cycle.
    pub fn advance_cursor(&mut self) {
        if !self.moves.is_empty() {
            self.move_cursor = (self.move_cursor + 1) % self.moves.len();
        }
    }
}
