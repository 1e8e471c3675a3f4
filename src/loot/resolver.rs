//! Loot resolution.
//!
//! Each entry of an enemy's loot table is rolled independently: sample
//! `u` in `[0, 1)` and grant the reward when `u < chance`. A chance of
//! 1.0 always drops and 0.0 never does.

use tracing::{debug, warn};

use crate::cards::CardCatalog;
use crate::core::{CardKey, ContentError, GameRng, GameState, ItemInstanceId, ItemKey};
use crate::enemies::{EnemyDefinition, LootReward};
use crate::items::{grant_item, ItemCatalog};

/// What a loot roll granted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LootReport {
    pub gold: u32,
    pub items: Vec<(ItemInstanceId, ItemKey)>,
    pub cards: Vec<CardKey>,
    /// Rewards that named unknown content and were skipped.
    pub skipped: Vec<ContentError>,
}

impl LootReport {
    /// Check if nothing dropped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gold == 0 && self.items.is_empty() && self.cards.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: LootReport) {
        self.gold = self.gold.saturating_add(other.gold);
        self.items.extend(other.items);
        self.cards.extend(other.cards);
        self.skipped.extend(other.skipped);
    }

    /// One-line summary for narration prompts, e.g. `"3 gold, Minor Healing Potion"`.
    #[must_use]
    pub fn summary(&self, state: &GameState) -> String {
        let mut parts = Vec::new();
        if self.gold > 0 {
            parts.push(format!("{} gold", self.gold));
        }
        for (id, key) in &self.items {
            let name = state
                .inventory
                .iter()
                .find(|item| item.instance_id == *id)
                .map_or(key.as_str(), |item| item.name());
            parts.push(name.to_string());
        }
        for card in &self.cards {
            parts.push(format!("the {} card", card));
        }
        if parts.is_empty() {
            "nothing".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Rolls loot tables against the item and card catalogs.
pub struct LootResolver<'c> {
    items: &'c ItemCatalog,
    cards: &'c CardCatalog,
}

impl<'c> LootResolver<'c> {
    #[must_use]
    pub fn new(items: &'c ItemCatalog, cards: &'c CardCatalog) -> Self {
        Self { items, cards }
    }

    /// Roll every entry of `enemy`'s loot table and apply the drops.
    pub fn resolve(&self, state: &mut GameState, enemy: &EnemyDefinition, rng: &mut GameRng) -> LootReport {
        let mut report = LootReport::default();

        for entry in &enemy.loot {
            let roll = rng.gen_unit();
            if roll >= entry.chance {
                continue;
            }
            debug!(enemy = %enemy.key, reward = ?entry.reward, roll, chance = entry.chance, "loot dropped");

            match &entry.reward {
                LootReward::Gold(amount) => {
                    state.gain_gold(*amount);
                    report.gold = report.gold.saturating_add(*amount);
                }
                LootReward::Item(key) => match grant_item(state, self.items, key) {
                    Ok(id) => report.items.push((id, key.clone())),
                    Err(err) => {
                        warn!(enemy = %enemy.key, error = %err, "skipping loot entry");
                        report.skipped.push(err);
                    }
                },
                LootReward::Card(card) => {
                    if self.cards.contains(card) {
                        state.deck.push(card.clone());
                        report.cards.push(card.clone());
                    } else {
                        let err = ContentError::UnknownCard(card.clone());
                        warn!(enemy = %enemy.key, error = %err, "skipping loot entry");
                        report.skipped.push(err);
                    }
                }
            }
        }

        report
    }
}
