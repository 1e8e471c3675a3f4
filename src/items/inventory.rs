//! Inventory instances and item use.
//!
//! Each granted item becomes its own [`InventoryItem`] with a fresh
//! instance id, so two potions are two entries. Instances copy the
//! definition's fields and need no catalog lookup once granted.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::definition::{ConsumableEffect, ItemCatalog, ItemDefinition, ItemKind};
use crate::core::{CardKey, ContentError, GameState, InvalidAction, ItemInstanceId, ItemKey};

/// An item held by the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub instance_id: ItemInstanceId,
    #[serde(flatten)]
    pub definition: ItemDefinition,
}

impl InventoryItem {
    #[must_use]
    pub fn key(&self) -> &ItemKey {
        &self.definition.key
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Whether [`use_item`] would accept this item.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        matches!(
            self.definition.kind,
            ItemKind::Consumable { .. } | ItemKind::CardScroll { .. }
        )
    }
}

/// Result of using an item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemUse {
    /// Health actually restored.
    Healed(u32),
    /// Card appended to the deck.
    LearnedCard(CardKey),
}

/// Add a new instance of `key` to the inventory.
pub fn grant_item(
    state: &mut GameState,
    items: &ItemCatalog,
    key: &ItemKey,
) -> Result<ItemInstanceId, ContentError> {
    let definition = items.get(key)?.clone();
    let instance_id = state.alloc_instance_id();
    debug!(item = %key, %instance_id, "granted item");
    state.inventory.push(InventoryItem {
        instance_id,
        definition,
    });
    Ok(instance_id)
}

/// Use an inventory item, consuming it.
///
/// Rejected items leave the state untouched.
pub fn use_item(state: &mut GameState, instance_id: ItemInstanceId) -> Result<ItemUse, InvalidAction> {
    let idx = state
        .inventory
        .iter()
        .position(|item| item.instance_id == instance_id)
        .ok_or(InvalidAction::ItemNotFound(instance_id))?;

    let outcome = match &state.inventory[idx].definition.kind {
        ItemKind::Consumable {
            effect: ConsumableEffect::Heal(amount),
        } => {
            let amount = *amount;
            ItemUse::Healed(state.heal(amount))
        }
        ItemKind::CardScroll { card } => {
            let card = card.clone();
            state.deck.push(card.clone());
            ItemUse::LearnedCard(card)
        }
        ItemKind::Currency | ItemKind::KeyItem => {
            return Err(InvalidAction::ItemNotUsable(
                state.inventory[idx].key().clone(),
            ));
        }
    };

    let item = state.inventory.remove(idx);
    debug!(item = %item.key(), %instance_id, ?outcome, "used item");
    Ok(outcome)
}
