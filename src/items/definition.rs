//! Item definitions.

use serde::{Deserialize, Serialize};

use crate::core::{Catalog, CardKey, ContentError, Definition, ItemKey};

/// Effect of a consumable item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "lowercase")]
pub enum ConsumableEffect {
    /// Restore health, clamped to max.
    Heal(u32),
}

/// Item category and its payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ItemKind {
    /// Tracked as the gold counter, never held as an instance.
    Currency,
    Consumable { effect: ConsumableEffect },
    /// Story item with no direct use.
    KeyItem,
    /// Consumed to add `card` to the deck.
    CardScroll { card: CardKey },
}

/// Static item definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub key: ItemKey,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

impl ItemDefinition {
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            key: ItemKey::new(key),
            name: name.into(),
            kind,
            description: String::new(),
            icon: String::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

impl Definition for ItemDefinition {
    type Key = ItemKey;

    fn key(&self) -> &ItemKey {
        &self.key
    }

    fn missing(key: &ItemKey) -> ContentError {
        ContentError::UnknownItem(key.clone())
    }
}

/// Catalog of item definitions.
pub type ItemCatalog = Catalog<ItemDefinition>;
