//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: its cost,
//! kind and effect. Cards in piles are referenced by [`CardKey`] only; the
//! definition is looked up in the [`CardCatalog`](super::CardCatalog) when
//! the card is played.

use serde::{Deserialize, Serialize};

use crate::core::CardKey;
use crate::effects::{StatusApplication, TargetScope};

/// What a card does when played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    /// Deals damage to enemies.
    Attack,
    /// Grants the player block.
    Defend,
    /// Applies a status effect.
    Utility,
    /// Restores player health.
    Healing,
}

impl CardKind {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardKind::Attack => "Attack",
            CardKind::Defend => "Defend",
            CardKind::Utility => "Utility",
            CardKind::Healing => "Healing",
        }
    }
}

/// Effect payload of a card.
///
/// Only the fields relevant to the card's [`CardKind`] are read during
/// resolution; the rest stay at zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardEffect {
    pub damage: u32,
    pub block: u32,
    pub heal: u32,
    pub status: Option<StatusApplication>,
    pub target: TargetScope,
    /// Move to the exile pile after use instead of discard.
    pub exile: bool,
}

impl CardEffect {
    /// Effect dealing `amount` damage to a single target.
    #[must_use]
    pub fn damage(amount: u32) -> Self {
        Self { damage: amount, ..Self::default() }
    }

    /// Effect granting `amount` block.
    #[must_use]
    pub fn block(amount: u32) -> Self {
        Self { block: amount, ..Self::default() }
    }

    /// Effect healing `amount` health.
    #[must_use]
    pub fn heal(amount: u32) -> Self {
        Self { heal: amount, ..Self::default() }
    }

    /// Effect applying a status to a single target.
    #[must_use]
    pub fn status(application: StatusApplication) -> Self {
        Self { status: Some(application), ..Self::default() }
    }

    /// Hit every enemy instead of the first living one.
    #[must_use]
    pub fn all_targets(mut self) -> Self {
        self.target = TargetScope::All;
        self
    }

    /// Exile the card after use.
    #[must_use]
    pub fn exiled(mut self) -> Self {
        self.exile = true;
        self
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use spellbound::cards::{CardDefinition, CardEffect, CardKind};
///
/// let strike = CardDefinition::new("Flame Strike", CardKind::Attack, 2, CardEffect::damage(8).all_targets())
///     .with_description("Engulf all enemies in fire. Deals 8 damage to all.");
///
/// assert_eq!(strike.cost, 2);
/// assert!(!strike.effect.exile);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Catalog key (also the default display name).
    pub key: CardKey,

    /// Display name.
    pub name: String,

    /// Mana cost.
    pub cost: u32,

    pub kind: CardKind,

    pub effect: CardEffect,

    #[serde(default)]
    pub description: String,
}

impl CardDefinition {
    /// Create a card whose display name is its key.
    #[must_use]
    pub fn new(key: impl Into<String>, kind: CardKind, cost: u32, effect: CardEffect) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key: CardKey::new(key),
            cost,
            kind,
            effect,
            description: String::new(),
        }
    }

    /// Set the display name (builder pattern).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StatusKey;

    #[test]
    fn test_card_builder() {
        let card = CardDefinition::new("Tidal Heal", CardKind::Healing, 2, CardEffect::heal(5).exiled())
            .with_description("Heal 5 HP. Exile.");

        assert_eq!(card.key, CardKey::new("Tidal Heal"));
        assert_eq!(card.name, "Tidal Heal");
        assert_eq!(card.effect.heal, 5);
        assert!(card.effect.exile);
        assert_eq!(card.effect.target, TargetScope::Single);
    }

    #[test]
    fn test_status_effect() {
        let effect = CardEffect::status(StatusApplication::new("miss_next", 1));
        let status = effect.status.unwrap();
        assert_eq!(status.key, StatusKey::new("miss_next"));
        assert_eq!(status.duration, 1);
    }

    #[test]
    fn test_effect_defaults_from_json() {
        let effect: CardEffect = serde_json::from_str(r#"{ "damage": 6 }"#).unwrap();
        assert_eq!(effect, CardEffect::damage(6));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(CardKind::Attack.name(), "Attack");
        assert_eq!(CardKind::Healing.name(), "Healing");
    }
}
