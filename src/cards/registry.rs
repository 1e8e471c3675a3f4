//! Card catalog for definition lookup.

use crate::core::{CardKey, Catalog, ContentError, Definition};

use super::definition::{CardDefinition, CardKind};

impl Definition for CardDefinition {
    type Key = CardKey;

    fn key(&self) -> &CardKey {
        &self.key
    }

    fn missing(key: &CardKey) -> ContentError {
        ContentError::UnknownCard(key.clone())
    }
}

/// Catalog of card definitions.
///
/// ## Example
///
/// ```
/// use spellbound::cards::{CardCatalog, CardDefinition, CardEffect, CardKind};
/// use spellbound::core::CardKey;
///
/// let catalog = CardCatalog::new()
///     .with(CardDefinition::new("Fireball", CardKind::Attack, 1, CardEffect::damage(6)));
///
/// let found = catalog.get(&CardKey::new("Fireball")).unwrap();
/// assert_eq!(found.effect.damage, 6);
/// assert!(catalog.get(&CardKey::new("Meteor")).is_err());
/// ```
pub type CardCatalog = Catalog<CardDefinition>;

/// Find cards of a given kind.
pub fn cards_of_kind(catalog: &CardCatalog, kind: CardKind) -> impl Iterator<Item = &CardDefinition> {
    catalog.iter().filter(move |c| c.kind == kind)
}
