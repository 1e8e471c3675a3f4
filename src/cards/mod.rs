//! Card system: definitions and catalog.
//!
//! ## Key Types
//!
//! - `CardDefinition`: Static card data (cost, kind, effect)
//! - `CardKind`: Attack, Defend, Utility or Healing
//! - `CardEffect`: Damage/block/heal/status payload, target scope, exile flag
//! - `CardCatalog`: Card definition lookup
//!
//! Cards in piles are plain [`CardKey`](crate::core::CardKey)s; duplicates
//! of the same card are indistinguishable.

pub mod definition;
pub mod registry;

pub use definition::{CardDefinition, CardEffect, CardKind};
pub use registry::{cards_of_kind, CardCatalog};
