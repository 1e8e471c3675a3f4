//! Loot tables.
//!
//! `LootResolver` rolls an enemy definition's loot entries and applies the
//! drops to gold, inventory and deck.

pub mod resolver;

pub use resolver::{LootReport, LootResolver};
