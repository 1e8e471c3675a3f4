//! Items: definitions, inventory instances, item use.
//!
//! ## Key Types
//!
//! - `ItemDefinition` / `ItemKind`: Static item data
//! - `ItemCatalog`: Definition lookup
//! - `InventoryItem`: A held instance with its own id
//! - `grant_item` / `use_item`: Inventory mutation

pub mod definition;
pub mod inventory;

pub use definition::{ConsumableEffect, ItemCatalog, ItemDefinition, ItemKind};
pub use inventory::{grant_item, use_item, InventoryItem, ItemUse};
