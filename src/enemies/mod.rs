//! Enemies: definitions, per-combat instances, catalog.
//!
//! ## Key Types
//!
//! - `EnemyDefinition`: Health, move cycle, loot table
//! - `EnemyMove` / `MoveKind`: One step of the deterministic move cycle
//! - `LootEntry` / `LootReward`: Independent loot rolls
//! - `EnemyInstance`: Mutable copy for one encounter
//! - `EnemyCatalog`: Definition lookup

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{EnemyDefinition, EnemyMove, LootEntry, LootReward, MoveKind};
pub use instance::EnemyInstance;
pub use registry::EnemyCatalog;
