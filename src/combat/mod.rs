//! Turn-based card combat.
//!
//! ## Key Types
//!
//! - `CombatEngine`: Encounter setup, card play, enemy phase, end check
//! - `CombatStatus`: Ongoing, Victory (with loot) or Defeat
//! - `CardPlay` / `EnemyPhase`: Reports of what a step did

pub mod engine;

pub use engine::{CardPlay, CombatEngine, CombatStatus, EnemyAction, EnemyPhase};
