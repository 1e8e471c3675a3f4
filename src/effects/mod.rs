//! Effect system for cards and enemy moves.
//!
//! ## Key Types
//!
//! - `TargetScope` / `select_targets`: Which enemies a card hits
//! - `absorb` / `strike`: Block-first damage resolution, shared by both sides
//! - `StatusRegistry`: Extensible registry of status definitions
//! - `StatusSet`: Statuses active on one combatant

pub mod damage;
pub mod status;
pub mod targeting;

pub use damage::{absorb, strike, DamageReport};
pub use status::{
    ActiveStatus, Expiry, StatusApplication, StatusBehavior, StatusDefinition, StatusRegistry,
    StatusSet,
};
pub use targeting::{select_targets, TargetScope, Targets};
