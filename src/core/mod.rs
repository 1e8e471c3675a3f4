//! Core engine types: identifiers, state, RNG, configuration, errors.
//!
//! This module contains the building blocks every other subsystem shares.
//! Content-specific data (cards, enemies, story) lives in its own module.

pub mod ids;
pub mod catalog;
pub mod rng;
pub mod config;
pub mod error;
pub mod state;

pub use ids::{CardKey, ChapterId, CityKey, EnemyKey, ItemInstanceId, ItemKey, StatusKey, StoryPieceId};
pub use catalog::{Catalog, Definition};
pub use rng::{GameRng, GameRngState};
pub use config::{EngineConfig, DEFAULT_HAND_SIZE, DEFAULT_SAVE_SLOTS};
pub use error::{ContentError, EngineError, GeneratorError, InvalidAction, PersistenceError, Result};
pub use state::{GameState, Gender};
