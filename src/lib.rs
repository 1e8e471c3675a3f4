//! # spellbound
//!
//! Game state machine and card-combat engine for a narrated deckbuilding
//! RPG. The player sets up a mage, travels a branching story whose prose
//! comes from an external text generator, and fights card battles against
//! scripted enemies.
//!
//! ## Design Principles
//!
//! 1. **One Owner**: `GameStateMachine` owns the `GameState` and is the
//!    only thing that mutates it. Every transition is a method call.
//!
//! 2. **Generator at Arm's Length**: Transitions that need prose return a
//!    `NarrativeRequest`. The host fulfils it whenever it likes and hands
//!    the reply back under the request's ticket; late replies are dropped.
//!
//! 3. **Content by Key**: Cards, enemies, items, statuses and story pieces
//!    are looked up in catalogs. A missing key is a recoverable
//!    `ContentError`, never a panic.
//!
//! ## Modules
//!
//! - `core`: Identifiers, catalogs, state, RNG, configuration, errors
//! - `cards`: Card definitions
//! - `effects`: Targeting, damage and status effects
//! - `enemies`: Enemy definitions, instances and intents
//! - `items`: Item definitions and inventory
//! - `zones`: Deck, hand, discard and exile piles
//! - `combat`: Card play, enemy phase and end-of-combat resolution
//! - `loot`: Loot rolls
//! - `narrative`: Story content, prompts, generator protocol, reply parsing
//! - `persistence`: Save slots over a key-value store
//! - `machine`: The game state machine
//! - `games`: Built-in content

pub mod core;
pub mod cards;
pub mod effects;
pub mod enemies;
pub mod items;
pub mod zones;
pub mod combat;
pub mod loot;
pub mod narrative;
pub mod persistence;
pub mod machine;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    CardKey, ChapterId, CityKey, EnemyKey, ItemInstanceId, ItemKey, StatusKey, StoryPieceId,
    Catalog, Definition,
    GameRng, GameRngState,
    EngineConfig, GameState, Gender,
    ContentError, EngineError, GeneratorError, InvalidAction, PersistenceError, Result,
};

pub use crate::cards::{CardCatalog, CardDefinition, CardEffect, CardKind};

pub use crate::effects::{
    StatusApplication, StatusBehavior, StatusDefinition, StatusRegistry, StatusSet, TargetScope,
};

pub use crate::enemies::{EnemyCatalog, EnemyDefinition, EnemyInstance, EnemyMove, LootEntry, LootReward, MoveKind};

pub use crate::items::{InventoryItem, ItemCatalog, ItemDefinition, ItemKind, ItemUse};

pub use crate::zones::{DeckManager, DrawReport, Pile};

pub use crate::combat::{CardPlay, CombatEngine, CombatStatus, EnemyAction, EnemyPhase};

pub use crate::loot::{LootReport, LootResolver};

pub use crate::narrative::{
    NarrativeGenerator, NarrativeRequest, ParsedNarration, RequestPurpose, RequestTicket, parse_response,
};

pub use crate::persistence::{FileKv, KeyValueStore, MemoryKv, SaveRecord, SaveStore, SlotId, SlotStore};

pub use crate::machine::{
    ActionEvent, ActionOutcome, Content, Delivery, GameMode, GameStateMachine, OptionRoute, PlayerAction,
};
