//! Error taxonomy.
//!
//! None of these are fatal. The state machine recovers from content,
//! generator and persistence errors locally (fallback narration, unusable
//! slot) and rejects invalid actions without touching state. They are
//! still returned so hosts can log or display them.

use thiserror::Error;

use super::ids::{CardKey, ChapterId, CityKey, EnemyKey, ItemInstanceId, ItemKey, StatusKey, StoryPieceId};
use crate::persistence::SlotId;

/// A content identifier did not resolve.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("unknown card: {0}")]
    UnknownCard(CardKey),

    #[error("unknown enemy: {0}")]
    UnknownEnemy(EnemyKey),

    #[error("unknown item: {0}")]
    UnknownItem(ItemKey),

    #[error("unknown status effect: {0}")]
    UnknownStatus(StatusKey),

    #[error("unknown city: {0}")]
    UnknownCity(CityKey),

    #[error("encounter has no enemies")]
    EmptyEncounter,

    #[error("chapter {0} not found")]
    UnknownChapter(ChapterId),

    #[error("story piece \"{piece}\" not found in chapter {chapter}")]
    UnknownStoryPiece { chapter: ChapterId, piece: StoryPieceId },
}

/// The narrative generator failed to produce usable text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("generator transport failed: {0}")]
    Transport(String),

    #[error("generator returned an empty response")]
    EmptyResponse,
}

/// A save slot could not be written or read.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("invalid save slot {slot}: only {slot_count} slots available")]
    InvalidSlot { slot: SlotId, slot_count: usize },

    #[error("save slot {slot} is corrupted: {reason}")]
    Corrupted { slot: SlotId, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// An action was rejected without changing any state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidAction {
    #[error("a narrative request is still in flight")]
    RequestInFlight,

    #[error("{action} is not allowed in {mode} mode")]
    WrongMode { action: &'static str, mode: &'static str },

    #[error("no card at hand index {index} (hand size {hand_size})")]
    CardIndexOutOfRange { index: usize, hand_size: usize },

    #[error("card {card} costs {cost} mana but only {mana} is available")]
    InsufficientMana { card: CardKey, cost: u32, mana: u32 },

    #[error("option {index} is out of range ({count} options shown)")]
    OptionOutOfRange { index: usize, count: usize },

    #[error("no options are currently shown")]
    NoOptions,

    #[error("item {0} is not in the inventory")]
    ItemNotFound(ItemInstanceId),

    #[error("item {0} cannot be used")]
    ItemNotUsable(ItemKey),

    #[error("there is no failed narration to retry")]
    NothingToRetry,

    #[error("there are no living enemies to act")]
    NoLivingEnemies,
}

/// Any engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    InvalidAction(#[from] InvalidAction),
}

pub type Result<T> = std::result::Result<T, EngineError>;
