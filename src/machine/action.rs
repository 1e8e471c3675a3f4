//! Player actions and their outcomes.

use serde::{Deserialize, Serialize};

use crate::combat::{CardPlay, CombatStatus, EnemyPhase};
use crate::core::{Gender, ItemInstanceId};
use crate::items::ItemUse;
use crate::narrative::NarrativeRequest;

/// Everything a player can do through the machine.
///
/// Save, load and reset are methods on the machine instead, since they
/// are allowed while a narrative request is in flight (load, reset) or
/// talk to the save store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    BeginAdventure,
    ChooseGender(Gender),
    /// Index into the city list.
    ChooseCity(usize),
    /// Index into the shown options.
    ChooseOption(usize),
    /// Index into the hand.
    PlayCard(usize),
    EndTurn,
    UseItem(ItemInstanceId),
    /// Re-issue the last request whose generation failed.
    RetryNarration,
}

impl PlayerAction {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PlayerAction::BeginAdventure => "begin adventure",
            PlayerAction::ChooseGender(_) => "choose gender",
            PlayerAction::ChooseCity(_) => "choose city",
            PlayerAction::ChooseOption(_) => "choose option",
            PlayerAction::PlayCard(_) => "play card",
            PlayerAction::EndTurn => "end turn",
            PlayerAction::UseItem(_) => "use item",
            PlayerAction::RetryNarration => "retry narration",
        }
    }
}

/// Detail of what an action resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionEvent {
    CardPlayed(CardPlay),
    EnemyPhase(EnemyPhase),
    ItemUsed(ItemUse),
}

/// Result of a successful action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Narration the host must fulfil and deliver.
    pub request: Option<NarrativeRequest>,
    /// Set when the action touched combat.
    pub combat: Option<CombatStatus>,
    pub event: Option<ActionEvent>,
}

impl ActionOutcome {
    pub(crate) fn with_request(request: NarrativeRequest) -> Self {
        Self {
            request: Some(request),
            ..Self::default()
        }
    }
}

/// What happened to a delivered reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Merged into the state (fallback narration on generator failure).
    Applied,
    /// Did not match the pending request and was dropped.
    Stale,
}
