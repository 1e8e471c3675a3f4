//! Top-level modes and option routing.

use serde::{Deserialize, Serialize};

use crate::core::StoryPieceId;

/// Step of character setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetupStep {
    Gender,
    City,
}

/// Top-level game mode.
///
/// ```text
/// MainMenu -> CharacterSetup -> Narrative <-> PreCombat -> Combat
///                                   ^                        |
///                                   +------ Victory <--------+
///                                                            |
///              {retry, load, reset} <------- Defeat <--------+
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    MainMenu,
    CharacterSetup(SetupStep),
    Narrative,
    /// Showing a piece that leads straight into a fight.
    PreCombat,
    Combat,
    Victory,
    Defeat,
}

impl GameMode {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            GameMode::MainMenu => "main menu",
            GameMode::CharacterSetup(SetupStep::Gender) => "gender selection",
            GameMode::CharacterSetup(SetupStep::City) => "city selection",
            GameMode::Narrative => "narrative",
            GameMode::PreCombat => "pre-combat",
            GameMode::Combat => "combat",
            GameMode::Victory => "victory",
            GameMode::Defeat => "defeat",
        }
    }
}

/// What choosing one of the shown options does.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionRoute {
    /// Follow the current story piece's `next`.
    #[default]
    FromPiece,
    /// Any option enters this piece.
    Goto(StoryPieceId),
    /// Options are the fixed end-of-segment labels.
    EndOfSegment,
    /// Options are the fixed defeat choices.
    Defeat,
}
