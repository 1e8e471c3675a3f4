//! Narrative generator interface.
//!
//! The state machine never calls a generator itself. A transition that
//! needs text hands back a [`NarrativeRequest`]; the host fulfils it,
//! now or later, and delivers the reply under the request's ticket. A
//! ticket identifies exactly one request, so a reply that arrives after
//! the machine has moved on (load, reset, a newer request) is recognised
//! and dropped.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{EnemyKey, GameState, GeneratorError, StoryPieceId};

/// Identifier of one narrative request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestTicket {
    /// Bumped on every load and reset.
    pub epoch: u32,
    pub serial: u64,
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.epoch, self.serial)
    }
}

/// Why narration was requested; decides how the reply is merged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPurpose {
    /// Narrate a story piece and offer its options.
    StoryPiece(StoryPieceId),
    /// Scene-setting before a fight. Options are discarded.
    CombatIntro(Vec<EnemyKey>),
    /// After a won fight. Any option continues to `next`.
    Victory { next: StoryPieceId },
    /// After a lost fight. Options are replaced by the defeat choices.
    Defeat,
}

impl RequestPurpose {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            RequestPurpose::StoryPiece(_) => "story",
            RequestPurpose::CombatIntro(_) => "combat_intro",
            RequestPurpose::Victory { .. } => "victory",
            RequestPurpose::Defeat => "defeat",
        }
    }
}

/// Player snapshot sent along with every prompt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeContext {
    pub city: String,
    pub health: u32,
    pub max_health: u32,
    pub gold: u32,
}

impl NarrativeContext {
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        Self {
            city: state
                .current_city
                .as_ref()
                .map_or_else(|| "an unknown place".to_string(), ToString::to_string),
            health: state.health,
            max_health: state.max_health,
            gold: state.gold,
        }
    }
}

/// A request for narration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeRequest {
    pub ticket: RequestTicket,
    pub purpose: RequestPurpose,
    pub prompt: String,
    pub context: NarrativeContext,
}

/// Something that turns prompts into narration.
///
/// Implementations own transport concerns (HTTP, keys, retries); the
/// engine only sees the returned text.
pub trait NarrativeGenerator {
    /// Produce a reply for `request`.
    fn generate(&mut self, request: &NarrativeRequest) -> Result<String, GeneratorError>;
}

/// Replays queued replies in order. Records every prompt it was given.
///
/// ```
/// use spellbound::core::GeneratorError;
/// use spellbound::narrative::ScriptedGenerator;
///
/// let generator = ScriptedGenerator::new()
///     .reply("The gates open.\nOptions:\n1. Enter")
///     .fail(GeneratorError::Transport("timeout".into()));
/// assert_eq!(generator.remaining(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedGenerator {
    replies: VecDeque<Result<String, GeneratorError>>,
    /// Prompts received, oldest first.
    pub prompts: Vec<String>,
}

impl ScriptedGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    #[must_use]
    pub fn reply(mut self, text: impl Into<String>) -> Self {
        self.replies.push_back(Ok(text.into()));
        self
    }

    /// Queue a failure.
    #[must_use]
    pub fn fail(mut self, error: GeneratorError) -> Self {
        self.replies.push_back(Err(error));
        self
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }
}

impl NarrativeGenerator for ScriptedGenerator {
    fn generate(&mut self, request: &NarrativeRequest) -> Result<String, GeneratorError> {
        self.prompts.push(request.prompt.clone());
        self.replies
            .pop_front()
            .unwrap_or_else(|| Err(GeneratorError::Transport("script exhausted".to_string())))
    }
}

/// Offline generator: echoes the prompt as narration with four fixed options.
#[derive(Clone, Copy, Debug, Default)]
pub struct EchoGenerator;

impl NarrativeGenerator for EchoGenerator {
    fn generate(&mut self, request: &NarrativeRequest) -> Result<String, GeneratorError> {
        Ok(format!(
            "{}\nOptions:\n1. Press on\n2. Look around\n3. Steady yourself\n4. Think it over",
            request.prompt
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EngineConfig;

    fn request(prompt: &str) -> NarrativeRequest {
        NarrativeRequest {
            ticket: RequestTicket { epoch: 0, serial: 1 },
            purpose: RequestPurpose::Defeat,
            prompt: prompt.to_string(),
            context: NarrativeContext::from_state(&GameState::new(&EngineConfig::default())),
        }
    }

    #[test]
    fn test_scripted_in_order() {
        let mut generator = ScriptedGenerator::new()
            .reply("first")
            .fail(GeneratorError::EmptyResponse);

        assert_eq!(generator.generate(&request("a")), Ok("first".to_string()));
        assert_eq!(generator.generate(&request("b")), Err(GeneratorError::EmptyResponse));
        assert!(matches!(generator.generate(&request("c")), Err(GeneratorError::Transport(_))));
        assert_eq!(generator.prompts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_echo_is_well_formed() {
        let reply = EchoGenerator.generate(&request("You stand at the gate.")).unwrap();
        let parsed = crate::narrative::parse_response(&reply);

        assert_eq!(parsed.narration, "You stand at the gate.");
        assert_eq!(parsed.options.len(), 4);
        assert!(!parsed.used_fallback);
    }

    #[test]
    fn test_context_without_city() {
        let context = request("x").context;
        assert_eq!(context.city, "an unknown place");
        assert_eq!((context.health, context.max_health, context.gold), (20, 20, 10));
    }

    #[test]
    fn test_ticket_display() {
        assert_eq!(RequestTicket { epoch: 2, serial: 7 }.to_string(), "#2.7");
    }
}
