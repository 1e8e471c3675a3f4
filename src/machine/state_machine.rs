//! The game state machine.
//!
//! `GameStateMachine` owns the [`GameState`], the run RNG and the save
//! store, and is the only thing that changes them. Player actions go
//! through [`GameStateMachine::apply`]; narration comes back through
//! [`GameStateMachine::deliver`].
//!
//! ## Narrative requests
//!
//! At most one request is pending. While it is, every action and `save`
//! fail with [`InvalidAction::RequestInFlight`]; `load` and `reset` are
//! always allowed and supersede it. A reply is merged only if its ticket
//! is the pending one.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::action::{ActionEvent, ActionOutcome, Delivery, PlayerAction};
use super::content::Content;
use super::mode::{GameMode, OptionRoute, SetupStep};
use crate::combat::CombatStatus;
use crate::core::{
    ContentError, EngineConfig, EnemyKey, GameRng, GameState, Gender, GeneratorError, InvalidAction, Result,
    StoryPieceId,
};
use crate::items::use_item;
use crate::narrative::prompt::{
    combat_intro_prompt, defeat_prompt, story_prompt, victory_prompt, CONNECTION_LOST, DEFEAT_OPTIONS,
    END_OF_SEGMENT, END_OF_SEGMENT_OPTIONS, LOST_THREAD, LOST_THREAD_OPTION, NO_PAST, UNKNOWN_ENEMY,
    UNKNOWN_ENEMY_OPTION,
};
use crate::narrative::{
    find_piece, parse_response, NarrativeContext, NarrativeGenerator, NarrativeRequest, RequestPurpose,
    RequestTicket, StoryNext,
};
use crate::persistence::{MemoryKv, SaveRecord, SaveStore, SlotId, SlotStore, SlotSummary};

/// Top-level controller of one game.
///
/// ## Usage
///
/// ```
/// use spellbound::core::{EngineConfig, Gender};
/// use spellbound::games::eldoraeya;
/// use spellbound::machine::{GameMode, GameStateMachine, PlayerAction};
/// use spellbound::narrative::EchoGenerator;
///
/// let mut machine = GameStateMachine::new(eldoraeya::content(), EngineConfig::default());
/// let mut narrator = EchoGenerator;
///
/// machine.apply(PlayerAction::BeginAdventure).unwrap();
/// machine.apply(PlayerAction::ChooseGender(Gender::Female)).unwrap();
/// machine.apply(PlayerAction::ChooseCity(0)).unwrap();
/// machine.run_pending(&mut narrator);
///
/// assert_eq!(machine.mode(), GameMode::Narrative);
/// assert_eq!(machine.state().last_options.len(), 4);
/// ```
pub struct GameStateMachine<S = SlotStore<MemoryKv>> {
    content: Content,
    config: EngineConfig,
    state: GameState,
    rng: GameRng,
    store: S,

    /// Bumped on load and reset.
    epoch: u32,
    next_serial: u64,
    pending: Option<NarrativeRequest>,
    /// Last request whose generation failed, for retry.
    failed: Option<NarrativeRequest>,
}

impl GameStateMachine<SlotStore<MemoryKv>> {
    /// Machine with an in-memory save store.
    #[must_use]
    pub fn new(content: Content, config: EngineConfig) -> Self {
        let store = SlotStore::new(MemoryKv::new(), config.save_slot_count);
        Self::with_store(content, config, store)
    }
}

impl<S: SaveStore> GameStateMachine<S> {
    /// Machine persisting to `store`.
    #[must_use]
    pub fn with_store(content: Content, config: EngineConfig, store: S) -> Self {
        Self {
            state: GameState::new(&config),
            rng: GameRng::new(config.seed),
            content,
            config,
            store,
            epoch: 0,
            next_serial: 1,
            pending: None,
            failed: None,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The request awaiting a reply, if any.
    #[must_use]
    pub fn pending_request(&self) -> Option<&NarrativeRequest> {
        self.pending.as_ref()
    }

    /// Whether [`PlayerAction::RetryNarration`] has something to retry.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        self.failed.is_some()
    }

    // === Actions ===

    /// Apply a player action.
    ///
    /// On error nothing has changed.
    pub fn apply(&mut self, action: PlayerAction) -> Result<ActionOutcome> {
        if self.pending.is_some() {
            return Err(InvalidAction::RequestInFlight.into());
        }
        debug!(action = action.name(), mode = self.state.mode.name(), "apply");

        match action {
            PlayerAction::BeginAdventure => {
                self.require(action, |mode| mode == GameMode::MainMenu)?;
                self.set_mode(GameMode::CharacterSetup(SetupStep::Gender));
                self.show(None, vec![Gender::Male.label().to_string(), Gender::Female.label().to_string()]);
                Ok(ActionOutcome::default())
            }
            PlayerAction::ChooseGender(gender) => {
                self.require(action, |mode| mode == GameMode::CharacterSetup(SetupStep::Gender))?;
                self.state.gender = Some(gender);
                self.set_mode(GameMode::CharacterSetup(SetupStep::City));
                let labels = self.content.cities.iter().map(|c| c.label()).collect();
                self.show(None, labels);
                Ok(ActionOutcome::default())
            }
            PlayerAction::ChooseCity(index) => {
                self.require(action, |mode| mode == GameMode::CharacterSetup(SetupStep::City))?;
                let city = self.content.cities.at(index).ok_or(InvalidAction::OptionOutOfRange {
                    index,
                    count: self.content.cities.len(),
                })?;
                self.state.starting_city = Some(city.key.clone());
                self.state.current_city = Some(city.key.clone());
                self.state.chapter = self.config.starting_chapter;
                info!(city = %city.key, "city chosen");
                let start = self.config.start_piece.clone();
                Ok(self.enter_piece(start))
            }
            PlayerAction::ChooseOption(index) => {
                self.require(action, |mode| {
                    matches!(
                        mode,
                        GameMode::Narrative | GameMode::PreCombat | GameMode::Victory | GameMode::Defeat
                    )
                })?;
                let count = self.state.last_options.len();
                if count == 0 {
                    return Err(InvalidAction::NoOptions.into());
                }
                if index >= count {
                    return Err(InvalidAction::OptionOutOfRange { index, count }.into());
                }
                Ok(self.choose(index))
            }
            PlayerAction::PlayCard(hand_index) => {
                self.require(action, |mode| mode == GameMode::Combat)?;
                let play = self
                    .content
                    .combat(self.config.hand_size)
                    .play_card(&mut self.state, hand_index, &mut self.rng)?;
                let status = play.outcome.clone();
                let mut outcome = self.after_combat_step(status);
                outcome.event = Some(ActionEvent::CardPlayed(play));
                Ok(outcome)
            }
            PlayerAction::EndTurn => {
                self.require(action, |mode| mode == GameMode::Combat)?;
                let phase = self
                    .content
                    .combat(self.config.hand_size)
                    .end_turn(&mut self.state, &mut self.rng)?;
                let status = phase.outcome.clone();
                let mut outcome = self.after_combat_step(status);
                outcome.event = Some(ActionEvent::EnemyPhase(phase));
                Ok(outcome)
            }
            PlayerAction::UseItem(instance_id) => {
                self.require(action, |mode| {
                    matches!(
                        mode,
                        GameMode::Narrative | GameMode::PreCombat | GameMode::Combat | GameMode::Victory
                    )
                })?;
                let used = use_item(&mut self.state, instance_id)?;
                Ok(ActionOutcome {
                    event: Some(ActionEvent::ItemUsed(used)),
                    ..ActionOutcome::default()
                })
            }
            PlayerAction::RetryNarration => {
                let failed = self.failed.take().ok_or(InvalidAction::NothingToRetry)?;
                info!(purpose = failed.purpose.name(), "retrying narration");
                Ok(ActionOutcome::with_request(self.issue(failed.purpose, failed.prompt)))
            }
        }
    }

    /// Apply an action and fulfil any resulting request with `generator`.
    pub fn apply_with(
        &mut self,
        action: PlayerAction,
        generator: &mut impl NarrativeGenerator,
    ) -> Result<ActionOutcome> {
        let outcome = self.apply(action)?;
        self.run_pending(generator);
        Ok(outcome)
    }

    fn require(
        &self,
        action: PlayerAction,
        allowed: impl Fn(GameMode) -> bool,
    ) -> std::result::Result<(), InvalidAction> {
        if allowed(self.state.mode) {
            Ok(())
        } else {
            Err(InvalidAction::WrongMode {
                action: action.name(),
                mode: self.state.mode.name(),
            })
        }
    }

    fn set_mode(&mut self, mode: GameMode) {
        if self.state.mode != mode {
            info!(from = self.state.mode.name(), to = mode.name(), "mode change");
            self.state.mode = mode;
        }
    }

    fn show(&mut self, narration: Option<&str>, options: Vec<String>) {
        self.state.last_narrative_text = narration.map(str::to_string);
        self.state.last_options = options;
    }

    // === Narrative ===

    fn city_name(&self) -> String {
        self.state
            .current_city
            .as_ref()
            .map_or_else(|| "an unknown place".to_string(), ToString::to_string)
    }

    fn foe_names(&self, keys: &[EnemyKey]) -> Vec<String> {
        keys.iter()
            .map(|key| {
                self.content
                    .enemies
                    .get(key)
                    .map_or_else(|_| key.to_string(), |def| def.name.clone())
            })
            .collect()
    }

    /// Show a story piece and request its narration.
    fn enter_piece(&mut self, id: StoryPieceId) -> ActionOutcome {
        let piece = match find_piece(&self.content.story, self.state.chapter, &id) {
            Ok(piece) => piece,
            Err(err) => return self.lost_thread(err),
        };

        self.state.current_story_piece = Some(id.clone());
        self.state.completed_story_beats.insert(id.clone());
        let foes = match &piece.next {
            StoryNext::Combat { enemies, .. } => self.foe_names(enemies),
            _ => Vec::new(),
        };
        let prompt = story_prompt(piece, &self.city_name(), &foes);
        let mode = if matches!(piece.next, StoryNext::Combat { .. }) {
            GameMode::PreCombat
        } else {
            GameMode::Narrative
        };

        debug!(piece = %id, chapter = %self.state.chapter, "entering story piece");
        self.set_mode(mode);
        self.state.route = OptionRoute::FromPiece;
        ActionOutcome::with_request(self.issue(RequestPurpose::StoryPiece(id), prompt))
    }

    /// Recover from missing story content.
    fn lost_thread(&mut self, err: ContentError) -> ActionOutcome {
        warn!(error = %err, "story content missing");
        self.set_mode(GameMode::Narrative);
        self.state.route = OptionRoute::Goto(self.config.start_piece.clone());
        self.show(Some(LOST_THREAD), vec![LOST_THREAD_OPTION.to_string()]);
        ActionOutcome::default()
    }

    fn choose(&mut self, index: usize) -> ActionOutcome {
        debug!(index, option = %self.state.last_options[index], "option chosen");
        match self.state.route.clone() {
            OptionRoute::Goto(piece) => self.enter_piece(piece),
            OptionRoute::EndOfSegment => self.end_of_segment(),
            OptionRoute::Defeat => self.defeat_choice(index),
            OptionRoute::FromPiece => self.follow_piece(index),
        }
    }

    fn follow_piece(&mut self, index: usize) -> ActionOutcome {
        let Some(current) = self.state.current_story_piece.clone() else {
            let start = self.config.start_piece.clone();
            return self.enter_piece(start);
        };
        let next = match find_piece(&self.content.story, self.state.chapter, &current) {
            Ok(piece) => piece.next.clone(),
            Err(err) => return self.lost_thread(err),
        };

        match next {
            StoryNext::Options { pieces } if !pieces.is_empty() => {
                let target = pieces[index % pieces.len()].clone();
                self.enter_piece(target)
            }
            StoryNext::Combat { enemies, .. } => self.start_combat(&enemies),
            StoryNext::Options { .. } | StoryNext::End => self.end_of_segment(),
        }
    }

    fn end_of_segment(&mut self) -> ActionOutcome {
        self.set_mode(GameMode::Narrative);
        self.state.route = OptionRoute::EndOfSegment;
        self.show(
            Some(END_OF_SEGMENT),
            END_OF_SEGMENT_OPTIONS.iter().map(|o| o.to_string()).collect(),
        );
        ActionOutcome::default()
    }

    // === Combat ===

    fn start_combat(&mut self, enemies: &[EnemyKey]) -> ActionOutcome {
        let started = self
            .content
            .combat(self.config.hand_size)
            .start_encounter(&mut self.state, enemies, &mut self.rng);
        if let Err(err) = started {
            warn!(error = %err, "cannot start combat");
            self.set_mode(GameMode::Narrative);
            self.state.route = OptionRoute::Goto(self.config.start_piece.clone());
            self.show(Some(UNKNOWN_ENEMY), vec![UNKNOWN_ENEMY_OPTION.to_string()]);
            return ActionOutcome::default();
        }

        self.set_mode(GameMode::Combat);
        self.show(None, Vec::new());
        let hero = self.state.gender.map_or("mage", Gender::label);
        let enemy_health = self.state.current_enemies.first().map_or(0, |e| e.health);
        let prompt = combat_intro_prompt(
            hero,
            &self.foe_names(enemies),
            &self.city_name(),
            self.state.health,
            enemy_health,
        );
        let request = self.issue(RequestPurpose::CombatIntro(enemies.to_vec()), prompt);
        ActionOutcome {
            request: Some(request),
            combat: Some(CombatStatus::Ongoing),
            event: None,
        }
    }

    /// Leave combat if the last step ended it.
    fn after_combat_step(&mut self, status: CombatStatus) -> ActionOutcome {
        let request = match &status {
            CombatStatus::Ongoing => None,
            CombatStatus::Victory { loot } => {
                let next = self.victory_target();
                let foes = self.foe_names(&self.state.last_encounter);
                let prompt = victory_prompt(
                    &foes,
                    &self.city_name(),
                    self.state.health,
                    self.state.gold,
                    &loot.summary(&self.state),
                );
                self.set_mode(GameMode::Victory);
                self.state.route = OptionRoute::Goto(next.clone());
                Some(self.issue(RequestPurpose::Victory { next }, prompt))
            }
            CombatStatus::Defeat => {
                let foes = self.foe_names(&self.state.last_encounter);
                let prompt = defeat_prompt(&foes, &self.city_name());
                self.set_mode(GameMode::Defeat);
                self.state.route = OptionRoute::Defeat;
                let request = self.issue(RequestPurpose::Defeat, prompt);
                // Defeat choices stay available even if narration fails
                self.state.last_options = DEFEAT_OPTIONS.iter().map(|o| o.to_string()).collect();
                Some(request)
            }
        };

        ActionOutcome {
            request,
            combat: Some(status),
            event: None,
        }
    }

    /// Piece to continue with after winning the current piece's fight.
    fn victory_target(&self) -> StoryPieceId {
        self.state
            .current_story_piece
            .as_ref()
            .and_then(|id| find_piece(&self.content.story, self.state.chapter, id).ok())
            .and_then(|piece| match &piece.next {
                StoryNext::Combat { victory, .. } => victory.clone(),
                _ => None,
            })
            .unwrap_or_else(|| self.config.start_piece.clone())
    }

    fn defeat_choice(&mut self, index: usize) -> ActionOutcome {
        match index {
            0 => {
                let encounter = self.state.last_encounter.clone();
                if encounter.is_empty() {
                    warn!("no encounter to restart");
                    self.reset();
                    return ActionOutcome::default();
                }
                info!(enemies = ?encounter, "restarting battle");
                self.state.heal_full();
                self.start_combat(&encounter)
            }
            1 => {
                match self.load_most_recent() {
                    Ok(true) => {}
                    Ok(false) => {
                        self.reset();
                        self.state.last_narrative_text = Some(NO_PAST.to_string());
                    }
                    Err(err) => {
                        warn!(error = %err, "rewind failed");
                        self.reset();
                        self.state.last_narrative_text = Some(NO_PAST.to_string());
                    }
                }
                ActionOutcome::default()
            }
            _ => {
                self.reset();
                ActionOutcome::default()
            }
        }
    }

    // === Generator protocol ===

    fn issue(&mut self, purpose: RequestPurpose, prompt: String) -> NarrativeRequest {
        let ticket = RequestTicket {
            epoch: self.epoch,
            serial: self.next_serial,
        };
        self.next_serial += 1;

        let request = NarrativeRequest {
            ticket,
            purpose,
            prompt,
            context: NarrativeContext::from_state(&self.state),
        };
        debug!(%ticket, purpose = request.purpose.name(), "narrative request issued");

        self.state.last_narrative_text = None;
        self.state.last_options.clear();
        self.failed = None;
        self.pending = Some(request.clone());
        request
    }

    /// Deliver the reply to a request.
    ///
    /// A reply whose ticket is not the pending one is dropped. A failed or
    /// empty reply shows fallback narration and can be retried.
    pub fn deliver(
        &mut self,
        ticket: RequestTicket,
        reply: std::result::Result<String, GeneratorError>,
    ) -> Delivery {
        let is_pending = self.pending.as_ref().is_some_and(|p| p.ticket == ticket);
        if !is_pending {
            warn!(%ticket, "discarding stale narrative reply");
            return Delivery::Stale;
        }
        let Some(request) = self.pending.take() else {
            return Delivery::Stale;
        };

        let reply = reply.and_then(|text| {
            if text.trim().is_empty() {
                Err(GeneratorError::EmptyResponse)
            } else {
                Ok(text)
            }
        });

        match reply {
            Ok(text) => {
                let parsed = parse_response(&text);
                let options = match &request.purpose {
                    RequestPurpose::StoryPiece(_) | RequestPurpose::Victory { .. } => parsed.options,
                    RequestPurpose::CombatIntro(_) => Vec::new(),
                    RequestPurpose::Defeat => DEFEAT_OPTIONS.iter().map(|o| o.to_string()).collect(),
                };
                debug!(%ticket, fallback_options = parsed.used_fallback, "narration applied");
                self.show(Some(&parsed.narration), options);
            }
            Err(err) => {
                warn!(%ticket, error = %err, "narrative generation failed");
                let options = match request.purpose {
                    RequestPurpose::Defeat => DEFEAT_OPTIONS.iter().map(|o| o.to_string()).collect(),
                    _ => Vec::new(),
                };
                self.show(Some(CONNECTION_LOST), options);
                self.failed = Some(request);
            }
        }
        Delivery::Applied
    }

    /// Fulfil the pending request, if any, with `generator`.
    pub fn run_pending(&mut self, generator: &mut impl NarrativeGenerator) -> Option<Delivery> {
        let request = self.pending.clone()?;
        let reply = generator.generate(&request);
        Some(self.deliver(request.ticket, reply))
    }

    // === Persistence ===

    /// Save the current state to `slot`.
    pub fn save(&mut self, slot: SlotId) -> Result<()> {
        if self.pending.is_some() {
            return Err(InvalidAction::RequestInFlight.into());
        }
        let record = SaveRecord::new(&self.state, Some(self.rng.state()), Utc::now());
        self.store.write(slot, &record)?;
        self.state.last_saved = record.state.last_saved;
        info!(%slot, description = %record.description, "game saved");
        Ok(())
    }

    /// Load `slot`, replacing the current state.
    ///
    /// Returns `Ok(false)` and changes nothing if the slot is empty. A
    /// corrupted slot is an error and also changes nothing.
    pub fn load(&mut self, slot: SlotId) -> Result<bool> {
        let Some(record) = self.store.read(slot)? else {
            info!(%slot, "no save found");
            return Ok(false);
        };

        self.rng = record
            .rng
            .as_ref()
            .map_or_else(|| GameRng::new(self.config.seed), GameRng::from_state);
        self.state = record.state;
        self.supersede();
        info!(%slot, mode = self.state.mode.name(), "game loaded");
        Ok(true)
    }

    /// Load the newest readable slot.
    pub fn load_most_recent(&mut self) -> Result<bool> {
        match self.store.most_recent() {
            Some(slot) => self.load(slot),
            None => Ok(false),
        }
    }

    /// Occupied save slots.
    #[must_use]
    pub fn list_saves(&self) -> Vec<SlotSummary> {
        self.store.list()
    }

    /// Abandon the run and return to the main menu.
    pub fn reset(&mut self) {
        let started = self.state.mode != GameMode::MainMenu || self.state.gender.is_some();
        let run = if started { self.state.run + 1 } else { self.state.run };

        self.state = GameState::new(&self.config);
        self.state.run = run;
        self.supersede();
        info!(run, "game reset");
    }

    /// Invalidate every outstanding request.
    fn supersede(&mut self) {
        self.epoch += 1;
        if let Some(request) = self.pending.take() {
            debug!(ticket = %request.ticket, "pending request superseded");
        }
        self.failed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineError, PersistenceError};
    use crate::games::eldoraeya;
    use crate::narrative::{EchoGenerator, ScriptedGenerator};

    fn machine() -> GameStateMachine {
        GameStateMachine::new(eldoraeya::content(), EngineConfig::default().with_seed(42))
    }

    /// Machine showing the first story piece, narrated.
    fn at_start() -> GameStateMachine {
        let mut m = machine();
        m.apply(PlayerAction::BeginAdventure).unwrap();
        m.apply(PlayerAction::ChooseGender(Gender::Male)).unwrap();
        m.apply_with(PlayerAction::ChooseCity(0), &mut EchoGenerator).unwrap();
        m
    }

    fn invalid(result: Result<ActionOutcome>) -> InvalidAction {
        match result {
            Err(EngineError::InvalidAction(err)) => err,
            other => panic!("expected invalid action, got {:?}", other.map(|o| o.request)),
        }
    }

    #[test]
    fn test_character_setup() {
        let mut m = machine();
        assert_eq!(m.mode(), GameMode::MainMenu);

        m.apply(PlayerAction::BeginAdventure).unwrap();
        assert_eq!(m.mode(), GameMode::CharacterSetup(SetupStep::Gender));
        assert_eq!(m.state().last_options, vec!["male", "female"]);

        m.apply(PlayerAction::ChooseGender(Gender::Female)).unwrap();
        assert_eq!(m.mode(), GameMode::CharacterSetup(SetupStep::City));
        assert_eq!(m.state().last_options.len(), 7);
        assert!(m.state().last_options[0].starts_with("Emberpeak ("));

        let outcome = m.apply(PlayerAction::ChooseCity(1)).unwrap();
        let request = outcome.request.unwrap();
        assert_eq!(request.purpose, RequestPurpose::StoryPiece(StoryPieceId::new("start")));
        assert!(request.prompt.contains("You arrive in Mysthaven"));
        assert_eq!(m.mode(), GameMode::Narrative);
        assert_eq!(m.state().current_city.as_ref().unwrap().as_str(), "Mysthaven");
        assert!(m.state().last_options.is_empty());
    }

    #[test]
    fn test_city_out_of_range() {
        let mut m = machine();
        m.apply(PlayerAction::BeginAdventure).unwrap();
        m.apply(PlayerAction::ChooseGender(Gender::Male)).unwrap();

        let err = invalid(m.apply(PlayerAction::ChooseCity(7)));
        assert_eq!(err, InvalidAction::OptionOutOfRange { index: 7, count: 7 });
        assert_eq!(m.mode(), GameMode::CharacterSetup(SetupStep::City));
    }

    #[test]
    fn test_wrong_mode() {
        let mut m = machine();
        let err = invalid(m.apply(PlayerAction::PlayCard(0)));
        assert_eq!(
            err,
            InvalidAction::WrongMode {
                action: "play card",
                mode: "main menu"
            }
        );
    }

    #[test]
    fn test_actions_rejected_while_request_in_flight() {
        let mut m = machine();
        m.apply(PlayerAction::BeginAdventure).unwrap();
        m.apply(PlayerAction::ChooseGender(Gender::Male)).unwrap();
        m.apply(PlayerAction::ChooseCity(0)).unwrap();
        let before = m.state().clone();

        assert_eq!(invalid(m.apply(PlayerAction::ChooseOption(0))), InvalidAction::RequestInFlight);
        assert!(matches!(
            m.save(SlotId::Numbered(0)),
            Err(EngineError::InvalidAction(InvalidAction::RequestInFlight))
        ));
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn test_reply_applies_options() {
        let m = at_start();
        assert!(m.pending_request().is_none());
        assert_eq!(m.state().last_options.len(), 4);
        assert!(m.state().last_narrative_text.as_ref().unwrap().contains("Emberpeak"));
    }

    #[test]
    fn test_stale_ticket_dropped() {
        let mut m = machine();
        m.apply(PlayerAction::BeginAdventure).unwrap();
        m.apply(PlayerAction::ChooseGender(Gender::Male)).unwrap();
        let ticket = m.apply(PlayerAction::ChooseCity(0)).unwrap().request.unwrap().ticket;

        let wrong = RequestTicket {
            epoch: ticket.epoch,
            serial: ticket.serial + 1,
        };
        assert_eq!(m.deliver(wrong, Ok("Nope.".into())), Delivery::Stale);
        assert!(m.pending_request().is_some());

        assert_eq!(m.deliver(ticket, Ok("Fine.".into())), Delivery::Applied);
        assert_eq!(m.deliver(ticket, Ok("Again.".into())), Delivery::Stale);
        assert_eq!(m.state().last_narrative_text.as_deref(), Some("Fine."));
    }

    #[test]
    fn test_reset_supersedes_pending() {
        let mut m = machine();
        m.apply(PlayerAction::BeginAdventure).unwrap();
        m.apply(PlayerAction::ChooseGender(Gender::Male)).unwrap();
        let ticket = m.apply(PlayerAction::ChooseCity(0)).unwrap().request.unwrap().ticket;

        m.reset();
        assert_eq!(m.mode(), GameMode::MainMenu);
        assert_eq!(m.state().run, 2);
        assert!(m.pending_request().is_none());

        assert_eq!(m.deliver(ticket, Ok("Late reply.".into())), Delivery::Stale);
        assert!(m.state().last_narrative_text.is_none());
    }

    #[test]
    fn test_reset_before_start_keeps_run() {
        let mut m = machine();
        m.reset();
        assert_eq!(m.state().run, 1);
    }

    #[test]
    fn test_generator_failure_and_retry() {
        let mut m = machine();
        let mut generator = ScriptedGenerator::new()
            .fail(GeneratorError::Transport("offline".into()))
            .reply("The forge glows.\nOptions:\n1. Approach\n2. Leave");

        m.apply(PlayerAction::BeginAdventure).unwrap();
        m.apply(PlayerAction::ChooseGender(Gender::Male)).unwrap();
        m.apply_with(PlayerAction::ChooseCity(0), &mut generator).unwrap();

        assert_eq!(m.state().last_narrative_text.as_deref(), Some(CONNECTION_LOST));
        assert!(m.state().last_options.is_empty());
        assert!(m.can_retry());
        assert_eq!(invalid(m.apply(PlayerAction::ChooseOption(0))), InvalidAction::NoOptions);

        m.apply_with(PlayerAction::RetryNarration, &mut generator).unwrap();
        assert_eq!(m.state().last_narrative_text.as_deref(), Some("The forge glows."));
        assert_eq!(m.state().last_options, vec!["Approach", "Leave"]);
        assert_eq!(generator.prompts[0], generator.prompts[1]);
        assert!(!m.can_retry());
    }

    #[test]
    fn test_empty_reply_is_failure() {
        let mut m = machine();
        m.apply(PlayerAction::BeginAdventure).unwrap();
        m.apply(PlayerAction::ChooseGender(Gender::Male)).unwrap();
        let ticket = m.apply(PlayerAction::ChooseCity(0)).unwrap().request.unwrap().ticket;

        m.deliver(ticket, Ok("   \n".into()));
        assert_eq!(m.state().last_narrative_text.as_deref(), Some(CONNECTION_LOST));
        assert!(m.can_retry());
    }

    #[test]
    fn test_nothing_to_retry() {
        let mut m = at_start();
        assert_eq!(invalid(m.apply(PlayerAction::RetryNarration)), InvalidAction::NothingToRetry);
    }

    #[test]
    fn test_option_out_of_range() {
        let mut m = at_start();
        assert_eq!(
            invalid(m.apply(PlayerAction::ChooseOption(4))),
            InvalidAction::OptionOutOfRange { index: 4, count: 4 }
        );
    }

    #[test]
    fn test_missing_piece_recovers_to_start() {
        let mut m = at_start();

        // "seek_information" is not written
        let outcome = m.apply(PlayerAction::ChooseOption(1)).unwrap();
        assert!(outcome.request.is_none());
        assert_eq!(m.state().last_narrative_text.as_deref(), Some(LOST_THREAD));
        assert_eq!(m.state().last_options, vec![LOST_THREAD_OPTION]);

        let outcome = m.apply(PlayerAction::ChooseOption(0)).unwrap();
        assert_eq!(
            outcome.request.unwrap().purpose,
            RequestPurpose::StoryPiece(StoryPieceId::new("start"))
        );
    }

    #[test]
    fn test_unknown_enemy_recovers() {
        let mut content = eldoraeya::content();
        let chapter = crate::narrative::Chapter::new(1)
            .with_piece(crate::narrative::StoryPiece::options("start", "Begin.", &["ambush"]))
            .with_piece(crate::narrative::StoryPiece::combat("ambush", "Shadows move.", "wraith"));
        content.story = crate::narrative::StoryCatalog::new().with(chapter);

        let mut m = GameStateMachine::new(content, EngineConfig::default());
        m.apply(PlayerAction::BeginAdventure).unwrap();
        m.apply(PlayerAction::ChooseGender(Gender::Male)).unwrap();
        m.apply_with(PlayerAction::ChooseCity(0), &mut EchoGenerator).unwrap();
        m.apply_with(PlayerAction::ChooseOption(0), &mut EchoGenerator).unwrap();
        assert_eq!(m.mode(), GameMode::PreCombat);

        let outcome = m.apply(PlayerAction::ChooseOption(0)).unwrap();
        assert!(outcome.request.is_none());
        assert_eq!(m.mode(), GameMode::Narrative);
        assert_eq!(m.state().last_narrative_text.as_deref(), Some(UNKNOWN_ENEMY));
        assert_eq!(m.state().last_options, vec![UNKNOWN_ENEMY_OPTION]);
        assert!(!m.state().in_combat());
    }

    #[test]
    fn test_empty_encounter_recovers() {
        let mut content = eldoraeya::content();
        let mut ambush = crate::narrative::StoryPiece::combat("ambush", "Nothing stirs.", "thug");
        ambush.next = StoryNext::Combat {
            enemies: Vec::new(),
            victory: None,
        };
        let chapter = crate::narrative::Chapter::new(1)
            .with_piece(crate::narrative::StoryPiece::options("start", "Begin.", &["ambush"]))
            .with_piece(ambush);
        content.story = crate::narrative::StoryCatalog::new().with(chapter);

        let mut m = GameStateMachine::new(content, EngineConfig::default());
        m.apply(PlayerAction::BeginAdventure).unwrap();
        m.apply(PlayerAction::ChooseGender(Gender::Female)).unwrap();
        m.apply_with(PlayerAction::ChooseCity(0), &mut EchoGenerator).unwrap();
        m.apply_with(PlayerAction::ChooseOption(0), &mut EchoGenerator).unwrap();
        assert_eq!(m.mode(), GameMode::PreCombat);

        let outcome = m.apply(PlayerAction::ChooseOption(0)).unwrap();
        assert!(outcome.combat.is_none());
        assert_eq!(m.mode(), GameMode::Narrative);
        assert_eq!(m.state().last_narrative_text.as_deref(), Some(UNKNOWN_ENEMY));
        assert!(!m.state().in_combat());

        // The fallback option leads back to the chapter start
        let outcome = m.apply(PlayerAction::ChooseOption(0)).unwrap();
        assert!(outcome.request.is_some());
        assert_eq!(m.state().current_story_piece, Some(StoryPieceId::new("start")));
    }

    #[test]
    fn test_end_piece_shows_end_of_segment() {
        let mut content = eldoraeya::content();
        let chapter = crate::narrative::Chapter::new(1)
            .with_piece(crate::narrative::StoryPiece::end("start", "The road ends here."));
        content.story = crate::narrative::StoryCatalog::new().with(chapter);

        let mut m = GameStateMachine::new(content, EngineConfig::default());
        m.apply(PlayerAction::BeginAdventure).unwrap();
        m.apply(PlayerAction::ChooseGender(Gender::Male)).unwrap();
        m.apply_with(PlayerAction::ChooseCity(0), &mut EchoGenerator).unwrap();

        m.apply(PlayerAction::ChooseOption(2)).unwrap();
        assert_eq!(m.state().last_narrative_text.as_deref(), Some(END_OF_SEGMENT));
        assert_eq!(m.state().last_options.len(), END_OF_SEGMENT_OPTIONS.len());

        m.apply(PlayerAction::ChooseOption(0)).unwrap();
        assert_eq!(m.state().route, OptionRoute::EndOfSegment);
        assert!(m.pending_request().is_none());
    }

    #[test]
    fn test_use_item_rules() {
        let mut m = at_start();
        let id = crate::items::grant_item(
            &mut m.state,
            &m.content.items,
            &crate::core::ItemKey::new("minorHealingPotion"),
        )
        .unwrap();
        m.state.health = 4;

        let outcome = m.apply(PlayerAction::UseItem(id)).unwrap();
        assert_eq!(outcome.event, Some(ActionEvent::ItemUsed(crate::items::ItemUse::Healed(10))));
        assert_eq!(m.state().health, 14);
        assert_eq!(invalid(m.apply(PlayerAction::UseItem(id))), InvalidAction::ItemNotFound(id));

        m.reset();
        assert!(matches!(
            invalid(m.apply(PlayerAction::UseItem(id))),
            InvalidAction::WrongMode { .. }
        ));
    }

    #[test]
    fn test_save_and_load() {
        let mut m = at_start();
        m.save(SlotId::Numbered(2)).unwrap();
        let saved = m.state().clone();
        assert!(saved.last_saved.is_some());

        m.apply_with(PlayerAction::ChooseOption(0), &mut EchoGenerator).unwrap();
        assert_ne!(m.state(), &saved);

        assert!(m.load(SlotId::Numbered(2)).unwrap());
        assert_eq!(m.state(), &saved);

        assert!(!m.load(SlotId::Numbered(5)).unwrap());
        assert!(matches!(
            m.load(SlotId::Numbered(10)),
            Err(EngineError::Persistence(PersistenceError::InvalidSlot { .. }))
        ));

        let saves = m.list_saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].slot, SlotId::Numbered(2));
    }

    #[test]
    fn test_load_restores_rng() {
        let mut m = at_start();
        m.save(SlotId::Legacy).unwrap();
        let first = m.rng.gen_unit();

        m.load(SlotId::Legacy).unwrap();
        assert_eq!(m.rng.gen_unit(), first);
    }
}
