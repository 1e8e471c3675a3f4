//! End-to-end tests through `GameStateMachine`.
//!
//! A run from the main menu through the chapter one ambush, won and lost,
//! with narration from scripted and offline generators.

use spellbound::cards::CardKind;
use spellbound::combat::CombatStatus;
use spellbound::core::{EngineConfig, Gender, GeneratorError, StoryPieceId};
use spellbound::games::eldoraeya;
use spellbound::machine::{GameMode, GameStateMachine, OptionRoute, PlayerAction};
use spellbound::narrative::prompt::{CONNECTION_LOST, DEFEAT_OPTIONS, NO_PAST};
use spellbound::narrative::{EchoGenerator, RequestPurpose, ScriptedGenerator};
use spellbound::persistence::SlotId;

fn machine(config: EngineConfig) -> GameStateMachine {
    GameStateMachine::new(eldoraeya::content(), config)
}

/// Walk from the main menu to the first turn of the thug fight.
fn to_ambush(m: &mut GameStateMachine) {
    let mut narrator = EchoGenerator;
    m.apply(PlayerAction::BeginAdventure).unwrap();
    m.apply(PlayerAction::ChooseGender(Gender::Male)).unwrap();
    m.apply_with(PlayerAction::ChooseCity(0), &mut narrator).unwrap();
    m.apply_with(PlayerAction::ChooseOption(0), &mut narrator).unwrap();
    assert_eq!(m.state().current_story_piece, Some(StoryPieceId::new("explore_city")));

    m.apply_with(PlayerAction::ChooseOption(3), &mut narrator).unwrap();
    assert_eq!(m.mode(), GameMode::PreCombat);

    let outcome = m.apply_with(PlayerAction::ChooseOption(0), &mut narrator).unwrap();
    assert_eq!(outcome.combat, Some(CombatStatus::Ongoing));
    assert_eq!(m.mode(), GameMode::Combat);
    assert!(m.state().last_options.is_empty());
}

/// Play the first affordable attack, else the first affordable card, else end the turn.
fn fight(m: &mut GameStateMachine) -> CombatStatus {
    let mut narrator = EchoGenerator;
    for _ in 0..100 {
        let choice = {
            let state = m.state();
            let cards = &m.content().cards;
            let affordable = |kind: Option<CardKind>| {
                state.hand.iter().position(|key| {
                    cards
                        .get(key)
                        .map(|c| c.cost <= state.mana && kind.map_or(true, |k| c.kind == k))
                        .unwrap_or(false)
                })
            };
            affordable(Some(CardKind::Attack)).or_else(|| affordable(None))
        };
        let action = choice.map_or(PlayerAction::EndTurn, PlayerAction::PlayCard);
        let outcome = m.apply_with(action, &mut narrator).unwrap();
        if let Some(status) = outcome.combat {
            if status.is_over() {
                return status;
            }
        }
    }
    panic!("combat did not end");
}

#[test]
fn test_win_the_ambush() {
    let mut m = machine(EngineConfig::default().with_seed(17));
    to_ambush(&mut m);
    assert_eq!(m.state().hand.len(), 5);

    let status = fight(&mut m);
    assert!(matches!(status, CombatStatus::Victory { .. }));
    assert_eq!(m.mode(), GameMode::Victory);
    assert_eq!(m.state().route, OptionRoute::Goto(StoryPieceId::new("explore_city")));
    assert_eq!(m.state().last_options.len(), 4);
    assert_eq!(m.state().deck.len(), 10);

    let outcome = m.apply(PlayerAction::ChooseOption(2)).unwrap();
    assert_eq!(
        outcome.request.unwrap().purpose,
        RequestPurpose::StoryPiece(StoryPieceId::new("explore_city"))
    );
    assert_eq!(m.mode(), GameMode::Narrative);
}

#[test]
fn test_lose_and_restart_battle() {
    let mut m = machine(EngineConfig::default().with_starting_health(5));
    to_ambush(&mut m);

    let outcome = m.apply(PlayerAction::EndTurn).unwrap();
    assert_eq!(outcome.combat, Some(CombatStatus::Defeat));
    assert_eq!(outcome.request.as_ref().unwrap().purpose, RequestPurpose::Defeat);
    assert_eq!(m.mode(), GameMode::Defeat);

    m.run_pending(&mut EchoGenerator);
    assert_eq!(m.state().last_options, DEFEAT_OPTIONS);

    let outcome = m.apply(PlayerAction::ChooseOption(0)).unwrap();
    assert_eq!(outcome.combat, Some(CombatStatus::Ongoing));
    assert_eq!(m.mode(), GameMode::Combat);
    assert_eq!(m.state().health, 5);
    assert_eq!(m.state().current_enemies[0].health, 15);
}

#[test]
fn test_defeat_narration_failure_keeps_choices() {
    let mut m = machine(EngineConfig::default().with_starting_health(5));
    to_ambush(&mut m);
    let mut generator = ScriptedGenerator::new().fail(GeneratorError::Transport("timeout".into()));

    m.apply_with(PlayerAction::EndTurn, &mut generator).unwrap();

    assert_eq!(m.state().last_narrative_text.as_deref(), Some(CONNECTION_LOST));
    assert_eq!(m.state().last_options, DEFEAT_OPTIONS);
}

#[test]
fn test_rewind_without_saves() {
    let mut m = machine(EngineConfig::default().with_starting_health(5));
    to_ambush(&mut m);
    m.apply_with(PlayerAction::EndTurn, &mut EchoGenerator).unwrap();

    m.apply(PlayerAction::ChooseOption(1)).unwrap();

    assert_eq!(m.mode(), GameMode::MainMenu);
    assert_eq!(m.state().run, 2);
    assert_eq!(m.state().last_narrative_text.as_deref(), Some(NO_PAST));
}

#[test]
fn test_rewind_loads_latest_save() {
    let mut m = machine(EngineConfig::default().with_starting_health(5));
    let mut narrator = EchoGenerator;
    m.apply(PlayerAction::BeginAdventure).unwrap();
    m.apply(PlayerAction::ChooseGender(Gender::Male)).unwrap();
    m.apply_with(PlayerAction::ChooseCity(0), &mut narrator).unwrap();
    m.save(SlotId::Numbered(1)).unwrap();
    let saved = m.state().clone();

    m.apply_with(PlayerAction::ChooseOption(0), &mut narrator).unwrap();
    m.apply_with(PlayerAction::ChooseOption(3), &mut narrator).unwrap();
    m.apply_with(PlayerAction::ChooseOption(0), &mut narrator).unwrap();
    m.apply_with(PlayerAction::EndTurn, &mut narrator).unwrap();
    assert_eq!(m.mode(), GameMode::Defeat);

    m.apply(PlayerAction::ChooseOption(1)).unwrap();
    assert_eq!(m.state(), &saved);
    assert_eq!(m.mode(), GameMode::Narrative);
}

#[test]
fn test_abandon_run() {
    let mut m = machine(EngineConfig::default().with_starting_health(5));
    to_ambush(&mut m);
    m.apply_with(PlayerAction::EndTurn, &mut EchoGenerator).unwrap();

    m.apply(PlayerAction::ChooseOption(2)).unwrap();

    assert_eq!(m.mode(), GameMode::MainMenu);
    assert_eq!(m.state().run, 2);
    assert_eq!(m.state().health, 5);
    assert!(m.state().gender.is_none());
}

/// Prompts carry the scene; a scripted narrator sees them in order.
#[test]
fn test_prompts_reach_generator() {
    let mut m = machine(EngineConfig::default());
    let mut generator = ScriptedGenerator::new()
        .reply("Smoke curls over Emberpeak.\nOptions:\n1. Walk the streets\n2. Ask around\n3. Find a bed\n4. Watch")
        .reply("The market teems.\nOptions:\n1) Stalls\n2) Rumors\n3) Tavern\n4) Alley");

    m.apply(PlayerAction::BeginAdventure).unwrap();
    m.apply(PlayerAction::ChooseGender(Gender::Female)).unwrap();
    m.apply_with(PlayerAction::ChooseCity(0), &mut generator).unwrap();
    assert_eq!(m.state().last_options[0], "Walk the streets");

    m.apply_with(PlayerAction::ChooseOption(0), &mut generator).unwrap();
    assert_eq!(m.state().last_narrative_text.as_deref(), Some("The market teems."));
    assert_eq!(m.state().last_options, vec!["Stalls", "Rumors", "Tavern", "Alley"]);

    assert_eq!(generator.prompts.len(), 2);
    assert!(generator.prompts[0].contains("You arrive in Emberpeak"));
    assert!(generator.prompts[0].contains("explore_city, seek_information"));
    assert!(generator.prompts[1].contains("wander the streets of Emberpeak"));
    assert_eq!(generator.remaining(), 0);
}
