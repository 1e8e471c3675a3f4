//! Card pile tests.
//!
//! Draw, reshuffle and exile through `DeckManager`, plus a property test
//! that no sequence of pile moves creates or destroys cards.

use proptest::prelude::*;

use spellbound::core::{CardKey, EngineConfig, GameRng, GameState};
use spellbound::zones::{DeckManager, Pile};

fn keys(names: &[&str]) -> Vec<CardKey> {
    names.iter().map(|n| CardKey::new(*n)).collect()
}

fn state_with_deck(names: &[&str]) -> GameState {
    GameState::new(&EngineConfig::default().with_starting_deck(keys(names)))
}

/// Drawing past the deck reshuffles the discard pile, which is a
/// permutation of what was discarded.
#[test]
fn test_reshuffle_is_permutation() {
    let mut state = state_with_deck(&["a", "b"]);
    state.discard_pile = keys(&["c", "d", "e", "f"]);
    let mut rng = GameRng::new(9);

    let report = DeckManager::new(&mut state).draw(4, &mut rng);

    assert_eq!(report.reshuffles, 1);
    assert_eq!(&report.drawn[..2], &keys(&["b", "a"])[..]);
    assert_eq!(state.hand.len(), 4);
    assert!(state.discard_pile.is_empty());

    let mut rest: Vec<_> = report.drawn[2..].iter().chain(&state.deck).cloned().collect();
    rest.sort();
    assert_eq!(rest, keys(&["c", "d", "e", "f"]));
}

/// With both deck and discard empty, drawing is a no-op.
#[test]
fn test_draw_from_nothing() {
    let mut state = state_with_deck(&[]);
    let mut rng = GameRng::new(1);

    let report = DeckManager::new(&mut state).draw(5, &mut rng);

    assert!(report.drawn.is_empty());
    assert_eq!(report.reshuffles, 0);
    assert!(state.hand.is_empty());
}

/// A short draw stops once everything is in hand.
#[test]
fn test_short_draw() {
    let mut state = state_with_deck(&["a", "b", "c"]);
    let mut rng = GameRng::new(1);

    let report = DeckManager::new(&mut state).draw(5, &mut rng);

    assert_eq!(report.drawn.len(), 3);
    assert_eq!(state.deck.len() + state.discard_pile.len(), 0);
}

/// Exiled cards are out of the draw cycle until combat resolution.
#[test]
fn test_exile_skips_reshuffle() {
    let mut state = state_with_deck(&["heal", "guard"]);
    let mut rng = GameRng::new(4);
    let mut deck = DeckManager::new(&mut state);

    deck.draw(2, &mut rng);
    let played = deck.take_from_hand(1).unwrap();
    assert_eq!(played, CardKey::new("heal"));
    assert_eq!(deck.place_played(played, true), Pile::Exile);
    deck.discard_hand();

    let report = deck.draw(5, &mut rng);
    assert_eq!(report.drawn, keys(&["guard"]));
    assert_eq!(deck.pile(Pile::Exile), &keys(&["heal"])[..]);

    deck.gather_into_deck();
    assert_eq!(state.deck.len(), 2);
    assert!(state.exiled_pile.is_empty());
}

#[derive(Clone, Debug)]
enum Move {
    Draw(usize),
    Play { index: usize, exile: bool },
    DiscardHand,
    GatherIntoDiscard,
    GatherIntoDeck,
}

fn arb_move() -> impl Strategy<Value = Move> {
    prop_oneof![
        (0usize..7).prop_map(Move::Draw),
        (0usize..6, any::<bool>()).prop_map(|(index, exile)| Move::Play { index, exile }),
        Just(Move::DiscardHand),
        Just(Move::GatherIntoDiscard),
        Just(Move::GatherIntoDeck),
    ]
}

proptest! {
    #[test]
    fn prop_piles_conserve_cards(seed in any::<u64>(), moves in prop::collection::vec(arb_move(), 0..40)) {
        let mut state = GameState::new(&EngineConfig::default());
        let owned = state.owned_cards_sorted();
        let mut rng = GameRng::new(seed);
        let mut deck = DeckManager::new(&mut state);

        for m in moves {
            match m {
                Move::Draw(n) => {
                    deck.draw(n, &mut rng);
                }
                Move::Play { index, exile } => {
                    if let Some(card) = deck.take_from_hand(index) {
                        deck.place_played(card, exile);
                    }
                }
                Move::DiscardHand => deck.discard_hand(),
                Move::GatherIntoDiscard => deck.gather_into_discard(),
                Move::GatherIntoDeck => deck.gather_into_deck(),
            }
        }

        prop_assert_eq!(state.owned_cards_sorted(), owned);
    }
}
