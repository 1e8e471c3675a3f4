//! Combat resolution.
//!
//! Turn structure: `PlayerTurn -> EnemyTurn -> (PlayerTurn | Resolved)`.
//!
//! The engine holds only catalog references; all mutable combat state
//! (enemy instances, piles, block, statuses) lives on [`GameState`], which
//! each call borrows for its duration.
//!
//! ## End of combat
//!
//! Checked after every card and after every enemy phase:
//! 1. Player at 0 health: `Defeat`, no loot.
//! 2. Otherwise enemies at 0 health are removed and their loot rolled.
//! 3. No enemies left: `Victory`.
//!
//! Resolution gathers every pile back into the deck and clears block,
//! player statuses and the enemy list.

use tracing::{debug, info, warn};

use crate::cards::{CardCatalog, CardKind};
use crate::core::{
    CardKey, ContentError, EngineError, EnemyKey, GameRng, GameState, InvalidAction, StatusKey,
};
use crate::effects::{select_targets, strike, DamageReport, StatusRegistry};
use crate::enemies::{EnemyCatalog, EnemyInstance, MoveKind};
use crate::items::ItemCatalog;
use crate::loot::{LootReport, LootResolver};
use crate::zones::{DeckManager, DrawReport, Pile};

/// Result of an end-of-combat check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CombatStatus {
    Ongoing,
    /// Every enemy is down. Carries the loot of enemies removed by this check.
    Victory { loot: LootReport },
    Defeat,
}

impl CombatStatus {
    #[must_use]
    pub fn is_over(&self) -> bool {
        !matches!(self, CombatStatus::Ongoing)
    }
}

/// What playing a card did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardPlay {
    pub card: CardKey,
    /// Pile the card went to.
    pub pile: Pile,
    /// Damage dealt, per enemy index.
    pub hits: Vec<(usize, DamageReport)>,
    pub block_gained: u32,
    pub healed: u32,
    pub status_applied: Option<StatusKey>,
    pub outcome: CombatStatus,
}

/// What one enemy did on its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyAction {
    pub enemy: usize,
    pub move_name: String,
    pub kind: MoveKind,
    /// The attack was cancelled by a miss status.
    pub missed: bool,
    pub hits: Vec<DamageReport>,
    pub block_gained: u32,
    pub status_applied: Option<StatusKey>,
}

/// Result of ending the player's turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyPhase {
    pub actions: Vec<EnemyAction>,
    pub outcome: CombatStatus,
    /// The next turn's draw, if combat continues.
    pub draw: Option<DrawReport>,
}

/// Card and enemy resolution against the content catalogs.
pub struct CombatEngine<'c> {
    cards: &'c CardCatalog,
    enemies: &'c EnemyCatalog,
    items: &'c ItemCatalog,
    statuses: &'c StatusRegistry,
    hand_size: usize,
}

impl<'c> CombatEngine<'c> {
    #[must_use]
    pub fn new(
        cards: &'c CardCatalog,
        enemies: &'c EnemyCatalog,
        items: &'c ItemCatalog,
        statuses: &'c StatusRegistry,
        hand_size: usize,
    ) -> Self {
        Self {
            cards,
            enemies,
            items,
            statuses,
            hand_size,
        }
    }

    /// Start an encounter against a single enemy.
    pub fn start(&self, state: &mut GameState, enemy: &EnemyKey, rng: &mut GameRng) -> Result<DrawReport, ContentError> {
        self.start_encounter(state, std::slice::from_ref(enemy), rng)
    }

    /// Start an encounter against `encounter`, in order.
    ///
    /// Every key is resolved before anything changes, so an unknown enemy
    /// or an empty encounter leaves the state untouched.
    pub fn start_encounter(
        &self,
        state: &mut GameState,
        encounter: &[EnemyKey],
        rng: &mut GameRng,
    ) -> Result<DrawReport, ContentError> {
        if encounter.is_empty() {
            return Err(ContentError::EmptyEncounter);
        }
        let definitions = encounter
            .iter()
            .map(|key| self.enemies.get(key))
            .collect::<Result<Vec<_>, _>>()?;

        state.current_enemies = definitions.into_iter().map(EnemyInstance::spawn).collect();
        state.last_encounter = encounter.to_vec();
        state.block = 0;
        state.refill_mana();
        state.player_statuses.clear();

        let mut deck = DeckManager::new(state);
        deck.gather_into_discard();
        let draw = deck.draw(self.hand_size, rng);

        info!(enemies = ?encounter, hand = draw.drawn.len(), "combat started");
        Ok(draw)
    }

    /// Play the card at `hand_index`.
    ///
    /// Rejections (bad index, not enough mana, unknown content) happen
    /// before any state is touched.
    pub fn play_card(
        &self,
        state: &mut GameState,
        hand_index: usize,
        rng: &mut GameRng,
    ) -> Result<CardPlay, EngineError> {
        if !state.in_combat() {
            return Err(InvalidAction::NoLivingEnemies.into());
        }
        let key = state
            .hand
            .get(hand_index)
            .cloned()
            .ok_or(InvalidAction::CardIndexOutOfRange {
                index: hand_index,
                hand_size: state.hand.len(),
            })?;
        let card = self.cards.get(&key)?;
        if card.cost > state.mana {
            return Err(InvalidAction::InsufficientMana {
                card: key,
                cost: card.cost,
                mana: state.mana,
            }
            .into());
        }
        let status = match (&card.effect.status, card.kind) {
            (Some(application), CardKind::Utility) => {
                Some((self.statuses.get(&application.key)?, application.duration))
            }
            _ => None,
        };

        state.spend_mana(card.cost);
        let played = DeckManager::new(state)
            .take_from_hand(hand_index)
            .ok_or(InvalidAction::CardIndexOutOfRange {
                index: hand_index,
                hand_size: 0,
            })?;

        let mut hits = Vec::new();
        let mut block_gained = 0;
        let mut healed = 0;
        let mut status_applied = None;

        match card.kind {
            CardKind::Attack => {
                for idx in select_targets(&state.current_enemies, card.effect.target) {
                    let enemy = &mut state.current_enemies[idx];
                    let report = strike(&mut enemy.block, &mut enemy.health, &enemy.statuses, card.effect.damage);
                    debug!(card = %key, target = %enemy.name, ?report, "card hit");
                    hits.push((idx, report));
                }
            }
            CardKind::Defend => {
                state.block = state.block.saturating_add(card.effect.block);
                block_gained = card.effect.block;
            }
            CardKind::Healing => {
                healed = state.heal(card.effect.heal);
            }
            CardKind::Utility => {
                if let Some((definition, duration)) = status {
                    for idx in select_targets(&state.current_enemies, card.effect.target) {
                        state.current_enemies[idx].statuses.apply(definition, duration);
                    }
                    status_applied = Some(definition.key.clone());
                }
            }
        }

        let pile = DeckManager::new(state).place_played(played, card.effect.exile);
        debug!(card = %key, mana = state.mana, block = state.block, health = state.health, "card played");

        let outcome = self.check_end(state, rng);
        Ok(CardPlay {
            card: key,
            pile,
            hits,
            block_gained,
            healed,
            status_applied,
            outcome,
        })
    }

    /// End the player's turn: every living enemy acts once, then the round
    /// boundary passes and, if combat continues, the next player turn starts.
    pub fn end_turn(&self, state: &mut GameState, rng: &mut GameRng) -> Result<EnemyPhase, InvalidAction> {
        if state.living_enemy_indices().next().is_none() {
            return Err(InvalidAction::NoLivingEnemies);
        }

        let acting: Vec<usize> = state.living_enemy_indices().collect();
        let actions: Vec<EnemyAction> = acting.iter().map(|&idx| self.enemy_act(state, idx)).collect();

        for &idx in &acting {
            state.current_enemies[idx].advance_cursor();
        }
        for enemy in &mut state.current_enemies {
            enemy.statuses.tick_round();
        }
        state.player_statuses.tick_round();

        let outcome = self.check_end(state, rng);
        let draw = (!outcome.is_over()).then(|| self.start_player_turn(state, rng));

        Ok(EnemyPhase {
            actions,
            outcome,
            draw,
        })
    }

    /// Resolve the current move of the enemy at `idx`.
    fn enemy_act(&self, state: &mut GameState, idx: usize) -> EnemyAction {
        let GameState {
            current_enemies,
            block,
            health,
            player_statuses,
            ..
        } = state;
        let enemy = &mut current_enemies[idx];

        let Some(next) = enemy.intent().cloned() else {
            debug!(enemy = %enemy.name, "enemy has no moves");
            return EnemyAction {
                enemy: idx,
                move_name: String::new(),
                kind: MoveKind::Utility,
                missed: false,
                hits: Vec::new(),
                block_gained: 0,
                status_applied: None,
            };
        };

        let mut action = EnemyAction {
            enemy: idx,
            move_name: next.name.clone(),
            kind: next.kind,
            missed: false,
            hits: Vec::new(),
            block_gained: 0,
            status_applied: None,
        };

        match next.kind {
            MoveKind::Attack => {
                if enemy.statuses.consume_miss() {
                    action.missed = true;
                } else {
                    for _ in 0..next.hits.max(1) {
                        action.hits.push(strike(block, health, player_statuses, next.value));
                    }
                }
            }
            MoveKind::Defend => {
                // Enemy block stacks and never expires during the encounter
                enemy.block = enemy.block.saturating_add(next.value);
                action.block_gained = next.value;
            }
            MoveKind::Utility => {
                if let Some(application) = &next.status {
                    match player_statuses.apply_from(self.statuses, application) {
                        Ok(()) => action.status_applied = Some(application.key.clone()),
                        Err(err) => warn!(enemy = %enemy.name, error = %err, "enemy move skipped"),
                    }
                }
            }
        }

        debug!(
            enemy = %enemy.name,
            enemy_move = %next.name,
            missed = action.missed,
            hits = ?action.hits,
            player_health = *health,
            player_block = *block,
            "enemy acted"
        );
        action
    }

    /// Refill mana, clear block, discard the hand and draw a new one.
    pub fn start_player_turn(&self, state: &mut GameState, rng: &mut GameRng) -> DrawReport {
        state.refill_mana();
        state.block = 0;
        let mut deck = DeckManager::new(state);
        deck.discard_hand();
        deck.draw(self.hand_size, rng)
    }

    /// Run the end-of-combat check, resolving the encounter if it is over.
    pub fn check_end(&self, state: &mut GameState, rng: &mut GameRng) -> CombatStatus {
        if state.is_player_defeated() {
            info!(enemies = ?state.last_encounter, "player defeated");
            Self::resolve(state);
            return CombatStatus::Defeat;
        }

        let (defeated, standing): (Vec<EnemyInstance>, Vec<EnemyInstance>) =
            std::mem::take(&mut state.current_enemies)
                .into_iter()
                .partition(|enemy| !enemy.is_alive());
        state.current_enemies = standing;

        let resolver = LootResolver::new(self.items, self.cards);
        let mut loot = LootReport::default();
        for enemy in defeated {
            debug!(enemy = %enemy.name, "enemy defeated");
            match self.enemies.get(&enemy.definition) {
                Ok(definition) => loot.merge(resolver.resolve(state, definition, rng)),
                Err(err) => {
                    warn!(enemy = %enemy.name, error = %err, "no loot table");
                    loot.skipped.push(err);
                }
            }
        }

        if state.current_enemies.is_empty() {
            info!(gold = loot.gold, items = loot.items.len(), "combat won");
            Self::resolve(state);
            CombatStatus::Victory { loot }
        } else {
            CombatStatus::Ongoing
        }
    }

    /// Tear down an encounter.
    fn resolve(state: &mut GameState) {
        state.current_enemies.clear();
        state.player_statuses.clear();
        state.block = 0;
        DeckManager::new(state).gather_into_deck();
    }
}
