//! Content bundle.
//!
//! Everything the machine looks up by key, in one place. Built once by a
//! content pack (see [`crate::games::eldoraeya`]) and shared read-only.

use crate::cards::{cards_of_kind, CardCatalog, CardKind};
use crate::combat::CombatEngine;
use crate::core::{ContentError, EngineConfig};
use crate::effects::StatusRegistry;
use crate::enemies::{EnemyCatalog, LootReward};
use crate::items::{ItemCatalog, ItemKind};
use crate::narrative::{CityCatalog, StoryCatalog, StoryNext};

/// All catalogs of a content pack.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub cards: CardCatalog,
    pub enemies: EnemyCatalog,
    pub items: ItemCatalog,
    pub statuses: StatusRegistry,
    pub cities: CityCatalog,
    pub story: StoryCatalog,
}

impl Content {
    /// Combat engine over these catalogs.
    #[must_use]
    pub fn combat(&self, hand_size: usize) -> CombatEngine<'_> {
        CombatEngine::new(&self.cards, &self.enemies, &self.items, &self.statuses, hand_size)
    }

    /// Check cross-references between catalogs: the starting deck, card and
    /// enemy statuses, loot rewards, card scrolls and combat links.
    ///
    /// Story links between pieces are not checked; a missing piece is
    /// recovered from at runtime.
    pub fn validate(&self, config: &EngineConfig) -> Result<(), ContentError> {
        config.validate_deck(|key| self.cards.contains(key))?;

        for card in cards_of_kind(&self.cards, CardKind::Utility) {
            if let Some(status) = &card.effect.status {
                self.statuses.get(&status.key)?;
            }
        }

        for enemy in self.enemies.iter() {
            for status in enemy.moves.iter().filter_map(|m| m.status.as_ref()) {
                self.statuses.get(&status.key)?;
            }
            for entry in &enemy.loot {
                match &entry.reward {
                    LootReward::Gold(_) => {}
                    LootReward::Item(key) => {
                        self.items.get(key)?;
                    }
                    LootReward::Card(key) => {
                        self.cards.get(key)?;
                    }
                }
            }
        }

        for item in self.items.iter() {
            if let ItemKind::CardScroll { card } = &item.kind {
                self.cards.get(card)?;
            }
        }

        for chapter in self.story.iter() {
            for piece in &chapter.pieces {
                if let StoryNext::Combat { enemies, .. } = &piece.next {
                    if enemies.is_empty() {
                        return Err(ContentError::EmptyEncounter);
                    }
                    for enemy in enemies {
                        self.enemies.get(enemy)?;
                    }
                }
            }
        }

        self.story.get(&config.starting_chapter)?.piece(&config.start_piece)?;
        Ok(())
    }

    /// Option links that name pieces missing from their chapter.
    #[must_use]
    pub fn dangling_story_links(&self) -> Vec<ContentError> {
        let mut missing = Vec::new();
        for chapter in self.story.iter() {
            for piece in &chapter.pieces {
                let targets: Vec<_> = match &piece.next {
                    StoryNext::Options { pieces } => pieces.iter().collect(),
                    StoryNext::Combat { victory, .. } => victory.iter().collect(),
                    StoryNext::End => Vec::new(),
                };
                missing.extend(targets.into_iter().filter_map(|id| chapter.piece(id).err()));
            }
        }
        missing
    }
}
