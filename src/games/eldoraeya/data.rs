//! Eldoraeya content tables.

use crate::cards::{CardCatalog, CardDefinition, CardEffect, CardKind};
use crate::core::CardKey;
use crate::effects::{Expiry, StatusApplication, StatusBehavior, StatusDefinition, StatusRegistry};
use crate::enemies::{EnemyCatalog, EnemyDefinition, EnemyMove, LootEntry};
use crate::items::{ConsumableEffect, ItemCatalog, ItemDefinition, ItemKind};
use crate::machine::Content;
use crate::narrative::{Chapter, City, CityCatalog, StoryCatalog, StoryPiece};

/// Every catalog of the pack.
#[must_use]
pub fn content() -> Content {
    Content {
        cards: cards(),
        enemies: enemies(),
        items: items(),
        statuses: statuses(),
        cities: cities(),
        story: chapters(),
    }
}

/// Playable cities, in selection order.
#[must_use]
pub fn cities() -> CityCatalog {
    CityCatalog::new()
        .with(City::new("Emberpeak", "A volcanic city of fire mages and smiths.", "Elemental Fire"))
        .with(City::new("Mysthaven", "A plains city of arcane study and illusion.", "Mystical"))
        .with(City::new("SylvanGlade", "An elven forest of wind and nature magic.", "Nature"))
        .with(City::new("Tidegarde", "A coastal port of water mages and sailors.", "Elemental Water"))
        .with(City::new("Dunespire", "A desert oasis of earth mages and traders.", "Elemental Earth"))
        .with(City::new("Riverbloom", "A lush river town of growth and trade.", "Nature"))
        .with(City::new("Skyreach Castle", "A lofty fortress of air mages.", "Elemental Air"))
}

/// The written chapters.
///
/// Several option links point at pieces that are not written yet; the
/// machine recovers from those at runtime.
#[must_use]
pub fn chapters() -> StoryCatalog {
    let chapter_one = Chapter::new(1)
        .with_locations(&["Emberpeak", "Mysthaven", "SylvanGlade", "Tidegarde", "Dunespire"])
        .with_piece(StoryPiece::options(
            "start",
            "You arrive in [city], sent by your order to seek fading magic. The air hums with a strange \
             tension, and the weight of your task settles upon you. What is your first instinct?",
            &["explore_city", "seek_information", "find_lodging", "observe_locals"],
        ))
        .with_piece(StoryPiece::options(
            "explore_city",
            "You decide to wander the streets of [city]. The sounds of daily life fill the air, and you \
             soon find yourself in a bustling market square.",
            &["browse_stalls", "listen_for_rumors", "find_tavern", "thug_ambush"],
        ))
        .with_piece(
            StoryPiece::combat(
                "thug_ambush",
                "As you turn down a quieter alley, a shadowy figure steps out, blocking your path. \
                 'Your coin or your life, mage!' a gruff voice demands.",
                "thug",
            )
            .on_victory("explore_city"),
        );

    StoryCatalog::new().with(chapter_one)
}

/// Starter cards and the cards loot can grant.
#[must_use]
pub fn cards() -> CardCatalog {
    CardCatalog::new()
        .with(
            CardDefinition::new("Fireball", CardKind::Attack, 1, CardEffect::damage(6))
                .with_description("Hurl a small bolt of fire. Deals 6 damage."),
        )
        .with(
            CardDefinition::new("Flame Strike", CardKind::Attack, 2, CardEffect::damage(8).all_targets())
                .with_description("Engulf all enemies in fire. Deals 8 damage to all."),
        )
        .with(
            CardDefinition::new("Staff Guard", CardKind::Defend, 1, CardEffect::block(5))
                .with_description("Raise your staff to defend. Gain 5 Block."),
        )
        .with(
            CardDefinition::new(
                "Illusion",
                CardKind::Utility,
                1,
                CardEffect::status(StatusApplication::new("miss_next", 1)),
            )
            .with_description("Create an illusion. Enemy misses its next attack."),
        )
        .with(
            CardDefinition::new("Tidal Heal", CardKind::Healing, 2, CardEffect::heal(5).exiled())
                .with_description("Channel soothing waters. Heal 5 HP. Exile."),
        )
}

#[must_use]
pub fn statuses() -> StatusRegistry {
    StatusRegistry::new()
        .with(StatusDefinition::new(
            "miss_next",
            "Illusion",
            StatusBehavior::MissNextAttack,
            Expiry::OnTrigger,
        ))
        .with(StatusDefinition::new(
            "vulnerable",
            "Vulnerable",
            StatusBehavior::DamageTakenPercent(150),
            Expiry::Rounds,
        ))
}

#[must_use]
pub fn enemies() -> EnemyCatalog {
    EnemyCatalog::new()
        .with(
            EnemyDefinition::new("thug", "Street Thug", 15)
                .with_move(EnemyMove::attack("Pummel", 5).with_description("A crude but forceful strike."))
                .with_loot(LootEntry::gold(3, 0.8))
                .with_loot(LootEntry::item("minorHealingPotion", 0.1)),
        )
        .with(
            EnemyDefinition::new("banditBruiser", "Bandit Bruiser", 25)
                .with_move(EnemyMove::attack("Smash", 7).with_description("A powerful overhead strike."))
                .with_move(
                    EnemyMove::defend("Guard Up", 5).with_description("Braces for impact, gaining 5 Block."),
                )
                .with_loot(LootEntry::gold(10, 1.0))
                .with_loot(LootEntry::item("minorHealingPotion", 0.25)),
        )
        .with(
            EnemyDefinition::new("banditSlicer", "Bandit Slicer", 18)
                .with_move(EnemyMove::attack("Quick Stab", 4).with_description("A swift piercing attack."))
                .with_move(
                    EnemyMove::attack("Double Slash", 2)
                        .with_hits(2)
                        .with_description("Two quick slashes, 2 damage each."),
                )
                .with_loot(LootEntry::gold(7, 1.0))
                .with_loot(LootEntry::item("card_Fireball", 0.1)),
        )
        .with(
            EnemyDefinition::new("banditCurser", "Enclave Scout", 16)
                .with_move(EnemyMove::attack("Shadow Bolt", 3).with_description("A weak bolt of dark energy."))
                .with_move(
                    EnemyMove::utility("Weakening Curse", StatusApplication::new("vulnerable", 2))
                        .with_description("Applies Vulnerable (take 50% more damage) for 2 turns."),
                )
                .with_loot(LootEntry::gold(5, 1.0))
                .with_loot(LootEntry::item("runeShard", 0.05)),
        )
}

#[must_use]
pub fn items() -> ItemCatalog {
    ItemCatalog::new()
        .with(
            ItemDefinition::new("gold", "Gold Coins", ItemKind::Currency)
                .with_description("The common currency of Eldoraeya.")
                .with_icon("🟡"),
        )
        .with(
            ItemDefinition::new(
                "minorHealingPotion",
                "Minor Healing Potion",
                ItemKind::Consumable {
                    effect: ConsumableEffect::Heal(10),
                },
            )
            .with_description("A common salve that restores 10 Health.")
            .with_icon("🧪"),
        )
        .with(
            ItemDefinition::new("runeShard", "Rune Shard", ItemKind::KeyItem)
                .with_description("A fragment of an ancient rune, humming with faint power.")
                .with_icon("✨"),
        )
        .with(
            ItemDefinition::new(
                "card_Fireball",
                "Scroll of Fireball",
                ItemKind::CardScroll {
                    card: CardKey::new("Fireball"),
                },
            )
            .with_description("A scroll containing the incantation for Fireball. Adds Fireball to your deck.")
            .with_icon("📜"),
        )
}
