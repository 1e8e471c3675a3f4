//! Prompt text and fixed narration.
//!
//! Prompts describe what the generator should narrate; [`system_prompt`]
//! carries the narrator persona and output format for hosts that talk to
//! a chat-style model.

use super::content::{StoryNext, StoryPiece};
use super::generator::NarrativeContext;

/// Shown when the generator fails. No options; the player retries.
pub const CONNECTION_LOST: &str = "The Chronomancer's connection is unstable, and the path ahead is momentarily obscured. Please check your connection or try again after a brief pause.";

/// Shown when a chapter or story piece is missing.
pub const LOST_THREAD: &str = "The Chronomancer seems to have lost the thread of your tale...";

/// Single option offered after [`LOST_THREAD`]; returns to the chapter start.
pub const LOST_THREAD_OPTION: &str = "Find your bearings";

/// Shown when a combat link names an unknown enemy.
pub const UNKNOWN_ENEMY: &str = "A menacing presence is felt, but its form is lost to the Chronomancer's memory. The moment passes.";

/// Single option offered after [`UNKNOWN_ENEMY`].
pub const UNKNOWN_ENEMY_OPTION: &str = "Continue cautiously";

/// Shown when an option is chosen on a piece with no written continuation.
pub const END_OF_SEGMENT: &str =
    "The Chronomancer ponders your choice... and the path forward seems to shift. (End of current segment)";

pub const END_OF_SEGMENT_OPTIONS: [&str; 4] = ["Explore further", "Rest a while", "Consult map", "Check inventory"];

/// Fixed choices after a defeat, in order: retry, load, reset.
pub const DEFEAT_OPTIONS: [&str; 3] = [
    "Restart Battle",
    "Rewind Path (Load Last Save)",
    "Abandon Run (Reset Game)",
];

/// Shown when rewinding finds no save to load.
pub const NO_PAST: &str = "No past to rewind to... A new journey begins.";

/// Narrator persona and output format.
#[must_use]
pub fn system_prompt(context: &NarrativeContext) -> String {
    format!(
        "You are the witty and slightly melancholic Chronomancer DM for Eldoraeya: Spellbound. \
         Narrate events concisely but evocatively. Limit responses to narrative and options. \
         Provide exactly 4 numbered options like \"Options:\\n1. Option One\\n2. Option Two\\n3. Option Three\\n4. Option Four\". \
         Current city: {}. Player health: {}/{}. Gold: {}.",
        context.city, context.health, context.max_health, context.gold
    )
}

/// Prompt for narrating a story piece.
///
/// `foes` names the enemies of a combat link.
#[must_use]
pub fn story_prompt(piece: &StoryPiece, city: &str, foes: &[String]) -> String {
    let mut prompt = format!("Narrate the story piece: \"{}\". ", piece.render(city));
    match &piece.next {
        StoryNext::Options { pieces } => {
            let concepts: Vec<&str> = pieces.iter().map(|p| p.as_str()).collect();
            prompt.push_str(&format!(
                "The player can choose from these conceptual actions: {}. \
                 Generate 4 distinct, numbered in-character choices based on these concepts.",
                concepts.join(", ")
            ));
        }
        StoryNext::Combat { .. } => {
            prompt.push_str(&format!(
                "This leads directly to combat with {}. Describe the tense moments before the fight. \
                 Then offer 4 flavorful options that all lead to starting combat \
                 (e.g., \"Steel your nerves and attack\", \"Attempt a preemptive spell\", etc.).",
                foe_list(foes)
            ));
        }
        StoryNext::End => {
            prompt.push_str(
                "This part of the story concludes for now. What happens next is unclear. \
                 Generate 4 placeholder options like \"Continue cautiously\", \"Look around\", \
                 \"Consult the Chrono-Compass\", \"Prepare for anything\".",
            );
        }
    }
    prompt
}

/// Prompt for the scene before a fight.
#[must_use]
pub fn combat_intro_prompt(hero: &str, foes: &[String], city: &str, player_health: u32, enemy_health: u32) -> String {
    format!(
        "The player ({}) encounters {} in {}. Describe the scene and the enemy's menacing posture. \
         Player health: {}, Enemy health: {}.",
        hero,
        foe_list(foes),
        city,
        player_health,
        enemy_health
    )
}

/// Prompt for the aftermath of a won fight.
#[must_use]
pub fn victory_prompt(foes: &[String], city: &str, health: u32, gold: u32, loot: &str) -> String {
    format!(
        "The player has defeated {} in {}. Describe the victory and any immediate aftermath. \
         Loot found: {}. Player health: {}. Gold: {}.",
        foe_list(foes),
        city,
        loot,
        health,
        gold
    )
}

/// Prompt for the player's fall.
#[must_use]
pub fn defeat_prompt(foes: &[String], city: &str) -> String {
    format!(
        "The player has been defeated by {} in {}. Describe their fall.",
        foe_list(foes),
        city
    )
}

fn foe_list(foes: &[String]) -> String {
    match foes {
        [] => "an unknown foe".to_string(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_prompt_options() {
        let piece = StoryPiece::options("start", "You arrive in [city].", &["explore_city", "find_lodging"]);
        let prompt = story_prompt(&piece, "Mysthaven", &[]);

        assert!(prompt.starts_with("Narrate the story piece: \"You arrive in Mysthaven.\""));
        assert!(prompt.contains("explore_city, find_lodging"));
    }

    #[test]
    fn test_story_prompt_combat() {
        let piece = StoryPiece::combat("thug_ambush", "A figure blocks your path.", "thug");
        let prompt = story_prompt(&piece, "Emberpeak", &["Street Thug".to_string()]);
        assert!(prompt.contains("combat with Street Thug"));
    }

    #[test]
    fn test_foe_list() {
        assert_eq!(foe_list(&[]), "an unknown foe");
        let foes = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(foe_list(&foes), "A, B and C");
    }

    #[test]
    fn test_system_prompt_mentions_format() {
        let context = NarrativeContext {
            city: "Dunespire".to_string(),
            health: 12,
            max_health: 20,
            gold: 4,
        };
        let prompt = system_prompt(&context);

        assert!(prompt.contains("Options:"));
        assert!(prompt.contains("Player health: 12/20"));
    }
}
