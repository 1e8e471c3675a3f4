//! Status effects.
//!
//! Statuses are data-carrying tags applied to a combatant (the player or
//! an enemy instance). The [`StatusRegistry`] defines what each status key
//! means; when a status is applied its behavior and expiry are copied onto
//! the holder's [`StatusSet`], so active statuses are self-describing and
//! survive save/load without the registry.
//!
//! ## Expiry
//!
//! - `OnTrigger`: lasts until its behavior fires `duration` times
//!   (e.g. "miss next attack" is consumed by the next attack).
//! - `Rounds`: counts down once per round boundary (after the enemy
//!   phase). The boundary that ends the round in which the status was
//!   applied does not count, so a 2-round status affects two enemy phases.

use serde::{Deserialize, Serialize};

use crate::core::{Catalog, ContentError, Definition, StatusKey};

/// What a status does while active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusBehavior {
    /// The holder's next attack deals no damage.
    MissNextAttack,
    /// Incoming damage is scaled by `percent` / 100 (floor) before block.
    DamageTakenPercent(u32),
    /// No engine-level effect; a narrative tag.
    Marker,
}

/// How a status runs out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expiry {
    /// Decrements each time the behavior fires.
    OnTrigger,
    /// Decrements at each round boundary after the first.
    Rounds,
}

/// Registry entry for a status key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDefinition {
    pub key: StatusKey,
    pub name: String,
    pub behavior: StatusBehavior,
    pub expiry: Expiry,
}

impl StatusDefinition {
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>, behavior: StatusBehavior, expiry: Expiry) -> Self {
        Self {
            key: StatusKey::new(key),
            name: name.into(),
            behavior,
            expiry,
        }
    }
}

impl Definition for StatusDefinition {
    type Key = StatusKey;

    fn key(&self) -> &StatusKey {
        &self.key
    }

    fn missing(key: &StatusKey) -> ContentError {
        ContentError::UnknownStatus(key.clone())
    }
}

/// Registry of known statuses. Extend by registering more definitions.
pub type StatusRegistry = Catalog<StatusDefinition>;

/// Request to apply a status for some duration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusApplication {
    pub key: StatusKey,
    #[serde(default = "default_duration")]
    pub duration: u32,
}

fn default_duration() -> u32 {
    1
}

impl StatusApplication {
    #[must_use]
    pub fn new(key: impl Into<String>, duration: u32) -> Self {
        Self {
            key: StatusKey::new(key),
            duration,
        }
    }
}

/// A status currently on a combatant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveStatus {
    pub key: StatusKey,
    pub behavior: StatusBehavior,
    pub expiry: Expiry,
    pub remaining: u32,
    /// Applied during the current round; skips the next round tick.
    pub fresh: bool,
}

/// Statuses held by one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSet {
    active: Vec<ActiveStatus>,
}

impl StatusSet {
    /// Apply a status. Re-applying an active status adds to its duration.
    pub fn apply(&mut self, definition: &StatusDefinition, duration: u32) {
        if duration == 0 {
            return;
        }
        if let Some(existing) = self.active.iter_mut().find(|s| s.key == definition.key) {
            existing.remaining = existing.remaining.saturating_add(duration);
            existing.fresh = true;
            return;
        }
        self.active.push(ActiveStatus {
            key: definition.key.clone(),
            behavior: definition.behavior,
            expiry: definition.expiry,
            remaining: duration,
            fresh: true,
        });
    }

    /// Look up the application's key in the registry and apply it.
    pub fn apply_from(
        &mut self,
        registry: &StatusRegistry,
        application: &StatusApplication,
    ) -> Result<(), ContentError> {
        let definition = registry.get(&application.key)?;
        self.apply(definition, application.duration);
        Ok(())
    }

    /// Check if a status is active.
    #[must_use]
    pub fn has(&self, key: &StatusKey) -> bool {
        self.active.iter().any(|s| &s.key == key)
    }

    /// Remaining duration of a status, if active.
    #[must_use]
    pub fn remaining(&self, key: &StatusKey) -> Option<u32> {
        self.active.iter().find(|s| &s.key == key).map(|s| s.remaining)
    }

    /// Iterate over active statuses.
    pub fn iter(&self) -> impl Iterator<Item = &ActiveStatus> {
        self.active.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Scale incoming damage by every active damage-taken modifier.
    #[must_use]
    pub fn incoming_damage(&self, base: u32) -> u32 {
        self.active.iter().fold(base, |dmg, s| match s.behavior {
            StatusBehavior::DamageTakenPercent(percent) => {
                u32::try_from(u64::from(dmg) * u64::from(percent) / 100).unwrap_or(u32::MAX)
            }
            _ => dmg,
        })
    }

    /// If a miss-next-attack status is active, fire it and return `true`.
    pub fn consume_miss(&mut self) -> bool {
        let Some(idx) = self
            .active
            .iter()
            .position(|s| s.behavior == StatusBehavior::MissNextAttack)
        else {
            return false;
        };

        let status = &mut self.active[idx];
        if status.expiry == Expiry::OnTrigger {
            status.remaining -= 1;
            if status.remaining == 0 {
                self.active.remove(idx);
            }
        }
        true
    }

    /// Round boundary: count down `Rounds` statuses and drop expired ones.
    pub fn tick_round(&mut self) {
        for status in self.active.iter_mut().filter(|s| s.expiry == Expiry::Rounds) {
            if status.fresh {
                status.fresh = false;
            } else {
                status.remaining = status.remaining.saturating_sub(1);
            }
        }
        self.active.retain(|s| s.remaining > 0);
    }

    /// Remove every status.
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> StatusRegistry {
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

    #[test]
    fn test_apply_unknown_status() {
        let mut set = StatusSet::default();
        let err = set
            .apply_from(&registry(), &StatusApplication::new("frozen", 1))
            .unwrap_err();
        assert_eq!(err, ContentError::UnknownStatus(StatusKey::new("frozen")));
        assert!(set.is_empty());
    }

    #[test]
    fn test_miss_consumed_by_trigger_not_rounds() {
        let mut set = StatusSet::default();
        set.apply_from(&registry(), &StatusApplication::new("miss_next", 1)).unwrap();

        // Surviving round boundaries until an attack happens
        set.tick_round();
        set.tick_round();
        assert!(set.has(&StatusKey::new("miss_next")));

        assert!(set.consume_miss());
        assert!(!set.has(&StatusKey::new("miss_next")));
        assert!(!set.consume_miss());
    }

    #[test]
    fn test_vulnerable_lasts_two_rounds() {
        let mut set = StatusSet::default();
        let key = StatusKey::new("vulnerable");
        set.apply_from(&registry(), &StatusApplication::new("vulnerable", 2)).unwrap();

        // Boundary of the round it was applied in does not count
        set.tick_round();
        assert_eq!(set.remaining(&key), Some(2));

        set.tick_round();
        assert_eq!(set.remaining(&key), Some(1));

        set.tick_round();
        assert_eq!(set.remaining(&key), None);
    }

    #[test]
    fn test_incoming_damage_scaling() {
        let mut set = StatusSet::default();
        assert_eq!(set.incoming_damage(7), 7);

        set.apply_from(&registry(), &StatusApplication::new("vulnerable", 1)).unwrap();
        assert_eq!(set.incoming_damage(7), 10);
        assert_eq!(set.incoming_damage(0), 0);
    }

    #[test]
    fn test_incoming_damage_saturates() {
        let mut set = StatusSet::default();
        set.apply_from(&registry(), &StatusApplication::new("vulnerable", 1)).unwrap();
        assert_eq!(set.incoming_damage(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_reapply_extends() {
        let mut set = StatusSet::default();
        let reg = registry();
        set.apply_from(&reg, &StatusApplication::new("vulnerable", 2)).unwrap();
        set.apply_from(&reg, &StatusApplication::new("vulnerable", 1)).unwrap();

        assert_eq!(set.remaining(&StatusKey::new("vulnerable")), Some(3));
        assert_eq!(set.iter().count(), 1);
    }

    #[test]
    fn test_zero_duration_is_noop() {
        let mut set = StatusSet::default();
        set.apply_from(&registry(), &StatusApplication::new("vulnerable", 0)).unwrap();
        assert!(set.is_empty());
    }
}
