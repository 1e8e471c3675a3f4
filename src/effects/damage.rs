//! Damage resolution.
//!
//! Damage is symmetric between the player and enemies: status modifiers
//! on the defender scale the incoming amount, block absorbs first, and
//! whatever is left comes off health, which never goes below zero.

use super::status::StatusSet;

/// Outcome of one hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageReport {
    /// Damage after status modifiers, before block.
    pub incoming: u32,
    /// Amount soaked by block.
    pub absorbed: u32,
    /// Health actually lost.
    pub health_lost: u32,
}

/// Apply `damage` to a block pool and health pool.
///
/// Leaves `block = max(0, block - damage)` and
/// `health = max(0, health - max(0, damage - block))`.
pub fn absorb(block: &mut u32, health: &mut u32, damage: u32) -> DamageReport {
    let absorbed = damage.min(*block);
    *block -= absorbed;

    let remainder = damage - absorbed;
    let health_lost = remainder.min(*health);
    *health -= health_lost;

    DamageReport {
        incoming: damage,
        absorbed,
        health_lost,
    }
}

/// Apply `base` damage to a defender with statuses.
pub fn strike(block: &mut u32, health: &mut u32, statuses: &StatusSet, base: u32) -> DamageReport {
    absorb(block, health, statuses.incoming_damage(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Expiry, StatusBehavior, StatusDefinition};
    use proptest::prelude::*;

    #[test]
    fn test_block_soaks_everything() {
        let (mut block, mut health) = (5, 10);
        let report = absorb(&mut block, &mut health, 3);

        assert_eq!((block, health), (2, 10));
        assert_eq!(report.absorbed, 3);
        assert_eq!(report.health_lost, 0);
    }

    #[test]
    fn test_remainder_hits_health() {
        let (mut block, mut health) = (3, 10);
        let report = absorb(&mut block, &mut health, 5);

        assert_eq!((block, health), (0, 8));
        assert_eq!(report.health_lost, 2);
    }

    #[test]
    fn test_health_floors_at_zero() {
        let (mut block, mut health) = (0, 4);
        let report = absorb(&mut block, &mut health, 9);

        assert_eq!(health, 0);
        assert_eq!(report.health_lost, 4);
    }

    #[test]
    fn test_strike_applies_vulnerable_before_block() {
        let mut statuses = StatusSet::default();
        statuses.apply(
            &StatusDefinition::new("vulnerable", "Vulnerable", StatusBehavior::DamageTakenPercent(150), Expiry::Rounds),
            1,
        );

        let (mut block, mut health) = (4, 20);
        let report = strike(&mut block, &mut health, &statuses, 6);

        assert_eq!(report.incoming, 9);
        assert_eq!((block, health), (0, 15));
    }

    proptest! {
        #[test]
        fn prop_block_then_health(d in 0u32..500, b in 0u32..500, h in 0u32..500) {
            let (mut block, mut health) = (b, h);
            absorb(&mut block, &mut health, d);

            prop_assert_eq!(block, b.saturating_sub(d));
            prop_assert_eq!(health, h.saturating_sub(d.saturating_sub(b)));
        }
    }
}
