//! Effect targeting.
//!
//! Cards declare a [`TargetScope`]; the engine resolves it against the
//! current enemy line-up to a list of enemy indices.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::enemies::EnemyInstance;

/// Which enemies a card affects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetScope {
    /// The first living enemy in encounter order.
    #[default]
    Single,
    /// Every living enemy.
    All,
}

/// Resolved target indices.
///
/// SmallVec keeps typical encounters (1-4 enemies) off the heap.
pub type Targets = SmallVec<[usize; 4]>;

/// Resolve a scope to indices into `enemies`, in encounter order.
///
/// Returns empty if no enemy is alive.
#[must_use]
pub fn select_targets(enemies: &[EnemyInstance], scope: TargetScope) -> Targets {
    let living = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_alive())
        .map(|(i, _)| i);

    match scope {
        TargetScope::Single => living.take(1).collect(),
        TargetScope::All => living.collect(),
    }
}
