//! Enemy catalog for definition lookup.

use crate::core::{Catalog, ContentError, Definition, EnemyKey};

use super::definition::EnemyDefinition;

impl Definition for EnemyDefinition {
    type Key = EnemyKey;

    fn key(&self) -> &EnemyKey {
        &self.key
    }

    fn missing(key: &EnemyKey) -> ContentError {
        ContentError::UnknownEnemy(key.clone())
    }
}

/// Catalog of enemy definitions.
pub type EnemyCatalog = Catalog<EnemyDefinition>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::EnemyMove;

    #[test]
    fn test_lookup() {
        let catalog = EnemyCatalog::new()
            .with(EnemyDefinition::new("thug", "Street Thug", 15).with_move(EnemyMove::attack("Pummel", 5)));

        assert_eq!(catalog.get(&EnemyKey::new("thug")).unwrap().max_health, 15);
        assert_eq!(
            catalog.get(&EnemyKey::new("streetthug")).unwrap_err(),
            ContentError::UnknownEnemy(EnemyKey::new("streetthug"))
        );
    }
}
