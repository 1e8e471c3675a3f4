//! Identifier types.
//!
//! Content is addressed by string keys (`"Fireball"`, `"thug"`,
//! `"minorHealingPotion"`). Each key kind gets its own newtype so a card key
//! can never be passed where an enemy key is expected.
//!
//! ```
//! use spellbound::core::{CardKey, EnemyKey};
//!
//! let card = CardKey::new("Fireball");
//! let enemy = EnemyKey::from("thug");
//!
//! assert_eq!(card.as_str(), "Fireball");
//! assert_eq!(enemy.to_string(), "thug");
//! ```

use serde::{Deserialize, Serialize};

macro_rules! string_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new key.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the raw key.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_key!(
    /// Key of a card definition.
    CardKey
);
string_key!(
    /// Key of an enemy definition.
    EnemyKey
);
string_key!(
    /// Key of an item definition.
    ItemKey
);
string_key!(
    /// Key of a story piece within a chapter.
    StoryPieceId
);
string_key!(
    /// Key of a status effect in the status registry.
    StatusKey
);
string_key!(
    /// Key of a city.
    CityKey
);

/// Chapter number (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(pub u32);

impl ChapterId {
    /// Create a new chapter ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for one inventory item instance.
///
/// Two potions of the same kind get different instance IDs, so each
/// can be consumed individually. Allocated sequentially by
/// [`GameState::alloc_instance_id`](crate::core::GameState::alloc_instance_id).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemInstanceId(pub u32);

impl ItemInstanceId {
    /// Create a new instance ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ItemInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Item#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_keys() {
        let key = CardKey::new("Flame Strike");
        assert_eq!(key.as_str(), "Flame Strike");
        assert_eq!(format!("{}", key), "Flame Strike");
        assert_eq!(key, CardKey::from("Flame Strike".to_string()));
    }

    #[test]
    fn test_keys_serialize_transparently() {
        let json = serde_json::to_string(&EnemyKey::new("thug")).unwrap();
        assert_eq!(json, "\"thug\"");

        let back: EnemyKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "thug");
    }

    #[test]
    fn test_numeric_ids() {
        assert_eq!(ChapterId::new(1).raw(), 1);
        assert_eq!(format!("{}", ItemInstanceId::new(7)), "Item#7");
        assert!(ItemInstanceId::new(1) < ItemInstanceId::new(2));
    }
}
