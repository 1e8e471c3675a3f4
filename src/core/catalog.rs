//! Immutable content catalogs.
//!
//! A `Catalog` stores definitions by key and provides lookup. Cards,
//! enemies and items each get a catalog; the only behavior is
//! lookup-or-fail, where failure is a [`ContentError`] naming the missing
//! key rather than a panic.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use super::error::ContentError;

/// A definition that can live in a [`Catalog`].
pub trait Definition {
    /// Key type used to look the definition up.
    type Key: Clone + Eq + Hash + std::fmt::Debug;

    /// The definition's key.
    fn key(&self) -> &Self::Key;

    /// Error reported when `key` is not in the catalog.
    fn missing(key: &Self::Key) -> ContentError;
}

/// Registry of definitions keyed by identifier.
///
/// Preserves registration order for iteration, so listings are stable.
#[derive(Clone, Debug)]
pub struct Catalog<D: Definition> {
    entries: FxHashMap<D::Key, usize>,
    definitions: Vec<D>,
}

impl<D: Definition> Default for Catalog<D> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            definitions: Vec::new(),
        }
    }
}

impl<D: Definition> Catalog<D> {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition.
    ///
    /// Panics if a definition with the same key already exists.
    pub fn register(&mut self, definition: D) {
        let key = definition.key().clone();
        if self.entries.contains_key(&key) {
            panic!("Definition with key {:?} already registered", key);
        }
        self.entries.insert(key, self.definitions.len());
        self.definitions.push(definition);
    }

    /// Register a definition (builder pattern).
    #[must_use]
    pub fn with(mut self, definition: D) -> Self {
        self.register(definition);
        self
    }

    /// Look up a definition.
    pub fn get(&self, key: &D::Key) -> Result<&D, ContentError> {
        self.entries
            .get(key)
            .map(|&idx| &self.definitions[idx])
            .ok_or_else(|| D::missing(key))
    }

    /// Definition at a registration position.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&D> {
        self.definitions.get(index)
    }

    /// Check if a key is registered.
    #[must_use]
    pub fn contains(&self, key: &D::Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate over all definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &D> {
        self.definitions.iter()
    }
}

impl<D: Definition> FromIterator<D> for Catalog<D> {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for definition in iter {
            catalog.register(definition);
        }
        catalog
    }
}
