//! Eldoraeya: the built-in content pack.
//!
//! A mage sent by their order to find where magic is fading. Seven cities,
//! the first chapter of the story, the starter cards, four bandits and a
//! handful of items.
//!
//! Hosts that ship their own content build a [`Content`](crate::machine::Content)
//! the same way [`content`] does.

mod data;

pub use data::{cards, chapters, cities, content, enemies, items, statuses};
