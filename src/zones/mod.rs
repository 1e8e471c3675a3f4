//! Card piles.
//!
//! The player's cards live in four ordered piles on `GameState`: deck,
//! hand, discard and exile. `DeckManager` performs every move between them.
//!
//! ## Key Types
//!
//! - `Pile`: Pile identifier
//! - `DeckManager`: Draw, reshuffle, discard, exile, gather
//! - `DrawReport`: What a draw did

pub mod deck;

pub use deck::{DeckManager, DrawReport, Pile};
