//! Content packs.

pub mod eldoraeya;
