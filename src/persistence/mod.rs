//! Save slots.
//!
//! ## Key Types
//!
//! - `SaveRecord`: Snapshot of a run with timestamp and description
//! - `SaveStore`: Slot-addressed persistence contract
//! - `SlotStore`: JSON `SaveStore` over any `KeyValueStore`
//! - `MemoryKv` / `FileKv`: Key-value backends

pub mod kv;
pub mod slots;

pub use kv::{FileKv, KeyValueStore, MemoryKv};
pub use slots::{
    describe, SaveRecord, SaveStore, SlotId, SlotStore, SlotSummary, CORRUPTED_DESCRIPTION, LEGACY_SLOT_KEY,
    SLOT_KEY_PREFIX,
};
