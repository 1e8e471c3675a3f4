//! Multi-slot save records.
//!
//! ## Keys
//!
//! - Numbered slots: `eldoraeya_save_slot_{n}` for `n` in `0..slot_count`
//! - Legacy single slot: `eldoraeya_save`
//!
//! A slot whose value cannot be parsed is reported as corrupted. It still
//! shows up in listings, and reading it is an error for that slot only.

use std::fmt;
use std::io;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::kv::KeyValueStore;
use crate::core::{GameRngState, GameState, PersistenceError};

/// Key prefix of numbered slots.
pub const SLOT_KEY_PREFIX: &str = "eldoraeya_save_slot_";

/// Key of the legacy single slot.
pub const LEGACY_SLOT_KEY: &str = "eldoraeya_save";

/// Description shown for unreadable slots.
pub const CORRUPTED_DESCRIPTION: &str = "Corrupted Save";

/// Address of a save slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotId {
    Numbered(usize),
    Legacy,
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::Numbered(n) => write!(f, "{}", n),
            SlotId::Legacy => f.write_str("legacy"),
        }
    }
}

/// A saved run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub state: GameState,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub description: String,
    /// RNG position, so a loaded run continues the same random sequence.
    #[serde(default)]
    pub rng: Option<GameRngState>,
}

impl SaveRecord {
    /// Snapshot `state` at `now`. The snapshot's `last_saved` is set to `now`.
    ///
    /// `now` is truncated to milliseconds, the stored precision.
    #[must_use]
    pub fn new(state: &GameState, rng: Option<GameRngState>, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        let mut state = state.clone();
        state.last_saved = Some(now);
        let description = describe(&state, now);
        Self {
            state,
            timestamp: now,
            description,
            rng,
        }
    }
}

/// `"Ch: {chapter} - {city} - {YYYY-MM-DD}"`.
#[must_use]
pub fn describe(state: &GameState, at: DateTime<Utc>) -> String {
    let city = state.current_city.as_ref().map_or("Unknown", |c| c.as_str());
    format!("Ch: {} - {} - {}", state.chapter, city, at.format("%Y-%m-%d"))
}

/// Listing entry for an occupied slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSummary {
    pub slot: SlotId,
    /// `None` for corrupted slots.
    pub timestamp: Option<DateTime<Utc>>,
    pub description: String,
    pub corrupted: bool,
}

/// Slot-addressed save storage.
pub trait SaveStore {
    /// Number of numbered slots.
    fn slot_count(&self) -> usize;

    /// Write `record` to `slot`.
    fn write(&mut self, slot: SlotId, record: &SaveRecord) -> Result<(), PersistenceError>;

    /// Read `slot`. `Ok(None)` if it was never written.
    fn read(&self, slot: SlotId) -> Result<Option<SaveRecord>, PersistenceError>;

    /// Every occupied slot: numbered slots in order, then the legacy slot.
    fn list(&self) -> Vec<SlotSummary>;

    /// The readable slot with the newest timestamp.
    fn most_recent(&self) -> Option<SlotId> {
        self.list()
            .into_iter()
            .filter(|s| !s.corrupted)
            .max_by_key(|s| s.timestamp)
            .map(|s| s.slot)
    }
}

/// [`SaveStore`] over any [`KeyValueStore`], as JSON.
///
/// ```
/// use chrono::Utc;
/// use spellbound::core::{EngineConfig, GameState};
/// use spellbound::persistence::{MemoryKv, SaveRecord, SaveStore, SlotId, SlotStore};
///
/// let mut store = SlotStore::new(MemoryKv::new(), 10);
/// let state = GameState::new(&EngineConfig::default());
///
/// store.write(SlotId::Numbered(3), &SaveRecord::new(&state, None, Utc::now())).unwrap();
/// assert!(store.read(SlotId::Numbered(3)).unwrap().is_some());
/// assert_eq!(store.list().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct SlotStore<K> {
    kv: K,
    slot_count: usize,
}

impl<K: KeyValueStore> SlotStore<K> {
    #[must_use]
    pub fn new(kv: K, slot_count: usize) -> Self {
        Self { kv, slot_count }
    }

    /// The underlying key-value store.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut K {
        &mut self.kv
    }

    /// Storage key of `slot`.
    pub fn key(&self, slot: SlotId) -> Result<String, PersistenceError> {
        match slot {
            SlotId::Numbered(n) if n < self.slot_count => Ok(format!("{}{}", SLOT_KEY_PREFIX, n)),
            SlotId::Numbered(_) => Err(PersistenceError::InvalidSlot {
                slot,
                slot_count: self.slot_count,
            }),
            SlotId::Legacy => Ok(LEGACY_SLOT_KEY.to_string()),
        }
    }

    fn summarize(&self, slot: SlotId) -> Option<SlotSummary> {
        match self.read(slot) {
            Ok(None) => None,
            Ok(Some(record)) => Some(SlotSummary {
                slot,
                timestamp: Some(record.timestamp),
                description: record.description,
                corrupted: false,
            }),
            Err(err) => {
                warn!(%slot, error = %err, "unreadable save slot");
                Some(SlotSummary {
                    slot,
                    timestamp: None,
                    description: CORRUPTED_DESCRIPTION.to_string(),
                    corrupted: true,
                })
            }
        }
    }
}

impl<K: KeyValueStore> SaveStore for SlotStore<K> {
    fn slot_count(&self) -> usize {
        self.slot_count
    }

    fn write(&mut self, slot: SlotId, record: &SaveRecord) -> Result<(), PersistenceError> {
        let key = self.key(slot)?;
        let json = serde_json::to_string(record).map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        self.kv.set(&key, json)?;
        debug!(%slot, description = %record.description, "wrote save slot");
        Ok(())
    }

    fn read(&self, slot: SlotId) -> Result<Option<SaveRecord>, PersistenceError> {
        let key = self.key(slot)?;
        let json = match self.kv.get(&key) {
            Ok(Some(json)) => json,
            Ok(None) => return Ok(None),
            // Present but not text
            Err(PersistenceError::Io(err)) if err.kind() == io::ErrorKind::InvalidData => {
                return Err(PersistenceError::Corrupted {
                    slot,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| PersistenceError::Corrupted {
                slot,
                reason: e.to_string(),
            })
    }

    fn list(&self) -> Vec<SlotSummary> {
        (0..self.slot_count)
            .map(SlotId::Numbered)
            .chain(std::iter::once(SlotId::Legacy))
            .filter_map(|slot| self.summarize(slot))
            .collect()
    }
}
