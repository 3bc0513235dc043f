//! Idempotency ledger of already-routed record identities.
//!
//! The set is persisted as one JSON array of `"<tableId>_<position>"` strings
//! under a single configuration key, loaded fully before an operation and
//! written back fully after mutation. Single-record callers load and persist
//! per call; the batch driver loads once and persists once per batch.

use crate::config::{KvStore, KEY_PROCESSED};
use crate::core::{RecordIdentity, Result, RouterError};
use std::collections::HashSet;

/// In-memory snapshot of the processed-identity set.
///
/// An identity is inserted only after its record's copy into a partition has
/// completed, so membership always implies a completed copy.
#[derive(Debug, Default, Clone)]
pub struct ProcessedSet {
    entries: HashSet<String>,
}

impl ProcessedSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the persisted set. A missing entry is an empty set; a failing
    /// backend is [`RouterError::TrackerUnavailable`], never conflated with
    /// empty.
    pub fn load(kv: &dyn KvStore) -> Result<Self> {
        let raw = kv
            .get(KEY_PROCESSED)
            .map_err(|e| RouterError::TrackerUnavailable(e.to_string()))?;
        let entries = match raw {
            Some(json) => serde_json::from_str::<HashSet<String>>(&json)
                .map_err(|e| RouterError::TrackerUnavailable(format!("Corrupt processed set: {}", e)))?,
            None => HashSet::new(),
        };
        Ok(Self { entries })
    }

    /// Writes the full set back. Fatal for the current operation when the
    /// backend refuses, since idempotency cannot be guaranteed without it.
    pub fn persist(&self, kv: &mut dyn KvStore) -> Result<()> {
        let json = serde_json::to_string(&self.entries)
            .map_err(|e| RouterError::Serialization(e.to_string()))?;
        kv.set(KEY_PROCESSED, &json)
            .map_err(|e| RouterError::TrackerUnavailable(e.to_string()))
    }

    pub fn contains(&self, identity: &RecordIdentity) -> bool {
        self.entries.contains(&identity.to_string())
    }

    /// Idempotent; inserting a present identity changes nothing.
    pub fn insert(&mut self, identity: &RecordIdentity) {
        self.entries.insert(identity.to_string());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
