//! Per-record routing: the at-most-once engine.

use crate::core::{Configuration, RecordIdentity, Result, RouterError};
use crate::key::normalize;
use crate::store::{PartitionStore, TableEngine};
use crate::tracker::ProcessedSet;
use log::debug;

/// Outcome of routing a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingOutcome {
    /// Copied into its partition and marked processed.
    Routed,
    /// Identity already in the processed set; nothing touched.
    SkippedAlreadyProcessed,
    /// Designated field empty; not marked, so the record is retried once the
    /// field acquires a value.
    SkippedEmptyKey,
}

/// Routes one record at a time against a fixed configuration.
///
/// Owns no persistent state: the processed set is passed in by the caller,
/// which decides how often to persist it (per record for the single-shot
/// path, per batch for the driver).
pub struct RoutingEngine<'a, E: TableEngine + ?Sized> {
    engine: &'a mut E,
    config: Configuration,
}

impl<'a, E: TableEngine + ?Sized> RoutingEngine<'a, E> {
    pub fn new(engine: &'a mut E, config: Configuration) -> Self {
        Self { engine, config }
    }

    /// Routes the record at `position`.
    ///
    /// The identity is inserted into `processed` strictly after the append
    /// has succeeded; a failed append leaves the record unprocessed so a
    /// later pass retries it.
    pub fn route(&mut self, position: u64, processed: &mut ProcessedSet) -> Result<RoutingOutcome> {
        let identity = RecordIdentity::new(self.config.source_table, position);
        if processed.contains(&identity) {
            debug!("Record {} already routed", identity);
            return Ok(RoutingOutcome::SkippedAlreadyProcessed);
        }

        let record = self.engine.read_row(&self.config.source_table, position)?;
        let cell = self
            .config
            .field_index
            .checked_sub(1)
            .and_then(|i| record.values.get(i))
            .ok_or(RouterError::FieldOutOfRange(self.config.field_index, record.width()))?;
        if !cell.as_bool() {
            debug!("Record {} has no key value yet", identity);
            return Ok(RoutingOutcome::SkippedEmptyKey);
        }

        let key = normalize(cell);
        let mut store = PartitionStore::new(&mut *self.engine);
        let partition = store.get_or_create(&key, &self.config.source_table)?;
        store.append(&partition, &record)?;

        processed.insert(&identity);
        debug!("Routed record {} to partition '{}'", identity, key);
        Ok(RoutingOutcome::Routed)
    }
}
