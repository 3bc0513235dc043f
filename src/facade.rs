//! High-level routing surface: setup, event handling, bulk passes, reset.

use crate::batch::{self, BatchOptions};
use crate::config::{load_configuration, save_configuration, KvStore};
use crate::core::{Configuration, Result, RouterError, TableId};
use crate::probe::source_is_form_compatible;
use crate::routing::{RoutingEngine, RoutingOutcome};
use crate::store::TableEngine;
use crate::tracker::ProcessedSet;
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard};

/// Routes records from one configured source table into per-key partitions.
///
/// Owns its table engine and configuration store; `&mut self` on every
/// mutating operation gives structural mutual exclusion per router. Use
/// [`SharedRouter`] when multiple owners need the same router.
///
/// # Examples
///
/// ```
/// use rowrouter::{FormattedRow, InMemoryKv, InMemoryTables, Router, RoutingOutcome, Value};
///
/// # fn main() -> rowrouter::Result<()> {
/// let mut tables = InMemoryTables::new();
/// let header = FormattedRow::plain(vec![
///     Value::Text("Timestamp".into()),
///     Value::Text("Email Address".into()),
///     Value::Text("Department".into()),
/// ]);
/// let source = tables.create_with_header("Responses", header)?;
/// tables.push_row(&source, FormattedRow::plain(vec![
///     Value::Text("t1".into()),
///     Value::Text("a@x.com".into()),
///     Value::Text("Sales".into()),
/// ]))?;
///
/// let mut router = Router::new(tables, InMemoryKv::new());
/// router.setup(source, 3)?;
/// assert_eq!(router.route_record(2)?, RoutingOutcome::Routed);
/// assert_eq!(router.route_record(2)?, RoutingOutcome::SkippedAlreadyProcessed);
/// # Ok(())
/// # }
/// ```
pub struct Router<E: TableEngine, K: KvStore> {
    engine: E,
    kv: K,
    batch: BatchOptions,
    event_registered: bool,
}

impl<E: TableEngine, K: KvStore> Router<E, K> {
    pub fn new(engine: E, kv: K) -> Self {
        Self {
            engine,
            kv,
            batch: BatchOptions::default(),
            event_registered: false,
        }
    }

    /// Replace the batch sizing/pacing used by [`Router::route_existing`].
    pub fn with_batch_options(mut self, options: BatchOptions) -> Self {
        self.batch = options;
        self
    }

    /// Tells the capability probe that a record-arrival event registration
    /// already targets the hosting file.
    pub fn set_event_registered(&mut self, registered: bool) {
        self.event_registered = registered;
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Dismantles the router into its engine and store, e.g. to rebuild it
    /// over a reopened backend.
    pub fn into_parts(self) -> (E, K) {
        (self.engine, self.kv)
    }

    /// Records the routing configuration after probing the source.
    ///
    /// Refused before anything is persisted when the probe rejects the
    /// source or the field index is not 1-based.
    pub fn setup(&mut self, source_table: TableId, field_index: usize) -> Result<()> {
        if field_index == 0 {
            return Err(RouterError::FieldOutOfRange(0, 0));
        }
        if !source_is_form_compatible(&self.engine, &source_table, self.event_registered)? {
            let name = self.engine.table_name(&source_table)?;
            return Err(RouterError::SourceNotCompatible(name));
        }

        let config = Configuration::new(source_table, field_index);
        save_configuration(&mut self.kv, &config)?;
        info!("Routing configured: source {}, field {}", source_table, field_index);
        Ok(())
    }

    /// The recorded configuration; `None` until setup has run.
    pub fn configuration(&self) -> Result<Option<Configuration>> {
        load_configuration(&self.kv)
    }

    fn required_configuration(&self) -> Result<Configuration> {
        self.configuration()?.ok_or(RouterError::ConfigurationMissing)
    }

    /// Routes the single record at `position`. Loads and persists the
    /// processed set around the one record.
    pub fn route_record(&mut self, position: u64) -> Result<RoutingOutcome> {
        let config = self.required_configuration()?;
        let mut processed = ProcessedSet::load(&self.kv)?;

        let outcome = RoutingEngine::new(&mut self.engine, config).route(position, &mut processed)?;
        if outcome == RoutingOutcome::Routed {
            processed.persist(&mut self.kv)?;
        }
        Ok(outcome)
    }

    /// Event entry point for a newly arrived record. Best-effort: a failure
    /// is logged and swallowed, since the record stays unprocessed and the
    /// next bulk pass retries it. Delivery may repeat; routing is idempotent.
    pub fn on_record_added(&mut self, position: u64) {
        match self.route_record(position) {
            Ok(outcome) => info!("Record at position {} handled: {:?}", position, outcome),
            Err(e) => warn!(
                "Routing record at position {} failed, leaving it for the bulk pass: {}",
                position, e
            ),
        }
    }

    /// Routes every record in `first..=last` and returns how many came back
    /// `Routed`. A result smaller than the range size means records were
    /// skipped or failed.
    pub fn route_existing(&mut self, first: u64, last: u64) -> Result<u64> {
        let config = self.required_configuration()?;
        let report = batch::drive(&mut self.engine, config, &mut self.kv, first, last, &self.batch)?;
        Ok(report.routed)
    }

    /// Routes every data record of the configured source (positions 2
    /// through the last occupied row).
    pub fn route_all_existing(&mut self) -> Result<u64> {
        let config = self.required_configuration()?;
        let last = self.engine.last_row_index(&config.source_table)?;
        if last < 2 {
            return Ok(0);
        }
        self.route_existing(2, last)
    }

    /// Clears the processed set and the configuration. Already-copied rows
    /// stay in their partitions; re-running after reset duplicates them by
    /// design.
    pub fn reset(&mut self) -> Result<()> {
        self.kv.delete_all()?;
        info!("Routing configuration and processed set cleared");
        Ok(())
    }
}

/// Clonable handle serializing all router operations behind one mutex.
///
/// The lock spans the whole load-route-persist cycle of each operation, so
/// two concurrent routings cannot both create the same partition or compute
/// the same next row.
pub struct SharedRouter<E: TableEngine, K: KvStore> {
    inner: Arc<Mutex<Router<E, K>>>,
}

impl<E: TableEngine, K: KvStore> Clone for SharedRouter<E, K> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<E: TableEngine, K: KvStore> SharedRouter<E, K> {
    pub fn new(router: Router<E, K>) -> Self {
        Self { inner: Arc::new(Mutex::new(router)) }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Router<E, K>>> {
        Ok(self.inner.lock()?)
    }

    pub fn setup(&self, source_table: TableId, field_index: usize) -> Result<()> {
        self.lock()?.setup(source_table, field_index)
    }

    pub fn configuration(&self) -> Result<Option<Configuration>> {
        self.lock()?.configuration()
    }

    pub fn route_record(&self, position: u64) -> Result<RoutingOutcome> {
        self.lock()?.route_record(position)
    }

    pub fn on_record_added(&self, position: u64) {
        match self.lock() {
            Ok(mut router) => router.on_record_added(position),
            Err(e) => warn!("Router lock poisoned, dropping event for position {}: {}", position, e),
        }
    }

    pub fn route_existing(&self, first: u64, last: u64) -> Result<u64> {
        self.lock()?.route_existing(first, last)
    }

    pub fn reset(&self) -> Result<()> {
        self.lock()?.reset()
    }
}
