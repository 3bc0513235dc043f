//! Lazy partition creation and ordered appends.

use super::engine::TableEngine;
use crate::core::{FormattedRow, Result, RouterError, TableId};
use crate::key::PartitionKey;
use log::{debug, info};

/// Mapping from partition keys to destination tables, backed by a
/// [`TableEngine`]. Partitions are created on first use with the schema
/// source's header row copied verbatim, formatting included, and frozen from
/// then on; a later schema change in the source does not propagate.
pub struct PartitionStore<'a, E: TableEngine + ?Sized> {
    engine: &'a mut E,
}

impl<'a, E: TableEngine + ?Sized> PartitionStore<'a, E> {
    pub fn new(engine: &'a mut E) -> Self {
        Self { engine }
    }

    /// Returns the partition named `key`, creating it with `schema_source`'s
    /// header if it does not exist yet. An existing partition is returned
    /// unchanged.
    pub fn get_or_create(&mut self, key: &PartitionKey, schema_source: &TableId) -> Result<TableId> {
        if let Some(existing) = self.engine.find_table_by_name(key.as_str())? {
            return Ok(existing);
        }

        let header = self
            .engine
            .read_header(schema_source)
            .map_err(|e| RouterError::PartitionCreation(key.to_string(), e.to_string()))?;
        let partition = self
            .engine
            .create_table(key.as_str())
            .map_err(|e| RouterError::PartitionCreation(key.to_string(), e.to_string()))?;
        self.engine
            .write_row(&partition, 1, &header)
            .map_err(|e| RouterError::PartitionCreation(key.to_string(), e.to_string()))?;

        info!("Created partition '{}'", key);
        Ok(partition)
    }

    /// Appends `record` at the first unused row of `partition`, fitted to
    /// the partition's column count so a mismatched source row can never
    /// write out of range.
    pub fn append(&mut self, partition: &TableId, record: &FormattedRow) -> Result<()> {
        let name = self.engine.table_name(partition)?;
        let width = self.engine.last_column_index(partition)?;
        let fitted = if width > 0 && width != record.width() {
            record.fitted_to(width)
        } else {
            record.clone()
        };

        let next = self
            .engine
            .last_row_index(partition)
            .map_err(|e| RouterError::Append(name.clone(), e.to_string()))?
            + 1;
        self.engine
            .write_row(partition, next, &fitted)
            .map_err(|e| RouterError::Append(name.clone(), e.to_string()))?;

        debug!("Appended row {} to partition '{}'", next, name);
        Ok(())
    }
}
