// ============================================================================
// RowRouter Library
// ============================================================================
//
// Routes tabular records into per-category partitions keyed by one designated
// field, with at-most-once delivery under repeated invocation. The partition
// inherits the source header (values and formatting) at creation time; every
// routed row keeps its per-cell formatting.

pub mod batch;
pub mod config;
pub mod core;
pub mod facade;
pub mod key;
pub mod probe;
pub mod routing;
pub mod store;
pub mod tracker;

// Re-export main types for convenience
pub use batch::{BatchOptions, BatchReport};
pub use config::{FileKv, InMemoryKv, KvStore};
pub use crate::core::{
    Configuration, FormattedRow, RecordIdentity, Result, RouterError, Row, TableId, Value,
};
pub use facade::{Router, SharedRouter};
pub use key::{normalize, PartitionKey};
pub use probe::source_is_form_compatible;
pub use routing::{RoutingEngine, RoutingOutcome};
pub use store::{InMemoryTables, PartitionStore, TableEngine};
pub use tracker::ProcessedSet;
