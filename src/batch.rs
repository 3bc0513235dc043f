//! Bulk routing over a position range, in bounded batches.

use crate::config::KvStore;
use crate::core::{Configuration, Result};
use crate::routing::{RoutingEngine, RoutingOutcome};
use crate::store::TableEngine;
use crate::tracker::ProcessedSet;
use log::{info, warn};
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(1);

/// Batch sizing and pacing. The pause is a scheduling courtesy to
/// rate-limited hosts, not a correctness requirement; zero disables it.
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub batch_size: usize,
    pub pause: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            pause: DEFAULT_PAUSE,
        }
    }
}

impl BatchOptions {
    pub fn unpaced() -> Self {
        Self {
            pause: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// What a bulk pass accomplished. `routed < examined` signals skipped or
/// failed records; no failure is silently dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub examined: u64,
    pub routed: u64,
    pub failed: u64,
}

/// Drives the routing engine across the inclusive position range
/// `first..=last` in ascending order, in batches of `options.batch_size`.
///
/// The processed set is loaded once up front and persisted after every
/// batch, never per record. A per-record failure is logged and counted but
/// does not abort the other records; an unavailable tracker store is fatal.
pub fn drive<E: TableEngine + ?Sized>(
    engine: &mut E,
    config: Configuration,
    kv: &mut dyn KvStore,
    first: u64,
    last: u64,
    options: &BatchOptions,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    if first > last {
        return Ok(report);
    }

    let batch_size = options.batch_size.max(1) as u64;
    let mut processed = ProcessedSet::load(kv)?;
    let mut batch_start = first;

    while batch_start <= last {
        let batch_end = last.min(batch_start + batch_size - 1);

        let mut routing = RoutingEngine::new(&mut *engine, config);
        for position in batch_start..=batch_end {
            report.examined += 1;
            match routing.route(position, &mut processed) {
                Ok(RoutingOutcome::Routed) => report.routed += 1,
                Ok(_) => {}
                Err(e) => {
                    report.failed += 1;
                    warn!("Routing failed for position {}: {}", position, e);
                }
            }
        }

        processed.persist(kv)?;

        if batch_end < last && !options.pause.is_zero() {
            std::thread::sleep(options.pause);
        }
        batch_start = batch_end + 1;
    }

    info!(
        "Bulk pass complete: {} routed, {} failed of {} examined",
        report.routed, report.failed, report.examined
    );
    Ok(report)
}
