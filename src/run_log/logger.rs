//! Run logging into `LOGGING_TABLE`.

use super::context::{PhaseContext, PhaseOutcome, PhaseStatus};
use crate::sync::SyncError;
use crate::warehouse::{LogEntry, WarehouseStore};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Records one log row per phase attempt.
///
/// A failure to write the row is reported through `tracing` and never
/// changes the phase's outcome.
pub struct RunLogger {
    store: Arc<dyn WarehouseStore>,
}

impl RunLogger {
    pub fn new(store: Arc<dyn WarehouseStore>) -> Self {
        Self { store }
    }

    /// Make sure the log table exists and drop successful entries older than
    /// `retention_months`.
    pub fn prepare(&self, retention_months: u32) -> Result<usize> {
        self.store
            .prepare_run_log(retention_months)
            .context("Failed to prepare the run log")
    }

    /// Run `body` as a logged phase named `name`.
    pub fn run_phase<F>(&self, name: &str, body: F) -> PhaseOutcome
    where
        F: FnOnce(&mut PhaseContext) -> Result<(), SyncError>,
    {
        let mut ctx = PhaseContext::new(name);
        ctx.start();
        info!("Phase {} started", name);

        let result = body(&mut ctx);
        let (outcome, entry) = ctx.finish(result);

        match &outcome.status {
            PhaseStatus::Succeeded => {
                info!(
                    "Phase {} completed: {} records",
                    outcome.name, outcome.record_count
                );
            }
            PhaseStatus::Failed { kind, message } => {
                warn!(
                    "Phase {} failed after {} records ({:?}): {}",
                    outcome.name, outcome.record_count, kind, message
                );
            }
        }

        self.record(&entry);
        outcome
    }

    fn record(&self, entry: &LogEntry) {
        if let Err(e) = self.store.append_log_entry(entry) {
            error!(
                "Failed to write run log entry for {}: {:#}",
                entry.script_name, e
            );
        }
    }
}
