//! Full warehouse rebuild from the listener's library.

mod aggregate;
pub mod collections;
pub mod enrich;
mod error;

pub use aggregate::{compute_track_aggregates, TrackAggregate};
pub use error::{FaultKind, SyncError};

use crate::config::CollectionConventions;
use crate::run_log::{PhaseOutcome, RunLogger};
use crate::streaming_api::{LibraryApi, TimeRange, UserProfile};
use crate::warehouse::{WarehouseStats, WarehouseStore, WarehouseTable};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info};

/// Everything a phase needs. Built once per run.
pub struct SyncContext<'a> {
    pub api: &'a dyn LibraryApi,
    pub store: &'a dyn WarehouseStore,
    pub logger: &'a RunLogger,
    pub conventions: &'a CollectionConventions,
    pub user: &'a UserProfile,
}

/// Result of one pipeline run.
#[derive(Debug)]
pub struct SyncReport {
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub purged_log_entries: usize,
    pub phases: Vec<PhaseOutcome>,
    pub stats: WarehouseStats,
}

impl SyncReport {
    pub fn failed_phases(&self) -> impl Iterator<Item = &PhaseOutcome> {
        self.phases.iter().filter(|p| !p.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_phases().next().is_none()
    }
}

pub struct SyncPipeline<A: LibraryApi> {
    api: A,
    store: Arc<dyn WarehouseStore>,
    logger: RunLogger,
    conventions: CollectionConventions,
    log_retention_months: u32,
}

impl<A: LibraryApi> SyncPipeline<A> {
    pub fn new(
        api: A,
        store: Arc<dyn WarehouseStore>,
        conventions: CollectionConventions,
        log_retention_months: u32,
    ) -> Self {
        let logger = RunLogger::new(Arc::clone(&store));
        Self {
            api,
            store,
            logger,
            conventions,
            log_retention_months,
        }
    }

    /// Rebuild the warehouse.
    ///
    /// Returns an error only when the run cannot start. Once phases run,
    /// their failures are recorded in the report and the run log.
    pub fn run(&self) -> Result<SyncReport> {
        let started_at = Utc::now();

        let purged_log_entries = self.logger.prepare(self.log_retention_months)?;

        let user = self
            .api
            .current_user()
            .context("Failed to fetch the current user")?;
        info!(
            "Syncing library of {} ({})",
            user.display_name.as_deref().unwrap_or("<no display name>"),
            user.id
        );

        self.store.recreate_table(WarehouseTable::Collections)?;
        self.store.recreate_table(WarehouseTable::Facts)?;

        let ctx = SyncContext {
            api: &self.api,
            store: self.store.as_ref(),
            logger: &self.logger,
            conventions: &self.conventions,
            user: &user,
        };

        let mut phases = Vec::new();
        for range in TimeRange::ALL {
            phases.extend(collections::load_top_tracks(&ctx, range));
        }
        phases.extend(collections::load_liked_tracks(&ctx));
        phases.extend(collections::load_playlists(&ctx));
        phases.push(enrich::enrich_tracks(&ctx));
        phases.push(enrich::enrich_albums(&ctx));
        phases.push(enrich::enrich_artists(&ctx));

        let stats = self.store.get_stats().unwrap_or_else(|e| {
            error!("Failed to read warehouse stats: {:#}", e);
            WarehouseStats::default()
        });
        let report = SyncReport {
            user_id: user.id,
            started_at,
            finished_at: Utc::now(),
            purged_log_entries,
            phases,
            stats,
        };

        let failed = report.failed_phases().count();
        info!(
            "Sync finished: {} phases, {} failed",
            report.phases.len(),
            failed
        );
        Ok(report)
    }
}
