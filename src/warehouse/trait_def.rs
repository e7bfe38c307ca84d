//! WarehouseStore trait definition.

use super::models::{
    AlbumDim, ArtistDim, CollectionDim, LogEntry, TrackDim, TrackFact, WarehouseStats,
};
use super::schema::WarehouseTable;
use anyhow::Result;

/// Storage backend for the listening warehouse.
///
/// Every write method commits before returning, so rows written before a
/// later failure stay in the store.
pub trait WarehouseStore: Send + Sync {
    // =========================================================================
    // Run log
    // =========================================================================

    /// Create the run log table if missing and purge successful entries that
    /// finished more than `retention_months` ago. Returns the purged count.
    fn prepare_run_log(&self, retention_months: u32) -> Result<usize>;

    fn append_log_entry(&self, entry: &LogEntry) -> Result<()>;

    /// All log entries, oldest first.
    fn get_log_entries(&self) -> Result<Vec<LogEntry>>;

    // =========================================================================
    // Table lifecycle
    // =========================================================================

    /// Drop the table and create it again, empty.
    fn recreate_table(&self, table: WarehouseTable) -> Result<()>;

    // =========================================================================
    // Facts and collections
    // =========================================================================

    fn insert_track_facts(&self, facts: &[TrackFact]) -> Result<()>;

    fn upsert_collections(&self, collections: &[CollectionDim]) -> Result<()>;

    /// All facts in insertion order.
    fn get_track_facts(&self) -> Result<Vec<TrackFact>>;

    fn get_collections(&self) -> Result<Vec<CollectionDim>>;

    // =========================================================================
    // Dimensions
    // =========================================================================

    fn upsert_tracks(&self, tracks: &[TrackDim]) -> Result<()>;

    fn get_tracks(&self) -> Result<Vec<TrackDim>>;

    /// `(album_id, track rows)` over tracks with a non-null playlist count,
    /// ordered by album id.
    fn get_album_track_counts(&self) -> Result<Vec<(String, i64)>>;

    /// `(primary_artist_id, track rows)` over tracks with a non-null playlist
    /// count, ordered by artist id.
    fn get_artist_track_counts(&self) -> Result<Vec<(String, i64)>>;

    fn upsert_albums(&self, albums: &[AlbumDim]) -> Result<()>;

    fn get_albums(&self) -> Result<Vec<AlbumDim>>;

    fn upsert_artists(&self, artists: &[ArtistDim]) -> Result<()>;

    fn get_artists(&self) -> Result<Vec<ArtistDim>>;

    // =========================================================================
    // Statistics
    // =========================================================================

    fn get_stats(&self) -> Result<WarehouseStats>;
}
