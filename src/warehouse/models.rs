//! Row types for the warehouse tables.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Timestamp layout used in `LOGGING_TABLE`. It sorts lexicographically and
/// compares correctly against SQLite's `datetime()` output.
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn format_log_time(dt: &DateTime<Utc>) -> String {
    dt.format(LOG_TIME_FORMAT).to_string()
}

pub fn parse_log_time(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, LOG_TIME_FORMAT).map(|naive| naive.and_utc())
}

/// One membership of a track in a collection (`FACT_TRACKS`).
#[derive(Debug, Clone, PartialEq)]
pub struct TrackFact {
    pub track_id: String,
    pub collection_id: String,
    /// 1-based position inside the collection when it was observed.
    pub position: i64,
    /// Only saved tracks and playlist items carry an added date.
    pub added_date: Option<String>,
}

/// A liked-tracks pseudo collection, a top-tracks window or a playlist
/// (`DIM_COLLECTIONS`).
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionDim {
    pub id: String,
    pub name: String,
    pub owner: Option<String>,
    pub kind: String,
    pub track_count: i64,
    pub public: bool,
    pub owned: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackDim {
    pub track_id: String,
    pub name: String,
    pub primary_artist_id: Option<String>,
    pub album_id: Option<String>,
    pub duration_ms: i64,
    pub popularity: Option<i64>,
    pub kind: String,
    pub most_recent_added_date: Option<String>,
    pub playlist_count: Option<i64>,
    pub track_rank: Option<f64>,
    /// Stored as 1 when set and NULL otherwise, never 0.
    pub is_liked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlbumDim {
    pub album_id: String,
    pub name: String,
    pub album_type: Option<String>,
    pub release_date: Option<String>,
    pub total_tracks: i64,
    pub tracks_added: i64,
    pub added_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtistDim {
    pub artist_id: String,
    pub name: String,
    pub kind: String,
    pub popularity: Option<i64>,
    pub tracks_added: i64,
}

/// One phase attempt as recorded in `LOGGING_TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub script_name: String,
    pub success: bool,
    pub record_count: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub error_message: Option<String>,
}

/// Row counts of every warehouse table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarehouseStats {
    pub facts: usize,
    pub collections: usize,
    pub tracks: usize,
    pub albums: usize,
    pub artists: usize,
    pub log_entries: usize,
}
