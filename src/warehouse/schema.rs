//! Table definitions of the listening warehouse.
//!
//! Column names follow the layout downstream reports already query, which is
//! why they are upper case (except for the run log).

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table};

pub const FACT_TRACKS_TABLE: Table = Table {
    name: "FACT_TRACKS",
    columns: &[
        sqlite_column!("TRACK_ID", &SqlType::Text, non_null = true),
        sqlite_column!("COLLECTION_ID", &SqlType::Text, non_null = true),
        sqlite_column!("COLLECTION_POSITION", &SqlType::Integer, non_null = true),
        sqlite_column!("COLLECTION_ADDED_DATE", &SqlType::Text),
    ],
    indices: &[
        ("idx_fact_tracks_track_id", "TRACK_ID"),
        ("idx_fact_tracks_collection_id", "COLLECTION_ID"),
    ],
};

pub const DIM_COLLECTIONS_TABLE: Table = Table {
    name: "DIM_COLLECTIONS",
    columns: &[
        sqlite_column!("ID", &SqlType::Text, is_primary_key = true),
        sqlite_column!("NAME", &SqlType::Text),
        sqlite_column!("OWNER", &SqlType::Text),
        sqlite_column!("TYPE", &SqlType::Text),
        sqlite_column!("TRACK_COUNT", &SqlType::Integer),
        sqlite_column!("PUBLIC", &SqlType::Integer),
        sqlite_column!("OWNED", &SqlType::Integer),
    ],
    indices: &[],
};

pub const DIM_TRACKS_TABLE: Table = Table {
    name: "DIM_TRACKS",
    columns: &[
        sqlite_column!("TRACK_ID", &SqlType::Text, is_primary_key = true),
        sqlite_column!("TRACK_NAME", &SqlType::Text),
        sqlite_column!("PRIMARY_ARTIST_ID", &SqlType::Text),
        sqlite_column!("ALBUM_ID", &SqlType::Text),
        sqlite_column!("DURATION_MS", &SqlType::Integer),
        sqlite_column!("POPULARITY", &SqlType::Integer),
        sqlite_column!("TYPE", &SqlType::Text),
        sqlite_column!("MOST_RECENT_ADDED_DATE", &SqlType::Text),
        sqlite_column!("PLAYLIST_COUNT", &SqlType::Integer),
        sqlite_column!("TRACK_RANK", &SqlType::Real),
        sqlite_column!("IS_LIKED", &SqlType::Integer),
    ],
    indices: &[
        ("idx_dim_tracks_album_id", "ALBUM_ID"),
        ("idx_dim_tracks_artist_id", "PRIMARY_ARTIST_ID"),
    ],
};

pub const DIM_ALBUMS_TABLE: Table = Table {
    name: "DIM_ALBUMS",
    columns: &[
        sqlite_column!("ALBUM_ID", &SqlType::Text, is_primary_key = true),
        sqlite_column!("ALBUM_NAME", &SqlType::Text),
        sqlite_column!("ALBUM_TYPE", &SqlType::Text),
        sqlite_column!("ALBUM_RELEASE", &SqlType::Text),
        sqlite_column!("TOTAL_TRACKS", &SqlType::Integer),
        sqlite_column!("TRACKS_ADDED", &SqlType::Integer),
        sqlite_column!("ADDED_PERCENT", &SqlType::Real),
    ],
    indices: &[],
};

pub const DIM_ARTISTS_TABLE: Table = Table {
    name: "DIM_ARTISTS",
    columns: &[
        sqlite_column!("ARTIST_ID", &SqlType::Text, is_primary_key = true),
        sqlite_column!("ARTIST_NAME", &SqlType::Text),
        sqlite_column!("ARTIST_TYPE", &SqlType::Text),
        sqlite_column!("ARTIST_POPULARITY", &SqlType::Integer),
        sqlite_column!("TRACKS_ADDED", &SqlType::Integer),
    ],
    indices: &[],
};

/// Run log. Survives across runs, unlike every other table here.
pub const LOGGING_TABLE: Table = Table {
    name: "LOGGING_TABLE",
    columns: &[
        sqlite_column!("script_name", &SqlType::Text),
        sqlite_column!("script_success", &SqlType::Integer),
        sqlite_column!("record_count", &SqlType::Integer),
        sqlite_column!("script_start_time", &SqlType::Text),
        sqlite_column!("script_end_time", &SqlType::Text),
        sqlite_column!("script_error_message", &SqlType::Text),
    ],
    indices: &[],
};

/// Tables that are rebuilt from scratch during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarehouseTable {
    Facts,
    Collections,
    Tracks,
    Albums,
    Artists,
}

impl WarehouseTable {
    pub fn table(&self) -> &'static Table {
        match self {
            WarehouseTable::Facts => &FACT_TRACKS_TABLE,
            WarehouseTable::Collections => &DIM_COLLECTIONS_TABLE,
            WarehouseTable::Tracks => &DIM_TRACKS_TABLE,
            WarehouseTable::Albums => &DIM_ALBUMS_TABLE,
            WarehouseTable::Artists => &DIM_ARTISTS_TABLE,
        }
    }

    pub fn name(&self) -> &'static str {
        self.table().name
    }
}
