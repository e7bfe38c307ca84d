//! SQLite-backed warehouse store implementation.

use super::models::{
    format_log_time, parse_log_time, AlbumDim, ArtistDim, CollectionDim, LogEntry, TrackDim,
    TrackFact, WarehouseStats,
};
use super::schema::{WarehouseTable, LOGGING_TABLE};
use super::trait_def::WarehouseStore;
use crate::sqlite_persistence::Table;
use anyhow::{Context, Result};
use rusqlite::{params, types::Type, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// SQLite-backed warehouse store holding a single writer connection.
#[derive(Clone)]
pub struct SqliteWarehouseStore {
    conn: Arc<Mutex<Connection>>,
}

fn read_log_time(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    let raw: String = row.get(idx)?;
    parse_log_time(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn count_rows(conn: &Connection, table: &Table) -> Result<usize> {
    if !table.exists(conn)? {
        return Ok(0);
    }
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table.name), [], |r| {
        r.get(0)
    })?;
    Ok(count as usize)
}

impl SqliteWarehouseStore {
    /// Open (or create) the warehouse database file.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open warehouse database at {:?}", path))?;

        let stats = Self::count_all(&conn)?;
        info!(
            "Warehouse store opened at {:?}: {} facts, {} collections, {} tracks, {} albums, {} artists",
            path, stats.facts, stats.collections, stats.tracks, stats.albums, stats.artists
        );

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn count_all(conn: &Connection) -> Result<WarehouseStats> {
        Ok(WarehouseStats {
            facts: count_rows(conn, WarehouseTable::Facts.table())?,
            collections: count_rows(conn, WarehouseTable::Collections.table())?,
            tracks: count_rows(conn, WarehouseTable::Tracks.table())?,
            albums: count_rows(conn, WarehouseTable::Albums.table())?,
            artists: count_rows(conn, WarehouseTable::Artists.table())?,
            log_entries: count_rows(conn, &LOGGING_TABLE)?,
        })
    }

    fn grouped_track_counts(&self, column: &str) -> Result<Vec<(String, i64)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {col}, COUNT(TRACK_ID) FROM DIM_TRACKS \
             WHERE PLAYLIST_COUNT IS NOT NULL AND {col} IS NOT NULL \
             GROUP BY {col} ORDER BY {col}",
            col = column
        ))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl WarehouseStore for SqliteWarehouseStore {
    fn prepare_run_log(&self, retention_months: u32) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        LOGGING_TABLE
            .ensure(&conn)
            .context("LOGGING_TABLE does not match the expected layout")?;
        let purged = conn.execute(
            "DELETE FROM LOGGING_TABLE \
             WHERE script_end_time < datetime('now', ?1) AND script_success = 1",
            params![format!("-{} months", retention_months)],
        )?;
        if purged > 0 {
            info!("Purged {} successful run log entries", purged);
        }
        Ok(purged)
    }

    fn append_log_entry(&self, entry: &LogEntry) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO LOGGING_TABLE (script_name, script_success, record_count, \
             script_start_time, script_end_time, script_error_message) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.script_name,
                entry.success,
                entry.record_count,
                format_log_time(&entry.start_time),
                format_log_time(&entry.end_time),
                entry.error_message,
            ],
        )?;
        Ok(())
    }

    fn get_log_entries(&self) -> Result<Vec<LogEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT script_name, script_success, record_count, script_start_time, \
             script_end_time, script_error_message FROM LOGGING_TABLE ORDER BY rowid",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(LogEntry {
                    script_name: row.get(0)?,
                    success: row.get(1)?,
                    record_count: row.get(2)?,
                    start_time: read_log_time(row, 3)?,
                    end_time: read_log_time(row, 4)?,
                    error_message: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn recreate_table(&self, table: WarehouseTable) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        table
            .table()
            .recreate(&conn)
            .with_context(|| format!("Failed to recreate {}", table.name()))?;
        debug!("Recreated {}", table.name());
        Ok(())
    }

    fn insert_track_facts(&self, facts: &[TrackFact]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO FACT_TRACKS (TRACK_ID, COLLECTION_ID, COLLECTION_POSITION, \
                 COLLECTION_ADDED_DATE) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for fact in facts {
                stmt.execute(params![
                    fact.track_id,
                    fact.collection_id,
                    fact.position,
                    fact.added_date,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn upsert_collections(&self, collections: &[CollectionDim]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO DIM_COLLECTIONS (ID, NAME, OWNER, TYPE, TRACK_COUNT, \
                 PUBLIC, OWNED) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for c in collections {
                stmt.execute(params![
                    c.id,
                    c.name,
                    c.owner,
                    c.kind,
                    c.track_count,
                    c.public,
                    c.owned,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_track_facts(&self) -> Result<Vec<TrackFact>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT TRACK_ID, COLLECTION_ID, COLLECTION_POSITION, COLLECTION_ADDED_DATE \
             FROM FACT_TRACKS ORDER BY rowid",
        )?;
        let facts = stmt
            .query_map([], |row| {
                Ok(TrackFact {
                    track_id: row.get(0)?,
                    collection_id: row.get(1)?,
                    position: row.get(2)?,
                    added_date: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(facts)
    }

    fn get_collections(&self) -> Result<Vec<CollectionDim>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT ID, NAME, OWNER, TYPE, TRACK_COUNT, PUBLIC, OWNED \
             FROM DIM_COLLECTIONS ORDER BY rowid",
        )?;
        let collections = stmt
            .query_map([], |row| {
                Ok(CollectionDim {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    owner: row.get(2)?,
                    kind: row.get(3)?,
                    track_count: row.get(4)?,
                    public: row.get(5)?,
                    owned: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(collections)
    }

    fn upsert_tracks(&self, tracks: &[TrackDim]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO DIM_TRACKS (TRACK_ID, TRACK_NAME, PRIMARY_ARTIST_ID, \
                 ALBUM_ID, DURATION_MS, POPULARITY, TYPE, MOST_RECENT_ADDED_DATE, \
                 PLAYLIST_COUNT, TRACK_RANK, IS_LIKED) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for t in tracks {
                stmt.execute(params![
                    t.track_id,
                    t.name,
                    t.primary_artist_id,
                    t.album_id,
                    t.duration_ms,
                    t.popularity,
                    t.kind,
                    t.most_recent_added_date,
                    t.playlist_count,
                    t.track_rank,
                    t.is_liked.then_some(1i64),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_tracks(&self) -> Result<Vec<TrackDim>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT TRACK_ID, TRACK_NAME, PRIMARY_ARTIST_ID, ALBUM_ID, DURATION_MS, POPULARITY, \
             TYPE, MOST_RECENT_ADDED_DATE, PLAYLIST_COUNT, TRACK_RANK, IS_LIKED \
             FROM DIM_TRACKS ORDER BY TRACK_ID",
        )?;
        let tracks = stmt
            .query_map([], |row| {
                Ok(TrackDim {
                    track_id: row.get(0)?,
                    name: row.get(1)?,
                    primary_artist_id: row.get(2)?,
                    album_id: row.get(3)?,
                    duration_ms: row.get(4)?,
                    popularity: row.get(5)?,
                    kind: row.get(6)?,
                    most_recent_added_date: row.get(7)?,
                    playlist_count: row.get(8)?,
                    track_rank: row.get(9)?,
                    is_liked: row.get::<_, Option<i64>>(10)? == Some(1),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tracks)
    }

    fn get_album_track_counts(&self) -> Result<Vec<(String, i64)>> {
        self.grouped_track_counts("ALBUM_ID")
    }

    fn get_artist_track_counts(&self) -> Result<Vec<(String, i64)>> {
        self.grouped_track_counts("PRIMARY_ARTIST_ID")
    }

    fn upsert_albums(&self, albums: &[AlbumDim]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO DIM_ALBUMS (ALBUM_ID, ALBUM_NAME, ALBUM_TYPE, \
                 ALBUM_RELEASE, TOTAL_TRACKS, TRACKS_ADDED, ADDED_PERCENT) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for a in albums {
                stmt.execute(params![
                    a.album_id,
                    a.name,
                    a.album_type,
                    a.release_date,
                    a.total_tracks,
                    a.tracks_added,
                    a.added_percent,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_albums(&self) -> Result<Vec<AlbumDim>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT ALBUM_ID, ALBUM_NAME, ALBUM_TYPE, ALBUM_RELEASE, TOTAL_TRACKS, \
             TRACKS_ADDED, ADDED_PERCENT FROM DIM_ALBUMS ORDER BY ALBUM_ID",
        )?;
        let albums = stmt
            .query_map([], |row| {
                Ok(AlbumDim {
                    album_id: row.get(0)?,
                    name: row.get(1)?,
                    album_type: row.get(2)?,
                    release_date: row.get(3)?,
                    total_tracks: row.get(4)?,
                    tracks_added: row.get(5)?,
                    added_percent: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(albums)
    }

    fn upsert_artists(&self, artists: &[ArtistDim]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO DIM_ARTISTS (ARTIST_ID, ARTIST_NAME, ARTIST_TYPE, \
                 ARTIST_POPULARITY, TRACKS_ADDED) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for a in artists {
                stmt.execute(params![
                    a.artist_id,
                    a.name,
                    a.kind,
                    a.popularity,
                    a.tracks_added,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_artists(&self) -> Result<Vec<ArtistDim>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT ARTIST_ID, ARTIST_NAME, ARTIST_TYPE, ARTIST_POPULARITY, TRACKS_ADDED \
             FROM DIM_ARTISTS ORDER BY ARTIST_ID",
        )?;
        let artists = stmt
            .query_map([], |row| {
                Ok(ArtistDim {
                    artist_id: row.get(0)?,
                    name: row.get(1)?,
                    kind: row.get(2)?,
                    popularity: row.get(3)?,
                    tracks_added: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(artists)
    }

    fn get_stats(&self) -> Result<WarehouseStats> {
        let conn = self.conn.lock().unwrap();
        Self::count_all(&conn)
    }
}
