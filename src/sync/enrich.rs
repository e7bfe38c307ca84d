//! Track, album and artist enrichment.
//!
//! Each enricher rebuilds its dimension table: it reads the ids to describe
//! from rows already in the warehouse, looks them up in request-sized
//! batches, pairs every id with the returned object by id and writes one
//! transaction per batch.

use super::aggregate::{compute_track_aggregates, TrackAggregate};
use super::{SyncContext, SyncError};
use crate::run_log::PhaseOutcome;
use crate::streaming_api::batching::{
    chunked, ALBUM_BATCH_SIZE, ARTIST_BATCH_SIZE, TRACK_BATCH_SIZE,
};
use crate::streaming_api::{Album, ApiError, Artist, Track};
use crate::warehouse::{AlbumDim, ArtistDim, TrackDim, WarehouseTable};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const TRACKS_PHASE: &str = "DIM_TRACKS";
pub const ALBUMS_PHASE: &str = "DIM_ALBUMS";
pub const ARTISTS_PHASE: &str = "DIM_ARTISTS";

/// Look `ids` up in batches of `batch_size` and hand `on_batch` the
/// `(id, object)` pairs of each batch, in request order.
///
/// Results are matched to ids by the id they carry, not by position. Ids
/// without a result are logged and left out.
pub fn fetch_by_id<T, F, K, B>(
    entity: &str,
    ids: &[String],
    batch_size: usize,
    mut fetch: F,
    key_of: K,
    mut on_batch: B,
) -> Result<(), SyncError>
where
    F: FnMut(&[String]) -> Result<Vec<Option<T>>, ApiError>,
    K: Fn(&T) -> Option<&str>,
    B: FnMut(Vec<(String, T)>) -> Result<(), SyncError>,
{
    for batch in chunked(ids, batch_size) {
        let mut by_id: HashMap<String, T> = HashMap::with_capacity(batch.len());
        for item in fetch(&batch)?.into_iter().flatten() {
            if let Some(key) = key_of(&item).map(str::to_string) {
                by_id.insert(key, item);
            }
        }

        let mut joined = Vec::with_capacity(batch.len());
        for id in batch {
            match by_id.remove(&id) {
                Some(item) => joined.push((id, item)),
                None => warn!("No {} returned for id {}, skipping", entity, id),
            }
        }
        if !by_id.is_empty() {
            debug!(
                "Ignoring {} unrequested {} results: {:?}",
                by_id.len(),
                entity,
                by_id.keys().collect::<Vec<_>>()
            );
        }

        on_batch(joined)?;
    }
    Ok(())
}

pub fn track_dim(aggregate: &TrackAggregate, track: &Track) -> TrackDim {
    TrackDim {
        track_id: aggregate.track_id.clone(),
        name: track.name.clone(),
        primary_artist_id: track.primary_artist_id().map(str::to_string),
        album_id: track.album_id().map(str::to_string),
        duration_ms: track.duration_ms,
        popularity: track.popularity,
        kind: track.kind.clone(),
        most_recent_added_date: aggregate.most_recent_added_date.clone(),
        playlist_count: aggregate.playlist_count,
        track_rank: aggregate.track_rank,
        is_liked: aggregate.is_liked,
    }
}

/// Share of an album's tracks present in the warehouse.
pub fn added_percent(album_id: &str, tracks_added: i64, total_tracks: i64) -> Result<f64, SyncError> {
    if total_tracks == 0 {
        return Err(SyncError::Arithmetic(format!(
            "album {} reports 0 total tracks",
            album_id
        )));
    }
    if total_tracks < 0 {
        return Err(SyncError::Data(format!(
            "album {} reports {} total tracks",
            album_id, total_tracks
        )));
    }
    Ok(tracks_added as f64 / total_tracks as f64)
}

pub fn album_dim(album: &Album, tracks_added: i64) -> Result<AlbumDim, SyncError> {
    Ok(AlbumDim {
        album_id: album.id.clone(),
        name: album.name.clone(),
        album_type: album.album_type.clone(),
        release_date: album.release_date.clone(),
        total_tracks: album.total_tracks,
        tracks_added,
        added_percent: added_percent(&album.id, tracks_added, album.total_tracks)?,
    })
}

pub fn artist_dim(artist: &Artist, tracks_added: i64) -> ArtistDim {
    ArtistDim {
        artist_id: artist.id.clone(),
        name: artist.name.clone(),
        kind: artist.kind.clone(),
        popularity: artist.popularity,
        tracks_added,
    }
}

pub fn enrich_tracks(ctx: &SyncContext) -> PhaseOutcome {
    ctx.logger.run_phase(TRACKS_PHASE, |phase| {
        ctx.store.recreate_table(WarehouseTable::Tracks)?;

        let facts = ctx.store.get_track_facts()?;
        let collections = ctx.store.get_collections()?;
        let aggregates: HashMap<String, TrackAggregate> =
            compute_track_aggregates(&facts, &collections, ctx.conventions)
                .into_iter()
                .map(|a| (a.track_id.clone(), a))
                .collect();
        let mut ids: Vec<String> = aggregates.keys().cloned().collect();
        ids.sort();
        debug!("Enriching {} distinct tracks", ids.len());

        fetch_by_id(
            "track",
            &ids,
            TRACK_BATCH_SIZE,
            |batch| ctx.api.tracks(batch),
            |track: &Track| track.id.as_deref(),
            |pairs| {
                let rows: Vec<TrackDim> = pairs
                    .iter()
                    .filter_map(|(id, track)| aggregates.get(id).map(|a| track_dim(a, track)))
                    .collect();
                ctx.store.upsert_tracks(&rows)?;
                phase.add_records(rows.len());
                Ok(())
            },
        )
    })
}

pub fn enrich_albums(ctx: &SyncContext) -> PhaseOutcome {
    ctx.logger.run_phase(ALBUMS_PHASE, |phase| {
        ctx.store.recreate_table(WarehouseTable::Albums)?;

        let counts: HashMap<String, i64> = ctx.store.get_album_track_counts()?.into_iter().collect();
        let mut ids: Vec<String> = counts.keys().cloned().collect();
        ids.sort();

        fetch_by_id(
            "album",
            &ids,
            ALBUM_BATCH_SIZE,
            |batch| ctx.api.albums(batch),
            |album: &Album| Some(album.id.as_str()),
            |pairs| {
                // Rows before a faulty album are still written.
                let mut rows = Vec::with_capacity(pairs.len());
                let mut fault = None;
                for (id, album) in &pairs {
                    match album_dim(album, counts.get(id).copied().unwrap_or(0)) {
                        Ok(row) => rows.push(row),
                        Err(e) => {
                            fault = Some(e);
                            break;
                        }
                    }
                }
                ctx.store.upsert_albums(&rows)?;
                phase.add_records(rows.len());
                fault.map_or(Ok(()), Err)
            },
        )
    })
}

pub fn enrich_artists(ctx: &SyncContext) -> PhaseOutcome {
    ctx.logger.run_phase(ARTISTS_PHASE, |phase| {
        ctx.store.recreate_table(WarehouseTable::Artists)?;

        let counts: HashMap<String, i64> =
            ctx.store.get_artist_track_counts()?.into_iter().collect();
        let mut ids: Vec<String> = counts.keys().cloned().collect();
        ids.sort();

        fetch_by_id(
            "artist",
            &ids,
            ARTIST_BATCH_SIZE,
            |batch| ctx.api.artists(batch),
            |artist: &Artist| Some(artist.id.as_str()),
            |pairs| {
                let rows: Vec<ArtistDim> = pairs
                    .iter()
                    .map(|(id, artist)| artist_dim(artist, counts.get(id).copied().unwrap_or(0)))
                    .collect();
                ctx.store.upsert_artists(&rows)?;
                phase.add_records(rows.len());
                Ok(())
            },
        )
    })
}
