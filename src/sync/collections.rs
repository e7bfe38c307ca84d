//! Loaders for liked tracks, top tracks and playlists.
//!
//! Every loader runs a facts phase and a collection phase. Both are logged
//! and fail independently.

use super::SyncContext;
use crate::run_log::PhaseOutcome;
use crate::streaming_api::pagination::{drain_pages, drain_pages_capped};
use crate::streaming_api::{Playlist, PlaylistItem, SavedTrack, TimeRange, Track, UserProfile};
use crate::warehouse::{CollectionDim, TrackFact};
use tracing::debug;

pub const LIKED_COLLECTION_NAME: &str = "Liked Tracks";
pub const PRESET_COLLECTION_KIND: &str = "preset";

pub fn liked_facts_phase() -> String {
    format!("FACT_TRACKS ({})", LIKED_COLLECTION_NAME)
}

pub fn liked_collection_phase() -> String {
    format!("DIM_COLLECTION ({})", LIKED_COLLECTION_NAME)
}

pub fn top_collection_name(range: TimeRange) -> String {
    format!("Top Tracks - {}", range)
}

pub fn top_facts_phase(range: TimeRange) -> String {
    format!("FACT_TRACKS ({})", top_collection_name(range))
}

pub fn top_collection_phase(range: TimeRange) -> String {
    format!("DIM_COLLECTION ({})", top_collection_name(range))
}

pub const PLAYLIST_COLLECTIONS_PHASE: &str = "DIM_COLLECTIONS (Playlists)";
pub const PLAYLIST_FACTS_PHASE: &str = "FACT_TRACKS (Playlists)";

/// Turn an ordered list of optional track ids into facts.
///
/// Positions are 1-based slot indices, so a skipped slot still advances the
/// position of the slots after it.
fn slot_facts<'a, I>(collection_id: &str, slots: I) -> Vec<TrackFact>
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    slots
        .into_iter()
        .enumerate()
        .filter_map(|(index, (track_id, added_date))| {
            let position = index as i64 + 1;
            match track_id {
                Some(track_id) => Some(TrackFact {
                    track_id: track_id.to_string(),
                    collection_id: collection_id.to_string(),
                    position,
                    added_date: added_date.map(str::to_string),
                }),
                None => {
                    debug!(
                        "Skipping empty slot {} in collection {}",
                        position, collection_id
                    );
                    None
                }
            }
        })
        .collect()
}

pub fn liked_facts(collection_id: &str, saved: &[SavedTrack]) -> Vec<TrackFact> {
    slot_facts(
        collection_id,
        saved.iter().map(|s| {
            (
                s.track.as_ref().and_then(|t| t.id.as_deref()),
                s.added_at.as_deref(),
            )
        }),
    )
}

pub fn top_facts(collection_id: &str, tracks: &[Track]) -> Vec<TrackFact> {
    slot_facts(
        collection_id,
        tracks.iter().map(|t| (t.id.as_deref(), None)),
    )
}

pub fn playlist_facts(playlist_id: &str, items: &[PlaylistItem]) -> Vec<TrackFact> {
    slot_facts(
        playlist_id,
        items.iter().map(|item| {
            (
                item.track.as_ref().and_then(|t| t.id.as_deref()),
                item.added_at.as_deref(),
            )
        }),
    )
}

/// Collection row for a collection the warehouse synthesizes itself.
pub fn preset_collection(
    id: &str,
    name: &str,
    user: &UserProfile,
    track_count: usize,
) -> CollectionDim {
    CollectionDim {
        id: id.to_string(),
        name: name.to_string(),
        owner: user.display_name.clone(),
        kind: PRESET_COLLECTION_KIND.to_string(),
        track_count: track_count as i64,
        public: false,
        owned: true,
    }
}

pub fn playlist_collection(playlist: &Playlist, user: &UserProfile) -> CollectionDim {
    CollectionDim {
        id: playlist.id.clone(),
        name: playlist.name.clone(),
        owner: playlist.owner.display_name.clone(),
        kind: playlist.kind.clone(),
        track_count: playlist.tracks.total,
        public: playlist.public == Some(true),
        owned: playlist.owner.id == user.id,
    }
}

pub fn load_liked_tracks(ctx: &SyncContext) -> Vec<PhaseOutcome> {
    let collection_id = ctx.conventions.liked_collection_id.as_str();
    let mut written = 0;

    let facts = ctx.logger.run_phase(&liked_facts_phase(), |phase| {
        let saved = drain_pages(|cursor| ctx.api.saved_tracks(cursor))?;
        let facts = liked_facts(collection_id, &saved);
        ctx.store.insert_track_facts(&facts)?;
        phase.add_records(facts.len());
        written = facts.len();
        Ok(())
    });

    let collection = ctx.logger.run_phase(&liked_collection_phase(), |phase| {
        let row = preset_collection(collection_id, LIKED_COLLECTION_NAME, ctx.user, written);
        ctx.store.upsert_collections(&[row])?;
        phase.add_records(1);
        Ok(())
    });

    vec![facts, collection]
}

pub fn load_top_tracks(ctx: &SyncContext, range: TimeRange) -> Vec<PhaseOutcome> {
    let collection_id = ctx.conventions.top_collection_id(range);
    let mut written = 0;

    let facts = ctx.logger.run_phase(&top_facts_phase(range), |phase| {
        let tracks = drain_pages_capped(range.cap(), |cursor| ctx.api.top_tracks(range, cursor))?;
        let facts = top_facts(&collection_id, &tracks);
        ctx.store.insert_track_facts(&facts)?;
        phase.add_records(facts.len());
        written = facts.len();
        Ok(())
    });

    let collection = ctx.logger.run_phase(&top_collection_phase(range), |phase| {
        let row = preset_collection(&collection_id, &top_collection_name(range), ctx.user, written);
        ctx.store.upsert_collections(&[row])?;
        phase.add_records(1);
        Ok(())
    });

    vec![facts, collection]
}

pub fn load_playlists(ctx: &SyncContext) -> Vec<PhaseOutcome> {
    let mut playlist_ids: Vec<String> = Vec::new();

    let collections = ctx.logger.run_phase(PLAYLIST_COLLECTIONS_PHASE, |phase| {
        let playlists = drain_pages(|cursor| ctx.api.playlists(cursor))?;
        let rows: Vec<CollectionDim> = playlists
            .iter()
            .map(|p| playlist_collection(p, ctx.user))
            .collect();
        ctx.store.upsert_collections(&rows)?;
        phase.add_records(rows.len());
        playlist_ids = playlists.into_iter().map(|p| p.id).collect();
        Ok(())
    });

    let facts = ctx.logger.run_phase(PLAYLIST_FACTS_PHASE, |phase| {
        for playlist_id in &playlist_ids {
            let items = drain_pages(|cursor| ctx.api.playlist_items(playlist_id, cursor))?;
            let facts = playlist_facts(playlist_id, &items);
            debug!(
                "Playlist {}: {} slots, {} facts",
                playlist_id,
                items.len(),
                facts.len()
            );
            ctx.store.insert_track_facts(&facts)?;
            phase.add_records(facts.len());
        }
        Ok(())
    });

    vec![collections, facts]
}
