//! Per-track metrics derived from loaded facts.

use crate::config::CollectionConventions;
use crate::warehouse::{CollectionDim, TrackFact};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Locally derived attributes of one distinct track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackAggregate {
    pub track_id: String,
    /// Earliest known added date.
    pub most_recent_added_date: Option<String>,
    /// Distinct private playlists holding the track, `None` when there are none.
    pub playlist_count: Option<i64>,
    /// Weighted top-tracks position score, `None` outside every top list.
    pub track_rank: Option<f64>,
    pub is_liked: bool,
}

#[derive(Default)]
struct Accumulator<'a> {
    earliest_added: Option<&'a str>,
    playlists: HashSet<&'a str>,
    rank: Option<f64>,
    liked: bool,
}

/// Compute one [`TrackAggregate`] per distinct track id in `facts`, ordered
/// by track id.
///
/// A membership adds to `playlist_count` only when its collection is known,
/// private, not synthesized (liked or top tracks) and not excluded by name.
/// Each top-tracks membership adds `(1 - position / size) * weight`, where
/// `size` is the highest slot position in that top collection.
pub fn compute_track_aggregates(
    facts: &[TrackFact],
    collections: &[CollectionDim],
    conventions: &CollectionConventions,
) -> Vec<TrackAggregate> {
    let collections_by_id: HashMap<&str, &CollectionDim> =
        collections.iter().map(|c| (c.id.as_str(), c)).collect();

    // Positions are slot indices, so the highest one is the list size even
    // when empty slots were skipped.
    let mut collection_sizes: HashMap<&str, i64> = HashMap::new();
    for fact in facts {
        let size = collection_sizes.entry(fact.collection_id.as_str()).or_default();
        *size = (*size).max(fact.position);
    }

    let counts_as_playlist = |collection_id: &str| -> bool {
        if conventions.is_liked_collection(collection_id)
            || conventions.is_top_collection(collection_id)
        {
            return false;
        }
        collections_by_id.get(collection_id).is_some_and(|c| {
            !c.public && !conventions.is_excluded_name(&c.name)
        })
    };

    let mut per_track: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for fact in facts {
        let acc = per_track.entry(fact.track_id.as_str()).or_default();
        let collection_id = fact.collection_id.as_str();

        match (acc.earliest_added, fact.added_date.as_deref()) {
            (Some(current), Some(added)) if added < current => acc.earliest_added = Some(added),
            (None, Some(added)) => acc.earliest_added = Some(added),
            _ => {}
        }

        if conventions.is_liked_collection(collection_id) {
            acc.liked = true;
        } else if let Some(range) = conventions.top_range_of(collection_id) {
            let size = collection_sizes[collection_id] as f64;
            let score = (1.0 - fact.position as f64 / size) * range.weight();
            acc.rank = Some(acc.rank.unwrap_or(0.0) + score);
        } else if counts_as_playlist(collection_id) {
            acc.playlists.insert(collection_id);
        }
    }

    per_track
        .into_iter()
        .map(|(track_id, acc)| TrackAggregate {
            track_id: track_id.to_string(),
            most_recent_added_date: acc.earliest_added.map(str::to_string),
            playlist_count: (!acc.playlists.is_empty()).then_some(acc.playlists.len() as i64),
            track_rank: acc.rank,
            is_liked: acc.liked,
        })
        .collect()
}
