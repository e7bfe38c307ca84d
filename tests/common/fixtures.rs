//! Sample library and warehouse fixtures.

use super::constants::*;
use super::fake_api::FakeLibraryApi;
use listening_warehouse::config::CollectionConventions;
use listening_warehouse::streaming_api::{
    Album, AlbumRef, Artist, ArtistRef, Playlist, PlaylistEntry, PlaylistItem, PlaylistOwner,
    PlaylistTrackCount, SavedTrack, TimeRange, Track, UserProfile,
};
use listening_warehouse::sync::{SyncPipeline, SyncReport};
use listening_warehouse::warehouse::SqliteWarehouseStore;
use std::sync::Arc;
use tempfile::TempDir;

pub fn make_track(id: &str, album_id: &str, artist_id: &str) -> Track {
    Track {
        id: Some(id.to_string()),
        name: format!("Song {}", id),
        artists: vec![ArtistRef {
            id: Some(artist_id.to_string()),
            name: format!("Artist {}", artist_id),
        }],
        album: Some(AlbumRef {
            id: Some(album_id.to_string()),
            name: format!("Album {}", album_id),
        }),
        duration_ms: 200_000,
        popularity: Some(50),
        kind: "track".to_string(),
    }
}

pub fn make_album(id: &str, total_tracks: i64) -> Album {
    Album {
        id: id.to_string(),
        name: format!("Album {}", id),
        album_type: Some("album".to_string()),
        release_date: Some("2020-01-31".to_string()),
        total_tracks,
    }
}

pub fn make_artist(id: &str, popularity: i64) -> Artist {
    Artist {
        id: id.to_string(),
        name: format!("Artist {}", id),
        kind: "artist".to_string(),
        popularity: Some(popularity),
    }
}

pub fn make_playlist(
    id: &str,
    name: &str,
    public: Option<bool>,
    owner_id: &str,
    total: i64,
) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        kind: "playlist".to_string(),
        public,
        owner: PlaylistOwner {
            id: owner_id.to_string(),
            display_name: Some(format!("Display {}", owner_id)),
        },
        tracks: PlaylistTrackCount { total },
    }
}

pub fn make_item(track_id: Option<&str>, added_at: &str) -> PlaylistItem {
    PlaylistItem {
        added_at: Some(added_at.to_string()),
        track: track_id.map(|id| PlaylistEntry {
            id: Some(id.to_string()),
        }),
    }
}

/// Sample library, served two items per page.
///
/// With default conventions it yields the `EXPECTED_*` row counts.
pub fn sample_library() -> FakeLibraryApi {
    let mut api = FakeLibraryApi::new(UserProfile {
        id: USER_ID.to_string(),
        display_name: Some(USER_NAME.to_string()),
    });
    api.page_size = 2;

    let catalog = [
        make_track(TRACK_1_ID, ALBUM_1_ID, ARTIST_1_ID),
        make_track(TRACK_2_ID, ALBUM_1_ID, ARTIST_1_ID),
        make_track(TRACK_3_ID, ALBUM_1_ID, ARTIST_2_ID),
        make_track(TRACK_4_ID, ALBUM_2_ID, ARTIST_2_ID),
        make_track(TRACK_5_ID, ALBUM_2_ID, ARTIST_2_ID),
        make_track(TRACK_6_ID, ALBUM_2_ID, ARTIST_1_ID),
    ];
    let by_id = |id: &str| {
        catalog
            .iter()
            .find(|t| t.id.as_deref() == Some(id))
            .cloned()
            .unwrap()
    };

    api.saved_tracks = vec![
        SavedTrack {
            added_at: Some("2024-03-01T10:00:00Z".to_string()),
            track: Some(by_id(TRACK_1_ID)),
        },
        SavedTrack {
            added_at: Some("2024-02-01T10:00:00Z".to_string()),
            track: Some(by_id(TRACK_6_ID)),
        },
    ];

    api.top_tracks.insert(
        TimeRange::ShortTerm,
        vec![by_id(TRACK_2_ID), by_id(TRACK_1_ID)],
    );
    api.top_tracks.insert(
        TimeRange::MediumTerm,
        vec![by_id(TRACK_1_ID), by_id(TRACK_3_ID), by_id(TRACK_4_ID)],
    );
    api.top_tracks.insert(
        TimeRange::LongTerm,
        vec![
            by_id(TRACK_1_ID),
            by_id(TRACK_2_ID),
            by_id(TRACK_3_ID),
            by_id(TRACK_4_ID),
            by_id(TRACK_5_ID),
        ],
    );

    api.playlists = vec![
        make_playlist(PLAYLIST_ROAD_TRIP_ID, "Road Trip", Some(false), USER_ID, 4),
        make_playlist(PLAYLIST_SHARED_ID, "Shared Mix", Some(true), OTHER_USER_ID, 2),
        make_playlist(PLAYLIST_SLEEP_ID, PLAYLIST_SLEEP_NAME, Some(false), USER_ID, 1),
        make_playlist(PLAYLIST_COLLAB_ID, "Collab", None, OTHER_USER_ID, 2),
    ];
    api.playlist_items.insert(
        PLAYLIST_ROAD_TRIP_ID.to_string(),
        vec![
            make_item(Some(TRACK_1_ID), "2023-06-01T00:00:00Z"),
            make_item(None, "2023-06-02T00:00:00Z"),
            make_item(Some(TRACK_2_ID), "2023-06-03T00:00:00Z"),
            make_item(Some(TRACK_3_ID), "2023-06-04T00:00:00Z"),
        ],
    );
    api.playlist_items.insert(
        PLAYLIST_SHARED_ID.to_string(),
        vec![
            make_item(Some(TRACK_4_ID), "2023-07-01T00:00:00Z"),
            make_item(Some(TRACK_1_ID), "2023-05-15T00:00:00Z"),
        ],
    );
    api.playlist_items.insert(
        PLAYLIST_SLEEP_ID.to_string(),
        vec![make_item(Some(TRACK_5_ID), "2023-08-01T00:00:00Z")],
    );
    api.playlist_items.insert(
        PLAYLIST_COLLAB_ID.to_string(),
        vec![
            make_item(Some(TRACK_5_ID), "2023-09-01T00:00:00Z"),
            make_item(Some(TRACK_4_ID), "2023-09-02T00:00:00Z"),
        ],
    );

    api.track_catalog = catalog
        .iter()
        .map(|t| (t.id.clone().unwrap(), t.clone()))
        .collect();
    api.album_catalog = [make_album(ALBUM_1_ID, 10), make_album(ALBUM_2_ID, 4)]
        .into_iter()
        .map(|a| (a.id.clone(), a))
        .collect();
    api.artist_catalog = [make_artist(ARTIST_1_ID, 70), make_artist(ARTIST_2_ID, 30)]
        .into_iter()
        .map(|a| (a.id.clone(), a))
        .collect();

    api
}

/// Creates an empty warehouse database in a temporary directory.
pub fn create_test_store() -> (Arc<SqliteWarehouseStore>, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(SqliteWarehouseStore::new(dir.path().join("sp_data.db")).unwrap());
    (store, dir)
}

pub fn run_sync(
    api: FakeLibraryApi,
    store: &Arc<SqliteWarehouseStore>,
    conventions: CollectionConventions,
) -> anyhow::Result<SyncReport> {
    SyncPipeline::new(api, store.clone(), conventions, 1).run()
}
