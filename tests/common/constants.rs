//! Shared constants for end-to-end tests
//!
//! When the sample library changes, update only this file and fixtures.rs.

// ============================================================================
// Listener
// ============================================================================

pub const USER_ID: &str = "listener-1";
pub const USER_NAME: &str = "Test Listener";
pub const OTHER_USER_ID: &str = "friend-1";

// ============================================================================
// Catalog IDs
// ============================================================================

pub const ALBUM_1_ID: &str = "album-1";
pub const ALBUM_2_ID: &str = "album-2";

pub const ARTIST_1_ID: &str = "artist-1";
pub const ARTIST_2_ID: &str = "artist-2";

/// album-1 / artist-1, liked, in every top list and in two playlists.
pub const TRACK_1_ID: &str = "track-1";
/// album-1 / artist-1
pub const TRACK_2_ID: &str = "track-2";
/// album-1 / artist-2
pub const TRACK_3_ID: &str = "track-3";
/// album-2 / artist-2
pub const TRACK_4_ID: &str = "track-4";
/// album-2 / artist-2, the only track of the "Sleep" playlist.
pub const TRACK_5_ID: &str = "track-5";
/// album-2 / artist-1, liked only. Never in a private playlist.
pub const TRACK_6_ID: &str = "track-6";

// ============================================================================
// Playlists
// ============================================================================

/// Private, owned. Its second slot holds a removed track.
pub const PLAYLIST_ROAD_TRIP_ID: &str = "playlist-road-trip";
/// Public, owned by someone else.
pub const PLAYLIST_SHARED_ID: &str = "playlist-shared";
/// Private, owned.
pub const PLAYLIST_SLEEP_ID: &str = "playlist-sleep";
pub const PLAYLIST_SLEEP_NAME: &str = "Sleep";
/// Collaborative (public is null), owned by someone else.
pub const PLAYLIST_COLLAB_ID: &str = "playlist-collab";

// ============================================================================
// Sizes of the sample library
// ============================================================================

pub const EXPECTED_FACTS: usize = 20;
pub const EXPECTED_COLLECTIONS: usize = 8;
pub const EXPECTED_TRACKS: usize = 6;
pub const EXPECTED_ALBUMS: usize = 2;
pub const EXPECTED_ARTISTS: usize = 2;

/// Phases of one run, in execution order.
pub const PHASE_NAMES: [&str; 13] = [
    "FACT_TRACKS (Top Tracks - short_term)",
    "DIM_COLLECTION (Top Tracks - short_term)",
    "FACT_TRACKS (Top Tracks - medium_term)",
    "DIM_COLLECTION (Top Tracks - medium_term)",
    "FACT_TRACKS (Top Tracks - long_term)",
    "DIM_COLLECTION (Top Tracks - long_term)",
    "FACT_TRACKS (Liked Tracks)",
    "DIM_COLLECTION (Liked Tracks)",
    "DIM_COLLECTIONS (Playlists)",
    "FACT_TRACKS (Playlists)",
    "DIM_TRACKS",
    "DIM_ALBUMS",
    "DIM_ARTISTS",
];
