//! Response shapes of the streaming Web API.
//!
//! Only the fields the warehouse reads are modelled. Unknown fields are
//! ignored by serde.

use serde::Deserialize;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// Absolute URL of the next page, absent on the last page.
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Full track object, as returned by top tracks, saved tracks and `/tracks`.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    /// Local files have no id.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub duration_ms: i64,
    #[serde(default)]
    pub popularity: Option<i64>,
    #[serde(rename = "type", default = "default_track_kind")]
    pub kind: String,
}

fn default_track_kind() -> String {
    "track".to_string()
}

impl Track {
    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artists.first().and_then(|a| a.id.as_deref())
    }

    pub fn album_id(&self) -> Option<&str> {
        self.album.as_ref().and_then(|a| a.id.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedTrack {
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistTrackCount {
    #[serde(default)]
    pub total: i64,
}

/// Simplified playlist object from `/me/playlists`.
#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "default_playlist_kind")]
    pub kind: String,
    /// `None` for collaborative playlists.
    #[serde(default)]
    pub public: Option<bool>,
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub tracks: PlaylistTrackCount,
}

fn default_playlist_kind() -> String {
    "playlist".to_string()
}

/// The playable inside a playlist slot. Can be a track or an episode.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub added_at: Option<String>,
    /// Null when the track was removed or is unavailable in the market.
    #[serde(default)]
    pub track: Option<PlaylistEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub album_type: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub total_tracks: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "default_artist_kind")]
    pub kind: String,
    #[serde(default)]
    pub popularity: Option<i64>,
}

fn default_artist_kind() -> String {
    "artist".to_string()
}

// Bulk lookup envelopes. Slots are null for unknown ids.

#[derive(Debug, Deserialize)]
pub(crate) struct TracksResponse {
    #[serde(default)]
    pub tracks: Vec<Option<Track>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlbumsResponse {
    #[serde(default)]
    pub albums: Vec<Option<Album>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistsResponse {
    #[serde(default)]
    pub artists: Vec<Option<Artist>>,
}
