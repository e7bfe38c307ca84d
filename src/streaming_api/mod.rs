//! Access to the listener's library on the streaming service.

pub mod batching;
mod client;
mod models;
pub mod pagination;

pub use client::{ClientSettings, SpotifyClient, DEFAULT_API_BASE_URL};
pub use models::*;

use thiserror::Error;

/// Failure of a single API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Observation window of the top-tracks listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeRange {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    /// Loading order of the top-tracks phases.
    pub const ALL: [TimeRange; 3] = [
        TimeRange::ShortTerm,
        TimeRange::MediumTerm,
        TimeRange::LongTerm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }

    pub fn parse(s: &str) -> Option<TimeRange> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// Maximum number of top tracks kept for this window.
    pub fn cap(&self) -> usize {
        match self {
            TimeRange::ShortTerm => 250,
            TimeRange::MediumTerm => 500,
            TimeRange::LongTerm => 1000,
        }
    }

    /// Contribution of this window to a track's rank.
    pub fn weight(&self) -> f64 {
        match self {
            TimeRange::ShortTerm => 0.2,
            TimeRange::MediumTerm => 0.4,
            TimeRange::LongTerm => 0.8,
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read access to the listener's library.
///
/// Listing methods take `None` for the first page and the previous page's
/// `next` URL afterwards. Bulk lookups return one slot per requested id, in
/// whatever order the service chooses; unknown ids come back as `None`.
pub trait LibraryApi {
    fn current_user(&self) -> Result<UserProfile, ApiError>;

    fn saved_tracks(&self, cursor: Option<&str>) -> Result<Page<SavedTrack>, ApiError>;

    fn top_tracks(&self, range: TimeRange, cursor: Option<&str>) -> Result<Page<Track>, ApiError>;

    fn playlists(&self, cursor: Option<&str>) -> Result<Page<Playlist>, ApiError>;

    fn playlist_items(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<PlaylistItem>, ApiError>;

    fn tracks(&self, ids: &[String]) -> Result<Vec<Option<Track>>, ApiError>;

    fn albums(&self, ids: &[String]) -> Result<Vec<Option<Album>>, ApiError>;

    fn artists(&self, ids: &[String]) -> Result<Vec<Option<Artist>>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_round_trip() {
        for range in TimeRange::ALL {
            assert_eq!(TimeRange::parse(range.as_str()), Some(range));
        }
        assert_eq!(TimeRange::parse("forever"), None);
    }

    #[test]
    fn test_caps_and_weights() {
        assert_eq!(TimeRange::ShortTerm.cap(), 250);
        assert_eq!(TimeRange::MediumTerm.cap(), 500);
        assert_eq!(TimeRange::LongTerm.cap(), 1000);
        assert!(TimeRange::LongTerm.weight() > TimeRange::MediumTerm.weight());
        assert!(TimeRange::MediumTerm.weight() > TimeRange::ShortTerm.weight());
    }
}
