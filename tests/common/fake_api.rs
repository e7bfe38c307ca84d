//! In-memory implementation of `LibraryApi`.
//!
//! Listings are served in pages of `page_size` items with `fake://` cursors.
//! Individual endpoints can be made to fail and bulk lookups can be
//! reordered to exercise the pipeline's error handling.

use listening_warehouse::streaming_api::{
    Album, ApiError, Artist, LibraryApi, Page, Playlist, PlaylistItem, SavedTrack, TimeRange,
    Track, UserProfile,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub struct FakeLibraryApi {
    pub user: UserProfile,
    pub saved_tracks: Vec<SavedTrack>,
    pub top_tracks: HashMap<TimeRange, Vec<Track>>,
    pub playlists: Vec<Playlist>,
    pub playlist_items: HashMap<String, Vec<PlaylistItem>>,
    pub track_catalog: HashMap<String, Track>,
    pub album_catalog: HashMap<String, Album>,
    pub artist_catalog: HashMap<String, Artist>,

    pub page_size: usize,
    /// Endpoints answering with an error, e.g. `albums` or `playlist_items:<id>`.
    pub failing_endpoints: HashSet<String>,
    /// Return bulk lookups in reverse request order.
    pub reverse_bulk_results: bool,
    /// Every request made, as `endpoint` or `endpoint:<detail>`.
    pub requests: Rc<RefCell<Vec<String>>>,
}

impl FakeLibraryApi {
    pub fn new(user: UserProfile) -> Self {
        Self {
            user,
            saved_tracks: Vec::new(),
            top_tracks: HashMap::new(),
            playlists: Vec::new(),
            playlist_items: HashMap::new(),
            track_catalog: HashMap::new(),
            album_catalog: HashMap::new(),
            artist_catalog: HashMap::new(),
            page_size: 50,
            failing_endpoints: HashSet::new(),
            reverse_bulk_results: false,
            requests: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn fail(mut self, endpoint: &str) -> Self {
        self.failing_endpoints.insert(endpoint.to_string());
        self
    }

    fn request(&self, endpoint: &str) -> Result<(), ApiError> {
        self.requests.borrow_mut().push(endpoint.to_string());
        if self.failing_endpoints.contains(endpoint) {
            return Err(ApiError::Status {
                url: format!("fake://{}", endpoint),
                status: 503,
                message: "Service unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn page<T: Clone>(&self, base: &str, items: &[T], cursor: Option<&str>) -> Page<T> {
        let offset: usize = cursor
            .and_then(|c| c.rsplit("offset=").next())
            .and_then(|o| o.parse().ok())
            .unwrap_or(0)
            .min(items.len());
        let end = (offset + self.page_size.max(1)).min(items.len());
        Page {
            items: items[offset..end].to_vec(),
            next: (end < items.len()).then(|| format!("fake://{}?offset={}", base, end)),
        }
    }

    fn bulk<T: Clone>(&self, catalog: &HashMap<String, T>, ids: &[String]) -> Vec<Option<T>> {
        let mut results: Vec<Option<T>> = ids.iter().map(|id| catalog.get(id).cloned()).collect();
        if self.reverse_bulk_results {
            results.reverse();
        }
        results
    }
}

impl LibraryApi for FakeLibraryApi {
    fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.request("current_user")?;
        Ok(self.user.clone())
    }

    fn saved_tracks(&self, cursor: Option<&str>) -> Result<Page<SavedTrack>, ApiError> {
        self.request("saved_tracks")?;
        Ok(self.page("me/tracks", &self.saved_tracks, cursor))
    }

    fn top_tracks(&self, range: TimeRange, cursor: Option<&str>) -> Result<Page<Track>, ApiError> {
        self.request(&format!("top_tracks:{}", range))?;
        let tracks = self.top_tracks.get(&range).cloned().unwrap_or_default();
        Ok(self.page(&format!("me/top/{}", range), &tracks, cursor))
    }

    fn playlists(&self, cursor: Option<&str>) -> Result<Page<Playlist>, ApiError> {
        self.request("playlists")?;
        Ok(self.page("me/playlists", &self.playlists, cursor))
    }

    fn playlist_items(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<PlaylistItem>, ApiError> {
        self.request(&format!("playlist_items:{}", playlist_id))?;
        let items = self
            .playlist_items
            .get(playlist_id)
            .cloned()
            .unwrap_or_default();
        Ok(self.page(&format!("playlists/{}", playlist_id), &items, cursor))
    }

    fn tracks(&self, ids: &[String]) -> Result<Vec<Option<Track>>, ApiError> {
        self.request("tracks")?;
        Ok(self.bulk(&self.track_catalog, ids))
    }

    fn albums(&self, ids: &[String]) -> Result<Vec<Option<Album>>, ApiError> {
        self.request("albums")?;
        Ok(self.bulk(&self.album_catalog, ids))
    }

    fn artists(&self, ids: &[String]) -> Result<Vec<Option<Artist>>, ApiError> {
        self.request("artists")?;
        Ok(self.bulk(&self.artist_catalog, ids))
    }
}
