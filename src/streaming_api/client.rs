//! Blocking HTTP client for the streaming Web API.
//!
//! Authenticates with a pre-issued bearer token and spaces requests by a
//! configurable minimum interval.

use super::models::*;
use super::{ApiError, LibraryApi, TimeRange};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

const SAVED_TRACKS_PAGE_SIZE: usize = 50;
const TOP_TRACKS_PAGE_SIZE: usize = 50;
const PLAYLISTS_PAGE_SIZE: usize = 50;
const PLAYLIST_ITEMS_PAGE_SIZE: usize = 100;

/// Settings for [`SpotifyClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub access_token: String,
    pub timeout: Duration,
    pub min_request_interval: Duration,
}

pub struct SpotifyClient {
    client: Client,
    base_url: String,
    access_token: String,
    min_request_interval: Duration,
    last_request: Mutex<Instant>,
}

impl SpotifyClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("listening-warehouse/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(|source| ApiError::Http {
                url: settings.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            access_token: settings.access_token,
            min_request_interval: settings.min_request_interval,
            last_request: Mutex::new(
                Instant::now()
                    .checked_sub(settings.min_request_interval)
                    .unwrap_or_else(Instant::now),
            ),
        })
    }

    fn rate_limit(&self) {
        let mut last = self.last_request.lock().unwrap();
        let elapsed = last.elapsed();
        if elapsed < self.min_request_interval {
            std::thread::sleep(self.min_request_interval - elapsed);
        }
        *last = Instant::now();
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        self.rate_limit();
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|source| ApiError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().map_err(|source| ApiError::Http {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// First page URL for `path`, or the cursor itself when continuing.
    fn page_url(&self, path: &str, cursor: Option<&str>) -> String {
        match cursor {
            Some(next) => next.to_string(),
            None => format!("{}{}", self.base_url, path),
        }
    }

    fn ids_url(&self, path: &str, ids: &[String]) -> String {
        let joined = ids
            .iter()
            .map(|id| urlencoding::encode(id).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}{}?ids={}", self.base_url, path, joined)
    }
}

/// Best-effort extraction of the API's `{"error": {"message": ...}}` body.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        })
}

impl LibraryApi for SpotifyClient {
    fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.get_json(&format!("{}/me", self.base_url))
    }

    fn saved_tracks(&self, cursor: Option<&str>) -> Result<Page<SavedTrack>, ApiError> {
        let path = format!("/me/tracks?limit={}", SAVED_TRACKS_PAGE_SIZE);
        self.get_json(&self.page_url(&path, cursor))
    }

    fn top_tracks(&self, range: TimeRange, cursor: Option<&str>) -> Result<Page<Track>, ApiError> {
        let path = format!(
            "/me/top/tracks?limit={}&time_range={}",
            TOP_TRACKS_PAGE_SIZE,
            range.as_str()
        );
        self.get_json(&self.page_url(&path, cursor))
    }

    fn playlists(&self, cursor: Option<&str>) -> Result<Page<Playlist>, ApiError> {
        let path = format!("/me/playlists?limit={}", PLAYLISTS_PAGE_SIZE);
        self.get_json(&self.page_url(&path, cursor))
    }

    fn playlist_items(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<PlaylistItem>, ApiError> {
        let path = format!(
            "/playlists/{}/tracks?limit={}",
            urlencoding::encode(playlist_id),
            PLAYLIST_ITEMS_PAGE_SIZE
        );
        self.get_json(&self.page_url(&path, cursor))
    }

    fn tracks(&self, ids: &[String]) -> Result<Vec<Option<Track>>, ApiError> {
        let response: TracksResponse = self.get_json(&self.ids_url("/tracks", ids))?;
        Ok(response.tracks)
    }

    fn albums(&self, ids: &[String]) -> Result<Vec<Option<Album>>, ApiError> {
        let response: AlbumsResponse = self.get_json(&self.ids_url("/albums", ids))?;
        Ok(response.albums)
    }

    fn artists(&self, ids: &[String]) -> Result<Vec<Option<Artist>>, ApiError> {
        let response: ArtistsResponse = self.get_json(&self.ids_url("/artists", ids))?;
        Ok(response.artists)
    }
}
