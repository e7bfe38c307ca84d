use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_dir: Option<String>,
    pub db_path: Option<String>,
    pub access_token: Option<String>,
    pub api_base_url: Option<String>,
    pub request_timeout_sec: Option<u64>,
    pub min_request_interval_ms: Option<u64>,
    pub log_retention_months: Option<u32>,

    pub collections: Option<CollectionsConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CollectionsConfig {
    pub liked_collection_id: Option<String>,
    pub top_collection_prefix: Option<String>,
    /// Playlists with these names never count towards a track's playlist count.
    pub excluded_collection_names: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
