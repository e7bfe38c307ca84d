mod file_config;

pub use file_config::{CollectionsConfig, FileConfig};

use crate::streaming_api::{TimeRange, DEFAULT_API_BASE_URL};
use anyhow::{bail, Result};
use std::path::PathBuf;

/// File name of the warehouse database inside `db_dir`.
pub const DEFAULT_DB_FILE_NAME: &str = "sp_data.db";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub access_token: Option<String>,
    pub api_base_url: String,
    pub request_timeout_sec: u64,
    pub min_request_interval_ms: u64,
    pub log_retention_months: u32,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_dir: None,
            db_path: None,
            access_token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_sec: 30,
            min_request_interval_ms: 100,
            log_retention_months: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub access_token: String,
    pub api_base_url: String,
    pub request_timeout_sec: u64,
    pub min_request_interval_ms: u64,
    pub log_retention_months: u32,

    pub collections: CollectionConventions,
}

/// Naming conventions for the collections the warehouse synthesizes itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionConventions {
    /// Collection id of the saved ("liked") tracks.
    pub liked_collection_id: String,
    /// Prefix of the top-tracks collection ids, followed by the time range.
    pub top_collection_prefix: String,
    pub excluded_collection_names: Vec<String>,
}

impl Default for CollectionConventions {
    fn default() -> Self {
        Self {
            liked_collection_id: "LIKED_TRACKS".to_string(),
            top_collection_prefix: "TOP_TRACKS_".to_string(),
            excluded_collection_names: Vec::new(),
        }
    }
}

impl CollectionConventions {
    pub fn top_collection_id(&self, range: TimeRange) -> String {
        format!("{}{}", self.top_collection_prefix, range.as_str())
    }

    pub fn is_liked_collection(&self, collection_id: &str) -> bool {
        collection_id == self.liked_collection_id
    }

    pub fn is_top_collection(&self, collection_id: &str) -> bool {
        collection_id.starts_with(&self.top_collection_prefix)
    }

    /// Time range of a top-tracks collection id, `None` for anything else.
    pub fn top_range_of(&self, collection_id: &str) -> Option<TimeRange> {
        collection_id
            .strip_prefix(&self.top_collection_prefix)
            .and_then(TimeRange::parse)
    }

    pub fn is_excluded_name(&self, name: &str) -> bool {
        self.excluded_collection_names.iter().any(|n| n == name)
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file.db_dir.map(PathBuf::from).or_else(|| cli.db_dir.clone());
        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .or_else(|| db_dir.as_ref().map(|dir| dir.join(DEFAULT_DB_FILE_NAME)))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "database location must be specified via --db-path, --db-dir or in config file"
                )
            })?;

        // The file itself may not exist yet, its directory must.
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let access_token = file
            .access_token
            .or_else(|| cli.access_token.clone())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "access_token must be specified via --access-token, \
                     LISTENING_WAREHOUSE_TOKEN or in config file"
                )
            })?;

        let api_base_url = file
            .api_base_url
            .unwrap_or_else(|| cli.api_base_url.clone());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            bail!("api_base_url must be an http(s) URL, got {:?}", api_base_url);
        }

        let request_timeout_sec = file
            .request_timeout_sec
            .unwrap_or(cli.request_timeout_sec);
        if request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than zero");
        }
        let min_request_interval_ms = file
            .min_request_interval_ms
            .unwrap_or(cli.min_request_interval_ms);
        let log_retention_months = file
            .log_retention_months
            .unwrap_or(cli.log_retention_months);

        let collections_file = file.collections.unwrap_or_default();
        let defaults = CollectionConventions::default();
        let collections = CollectionConventions {
            liked_collection_id: collections_file
                .liked_collection_id
                .unwrap_or(defaults.liked_collection_id),
            top_collection_prefix: collections_file
                .top_collection_prefix
                .unwrap_or(defaults.top_collection_prefix),
            excluded_collection_names: collections_file
                .excluded_collection_names
                .unwrap_or(defaults.excluded_collection_names),
        };
        if collections.top_collection_prefix.is_empty() {
            bail!("collections.top_collection_prefix must not be empty");
        }
        if collections.is_top_collection(&collections.liked_collection_id) {
            bail!(
                "collections.liked_collection_id {:?} collides with the top collection prefix",
                collections.liked_collection_id
            );
        }

        Ok(Self {
            db_path,
            access_token,
            api_base_url,
            request_timeout_sec,
            min_request_interval_ms,
            log_retention_months,
            collections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli_with_dir(dir: &TempDir) -> CliConfig {
        CliConfig {
            db_dir: Some(dir.path().to_path_buf()),
            access_token: Some("cli-token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_cli_only() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::resolve(&cli_with_dir(&temp_dir), None).unwrap();

        assert_eq!(config.db_path, temp_dir.path().join("sp_data.db"));
        assert_eq!(config.access_token, "cli-token");
        assert_eq!(config.api_base_url, "https://api.spotify.com/v1");
        assert_eq!(config.request_timeout_sec, 30);
        assert_eq!(config.min_request_interval_ms, 100);
        assert_eq!(config.log_retention_months, 1);
        assert_eq!(config.collections, CollectionConventions::default());
    }

    #[test]
    fn test_toml_overrides_cli() {
        let temp_dir = TempDir::new().unwrap();
        let other_dir = TempDir::new().unwrap();
        let file = FileConfig {
            db_path: Some(
                other_dir
                    .path()
                    .join("warehouse.db")
                    .to_string_lossy()
                    .to_string(),
            ),
            access_token: Some("file-token".to_string()),
            api_base_url: Some("http://localhost:9000/v1".to_string()),
            min_request_interval_ms: Some(0),
            log_retention_months: Some(6),
            collections: Some(CollectionsConfig {
                liked_collection_id: Some("SAVED".to_string()),
                top_collection_prefix: None,
                excluded_collection_names: Some(vec!["Private Mix".to_string()]),
            }),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli_with_dir(&temp_dir), Some(file)).unwrap();

        assert_eq!(config.db_path, other_dir.path().join("warehouse.db"));
        assert_eq!(config.access_token, "file-token");
        assert_eq!(config.api_base_url, "http://localhost:9000/v1");
        assert_eq!(config.min_request_interval_ms, 0);
        assert_eq!(config.log_retention_months, 6);
        assert_eq!(config.collections.liked_collection_id, "SAVED");
        assert_eq!(config.collections.top_collection_prefix, "TOP_TRACKS_");
        assert!(config.collections.is_excluded_name("Private Mix"));
    }

    #[test]
    fn test_missing_database_location_fails() {
        let cli = CliConfig {
            access_token: Some("token".to_string()),
            ..Default::default()
        };
        let err = AppConfig::resolve(&cli, None).unwrap_err();
        assert!(err.to_string().contains("database location"));
    }

    #[test]
    fn test_missing_db_dir_fails() {
        let cli = CliConfig {
            db_dir: Some(PathBuf::from("/nonexistent/warehouse/dir")),
            access_token: Some("token".to_string()),
            ..Default::default()
        };
        let err = AppConfig::resolve(&cli, None).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_blank_token_fails() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            access_token: Some("   ".to_string()),
            ..cli_with_dir(&temp_dir)
        };
        let err = AppConfig::resolve(&cli, None).unwrap_err();
        assert!(err.to_string().contains("access_token"));
    }

    #[test]
    fn test_liked_id_must_not_look_like_top_collection() {
        let temp_dir = TempDir::new().unwrap();
        let file = FileConfig {
            collections: Some(CollectionsConfig {
                liked_collection_id: Some("TOP_TRACKS_liked".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&cli_with_dir(&temp_dir), Some(file)).is_err());
    }

    #[test]
    fn test_conventions_classify_ids() {
        let conventions = CollectionConventions::default();
        assert_eq!(
            conventions.top_collection_id(TimeRange::MediumTerm),
            "TOP_TRACKS_medium_term"
        );
        assert_eq!(
            conventions.top_range_of("TOP_TRACKS_long_term"),
            Some(TimeRange::LongTerm)
        );
        assert_eq!(conventions.top_range_of("TOP_TRACKS_weird"), None);
        assert!(conventions.is_top_collection("TOP_TRACKS_weird"));
        assert_eq!(conventions.top_range_of("37i9dQZF1DX"), None);
        assert!(conventions.is_liked_collection("LIKED_TRACKS"));
        assert!(!conventions.is_excluded_name("Anything"));
    }

    #[test]
    fn test_load_file_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
db_dir = "/data"
log_retention_months = 3

[collections]
excluded_collection_names = ["Sleep", "Focus"]
"#,
        )
        .unwrap();

        let file = FileConfig::load(&path).unwrap();
        assert_eq!(file.db_dir.as_deref(), Some("/data"));
        assert_eq!(file.log_retention_months, Some(3));
        let collections = file.collections.unwrap();
        assert_eq!(
            collections.excluded_collection_names,
            Some(vec!["Sleep".to_string(), "Focus".to_string()])
        );
        assert!(collections.liked_collection_id.is_none());
    }
}
