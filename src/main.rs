use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use listening_warehouse::config::{AppConfig, CliConfig, FileConfig};
use listening_warehouse::run_log::PhaseStatus;
use listening_warehouse::streaming_api::{ClientSettings, SpotifyClient, DEFAULT_API_BASE_URL};
use listening_warehouse::sync::{SyncPipeline, SyncReport};
use listening_warehouse::warehouse::{SqliteWarehouseStore, WarehouseStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// Rebuild the listening warehouse from the streaming service.
#[derive(Parser, Debug)]
#[clap(version)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding the warehouse database (sp_data.db).
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// Path to the warehouse database file. Takes precedence over --db-dir.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Bearer token for the streaming Web API.
    #[clap(long, env = "LISTENING_WAREHOUSE_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Base URL of the streaming Web API.
    #[clap(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Timeout in seconds for a single API request.
    #[clap(long, default_value_t = 30)]
    pub request_timeout_sec: u64,

    /// Minimum delay between two API requests, in milliseconds.
    #[clap(long, default_value_t = 100)]
    pub min_request_interval_ms: u64,

    /// Successful run log entries older than this many months are purged.
    #[clap(long, default_value_t = 1)]
    pub log_retention_months: u32,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_dir: self.db_dir.clone(),
            db_path: self.db_path.clone(),
            access_token: self.access_token.clone(),
            api_base_url: self.api_base_url.clone(),
            request_timeout_sec: self.request_timeout_sec,
            min_request_interval_ms: self.min_request_interval_ms,
            log_retention_months: self.log_retention_months,
        }
    }
}

fn print_report(report: &SyncReport) {
    println!(
        "Sync of {} finished in {:.1}s",
        report.user_id,
        (report.finished_at - report.started_at).num_milliseconds() as f64 / 1000.0
    );
    for phase in &report.phases {
        match &phase.status {
            PhaseStatus::Succeeded => {
                println!("  ok      {:<45} {:>6}", phase.name, phase.record_count)
            }
            PhaseStatus::Failed { message, .. } => println!(
                "  FAILED  {:<45} {:>6}  {}",
                phase.name, phase.record_count, message
            ),
        }
    }
    let stats = &report.stats;
    println!(
        "Warehouse: {} facts, {} collections, {} tracks, {} albums, {} artists, {} log entries",
        stats.facts,
        stats.collections,
        stats.tracks,
        stats.albums,
        stats.artists,
        stats.log_entries
    );
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    info!(
        "listening-warehouse {}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let store: Arc<dyn WarehouseStore> = Arc::new(SqliteWarehouseStore::new(&config.db_path)?);

    let client = SpotifyClient::new(ClientSettings {
        base_url: config.api_base_url.clone(),
        access_token: config.access_token.clone(),
        timeout: Duration::from_secs(config.request_timeout_sec),
        min_request_interval: Duration::from_millis(config.min_request_interval_ms),
    })
    .context("Failed to build HTTP client")?;

    let pipeline = SyncPipeline::new(
        client,
        store,
        config.collections.clone(),
        config.log_retention_months,
    );
    let report = pipeline.run()?;

    print_report(&report);
    if !report.all_succeeded() {
        warn!(
            "{} phases failed, see LOGGING_TABLE for details",
            report.failed_phases().count()
        );
    }
    Ok(())
}
