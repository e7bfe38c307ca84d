//! Listening Warehouse Library
//!
//! Loads a listener's streaming library into a SQLite star schema.

pub mod config;
pub mod run_log;
pub mod sqlite_persistence;
pub mod streaming_api;
pub mod sync;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use streaming_api::{LibraryApi, SpotifyClient};
pub use sync::{SyncPipeline, SyncReport};
pub use warehouse::{SqliteWarehouseStore, WarehouseStore};
