mod models;
mod schema;
mod store;
mod trait_def;

pub use models::*;
pub use schema::{
    WarehouseTable, DIM_ALBUMS_TABLE, DIM_ARTISTS_TABLE, DIM_COLLECTIONS_TABLE, DIM_TRACKS_TABLE,
    FACT_TRACKS_TABLE, LOGGING_TABLE,
};
pub use store::SqliteWarehouseStore;
pub use trait_def::WarehouseStore;
