use const_format::concatcp;
use thiserror::Error;

pub mod storage;
mod tracker;
mod workout_store;

pub use tracker::*;
pub use workout_store::*;

pub const DATA_DIR: &str = "data/";
pub const STORE_DIR: &str = concatcp!(DATA_DIR, "store");

/// Key the whole workout collection is stored under.
pub const STORAGE_KEY: &str = "workout";

pub const MAP_ZOOM_LEVEL: f64 = 13.0;

#[derive(Debug, Error)]
pub enum DataManagerError {
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("invalid workout data: {0}")]
    Corrupt(#[from] serde_json::Error),
}
