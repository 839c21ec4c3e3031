//! Save/load of the three independent progress records
//!
//! - `currentLevel`: the last selected level id
//! - `stats`: cumulative counters (see `crate::stats`)
//! - `levelData`: per-level house layout and delivery counts
//!
//! A record that fails to parse is logged and treated as missing, so a
//! corrupted save falls back to defaults instead of stopping the game.
//! Backend failures (I/O) are fatal and propagate.

pub mod progress;

pub use progress::{HouseRecord, LevelProgress, LevelProgressStore};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::consts::FIRST_LEVEL;
use crate::error::{GameError, Result};
use crate::platform::Storage;
use crate::sim::catalog;

/// Storage keys
pub mod keys {
    pub const CURRENT_LEVEL: &str = "currentLevel";
    pub const STATS: &str = "stats";
    pub const LEVEL_DATA: &str = "levelData";
    pub const SETTINGS: &str = "settings";
}

/// Read and parse a JSON record. Unparseable records come back as `None`.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn load_record<T: DeserializeOwned>(storage: &impl Storage, key: &str) -> Result<Option<T>> {
    let Some(json) = storage.load(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&json) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            let err = GameError::InvalidPersistedData {
                key: key.to_string(),
                reason: e.to_string(),
            };
            log::warn!("{err}; using defaults");
            Ok(None)
        }
    }
}

/// Serialize and store a JSON record
///
/// # Errors
///
/// Returns an error if the storage backend cannot be written.
pub fn save_record<T: Serialize + ?Sized>(storage: &impl Storage, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).map_err(|e| GameError::InvalidPersistedData {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    storage.persist(key, &json)?;
    Ok(())
}

/// Load the saved level pointer, defaulting to level 1 when it is missing
/// or names a level the catalog does not have.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn load_current_level(storage: &impl Storage) -> Result<u32> {
    match load_record::<u32>(storage, keys::CURRENT_LEVEL)? {
        Some(level) if catalog::contains(level) => Ok(level),
        Some(level) => {
            log::warn!("Saved level {level} is not in the catalog; starting at level {FIRST_LEVEL}");
            Ok(FIRST_LEVEL)
        }
        None => Ok(FIRST_LEVEL),
    }
}

/// # Errors
///
/// Returns an error if the storage backend cannot be written.
pub fn save_current_level(storage: &impl Storage, level: u32) -> Result<()> {
    save_record(storage, keys::CURRENT_LEVEL, &level)
}
