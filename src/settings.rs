//! Gameplay tuning
//!
//! Persisted separately from game progress under its own storage key.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persistence::{self, keys};
use crate::platform::Storage;

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum logs carried at once
    pub carry_limit: u32,
    /// Player speed (world units per second)
    pub move_speed: f32,
    /// Time between log top-up spawns (ms)
    pub respawn_interval_ms: u32,
    /// Share of a level's log cap scattered when the level loads
    pub initial_log_fraction: f32,
    /// Tap-to-move stops this close to the target
    pub arrival_radius: f32,
    /// Fixed RNG seed (None = fresh entropy each run)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            carry_limit: 5,
            move_speed: 180.0,
            respawn_interval_ms: 2000,
            initial_log_fraction: 0.5,
            arrival_radius: 10.0,
            seed: None,
        }
    }
}

impl Settings {
    /// Number of placement attempts made when a level with `log_cap` loads
    pub fn initial_logs(&self, log_cap: u32) -> u32 {
        (log_cap as f32 * self.initial_log_fraction.clamp(0.0, 1.0)).floor() as u32
    }

    /// Load settings, falling back to defaults for missing or bad records
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend itself fails.
    pub fn load(storage: &impl Storage) -> Result<Self> {
        match persistence::load_record::<Self>(storage, keys::SETTINGS)? {
            Some(settings) => {
                log::info!("Loaded settings");
                Ok(settings)
            }
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written.
    pub fn save(&self, storage: &impl Storage) -> Result<()> {
        persistence::save_record(storage, keys::SETTINGS, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_initial_logs_floor() {
        let settings = Settings::default();
        assert_eq!(settings.initial_logs(30), 15);
        assert_eq!(settings.initial_logs(35), 17);
    }

    #[test]
    fn test_partial_record_uses_defaults() {
        let storage = MemoryStorage::new();
        storage.persist(keys::SETTINGS, r#"{"carry_limit": 8}"#).unwrap();

        let settings = Settings::load(&storage).unwrap();
        assert_eq!(settings.carry_limit, 8);
        assert_eq!(settings.respawn_interval_ms, 2000);
    }

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        let settings = Settings {
            seed: Some(42),
            ..Default::default()
        };
        settings.save(&storage).unwrap();
        assert_eq!(Settings::load(&storage).unwrap(), settings);
    }

    #[test]
    fn test_garbage_falls_back() {
        let storage = MemoryStorage::new();
        storage.persist(keys::SETTINGS, "not json").unwrap();
        assert_eq!(Settings::load(&storage).unwrap(), Settings::default());
    }
}
