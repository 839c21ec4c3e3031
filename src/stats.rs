//! Cumulative player statistics
//!
//! Persisted under the `stats` key after every change.

use serde::{Deserialize, Serialize};

use crate::consts::FIRST_LEVEL;
use crate::error::Result;
use crate::persistence::{self, keys};
use crate::platform::Storage;
use crate::sim::catalog;

/// Cross-session counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    /// Most recently selected level
    pub current_level: u32,
    /// Best level reached (never decreases until a reset)
    pub highest_level: u32,
    /// Logs delivered over all games
    #[serde(rename = "totalLogs")]
    pub total_logs_delivered: u64,
    pub games_played: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            current_level: FIRST_LEVEL,
            highest_level: FIRST_LEVEL,
            total_logs_delivered: 0,
            games_played: 0,
        }
    }
}

impl Stats {
    /// True until the first game is started
    pub fn is_first_time(&self) -> bool {
        self.games_played == 0
    }
}

/// Write-through wrapper around `Stats`
#[derive(Debug)]
pub struct StatsTracker<S: Storage> {
    storage: S,
    stats: Stats,
}

impl<S: Storage> StatsTracker<S> {
    /// Load saved stats, falling back to defaults for missing or bad records
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend fails.
    pub fn load(storage: S) -> Result<Self> {
        let mut stats: Stats = persistence::load_record(&storage, keys::STATS)?.unwrap_or_default();
        if !catalog::contains(stats.current_level) {
            log::warn!(
                "Saved current level {} is not in the catalog; using level {}",
                stats.current_level,
                FIRST_LEVEL
            );
            stats.current_level = FIRST_LEVEL;
        }
        let highest = stats.highest_level.clamp(FIRST_LEVEL, catalog::max_level());
        if highest != stats.highest_level {
            log::warn!(
                "Saved highest level {} is out of range; clamping to {}",
                stats.highest_level,
                highest
            );
            stats.highest_level = highest;
        }
        if stats.highest_level < stats.current_level {
            log::warn!(
                "Saved highest level {} below current level {}; raising it",
                stats.highest_level,
                stats.current_level
            );
            stats.highest_level = stats.current_level;
        }
        log::info!(
            "Loaded stats: {} game(s), {} log(s) delivered, highest level {}",
            stats.games_played,
            stats.total_logs_delivered,
            stats.highest_level
        );
        Ok(Self { storage, stats })
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written.
    pub fn save(&self) -> Result<()> {
        persistence::save_record(&self.storage, keys::STATS, &self.stats)
    }

    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn record_game_started(&mut self) -> Result<()> {
        self.stats.games_played += 1;
        self.save()
    }

    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn record_delivery(&mut self, amount: u32) -> Result<()> {
        self.stats.total_logs_delivered += u64::from(amount);
        self.save()
    }

    /// Select a level without touching the highest-level record
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn set_current_level(&mut self, level: u32) -> Result<()> {
        self.stats.current_level = level;
        self.save()
    }

    /// Move to a newly reached level, raising `highest_level` if needed
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn reach_level(&mut self, level: u32) -> Result<()> {
        self.stats.current_level = level;
        self.stats.highest_level = self.stats.highest_level.max(level);
        self.save()
    }

    /// Back to defaults, removing the saved record
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written.
    pub fn reset(&mut self) -> Result<()> {
        self.stats = Stats::default();
        self.storage.remove(keys::STATS)?;
        Ok(())
    }
}
