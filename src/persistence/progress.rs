//! Per-level delivery progress
//!
//! A level's house layout is generated once, on first visit, and kept until
//! a full progress reset. Replays only zero the delivery counts.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{keys, load_record, save_record};
use crate::error::{GameError, Result};
use crate::platform::Storage;
use crate::sim::catalog::{self, LevelSpec};
use crate::sim::layout;

/// A delivery target. `delivered` never exceeds `required`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseRecord {
    pub x: f32,
    pub y: f32,
    pub required: u32,
    #[serde(default)]
    pub delivered: u32,
}

impl HouseRecord {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Logs still needed
    pub fn remaining(&self) -> u32 {
        self.required.saturating_sub(self.delivered)
    }

    pub fn is_full(&self) -> bool {
        self.delivered >= self.required
    }
}

/// Saved state of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Filled in from the map key on load
    #[serde(skip)]
    pub level_id: u32,
    pub houses: Vec<HouseRecord>,
    pub requirements: Vec<u32>,
    #[serde(rename = "width")]
    pub map_width: u32,
    #[serde(rename = "height")]
    pub map_height: u32,
    #[serde(rename = "maxLogs")]
    pub log_cap: u32,
}

impl LevelProgress {
    /// Fresh layout for a level
    pub fn generate<R: Rng + ?Sized>(spec: &LevelSpec, rng: &mut R) -> Self {
        Self {
            level_id: spec.level_id,
            houses: layout::generate_houses(spec, rng),
            requirements: spec.quotas.to_vec(),
            map_width: spec.map_width,
            map_height: spec.map_height,
            log_cap: spec.log_cap,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.houses.iter().all(HouseRecord::is_full)
    }

    pub fn total_delivered(&self) -> u32 {
        self.houses.iter().map(|h| h.delivered).sum()
    }

    /// Check a loaded record against its catalog entry. Layouts that do not
    /// match the level's map size, house count or quotas cannot be played.
    fn validate(&self, spec: &LevelSpec) -> std::result::Result<(), String> {
        if (self.map_width, self.map_height) != (spec.map_width, spec.map_height) {
            return Err(format!(
                "map {}x{} but level is {}x{}",
                self.map_width, self.map_height, spec.map_width, spec.map_height
            ));
        }
        if self.houses.len() != spec.quotas.len() {
            return Err(format!(
                "{} houses but level has {}",
                self.houses.len(),
                spec.quotas.len()
            ));
        }
        let bounds = Vec2::new(spec.map_width as f32, spec.map_height as f32);
        for (i, (house, &quota)) in self.houses.iter().zip(spec.quotas).enumerate() {
            if house.required != quota {
                return Err(format!("house {i} requires {} instead of {quota}", house.required));
            }
            let pos = house.pos();
            if !pos.is_finite() || pos.cmplt(Vec2::ZERO).any() || pos.cmpgt(bounds).any() {
                return Err(format!("house {i} at {pos} is off the map"));
            }
        }
        Ok(())
    }

    /// Clamp any over-delivered house, returning how many were fixed
    fn clamp_deliveries(&mut self) -> usize {
        let mut fixed = 0;
        for (i, house) in self.houses.iter_mut().enumerate() {
            if house.delivered > house.required {
                let err = GameError::InvariantViolation(format!(
                    "level {} house {} delivered {} of {}",
                    self.level_id, i, house.delivered, house.required
                ));
                log::warn!("{err}; clamping");
                house.delivered = house.required;
                fixed += 1;
            }
        }
        fixed
    }
}

/// Owner of every level's progress record, written through to storage
#[derive(Debug)]
pub struct LevelProgressStore<S: Storage> {
    storage: S,
    levels: BTreeMap<u32, LevelProgress>,
}

impl<S: Storage> LevelProgressStore<S> {
    /// Load saved progress. Invalid entries are dropped or clamped.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn load(storage: S) -> Result<Self> {
        let saved: BTreeMap<u32, LevelProgress> =
            load_record(&storage, keys::LEVEL_DATA)?.unwrap_or_default();

        let mut levels = BTreeMap::new();
        for (level_id, mut progress) in saved {
            let Ok(spec) = catalog::get(level_id) else {
                log::warn!("Dropping saved progress for unknown level {level_id}");
                continue;
            };
            if let Err(reason) = progress.validate(spec) {
                let err = GameError::InvalidPersistedData {
                    key: format!("{}[{level_id}]", keys::LEVEL_DATA),
                    reason,
                };
                log::warn!("{err}; regenerating the level");
                continue;
            }
            progress.level_id = level_id;
            progress.clamp_deliveries();
            levels.insert(level_id, progress);
        }
        log::info!("Loaded progress for {} level(s)", levels.len());

        Ok(Self { storage, levels })
    }

    pub fn get(&self, level_id: u32) -> Option<&LevelProgress> {
        self.levels.get(&level_id)
    }

    /// Saved progress for a level, generating and persisting a layout on
    /// first access. Repeated calls return the same layout.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLevel` for levels outside the catalog, or a storage
    /// error if the new record cannot be saved.
    pub fn get_or_create<R: Rng + ?Sized>(&mut self, level_id: u32, rng: &mut R) -> Result<&LevelProgress> {
        if !self.levels.contains_key(&level_id) {
            let spec = catalog::get(level_id)?;
            let progress = LevelProgress::generate(spec, rng);
            log::info!(
                "Generated layout for level {} ({} houses)",
                level_id,
                progress.houses.len()
            );
            self.levels.insert(level_id, progress);
            self.save()?;
        }
        self.levels
            .get(&level_id)
            .ok_or(GameError::UnknownLevel(level_id))
    }

    /// Add up to `amount` logs to a house, never past its quota.
    /// Returns the amount actually applied.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing level or house, or if saving fails.
    pub fn record_delivery(&mut self, level_id: u32, house: usize, amount: u32) -> Result<u32> {
        let record = self
            .levels
            .get_mut(&level_id)
            .ok_or(GameError::UnknownLevel(level_id))?
            .houses
            .get_mut(house)
            .ok_or(GameError::UnknownHouse {
                level: level_id,
                index: house,
            })?;
        let applied = amount.min(record.remaining());
        record.delivered += applied;
        self.save()?;
        Ok(applied)
    }

    /// Zero every house's delivery count for a level
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn reset_deliveries(&mut self, level_id: u32) -> Result<()> {
        let Some(progress) = self.levels.get_mut(&level_id) else {
            return Ok(());
        };
        for house in &mut progress.houses {
            house.delivered = 0;
        }
        self.save()
    }

    pub fn is_level_complete(&self, level_id: u32) -> bool {
        self.levels
            .get(&level_id)
            .is_some_and(LevelProgress::is_complete)
    }

    /// Write every record back to storage
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written.
    pub fn save(&self) -> Result<()> {
        save_record(&self.storage, keys::LEVEL_DATA, &self.levels)
    }

    /// Forget every level (layouts regenerate on next access)
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written.
    pub fn clear(&mut self) -> Result<()> {
        self.levels.clear();
        self.storage.remove(keys::LEVEL_DATA)?;
        Ok(())
    }
}
