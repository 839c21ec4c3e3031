//! Static level table

use crate::error::{GameError, Result};

/// Parameters of one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSpec {
    pub level_id: u32,
    pub map_width: u32,
    pub map_height: u32,
    pub house_count: u32,
    /// Logs required per house, in house order
    pub quotas: &'static [u32],
    /// Most uncollected logs on the map at once
    pub log_cap: u32,
}

impl LevelSpec {
    /// Logs needed to clear the level
    pub fn total_required(&self) -> u32 {
        self.quotas.iter().sum()
    }
}

static LEVELS: [LevelSpec; 5] = [
    LevelSpec {
        level_id: 1,
        map_width: 800,
        map_height: 800,
        house_count: 1,
        quotas: &[8],
        log_cap: 30,
    },
    LevelSpec {
        level_id: 2,
        map_width: 1000,
        map_height: 1000,
        house_count: 2,
        quotas: &[10, 12],
        log_cap: 40,
    },
    LevelSpec {
        level_id: 3,
        map_width: 1200,
        map_height: 1200,
        house_count: 3,
        quotas: &[12, 15, 18],
        log_cap: 50,
    },
    LevelSpec {
        level_id: 4,
        map_width: 1400,
        map_height: 1400,
        house_count: 4,
        quotas: &[15, 18, 20, 25],
        log_cap: 60,
    },
    LevelSpec {
        level_id: 5,
        map_width: 1600,
        map_height: 1600,
        house_count: 5,
        quotas: &[18, 20, 25, 30, 35],
        log_cap: 70,
    },
];

/// Look up a level
///
/// # Errors
///
/// Returns `UnknownLevel` for ids outside `1..=max_level()`.
pub fn get(level_id: u32) -> Result<&'static LevelSpec> {
    LEVELS
        .iter()
        .find(|spec| spec.level_id == level_id)
        .ok_or(GameError::UnknownLevel(level_id))
}

pub fn contains(level_id: u32) -> bool {
    get(level_id).is_ok()
}

/// Highest defined level id
pub fn max_level() -> u32 {
    LEVELS.len() as u32
}

/// All levels in progression order
pub fn all() -> &'static [LevelSpec] {
    &LEVELS
}
