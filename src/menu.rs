//! Menu screens and the level-select listing

use crate::sim::catalog;
use crate::stats::Stats;

/// Which menu overlay is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScreen {
    /// Simple start screen for players who never started a game
    FirstTime,
    /// Full menu: start, level select, stats, reset
    Main,
    /// A level is being played
    Hidden,
}

pub fn menu_screen(stats: &Stats, active: bool) -> MenuScreen {
    if active {
        MenuScreen::Hidden
    } else if stats.is_first_time() {
        MenuScreen::FirstTime
    } else {
        MenuScreen::Main
    }
}

/// One tile of the level-select grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSelectEntry {
    pub level: u32,
    pub map_width: u32,
    pub map_height: u32,
    pub houses: u32,
    pub total_required: u32,
    pub unlocked: bool,
    pub completed: bool,
    pub current: bool,
}

/// Levels up to one past the best reached are playable
pub fn is_unlocked(level: u32, stats: &Stats) -> bool {
    level <= stats.highest_level + 1
}

/// Build the listing for every catalog level
pub fn level_entries(stats: &Stats) -> Vec<LevelSelectEntry> {
    catalog::all()
        .iter()
        .map(|spec| LevelSelectEntry {
            level: spec.level_id,
            map_width: spec.map_width,
            map_height: spec.map_height,
            houses: spec.house_count,
            total_required: spec.total_required(),
            unlocked: is_unlocked(spec.level_id, stats),
            completed: spec.level_id < stats.current_level,
            current: spec.level_id == stats.current_level,
        })
        .collect()
}
