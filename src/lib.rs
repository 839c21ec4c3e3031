//! Timber Run - a log-hauling arcade game
//!
//! Core modules:
//! - `sim`: Game core (level catalog, layout generation, session state machine)
//! - `persistence`: Per-level delivery progress and saved records
//! - `platform`: Storage and scene collaborators (memory, file, browser, headless)
//! - `stats`: Cumulative cross-session counters
//! - `settings`: Data-driven gameplay tuning
//! - `menu`: Menu screens and level-select listing

pub mod error;
pub mod menu;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod stats;

pub use error::{GameError, Result, StorageError};
pub use settings::Settings;
pub use stats::{Stats, StatsTracker};

/// Game configuration constants
pub mod consts {
    /// Houses stay this far from every map edge
    pub const HOUSE_MARGIN: f32 = 100.0;
    /// Minimum distance between two houses (best effort)
    pub const MIN_HOUSE_DISTANCE: f32 = 200.0;
    /// Placement attempts per house before the last candidate is accepted
    pub const HOUSE_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Logs stay this far from every map edge
    pub const LOG_MARGIN: f32 = 50.0;
    /// Minimum distance between a log and any house
    pub const LOG_HOUSE_CLEARANCE: f32 = 80.0;
    /// Placement attempts per log before the spawn is skipped
    pub const LOG_PLACEMENT_ATTEMPTS: u32 = 50;

    /// Overlap radii used by the headless scene
    pub const PLAYER_RADIUS: f32 = 16.0;
    pub const LOG_RADIUS: f32 = 12.0;
    pub const HOUSE_RADIUS: f32 = 40.0;

    /// First level of the campaign
    pub const FIRST_LEVEL: u32 = 1;
}
