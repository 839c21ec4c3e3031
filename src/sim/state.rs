//! Session state and core simulation types
//!
//! Nothing here is persisted directly; the level pointer, stats and level
//! progress records are written by their own stores.

use glam::Vec2;

use crate::platform::EntityId;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// In a menu, no level being played
    NotStarted,
    /// Active gameplay
    Playing,
    /// Gameplay frozen (progress untouched)
    Paused,
    /// Every house on the level is full; waiting for replay/advance
    LevelComplete,
    /// Advanced past the last level; waiting for play-again
    AllComplete,
}

/// Transient session bookkeeping. `carrying` stays within `0..=carry_limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub active: bool,
    pub current_level: u32,
    pub carrying: u32,
    pub carry_limit: u32,
}

/// A log lying on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub id: EntityId,
    pub pos: Vec2,
    pub collected: bool,
}

/// Input commands translated from raw UI events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Pick up an overlapping log
    Collect,
    /// Unload at an overlapping house
    Deliver,
    /// Deliver when at a house with logs in hand, otherwise collect
    Interact,
    /// Walk to a world point (tap/click)
    MoveTo(Vec2),
    /// Held direction keys; zero means released
    MoveDirection(Vec2),
}

/// Result of a collect attempt. Only `Collected` changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    Collected,
    CarryFull,
    AlreadyCollected,
    UnknownItem,
    /// Not playing right now
    Ignored,
}

/// Result of a delivery attempt. Only `Delivered` changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliverOutcome {
    Delivered { amount: u32, level_complete: bool },
    NothingCarried,
    HouseFull,
    /// Not playing right now
    Ignored,
}

/// Result of a dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Collect(CollectOutcome),
    Deliver(DeliverOutcome),
    /// Nothing of the needed kind overlaps the player
    NothingInReach,
    Moving,
    Ignored,
}

/// Entities of the level currently loaded into the scene
#[derive(Debug, Default)]
pub(crate) struct World {
    pub player: Option<EntityId>,
    /// House handles, indexed like the level's house records
    pub houses: Vec<EntityId>,
    pub logs: Vec<Collectible>,
    /// Pending tap-to-move destination
    pub move_target: Option<Vec2>,
    /// Held manual direction
    pub direction: Vec2,
    pub respawn_elapsed_ms: f32,
    /// Never reset, so handles stay unique across reloads
    next_id: u32,
}

impl World {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    /// Logs still lying on the map
    pub fn active_logs(&self) -> usize {
        self.logs.iter().filter(|l| !l.collected).count()
    }

    /// Every entity handle currently rendered
    pub fn rendered(&self) -> Vec<EntityId> {
        self.player
            .into_iter()
            .chain(self.houses.iter().copied())
            .chain(self.logs.iter().filter(|l| !l.collected).map(|l| l.id))
            .collect()
    }

    /// Drop all per-level entities
    pub fn clear(&mut self) {
        self.player = None;
        self.houses.clear();
        self.logs.clear();
        self.move_target = None;
        self.direction = Vec2::ZERO;
        self.respawn_elapsed_ms = 0.0;
    }
}
