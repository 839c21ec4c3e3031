//! Platform abstraction layer
//!
//! Everything the game core needs from the outside world goes through two
//! narrow traits:
//! - `Storage`: key-value persistence (memory, files, LocalStorage on web)
//! - `Scene`: rendering, physics movement and overlap queries, popups

pub mod headless;
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessScene;
pub use storage::{FileStorage, MemoryStorage, Storage};
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

use glam::Vec2;

/// Stable handle for anything the scene draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

/// Kinds of entity the scene knows how to draw and group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    House,
    Log,
}

/// Tone of a plain message popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// UI requests raised by the core. The UI answers by calling the matching
/// transition (`replay`, `advance`, `play_again`, ...) on the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Popup {
    LevelComplete { level: u32 },
    AllComplete,
    Message { kind: MessageKind, text: String },
}

/// Rendering and physics collaborator
///
/// All calls are synchronous. The core never consumes a value from the
/// fire-and-forget methods.
pub trait Scene {
    /// Resize the playable area (called on every level load)
    fn set_world_bounds(&mut self, width: f32, height: f32);

    /// Draw an entity at a position
    fn render(&mut self, id: EntityId, kind: EntityKind, pos: Vec2);

    /// Stop drawing an entity
    fn remove_render(&mut self, id: EntityId);

    /// Current position of an entity, if it is still drawn
    fn position(&self, id: EntityId) -> Option<Vec2>;

    /// First entity of `group` overlapping `entity`
    fn query_overlap(&self, entity: EntityId, group: EntityKind) -> Option<EntityId>;

    /// Head toward a point at the given speed
    fn move_toward(&mut self, id: EntityId, target: Vec2, speed: f32);

    fn set_velocity(&mut self, id: EntityId, velocity: Vec2);

    fn show_popup(&mut self, popup: Popup);
}
