//! Game core
//!
//! All gameplay logic lives here. Rendering, physics and audio are reached
//! only through the `Scene` collaborator; randomness comes from one seeded
//! RNG owned by the session, so a fixed seed replays the same layouts.

pub mod autopilot;
pub mod catalog;
pub mod layout;
pub mod session;
pub mod state;
pub mod tick;

pub use catalog::LevelSpec;
pub use session::Session;
pub use state::{
    CollectOutcome, Collectible, Command, CommandOutcome, DeliverOutcome, GamePhase, SessionState,
};
