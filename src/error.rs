//! Error types shared by the game core and its collaborators

use thiserror::Error;

use crate::sim::GamePhase;

/// Failures reported by a `Storage` backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Everything that can go wrong inside the game core
///
/// Expected "nothing to do" cases (full carry, collected log, full house)
/// are reported through outcome enums instead.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("level {0} does not exist")]
    UnknownLevel(u32),
    #[error("level {0} is locked")]
    LevelLocked(u32),
    #[error("level {level} has no house {index}")]
    UnknownHouse { level: u32, index: usize },
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition { action: &'static str, phase: GamePhase },
    #[error("saved record `{key}` is invalid: {reason}")]
    InvalidPersistedData { key: String, reason: String },
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, GameError>;
