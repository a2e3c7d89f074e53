//! Movement errors.

use thiserror::Error;

use crate::movement::orchestrator::MoverId;

/// Everything that can stop a move from happening.
///
/// None of these are fatal. The orchestrator logs them and reports the move
/// as rejected; the render loop keeps running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MovementError {
    /// Unrecognized direction token.
    #[error("Invalid direction: {0:?}")]
    InvalidDirection(String),

    /// Position has a non-finite component.
    #[error("Invalid destination")]
    InvalidDestination,

    /// Speed must be finite and positive.
    #[error("Invalid speed: {0}")]
    InvalidSpeed(f64),

    /// Frame rate must be finite and positive.
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(f64),

    /// No mover registered under this id.
    #[error("Mover {0} not found")]
    MissingMoverReference(MoverId),

    /// No level loaded, or the level failed validation.
    #[error("Misconfigured level: {0}")]
    MisconfiguredLevel(String),

    /// Resolution started outside the level boundary.
    #[error("Origin ({x}, {z}) is outside the level boundary")]
    OriginOutOfBounds {
        /// Column
        x: i32,
        /// Row
        z: i32,
    },

    /// Cell is outside the grid or occupied.
    #[error("Cell ({x}, {z}) is blocked")]
    CellBlocked {
        /// Column
        x: i32,
        /// Row
        z: i32,
    },

    /// Teleport attempted while a run is active.
    #[error("Movement run in progress")]
    RunActive,
}
