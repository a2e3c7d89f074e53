//! Movement Events
//!
//! Emitted by the orchestrator so hosts can drive animation, audio and UI
//! without polling every mover.

use serde::{Serialize, Deserialize};

use crate::core::direction::Direction;
use crate::core::position::GridPosition;
use crate::movement::orchestrator::MoverId;

/// Event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MovementEventData {
    /// A run began.
    Started {
        direction: Direction,
        from: GridPosition,
        to: GridPosition,
        total_frames: u32,
    },

    /// A run replaced one still in progress.
    Redirected {
        direction: Direction,
        from: GridPosition,
        to: GridPosition,
        total_frames: u32,
    },

    /// A run reached its destination.
    Completed {
        at: GridPosition,
    },

    /// The resolved destination was the current position.
    Blocked {
        direction: Direction,
        at: GridPosition,
    },

    /// Request dropped because the mover is already running.
    Busy {
        direction: Direction,
    },

    /// Request failed; the reason is the error's display text.
    Rejected {
        reason: String,
    },

    /// Mover placed without animation.
    Teleported {
        to: GridPosition,
    },
}

/// A movement event with timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementEvent {
    /// Orchestrator frame the event occurred on
    pub frame: u64,

    /// Mover involved
    pub mover: MoverId,

    /// Event data
    pub data: MovementEventData,
}

impl MovementEvent {
    /// Create a new event.
    pub fn new(frame: u64, mover: MoverId, data: MovementEventData) -> Self {
        Self { frame, mover, data }
    }

    /// True for events that end or prevent motion.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.data,
            MovementEventData::Completed { .. }
                | MovementEventData::Blocked { .. }
                | MovementEventData::Rejected { .. }
        )
    }
}
