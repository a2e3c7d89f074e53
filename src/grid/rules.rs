//! Game Mode Rules
//!
//! Per-level movement rules. Set once when a level loads.

use serde::{Serialize, Deserialize};

use crate::grid::loader::LevelError;

/// Movement rules for one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameModeRules {
    /// Moves are capped at `max_movement_distance` steps.
    pub movement_is_bounded: bool,
    /// Step cap for bounded movement. Unused when unbounded.
    #[serde(default)]
    pub max_movement_distance: u32,
    /// Obstacles do not stop movement.
    #[serde(default)]
    pub obstacles_are_ignored: bool,
}

impl GameModeRules {
    /// Slide until something stops the mover.
    pub const fn unbounded(obstacles_are_ignored: bool) -> Self {
        Self {
            movement_is_bounded: false,
            max_movement_distance: 0,
            obstacles_are_ignored,
        }
    }

    /// Move at most `distance` steps.
    pub const fn bounded(distance: u32, obstacles_are_ignored: bool) -> Self {
        Self {
            movement_is_bounded: true,
            max_movement_distance: distance,
            obstacles_are_ignored,
        }
    }

    /// Step cap for a scan, `None` when unbounded.
    #[inline]
    pub fn max_steps(&self) -> Option<u32> {
        self.movement_is_bounded.then_some(self.max_movement_distance)
    }

    /// Reject rule sets that can never move anything.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.movement_is_bounded && self.max_movement_distance == 0 {
            return Err(LevelError::InvalidRules(
                "bounded movement needs maxMovementDistance > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for GameModeRules {
    fn default() -> Self {
        Self::unbounded(false)
    }
}
