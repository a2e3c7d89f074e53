//! Movement Directions
//!
//! The four planar directions. UP/DOWN run along Z, LEFT/RIGHT along X.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::movement::error::MovementError;

/// Axis a direction moves along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// LEFT/RIGHT
    X,
    /// UP/DOWN
    Z,
}

/// Requested movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// +Z
    Up,
    /// -Z
    Down,
    /// -X
    Left,
    /// +X
    Right,
}

impl Direction {
    /// All directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step as (dx, dz).
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Axis this direction moves along.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Z,
            Direction::Left | Direction::Right => Axis::X,
        }
    }

    /// Direction pointing the other way.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True for RIGHT and UP.
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(self, Direction::Up | Direction::Right)
    }

    /// Input token for this direction.
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl FromStr for Direction {
    type Err = MovementError;

    /// Parse an input token. Case-insensitive, whitespace-trimmed.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let trimmed = token.trim();
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| MovementError::InvalidDirection(token.to_string()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
