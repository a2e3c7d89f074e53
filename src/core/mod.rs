//! Core primitives.
//!
//! Positions, directions and trajectory hashing shared by the grid and
//! movement layers.

pub mod direction;
pub mod hash;
pub mod position;

// Re-export core types
pub use direction::Direction;
pub use hash::{TrajectoryDigest, TrajectoryHasher};
pub use position::{Cell, GridPosition};
