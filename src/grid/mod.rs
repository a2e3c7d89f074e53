//! Level Grid Module
//!
//! The obstacle/boundary data movement reads from.
//!
//! ## Module Structure
//!
//! - `scanner`: `ObstacleScanner` query contract and the stepwise scan
//! - `level`: `LevelGrid` in-memory implementation, `Boundary`, `Obstacle`
//! - `rules`: Per-level `GameModeRules`
//! - `loader`: JSON level definitions

pub mod level;
pub mod loader;
pub mod rules;
pub mod scanner;

// Re-export key types
pub use level::{Boundary, LevelGrid, Obstacle, ObstacleKind};
pub use loader::{Level, LevelDefinition, LevelError};
pub use rules::GameModeRules;
pub use scanner::ObstacleScanner;
