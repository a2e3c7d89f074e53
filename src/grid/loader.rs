//! Level Definitions
//!
//! JSON level files and the validated `Level` they load into.
//!
//! ```json
//! {
//!   "name": "ice-rink",
//!   "width": 11,
//!   "depth": 21,
//!   "rules": { "movementIsBounded": false, "obstaclesAreIgnored": false },
//!   "speed": 6.0,
//!   "spawn": { "x": 5, "z": 5 },
//!   "obstacles": [ { "x": 6, "z": 5, "kind": "rock" } ]
//! }
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::info;

use crate::core::position::Cell;
use crate::grid::level::{LevelGrid, Obstacle, ObstacleKind, MAX_GRID_DIMENSION};
use crate::grid::rules::GameModeRules;
use crate::grid::scanner::ObstacleScanner;

/// Level loading errors.
#[derive(Debug, Error)]
pub enum LevelError {
    /// Malformed JSON.
    #[error("Invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Could not read the level file.
    #[error("Failed to read level: {0}")]
    Io(#[from] std::io::Error),

    /// Grid has no cells.
    #[error("Level grid is empty ({width}x{depth})")]
    EmptyGrid {
        /// Declared width
        width: u32,
        /// Declared depth
        depth: u32,
    },

    /// Grid larger than `MAX_GRID_DIMENSION` on some axis.
    #[error("Level grid is too large ({width}x{depth}, max {max} per side)")]
    GridTooLarge {
        /// Declared width
        width: u32,
        /// Declared depth
        depth: u32,
        /// Largest accepted side
        max: u32,
    },

    /// Obstacle placed outside the grid.
    #[error("Obstacle at ({x}, {z}) is outside the grid")]
    ObstacleOutOfBounds {
        /// Column
        x: i32,
        /// Row
        z: i32,
    },

    /// Two obstacles on the same cell.
    #[error("Duplicate obstacle at ({x}, {z})")]
    DuplicateObstacle {
        /// Column
        x: i32,
        /// Row
        z: i32,
    },

    /// Rules that can never move anything.
    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    /// Level speed must be finite and positive.
    #[error("Invalid level speed: {0}")]
    InvalidSpeed(f64),

    /// Spawn cell is outside the grid or occupied.
    #[error("Spawn cell ({x}, {z}) is blocked")]
    SpawnBlocked {
        /// Column
        x: i32,
        /// Row
        z: i32,
    },
}

/// One obstacle entry in a level file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleEntry {
    /// Column
    pub x: i32,
    /// Row
    pub z: i32,
    /// Obstacle kind
    pub kind: ObstacleKind,
}

/// Serialized level file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Display name
    pub name: String,
    /// Cells along X
    pub width: u32,
    /// Cells along Z
    pub depth: u32,
    /// Movement rules
    pub rules: GameModeRules,
    /// Movement speed override (grid units per second)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Where movers start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn: Option<Cell>,
    /// Obstacle placements
    #[serde(default)]
    pub obstacles: Vec<ObstacleEntry>,
}

impl LevelDefinition {
    /// Snapshot a loaded level back into its file form.
    pub fn from_level(level: &Level) -> Self {
        Self {
            name: level.name.clone(),
            width: level.grid.width(),
            depth: level.grid.depth(),
            rules: level.rules,
            speed: level.speed,
            spawn: level.spawn,
            obstacles: level
                .grid
                .obstacles()
                .map(|(cell, o)| ObstacleEntry { x: cell.x, z: cell.z, kind: o.kind })
                .collect(),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A validated, playable level.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    /// Display name
    pub name: String,
    /// Obstacle grid
    pub grid: LevelGrid,
    /// Movement rules
    pub rules: GameModeRules,
    /// Speed override; `None` uses the configured default
    pub speed: Option<f64>,
    /// Where movers start
    pub spawn: Option<Cell>,
}

impl Level {
    /// Create a level with no speed override or spawn.
    pub fn new(name: impl Into<String>, grid: LevelGrid, rules: GameModeRules) -> Self {
        Self {
            name: name.into(),
            grid,
            rules,
            speed: None,
            spawn: None,
        }
    }

    /// Builder-style speed override.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Builder-style spawn cell.
    pub fn with_spawn(mut self, spawn: Cell) -> Self {
        self.spawn = Some(spawn);
        self
    }

    /// Parse and validate a JSON level.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let definition: LevelDefinition = serde_json::from_str(json)?;
        Self::from_definition(definition)
    }

    /// Read, parse and validate a JSON level file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let level = Self::from_json(&json)?;
        info!("Loaded level {:?} from {}", level.name, path.as_ref().display());
        Ok(level)
    }

    /// Build a level from its file form.
    pub fn from_definition(definition: LevelDefinition) -> Result<Self, LevelError> {
        check_dimensions(definition.width, definition.depth)?;
        let mut grid = LevelGrid::new(definition.width, definition.depth);
        let mut seen = BTreeSet::new();

        for entry in &definition.obstacles {
            let cell = Cell::new(entry.x, entry.z);
            if !seen.insert(cell) {
                return Err(LevelError::DuplicateObstacle { x: entry.x, z: entry.z });
            }
            grid.place_obstacle(cell, Obstacle::new(entry.kind))?;
        }

        let level = Self {
            name: definition.name,
            grid,
            rules: definition.rules,
            speed: definition.speed,
            spawn: definition.spawn,
        };
        level.validate()?;
        Ok(level)
    }

    /// Check the level is playable.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.grid.width() == 0 || self.grid.depth() == 0 {
            return Err(LevelError::EmptyGrid {
                width: self.grid.width(),
                depth: self.grid.depth(),
            });
        }
        check_dimensions(self.grid.width(), self.grid.depth())?;

        self.rules.validate()?;

        if let Some(speed) = self.speed {
            if !(speed.is_finite() && speed > 0.0) {
                return Err(LevelError::InvalidSpeed(speed));
            }
        }

        if let Some(spawn) = self.spawn {
            if !self.grid.is_passable(spawn) {
                return Err(LevelError::SpawnBlocked { x: spawn.x, z: spawn.z });
            }
        }

        Ok(())
    }
}

fn check_dimensions(width: u32, depth: u32) -> Result<(), LevelError> {
    if width > MAX_GRID_DIMENSION || depth > MAX_GRID_DIMENSION {
        return Err(LevelError::GridTooLarge { width, depth, max: MAX_GRID_DIMENSION });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RINK: &str = r#"{
        "name": "rink",
        "width": 11,
        "depth": 21,
        "rules": { "movementIsBounded": false, "obstaclesAreIgnored": false },
        "speed": 6.0,
        "spawn": { "x": 5, "z": 5 },
        "obstacles": [
            { "x": 6, "z": 5, "kind": "rock" },
            { "x": 2, "z": 9, "kind": "water" }
        ]
    }"#;

    #[test]
    fn test_load_level() {
        let level = Level::from_json(RINK).unwrap();
        assert_eq!(level.name, "rink");
        assert_eq!(level.grid.width(), 11);
        assert_eq!(level.grid.depth(), 21);
        assert_eq!(level.speed, Some(6.0));
        assert_eq!(level.spawn, Some(Cell::new(5, 5)));
        assert_eq!(level.grid.occupant(6, 5).map(|o| o.kind), Some(ObstacleKind::Rock));
        assert_eq!(level.grid.obstacle_count(), 2);
    }

    #[test]
    fn test_definition_round_trip() {
        let level = Level::from_json(RINK).unwrap();
        let json = LevelDefinition::from_level(&level).to_json().unwrap();
        let reloaded = Level::from_json(&json).unwrap();
        assert_eq!(level, reloaded);
    }

    #[test]
    fn test_rejects_empty_grid() {
        let json = r#"{ "name": "x", "width": 0, "depth": 3, "rules": { "movementIsBounded": false } }"#;
        assert!(matches!(Level::from_json(json), Err(LevelError::EmptyGrid { .. })));
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let json = r#"{ "name": "x", "width": 4294967295, "depth": 4294967295,
            "rules": { "movementIsBounded": false } }"#;
        assert!(matches!(
            Level::from_json(json),
            Err(LevelError::GridTooLarge { width: u32::MAX, depth: u32::MAX, .. })
        ));

        let json = r#"{ "name": "x", "width": 4096, "depth": 4097,
            "rules": { "movementIsBounded": false } }"#;
        assert!(matches!(Level::from_json(json), Err(LevelError::GridTooLarge { .. })));
    }

    #[test]
    fn test_accepts_largest_grid_side() {
        let json = r#"{ "name": "x", "width": 4096, "depth": 1,
            "rules": { "movementIsBounded": false } }"#;
        let level = Level::from_json(json).unwrap();
        assert_eq!(level.grid.boundary().max_x, 4095);
    }

    #[test]
    fn test_rejects_obstacle_out_of_bounds() {
        let json = r#"{ "name": "x", "width": 3, "depth": 3,
            "rules": { "movementIsBounded": false },
            "obstacles": [ { "x": 3, "z": 0, "kind": "wall" } ] }"#;
        assert!(matches!(
            Level::from_json(json),
            Err(LevelError::ObstacleOutOfBounds { x: 3, z: 0 })
        ));
    }

    #[test]
    fn test_rejects_duplicate_obstacle() {
        let json = r#"{ "name": "x", "width": 3, "depth": 3,
            "rules": { "movementIsBounded": false },
            "obstacles": [ { "x": 1, "z": 1, "kind": "wall" }, { "x": 1, "z": 1, "kind": "tree" } ] }"#;
        assert!(matches!(
            Level::from_json(json),
            Err(LevelError::DuplicateObstacle { x: 1, z: 1 })
        ));
    }

    #[test]
    fn test_rejects_blocked_spawn_and_bad_speed() {
        let json = r#"{ "name": "x", "width": 3, "depth": 3,
            "rules": { "movementIsBounded": false }, "spawn": { "x": 1, "z": 1 },
            "obstacles": [ { "x": 1, "z": 1, "kind": "crate" } ] }"#;
        assert!(matches!(Level::from_json(json), Err(LevelError::SpawnBlocked { .. })));

        let json = r#"{ "name": "x", "width": 3, "depth": 3,
            "rules": { "movementIsBounded": false }, "speed": 0.0 }"#;
        assert!(matches!(Level::from_json(json), Err(LevelError::InvalidSpeed(_))));
    }

    #[test]
    fn test_rejects_zero_distance_bounded() {
        let json = r#"{ "name": "x", "width": 3, "depth": 3,
            "rules": { "movementIsBounded": true, "maxMovementDistance": 0 } }"#;
        assert!(matches!(Level::from_json(json), Err(LevelError::InvalidRules(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Level::from_json("{ not json"), Err(LevelError::Json(_))));
    }
}
