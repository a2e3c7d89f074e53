//! # Gridstep
//!
//! Tile-grid movement resolution and frame-interpolated motion for top-down
//! puzzle games.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         GRIDSTEP                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Primitives                               │
//! │  ├── position.rs  - GridPosition (f64) and Cell (i32)         │
//! │  ├── direction.rs - UP/DOWN/LEFT/RIGHT and token parsing      │
//! │  └── hash.rs      - Trajectory digests for replay checks      │
//! │                                                              │
//! │  grid/            - Level data (read-only for movement)       │
//! │  ├── scanner.rs   - ObstacleScanner trait + stepwise scan     │
//! │  ├── level.rs     - LevelGrid, Boundary, Obstacle             │
//! │  ├── rules.rs     - GameModeRules                             │
//! │  └── loader.rs    - JSON level definitions                    │
//! │                                                              │
//! │  movement/        - Resolution and interpolation              │
//! │  ├── resolver.rs  - Direction -> destination (pure)           │
//! │  ├── interpolator.rs - Per-mover MovementRun state machine    │
//! │  ├── orchestrator.rs - attempt_move / per_frame_update        │
//! │  ├── events.rs    - Movement events                           │
//! │  └── error.rs     - MovementError                             │
//! │                                                              │
//! │  config.rs        - MotionConfig (fps, speed, redirect)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame Model
//!
//! The host render loop calls [`PathOrchestrator::per_frame_update`] exactly
//! once per rendered frame with the measured frame time. Progress is driven by
//! accumulated time, so movement speed does not depend on the actual frame
//! rate. The nominal `fps` only sizes the frame count of a run.
//!
//! Nothing in this crate panics into the render loop: failed moves are logged
//! and reported as [`MoveOutcome::Rejected`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod grid;
pub mod movement;

// Re-export commonly used types
pub use config::{ConfigError, MotionConfig, RedirectPolicy};
pub use crate::core::direction::Direction;
pub use crate::core::position::{Cell, GridPosition};
pub use grid::level::{Boundary, LevelGrid, Obstacle, ObstacleKind};
pub use grid::loader::{Level, LevelDefinition, LevelError};
pub use grid::rules::GameModeRules;
pub use grid::scanner::ObstacleScanner;
pub use movement::error::MovementError;
pub use movement::events::{MovementEvent, MovementEventData};
pub use movement::interpolator::{MotionInterpolator, MoverModel, MovementRun};
pub use movement::orchestrator::{FrameResult, MoveOutcome, MoverId, PathOrchestrator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nominal frame rate used to size movement runs (Hz)
pub const DEFAULT_FPS: f64 = 30.0;

/// Default movement speed (grid units per second)
pub const DEFAULT_SPEED: f64 = 4.0;
