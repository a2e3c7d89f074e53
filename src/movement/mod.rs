//! Movement Module
//!
//! Direction resolution and frame-interpolated motion.
//!
//! ## Module Structure
//!
//! - `resolver`: Pure direction -> destination resolution
//! - `interpolator`: Per-mover `MovementRun` state machine
//! - `orchestrator`: `attempt_move` and the per-frame entry point
//! - `events`: Movement events for hosts and replay
//! - `error`: `MovementError`

pub mod error;
pub mod events;
pub mod interpolator;
pub mod orchestrator;
pub mod resolver;

// Re-export key types
pub use error::MovementError;
pub use events::{MovementEvent, MovementEventData};
pub use interpolator::{MotionInterpolator, MoverModel, MovementRun, StartOutcome, TickOutcome};
pub use orchestrator::{FrameResult, MoveOutcome, MoverId, PathOrchestrator};
pub use resolver::{resolve, resolve_token, try_resolve};
