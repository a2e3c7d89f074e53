//! Motion Interpolation
//!
//! Animates one mover from its position to a resolved destination over a
//! sequence of render frames.
//!
//! ## State Machine
//!
//! ```text
//!            start_movement (distance > 0)
//!   IDLE ───────────────────────────────────► RUNNING ──┐ per_frame_tick
//!    ▲                                          │  ▲      │ (not done)
//!    │   per_frame_tick reaches the end / reset │  └──────┘
//!    └──────────────────────────────────────────┘
//! ```
//!
//! Progress is driven by accumulated frame time, so a run takes the same
//! wall time at any render rate. The nominal frame rate only sizes
//! `total_frames`. On completion the position snaps exactly onto the
//! destination, discarding floating-point drift.

use std::fmt;
use tracing::{debug, error, warn};

use crate::config::MotionConfig;
use crate::core::position::GridPosition;
use crate::movement::error::MovementError;

/// Slack when comparing accumulated time against a run's duration (seconds).
const COMPLETION_EPSILON: f64 = 1e-9;

/// Slack when mapping elapsed time onto nominal frame indices.
const FRAME_EPSILON: f64 = 1e-6;

/// External visual that mirrors a mover's position.
pub trait MoverModel: Send {
    /// Called once per frame while moving, and on teleports.
    fn set_position(&mut self, position: GridPosition);

    /// Called when a run starts and when it ends.
    fn set_in_motion(&mut self, _moving: bool) {}
}

/// One active interpolation between two positions.
#[derive(Clone, Debug, PartialEq)]
pub struct MovementRun {
    /// Where the run started
    pub start: GridPosition,
    /// Where the run ends
    pub end: GridPosition,
    /// Unit vector from start to end
    pub direction: GridPosition,
    /// Straight-line distance
    pub distance: f64,
    /// Planned duration (seconds)
    pub duration: f64,
    /// Nominal frame count, at least 1
    pub total_frames: u32,
    /// Frames advanced so far, in `[0, total_frames]`
    pub current_frame: u32,
    /// Displacement per nominal frame
    pub per_frame_delta: GridPosition,
    /// Accumulated frame time (seconds)
    pub elapsed: f64,
    fps: f64,
}

impl MovementRun {
    /// Plan a run from `start` to `end`.
    ///
    /// Returns `Ok(None)` when the two positions coincide: there is nothing
    /// to animate and no direction to normalize.
    pub fn plan(start: GridPosition, end: GridPosition, speed: f64, fps: f64) -> Result<Option<Self>, MovementError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(MovementError::InvalidDestination);
        }
        if !(speed.is_finite() && speed > 0.0) {
            return Err(MovementError::InvalidSpeed(speed));
        }
        if !(fps.is_finite() && fps > 0.0) {
            return Err(MovementError::InvalidFrameRate(fps));
        }

        let offset = end - start;
        let distance = offset.length();
        if distance == 0.0 {
            return Ok(None);
        }

        let direction = offset.normalize();
        let duration = distance / speed;
        let total_frames = ((duration * fps).ceil() as u32).max(1);
        let per_frame_delta = direction.scale(distance / total_frames as f64);

        Ok(Some(Self {
            start,
            end,
            direction,
            distance,
            duration,
            total_frames,
            current_frame: 0,
            per_frame_delta,
            elapsed: 0.0,
            fps,
        }))
    }

    /// True once the final frame has been reached.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.current_frame >= self.total_frames
    }

    /// Fraction of the run covered, in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f64 {
        if self.is_complete() {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Advance by `dt` seconds and return the new position.
    fn advance(&mut self, dt: f64) -> GridPosition {
        self.elapsed += dt;

        let frame = (self.elapsed * self.fps + FRAME_EPSILON).floor();
        let reached_frame = frame >= self.total_frames as f64;
        if reached_frame || self.elapsed + COMPLETION_EPSILON >= self.duration {
            self.current_frame = self.total_frames;
            return self.end;
        }

        self.current_frame = (frame as u32).min(self.total_frames - 1);
        self.start.lerp(self.end, self.elapsed / self.duration)
    }
}

/// Result of `start_movement`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StartOutcome {
    /// A run began.
    Started {
        /// Nominal frame count of the run
        total_frames: u32,
        /// Planned duration (seconds)
        duration: f64,
    },
    /// Destination equals the current position; nothing to animate.
    AlreadyThere,
}

/// Result of one `per_frame_tick`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// No run active.
    Idle,
    /// Still moving.
    Moving {
        /// Frame index after this tick
        frame: u32,
        /// Interpolated position
        position: GridPosition,
    },
    /// The run finished this tick.
    Completed {
        /// Final position (exactly the destination)
        position: GridPosition,
    },
}

/// Per-mover motion state. Owns at most one `MovementRun`.
pub struct MotionInterpolator {
    position: GridPosition,
    run: Option<MovementRun>,
    in_motion: bool,
    fps: f64,
    max_frame_dt: f64,
    model: Option<Box<dyn MoverModel>>,
}

impl MotionInterpolator {
    /// Create an idle interpolator at `position`.
    ///
    /// A frame-time cap that is not finite and positive disables capping.
    pub fn new(position: GridPosition, config: &MotionConfig) -> Self {
        let max_frame_dt = if config.max_frame_dt.is_finite() && config.max_frame_dt > 0.0 {
            config.max_frame_dt
        } else {
            warn!("Ignoring max frame dt {}; frame time will not be capped", config.max_frame_dt);
            f64::INFINITY
        };
        Self {
            position,
            run: None,
            in_motion: false,
            fps: config.fps,
            max_frame_dt,
            model: None,
        }
    }

    /// Builder-style model attachment.
    pub fn with_model(mut self, model: Box<dyn MoverModel>) -> Self {
        self.attach_model(model);
        self
    }

    /// Connect a visual model and sync it to the current state.
    pub fn attach_model(&mut self, mut model: Box<dyn MoverModel>) {
        model.set_position(self.position);
        model.set_in_motion(self.in_motion);
        self.model = Some(model);
    }

    /// Disconnect the visual model.
    pub fn detach_model(&mut self) -> Option<Box<dyn MoverModel>> {
        self.model.take()
    }

    /// Current (possibly interpolated) position.
    #[inline]
    pub fn position(&self) -> GridPosition {
        self.position
    }

    /// The active run, if any.
    #[inline]
    pub fn run(&self) -> Option<&MovementRun> {
        self.run.as_ref()
    }

    /// True while a run is active.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.run.is_some()
    }

    /// The "in motion" flag exposed to animation systems.
    #[inline]
    pub fn in_motion(&self) -> bool {
        self.in_motion
    }

    /// True when there is no unfinished run.
    #[inline]
    pub fn is_movement_complete(&self) -> bool {
        self.run.as_ref().map_or(true, MovementRun::is_complete)
    }

    /// Fraction of the active run covered; 1.0 when idle.
    #[inline]
    pub fn progress(&self) -> f64 {
        self.run.as_ref().map_or(1.0, MovementRun::progress)
    }

    /// Begin animating toward `destination` at `speed` units per second.
    ///
    /// An active run is overwritten; the new run starts from the live
    /// position. Invalid inputs are logged and leave all state unchanged.
    pub fn start_movement(&mut self, destination: GridPosition, speed: f64) -> Result<StartOutcome, MovementError> {
        let planned = MovementRun::plan(self.position, destination, speed, self.fps)
            .inspect_err(|e| error!("Cannot start movement to {}: {}", destination, e))?;

        let Some(run) = planned else {
            debug!("Already at {}; nothing to animate", destination);
            self.run = None;
            self.position = destination;
            self.set_in_motion(false);
            return Ok(StartOutcome::AlreadyThere);
        };

        if let Some(previous) = &self.run {
            debug!("Overwriting run to {} at frame {}/{}", previous.end, previous.current_frame, previous.total_frames);
        }

        let outcome = StartOutcome::Started {
            total_frames: run.total_frames,
            duration: run.duration,
        };
        debug!(
            "Movement {} -> {}: {:.3} units, {:.3}s, {} frames",
            run.start, run.end, run.distance, run.duration, run.total_frames
        );
        self.run = Some(run);
        self.set_in_motion(true);
        Ok(outcome)
    }

    /// Advance the active run by `dt` seconds of frame time.
    ///
    /// Call exactly once per rendered frame. A no-op when idle. Negative or
    /// non-finite `dt` counts as zero; `dt` above the configured cap is
    /// clamped to it.
    pub fn per_frame_tick(&mut self, dt: f64) -> TickOutcome {
        let Some(run) = self.run.as_mut() else {
            return TickOutcome::Idle;
        };

        let dt = if dt.is_finite() { dt.max(0.0).min(self.max_frame_dt) } else { 0.0 };
        let position = run.advance(dt);
        let frame = run.current_frame;
        let complete = run.is_complete();

        #[cfg(feature = "debug-tracing")]
        tracing::trace!("frame {}/{} at {}", frame, run.total_frames, position);

        self.position = position;
        if let Some(model) = self.model.as_mut() {
            model.set_position(position);
        }

        if complete {
            debug!("Movement complete at {}", position);
            self.run = None;
            self.set_in_motion(false);
            return TickOutcome::Completed { position };
        }

        TickOutcome::Moving { frame, position }
    }

    /// Advance by one nominal frame (`1 / fps` seconds).
    ///
    /// Completion is decided by elapsed time, so a run whose
    /// `duration * fps` lands just above an integer can finish one call
    /// before `total_frames` calls.
    pub fn per_frame_tick_nominal(&mut self) -> TickOutcome {
        let dt = 1.0 / self.fps;
        self.per_frame_tick(dt)
    }

    /// Teleport without animating.
    pub fn set_position_no_motion(&mut self, position: GridPosition) -> Result<(), MovementError> {
        if self.run.is_some() {
            warn!("Refusing teleport to {} during an active run", position);
            return Err(MovementError::RunActive);
        }
        if !position.is_finite() {
            return Err(MovementError::InvalidDestination);
        }
        self.position = position;
        if let Some(model) = self.model.as_mut() {
            model.set_position(position);
        }
        Ok(())
    }

    /// Teleport by an offset without animating.
    pub fn adjust_position_no_motion(&mut self, delta: GridPosition) -> Result<(), MovementError> {
        self.set_position_no_motion(self.position + delta)
    }

    /// Drop the active run where it stands.
    pub fn reset(&mut self) {
        if let Some(run) = self.run.take() {
            debug!("Run to {} reset at frame {}/{}", run.end, run.current_frame, run.total_frames);
        }
        self.set_in_motion(false);
    }

    fn set_in_motion(&mut self, moving: bool) {
        if self.in_motion == moving {
            return;
        }
        self.in_motion = moving;
        if let Some(model) = self.model.as_mut() {
            model.set_in_motion(moving);
        }
    }
}

impl fmt::Debug for MotionInterpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionInterpolator")
            .field("position", &self.position)
            .field("run", &self.run)
            .field("in_motion", &self.in_motion)
            .field("fps", &self.fps)
            .field("has_model", &self.model.is_some())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
