//! Path Orchestration
//!
//! Single entry point for "move mover M in direction D" and the per-frame
//! hook for the host render loop.
//!
//! Nothing here panics or returns errors into the render loop. Failed
//! requests are logged, recorded as `Rejected` events and reported through
//! `MoveOutcome`; the character simply does not move.

use std::collections::BTreeMap;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{ConfigError, MotionConfig, RedirectPolicy};
use crate::core::direction::Direction;
use crate::core::position::{Cell, GridPosition};
use crate::grid::loader::Level;
use crate::grid::scanner::ObstacleScanner;
use crate::movement::error::MovementError;
use crate::movement::events::{MovementEvent, MovementEventData};
use crate::movement::interpolator::{MotionInterpolator, MoverModel, StartOutcome, TickOutcome};
use crate::movement::resolver::try_resolve;

/// Mover identifier. Ordered, so per-frame iteration is deterministic.
pub type MoverId = u32;

/// What happened to a move request.
#[derive(Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    /// A run began.
    Started {
        /// Resolved destination
        destination: GridPosition,
        /// Nominal frame count of the run
        total_frames: u32,
    },
    /// A run replaced one still in progress.
    Redirected {
        /// Resolved destination
        destination: GridPosition,
        /// Nominal frame count of the run
        total_frames: u32,
    },
    /// Resolution returned the current position. Not an error.
    Blocked,
    /// The mover is already running and the policy ignores new requests.
    Busy,
    /// The request failed.
    Rejected(MovementError),
}

impl MoveOutcome {
    /// True when a run was started or redirected.
    pub fn is_moving(&self) -> bool {
        matches!(self, MoveOutcome::Started { .. } | MoveOutcome::Redirected { .. })
    }
}

/// Result of one frame.
#[derive(Debug, Default)]
pub struct FrameResult {
    /// Frame number just processed
    pub frame: u64,
    /// Events generated since the previous frame
    pub events: Vec<MovementEvent>,
    /// Movers whose runs finished this frame
    pub completed: Vec<MoverId>,
    /// Position of every mover that moved this frame, in id order
    pub positions: Vec<(MoverId, GridPosition)>,
}

/// Coordinates resolution and interpolation for every mover in a level.
#[derive(Debug)]
pub struct PathOrchestrator {
    config: MotionConfig,
    level: Option<Level>,
    movers: BTreeMap<MoverId, MotionInterpolator>,
    frame: u64,
    events: Vec<MovementEvent>,
}

impl PathOrchestrator {
    /// Create an orchestrator with no level loaded.
    pub fn new(config: MotionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            level: None,
            movers: BTreeMap::new(),
            frame: 0,
            events: Vec::new(),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Install a level. Active runs are dropped where they stand.
    ///
    /// Movers left outside the new grid or on an obstacle are moved to the
    /// level's spawn cell. Without a spawn cell they stay put and every move
    /// is rejected until the host respawns them.
    pub fn load_level(&mut self, level: Level) -> Result<(), MovementError> {
        level
            .validate()
            .map_err(|e| MovementError::MisconfiguredLevel(e.to_string()))
            .inspect_err(|e| error!("Refusing level {:?}: {}", level.name, e))?;

        for (&id, mover) in self.movers.iter_mut() {
            mover.reset();
            let cell = mover.position().cell();
            if level.grid.is_passable(cell) {
                continue;
            }
            match level.spawn {
                Some(spawn) => {
                    let position = GridPosition::from_cell(spawn, mover.position().y);
                    mover.set_position_no_motion(position)?;
                    warn!("Mover {} stranded at {}; moved to spawn {}", id, cell, spawn);
                    self.events.push(MovementEvent::new(
                        self.frame,
                        id,
                        MovementEventData::Teleported { to: position },
                    ));
                }
                None => warn!("Mover {} stranded at {} and level has no spawn cell", id, cell),
            }
        }

        info!(
            "Level {:?} loaded: {}x{}, {} obstacles, {:?}",
            level.name,
            level.grid.width(),
            level.grid.depth(),
            level.grid.obstacle_count(),
            level.rules
        );
        self.level = Some(level);
        Ok(())
    }

    /// Remove the current level. Movers keep their positions but stop.
    pub fn unload_level(&mut self) -> Option<Level> {
        for mover in self.movers.values_mut() {
            mover.reset();
        }
        self.level.take()
    }

    /// The loaded level.
    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// Mutable access for obstacle placement between moves.
    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.level.as_mut()
    }

    /// Place a mover on `cell`, creating it if needed.
    ///
    /// An existing mover is stopped and teleported.
    pub fn spawn_mover(&mut self, id: MoverId, cell: Cell) -> Result<(), MovementError> {
        let level = self
            .level
            .as_ref()
            .ok_or_else(|| MovementError::MisconfiguredLevel("no level loaded".to_string()))?;
        if !level.grid.is_passable(cell) {
            return Err(MovementError::CellBlocked { x: cell.x, z: cell.z });
        }

        let position = GridPosition::from_cell(cell, 0.0);
        match self.movers.get_mut(&id) {
            Some(mover) => {
                mover.reset();
                mover.set_position_no_motion(position)?;
            }
            None => {
                self.movers.insert(id, MotionInterpolator::new(position, &self.config));
            }
        }

        debug!("Mover {} placed at {}", id, cell);
        self.events.push(MovementEvent::new(
            self.frame,
            id,
            MovementEventData::Teleported { to: position },
        ));
        Ok(())
    }

    /// Place a mover on the level's spawn cell.
    pub fn spawn_mover_at_start(&mut self, id: MoverId) -> Result<(), MovementError> {
        let spawn = self
            .level
            .as_ref()
            .ok_or_else(|| MovementError::MisconfiguredLevel("no level loaded".to_string()))?
            .spawn
            .ok_or_else(|| MovementError::MisconfiguredLevel("level has no spawn cell".to_string()))?;
        self.spawn_mover(id, spawn)
    }

    /// Forget a mover.
    pub fn remove_mover(&mut self, id: MoverId) -> Option<MotionInterpolator> {
        self.movers.remove(&id)
    }

    /// Connect a visual model to a mover.
    pub fn attach_model(&mut self, id: MoverId, model: Box<dyn MoverModel>) -> Result<(), MovementError> {
        let mover = self
            .movers
            .get_mut(&id)
            .ok_or(MovementError::MissingMoverReference(id))?;
        mover.attach_model(model);
        Ok(())
    }

    /// Request a move. Failures are logged and returned as `Rejected`.
    #[instrument(skip(self))]
    pub fn attempt_move(&mut self, id: MoverId, direction: Direction) -> MoveOutcome {
        match self.try_attempt_move(id, direction) {
            Ok(outcome) => outcome,
            Err(e) => self.reject(id, e),
        }
    }

    /// Request a move from a raw input token such as `"LEFT"`.
    pub fn attempt_move_token(&mut self, id: MoverId, token: &str) -> MoveOutcome {
        match token.parse::<Direction>() {
            Ok(direction) => self.attempt_move(id, direction),
            Err(e) => self.reject(id, e),
        }
    }

    /// Request a move, surfacing the failure instead of logging it.
    pub fn try_attempt_move(&mut self, id: MoverId, direction: Direction) -> Result<MoveOutcome, MovementError> {
        let level = self
            .level
            .as_ref()
            .ok_or_else(|| MovementError::MisconfiguredLevel("no level loaded".to_string()))?;
        let mover = self
            .movers
            .get_mut(&id)
            .ok_or(MovementError::MissingMoverReference(id))?;
        let frame = self.frame;

        let redirecting = mover.is_moving();
        if redirecting && self.config.redirect_policy == RedirectPolicy::Ignore {
            debug!("Mover {} busy; ignoring {}", id, direction);
            self.events.push(MovementEvent::new(frame, id, MovementEventData::Busy { direction }));
            return Ok(MoveOutcome::Busy);
        }

        let from = mover.position();
        let destination = try_resolve(direction, from, &level.rules, &level.grid)?;

        if destination == from {
            debug!("Mover {} blocked moving {} at {}", id, direction, from);
            self.events.push(MovementEvent::new(
                frame,
                id,
                MovementEventData::Blocked { direction, at: from },
            ));
            return Ok(MoveOutcome::Blocked);
        }

        let speed = level.speed.unwrap_or(self.config.default_speed);
        let total_frames = match mover.start_movement(destination, speed)? {
            StartOutcome::Started { total_frames, .. } => total_frames,
            StartOutcome::AlreadyThere => return Ok(MoveOutcome::Blocked),
        };

        let (data, outcome) = if redirecting {
            (
                MovementEventData::Redirected { direction, from, to: destination, total_frames },
                MoveOutcome::Redirected { destination, total_frames },
            )
        } else {
            (
                MovementEventData::Started { direction, from, to: destination, total_frames },
                MoveOutcome::Started { destination, total_frames },
            )
        };
        self.events.push(MovementEvent::new(frame, id, data));
        Ok(outcome)
    }

    /// Advance every mover by one frame of `dt` seconds.
    ///
    /// Call exactly once per rendered frame.
    pub fn per_frame_update(&mut self, dt: f64) -> FrameResult {
        self.frame += 1;
        let mut result = FrameResult {
            frame: self.frame,
            ..FrameResult::default()
        };

        // BTreeMap iterates in id order
        for (id, mover) in self.movers.iter_mut() {
            match mover.per_frame_tick(dt) {
                TickOutcome::Idle => {}
                TickOutcome::Moving { position, .. } => {
                    result.positions.push((*id, position));
                }
                TickOutcome::Completed { position } => {
                    result.positions.push((*id, position));
                    result.completed.push(*id);
                    self.events.push(MovementEvent::new(
                        self.frame,
                        *id,
                        MovementEventData::Completed { at: position },
                    ));
                }
            }
        }

        result.events = self.take_events();
        result
    }

    /// Advance every mover by one nominal frame (`1 / fps`).
    pub fn per_frame_update_nominal(&mut self) -> FrameResult {
        let dt = self.config.nominal_frame_dt();
        self.per_frame_update(dt)
    }

    /// Stop a mover where it stands.
    pub fn reset_mover(&mut self, id: MoverId) -> Result<(), MovementError> {
        let mover = self
            .movers
            .get_mut(&id)
            .ok_or(MovementError::MissingMoverReference(id))?;
        mover.reset();
        Ok(())
    }

    /// Current position of a mover.
    pub fn position(&self, id: MoverId) -> Option<GridPosition> {
        self.movers.get(&id).map(MotionInterpolator::position)
    }

    /// True while the mover has an active run.
    pub fn is_moving(&self, id: MoverId) -> bool {
        self.movers.get(&id).is_some_and(MotionInterpolator::is_moving)
    }

    /// Borrow a mover's interpolator.
    pub fn mover(&self, id: MoverId) -> Option<&MotionInterpolator> {
        self.movers.get(&id)
    }

    /// Registered mover ids in ascending order.
    pub fn mover_ids(&self) -> impl Iterator<Item = MoverId> + '_ {
        self.movers.keys().copied()
    }

    /// True when any mover has an active run.
    pub fn any_moving(&self) -> bool {
        self.movers.values().any(MotionInterpolator::is_moving)
    }

    /// Frames processed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Drain events not yet returned by `per_frame_update`.
    pub fn take_events(&mut self) -> Vec<MovementEvent> {
        std::mem::take(&mut self.events)
    }

    fn reject(&mut self, id: MoverId, e: MovementError) -> MoveOutcome {
        error!("Move for mover {} rejected: {}", id, e);
        self.events.push(MovementEvent::new(
            self.frame,
            id,
            MovementEventData::Rejected { reason: e.to_string() },
        ));
        MoveOutcome::Rejected(e)
    }
}
