//! Direction Resolution
//!
//! Turns "move in direction D" into a single legal destination cell under
//! the level's `GameModeRules`. Pure and synchronous: the same inputs on an
//! unchanged grid always give the same destination.
//!
//! | bounded | obstacles ignored | destination                                   |
//! |---------|-------------------|-----------------------------------------------|
//! | no      | yes               | boundary edge along the axis                  |
//! | no      | no                | scan until out of bounds or occupied          |
//! | yes     | yes               | shift by max distance, clamp each axis        |
//! | yes     | no                | scan at most max distance steps               |
//!
//! Obstacle-aware branches never jump a blocked cell: the destination is
//! always reachable in a straight, unobstructed line from the origin.

use tracing::{debug, error, warn};

use crate::core::direction::{Axis, Direction};
use crate::core::position::{Cell, GridPosition};
use crate::grid::rules::GameModeRules;
use crate::grid::scanner::ObstacleScanner;
use crate::movement::error::MovementError;

/// Resolve a destination, reporting why a move is impossible.
///
/// A non-integer origin (a mover caught mid-run) is snapped to its nearest
/// cell first. The origin's height is carried into the destination.
pub fn try_resolve<S>(
    direction: Direction,
    current: GridPosition,
    rules: &GameModeRules,
    grid: &S,
) -> Result<GridPosition, MovementError>
where
    S: ObstacleScanner + ?Sized,
{
    if !current.is_finite() {
        return Err(MovementError::InvalidDestination);
    }

    let origin = current.cell();
    if !grid.is_within_bounds(origin.x, current.y, origin.z) {
        return Err(MovementError::OriginOutOfBounds { x: origin.x, z: origin.z });
    }

    let destination = resolve_cell(direction, origin, rules, grid);
    debug!(
        "Resolved {} from {} to {} (bounded: {}, ignore obstacles: {})",
        direction, origin, destination, rules.movement_is_bounded, rules.obstacles_are_ignored
    );

    if destination == origin && current.is_on_grid() {
        return Ok(current);
    }
    Ok(GridPosition::from_cell(destination, current.y))
}

/// Resolve a destination. Any failure is logged and the move is denied by
/// returning `current` unchanged.
pub fn resolve<S>(
    direction: Direction,
    current: GridPosition,
    rules: &GameModeRules,
    grid: &S,
) -> GridPosition
where
    S: ObstacleScanner + ?Sized,
{
    match try_resolve(direction, current, rules, grid) {
        Ok(destination) => destination,
        Err(e) => {
            warn!("Movement {} denied from {}: {}", direction, current, e);
            current
        }
    }
}

/// Resolve from a raw input token such as `"UP"`.
///
/// An unrecognized token is logged as an error and yields `current`.
pub fn resolve_token<S>(
    token: &str,
    current: GridPosition,
    rules: &GameModeRules,
    grid: &S,
) -> GridPosition
where
    S: ObstacleScanner + ?Sized,
{
    match token.parse::<Direction>() {
        Ok(direction) => resolve(direction, current, rules, grid),
        Err(e) => {
            error!("{}", e);
            current
        }
    }
}

fn resolve_cell<S>(direction: Direction, origin: Cell, rules: &GameModeRules, grid: &S) -> Cell
where
    S: ObstacleScanner + ?Sized,
{
    let boundary = grid.boundary();

    match (rules.movement_is_bounded, rules.obstacles_are_ignored) {
        (false, true) => {
            let edge = boundary.edge(direction);
            match direction.axis() {
                Axis::X => Cell::new(edge, origin.z),
                Axis::Z => Cell::new(origin.x, edge),
            }
        }
        (false, false) => grid.scan_until_blocked(origin, direction, None),
        (true, true) => {
            let steps = rules.max_movement_distance.min(i32::MAX as u32) as i32;
            boundary.clamp(origin.offset(direction, steps))
        }
        (true, false) => grid.scan_until_blocked(origin, direction, Some(rules.max_movement_distance)),
    }
}
