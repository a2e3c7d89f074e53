//! Obstacle Scanner
//!
//! Query contract over a level grid. The stepwise scan lives here and only
//! here; the resolver delegates every obstacle-aware branch to it.

use crate::core::direction::Direction;
use crate::core::position::Cell;
use crate::grid::level::{Boundary, Obstacle};

/// Synchronous, read-only queries over a level's grid.
pub trait ObstacleScanner {
    /// Inclusive grid extent.
    fn boundary(&self) -> Boundary;

    /// Obstacle occupying `(x, z)`, if any.
    fn occupant(&self, x: i32, z: i32) -> Option<&Obstacle>;

    /// True when `(x, z)` lies inside the boundary. Movement is planar, so
    /// `y` only has to be finite.
    fn is_within_bounds(&self, x: i32, y: f64, z: i32) -> bool {
        y.is_finite() && self.boundary().contains(Cell::new(x, z))
    }

    /// True when a mover may stand on `cell`.
    fn is_passable(&self, cell: Cell) -> bool {
        self.boundary().contains(cell) && self.occupant(cell.x, cell.z).is_none()
    }

    /// Walk from `start` one cell at a time along `direction`.
    ///
    /// Stops before the first cell that is out of bounds or occupied, or
    /// after `max_steps` steps. Returns the last cell reached, which is
    /// `start` when the first step is already blocked. `None` scans until
    /// blocked; the boundary guarantees termination.
    fn scan_until_blocked(&self, start: Cell, direction: Direction, max_steps: Option<u32>) -> Cell {
        let boundary = self.boundary();
        let limit = max_steps.unwrap_or_else(|| boundary.span(direction));

        let mut current = start;
        for _ in 0..limit {
            let next = current.step(direction);
            if !self.is_passable(next) {
                break;
            }
            current = next;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::level::{LevelGrid, ObstacleKind};

    fn grid() -> LevelGrid {
        // Boundary {0, 10, 0, 20}
        LevelGrid::new(11, 21)
    }

    #[test]
    fn test_scan_to_edge() {
        let g = grid();
        assert_eq!(g.scan_until_blocked(Cell::new(5, 5), Direction::Right, None), Cell::new(10, 5));
        assert_eq!(g.scan_until_blocked(Cell::new(5, 5), Direction::Left, None), Cell::new(0, 5));
        assert_eq!(g.scan_until_blocked(Cell::new(5, 5), Direction::Up, None), Cell::new(5, 20));
        assert_eq!(g.scan_until_blocked(Cell::new(5, 5), Direction::Down, None), Cell::new(5, 0));
    }

    #[test]
    fn test_scan_stops_before_obstacle() {
        let mut g = grid();
        g.place_obstacle(Cell::new(8, 5), Obstacle::new(ObstacleKind::Rock)).unwrap();
        assert_eq!(g.scan_until_blocked(Cell::new(5, 5), Direction::Right, None), Cell::new(7, 5));
    }

    #[test]
    fn test_scan_blocked_immediately() {
        let mut g = grid();
        g.place_obstacle(Cell::new(6, 5), Obstacle::new(ObstacleKind::Wall)).unwrap();
        assert_eq!(g.scan_until_blocked(Cell::new(5, 5), Direction::Right, None), Cell::new(5, 5));
    }

    #[test]
    fn test_scan_respects_max_steps() {
        let g = grid();
        assert_eq!(g.scan_until_blocked(Cell::new(5, 5), Direction::Up, Some(3)), Cell::new(5, 8));
        assert_eq!(g.scan_until_blocked(Cell::new(5, 5), Direction::Up, Some(0)), Cell::new(5, 5));
        assert_eq!(g.scan_until_blocked(Cell::new(5, 18), Direction::Up, Some(5)), Cell::new(5, 20));
    }

    #[test]
    fn test_bounds_ignore_height() {
        let g = grid();
        assert!(g.is_within_bounds(0, 12.5, 0));
        assert!(g.is_within_bounds(10, 0.0, 20));
        assert!(!g.is_within_bounds(11, 0.0, 0));
        assert!(!g.is_within_bounds(0, 0.0, -1));
        assert!(!g.is_within_bounds(0, f64::NAN, 0));
    }
}
