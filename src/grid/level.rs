//! Level Grid
//!
//! Dense in-memory grid of optional obstacle occupants. Owned and mutated
//! by level loading; movement only reads it through `ObstacleScanner`.

use serde::{Serialize, Deserialize};

use crate::core::direction::{Axis, Direction};
use crate::core::position::Cell;
use crate::grid::loader::LevelError;
use crate::grid::scanner::ObstacleScanner;

/// Largest accepted width or depth for a loaded level.
pub const MAX_GRID_DIMENSION: u32 = 4096;

/// Inclusive grid extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Boundary {
    /// Smallest valid x
    pub min_x: i32,
    /// Largest valid x
    pub max_x: i32,
    /// Smallest valid z
    pub min_z: i32,
    /// Largest valid z
    pub max_z: i32,
}

impl Boundary {
    /// Create a boundary from inclusive limits.
    pub const fn new(min_x: i32, max_x: i32, min_z: i32, max_z: i32) -> Self {
        Self { min_x, max_x, min_z, max_z }
    }

    /// Boundary of a `width` x `depth` grid anchored at the origin.
    pub fn from_dimensions(width: u32, depth: u32) -> Self {
        Self {
            min_x: 0,
            max_x: i32::try_from(width).unwrap_or(i32::MAX).saturating_sub(1),
            min_z: 0,
            max_z: i32::try_from(depth).unwrap_or(i32::MAX).saturating_sub(1),
        }
    }

    /// True when the boundary contains no cell.
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_z < self.min_z
    }

    /// Check if a cell is inside.
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.min_x && cell.x <= self.max_x && cell.z >= self.min_z && cell.z <= self.max_z
    }

    /// Clamp each axis independently into the boundary.
    #[inline]
    pub fn clamp(&self, cell: Cell) -> Cell {
        Cell {
            x: cell.x.max(self.min_x).min(self.max_x),
            z: cell.z.max(self.min_z).min(self.max_z),
        }
    }

    /// Coordinate of the far edge in `direction` (x for LEFT/RIGHT, z for UP/DOWN).
    #[inline]
    pub fn edge(&self, direction: Direction) -> i32 {
        match direction {
            Direction::Up => self.max_z,
            Direction::Down => self.min_z,
            Direction::Left => self.min_x,
            Direction::Right => self.max_x,
        }
    }

    /// Number of steps across the boundary along `direction`'s axis.
    #[inline]
    pub fn span(&self, direction: Direction) -> u32 {
        let (lo, hi) = match direction.axis() {
            Axis::X => (self.min_x, self.max_x),
            Axis::Z => (self.min_z, self.max_z),
        };
        if hi < lo {
            0
        } else {
            hi.abs_diff(lo)
        }
    }
}

/// Kinds of grid-blocking entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Boulder
    Rock,
    /// Tree
    Tree,
    /// Wall segment
    Wall,
    /// Pushable crate (static as far as movement is concerned)
    Crate,
    /// Water tile
    Water,
}

/// An obstacle occupying one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obstacle {
    /// What the obstacle is
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Create a new obstacle.
    pub const fn new(kind: ObstacleKind) -> Self {
        Self { kind }
    }
}

/// Width x depth grid of optional occupants, indexed by (x, z).
#[derive(Clone, Debug, PartialEq)]
pub struct LevelGrid {
    width: u32,
    depth: u32,
    cells: Vec<Option<Obstacle>>,
}

impl LevelGrid {
    /// Create an empty grid.
    ///
    /// Allocates `width * depth` cells; level files are capped at
    /// `MAX_GRID_DIMENSION` before reaching here.
    pub fn new(width: u32, depth: u32) -> Self {
        Self {
            width,
            depth,
            cells: vec![None; width as usize * depth as usize],
        }
    }

    /// Grid width (cells along X).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid depth (cells along Z).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of occupied cells.
    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Iterate occupied cells in row-major (z, then x) order.
    pub fn obstacles(&self) -> impl Iterator<Item = (Cell, &Obstacle)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().filter_map(move |(i, slot)| {
            slot.as_ref()
                .map(|o| (Cell::new((i % width) as i32, (i / width) as i32), o))
        })
    }

    /// Put an obstacle on a cell, returning whatever was there.
    pub fn place_obstacle(&mut self, cell: Cell, obstacle: Obstacle) -> Result<Option<Obstacle>, LevelError> {
        let idx = self
            .index(cell)
            .ok_or(LevelError::ObstacleOutOfBounds { x: cell.x, z: cell.z })?;
        Ok(self.cells[idx].replace(obstacle))
    }

    /// Clear a cell, returning the obstacle that was there.
    pub fn remove_obstacle(&mut self, cell: Cell) -> Option<Obstacle> {
        let idx = self.index(cell)?;
        self.cells[idx].take()
    }

    /// Remove every obstacle.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.x < 0 || cell.z < 0 {
            return None;
        }
        let (x, z) = (cell.x as u32, cell.z as u32);
        if x >= self.width || z >= self.depth {
            return None;
        }
        Some(z as usize * self.width as usize + x as usize)
    }
}

impl ObstacleScanner for LevelGrid {
    fn boundary(&self) -> Boundary {
        Boundary::from_dimensions(self.width, self.depth)
    }

    fn occupant(&self, x: i32, z: i32) -> Option<&Obstacle> {
        self.index(Cell::new(x, z))
            .and_then(|idx| self.cells[idx].as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_from_dimensions() {
        let b = LevelGrid::new(11, 21).boundary();
        assert_eq!(b, Boundary::new(0, 10, 0, 20));
        assert_eq!(b.span(Direction::Left), 10);
        assert_eq!(b.span(Direction::Up), 20);
        assert!(!b.is_empty());
        assert!(LevelGrid::new(0, 5).boundary().is_empty());
    }

    #[test]
    fn test_boundary_from_huge_dimensions_saturates() {
        let b = Boundary::from_dimensions(u32::MAX, 1 << 31);
        assert_eq!(b, Boundary::new(0, i32::MAX - 1, 0, i32::MAX - 1));
        assert!(!b.is_empty());
    }

    #[test]
    fn test_boundary_clamp() {
        let b = Boundary::new(0, 10, 0, 7);
        assert_eq!(b.clamp(Cell::new(-3, 9)), Cell::new(0, 7));
        assert_eq!(b.clamp(Cell::new(4, 4)), Cell::new(4, 4));
        assert_eq!(b.edge(Direction::Right), 10);
        assert_eq!(b.edge(Direction::Down), 0);
    }

    #[test]
    fn test_place_and_remove() {
        let mut grid = LevelGrid::new(4, 4);
        let rock = Obstacle::new(ObstacleKind::Rock);

        assert_eq!(grid.place_obstacle(Cell::new(2, 3), rock).unwrap(), None);
        assert_eq!(grid.occupant(2, 3), Some(&rock));
        assert_eq!(grid.obstacle_count(), 1);
        assert!(!grid.is_passable(Cell::new(2, 3)));

        let tree = Obstacle::new(ObstacleKind::Tree);
        assert_eq!(grid.place_obstacle(Cell::new(2, 3), tree).unwrap(), Some(rock));

        assert_eq!(grid.remove_obstacle(Cell::new(2, 3)), Some(tree));
        assert_eq!(grid.occupant(2, 3), None);
        assert!(grid.is_passable(Cell::new(2, 3)));
    }

    #[test]
    fn test_place_out_of_bounds() {
        let mut grid = LevelGrid::new(4, 4);
        let err = grid
            .place_obstacle(Cell::new(4, 0), Obstacle::new(ObstacleKind::Wall))
            .unwrap_err();
        assert!(matches!(err, LevelError::ObstacleOutOfBounds { x: 4, z: 0 }));
        assert_eq!(grid.occupant(-1, 0), None);
    }

    #[test]
    fn test_obstacles_iter_order() {
        let mut grid = LevelGrid::new(3, 3);
        grid.place_obstacle(Cell::new(2, 0), Obstacle::new(ObstacleKind::Rock)).unwrap();
        grid.place_obstacle(Cell::new(0, 2), Obstacle::new(ObstacleKind::Crate)).unwrap();
        let cells: Vec<Cell> = grid.obstacles().map(|(c, _)| c).collect();
        assert_eq!(cells, vec![Cell::new(2, 0), Cell::new(0, 2)]);

        grid.clear();
        assert_eq!(grid.obstacle_count(), 0);
    }
}
