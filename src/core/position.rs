//! Grid Positions
//!
//! `GridPosition` is the continuous 3D position a mover occupies while it
//! animates. `Cell` is the discrete (x, z) tile it resolves to.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

use super::direction::Direction;

/// 3D position with planar movement on X/Z. Y is carried through unchanged.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridPosition {
    /// X component (LEFT/RIGHT axis)
    pub x: f64,
    /// Y component (height, constant during movement)
    pub y: f64,
    /// Z component (UP/DOWN axis)
    pub z: f64,
}

impl GridPosition {
    /// Origin
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Create a new position.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Position at the centre of a cell, at height `y`.
    #[inline]
    pub fn from_cell(cell: Cell, y: f64) -> Self {
        Self {
            x: cell.x as f64,
            y,
            z: cell.z as f64,
        }
    }

    /// Nearest grid cell.
    #[inline]
    pub fn cell(self) -> Cell {
        Cell::new(self.x.round() as i32, self.z.round() as i32)
    }

    /// True when x and z sit exactly on integer coordinates.
    #[inline]
    pub fn is_on_grid(self) -> bool {
        self.x.fract() == 0.0 && self.z.fract() == 0.0
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Scale by a scalar.
    #[inline]
    pub fn scale(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }

    /// Squared length.
    #[inline]
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Length (magnitude).
    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Straight-line distance to another position.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Normalize to unit length.
    /// Returns ZERO if length is zero, so callers never see NaN.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return Self::ZERO;
        }
        self.scale(1.0 / len)
    }

    /// Linear interpolation. t = 0 returns self, t = 1 returns other.
    #[inline]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self).scale(t)
    }
}

impl Add for GridPosition {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for GridPosition {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Neg for GridPosition {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.scale(-1.0)
    }
}

impl Mul<f64> for GridPosition {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl fmt::Debug for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Discrete tile coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Column
    pub x: i32,
    /// Row
    pub z: i32,
}

impl Cell {
    /// Create a new cell.
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The cell `steps` units away along `direction`.
    #[inline]
    pub fn offset(self, direction: Direction, steps: i32) -> Self {
        let (dx, dz) = direction.delta();
        Self {
            x: self.x.saturating_add(dx.saturating_mul(steps)),
            z: self.z.saturating_add(dz.saturating_mul(steps)),
        }
    }

    /// The adjacent cell along `direction`.
    #[inline]
    pub fn step(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }

    /// Manhattan distance to another cell.
    #[inline]
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_is_zero() {
        let n = GridPosition::ZERO.normalize();
        assert_eq!(n, GridPosition::ZERO);
        assert!(n.is_finite());
    }

    #[test]
    fn test_normalize_axis() {
        let v = GridPosition::new(5.0, 0.0, 0.0).normalize();
        assert_eq!(v, GridPosition::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_distance() {
        let a = GridPosition::new(0.0, 0.0, 0.0);
        let b = GridPosition::new(3.0, 0.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = GridPosition::new(1.0, 2.0, 3.0);
        let b = GridPosition::new(5.0, 2.0, -1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), GridPosition::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_cell_round_trip() {
        let p = GridPosition::new(4.4, 1.0, 6.6);
        assert_eq!(p.cell(), Cell::new(4, 7));
        assert!(!p.is_on_grid());
        let snapped = GridPosition::from_cell(p.cell(), p.y);
        assert_eq!(snapped, GridPosition::new(4.0, 1.0, 7.0));
        assert!(snapped.is_on_grid());
    }

    #[test]
    fn test_cell_offset() {
        let c = Cell::new(5, 5);
        assert_eq!(c.step(Direction::Up), Cell::new(5, 6));
        assert_eq!(c.step(Direction::Down), Cell::new(5, 4));
        assert_eq!(c.step(Direction::Left), Cell::new(4, 5));
        assert_eq!(c.offset(Direction::Right, 3), Cell::new(8, 5));
        assert_eq!(c.manhattan(Cell::new(8, 1)), 7);
    }
}
