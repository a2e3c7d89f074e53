//! Trajectory Hashing
//!
//! SHA-256 digests over the positions a mover passes through, frame by
//! frame. Two runs with identical inputs and frame times must produce
//! identical digests; the demo binary uses this to verify replays.

use sha2::{Sha256, Digest};

use super::position::{Cell, GridPosition};

/// Hash output type (256 bits / 32 bytes)
pub type TrajectoryDigest = [u8; 32];

/// Incremental hasher for recorded trajectories.
///
/// Order of updates is significant.
pub struct TrajectoryHasher {
    hasher: Sha256,
    frames: u64,
}

impl TrajectoryHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher, frames: 0 }
    }

    /// Create hasher for mover trajectories.
    pub fn for_trajectory() -> Self {
        Self::new(b"GRIDSTEP_TRAJECTORY_V1")
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with the exact bit pattern of an f64.
    #[inline]
    pub fn update_f64(&mut self, value: f64) {
        self.hasher.update(value.to_bits().to_le_bytes());
    }

    /// Update with a position.
    #[inline]
    pub fn update_position(&mut self, value: GridPosition) {
        self.update_f64(value.x);
        self.update_f64(value.y);
        self.update_f64(value.z);
    }

    /// Update with a cell.
    #[inline]
    pub fn update_cell(&mut self, value: Cell) {
        self.hasher.update(value.x.to_le_bytes());
        self.hasher.update(value.z.to_le_bytes());
    }

    /// Record one frame: frame index, mover and position.
    pub fn record_frame(&mut self, frame: u64, mover: u32, position: GridPosition) {
        self.update_u64(frame);
        self.update_u32(mover);
        self.update_position(position);
        self.frames += 1;
    }

    /// Number of frames recorded so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> TrajectoryDigest {
        self.hasher.finalize().into()
    }
}

impl Default for TrajectoryHasher {
    fn default() -> Self {
        Self::for_trajectory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_trajectories_match() {
        let mut a = TrajectoryHasher::for_trajectory();
        let mut b = TrajectoryHasher::for_trajectory();
        for i in 0..10 {
            let p = GridPosition::new(i as f64 * 0.1, 0.0, 5.0);
            a.record_frame(i, 1, p);
            b.record_frame(i, 1, p);
        }
        assert_eq!(a.frames(), 10);
        assert_eq!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_order_matters() {
        let p = GridPosition::new(1.0, 0.0, 2.0);
        let q = GridPosition::new(2.0, 0.0, 1.0);

        let mut a = TrajectoryHasher::for_trajectory();
        a.update_position(p);
        a.update_position(q);

        let mut b = TrajectoryHasher::for_trajectory();
        b.update_position(q);
        b.update_position(p);

        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_domain_separation() {
        let a = TrajectoryHasher::new(b"A").finalize();
        let b = TrajectoryHasher::new(b"B").finalize();
        assert_ne!(a, b);
    }
}
