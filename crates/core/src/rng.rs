//! RNG module - seeded shape selection
//!
//! The next shape is drawn uniformly from all shapes. A pending shape is kept
//! for the preview; each draw promotes it to the live piece and picks a new
//! pending one. A seeded LCG keeps every session reproducible.

use crate::types::PieceShape;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // A zero state would stick at the increment forever after; keep it off.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Random value in `[0, max)`.
    ///
    /// Uses the high bits; the low bits of an LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Live/pending shape selection
#[derive(Debug, Clone)]
pub struct ShapeQueue {
    pending: Option<PieceShape>,
    rng: SimpleRng,
}

impl ShapeQueue {
    pub fn new(seed: u32) -> Self {
        Self {
            pending: None,
            rng: SimpleRng::new(seed),
        }
    }

    fn random_shape(&mut self) -> PieceShape {
        let index = self.rng.next_range(PieceShape::COUNT as u32) as usize;
        PieceShape::from_index(index).unwrap_or(PieceShape::Single)
    }

    /// Shape shown in the next-piece preview
    pub fn peek(&self) -> Option<PieceShape> {
        self.pending
    }

    /// Promote the pending shape and pick a new pending one.
    ///
    /// The new pending shape is drawn first; on the very first call a second
    /// draw seeds the shape being promoted.
    pub fn draw(&mut self) -> PieceShape {
        let upcoming = self.random_shape();
        let live = match self.pending {
            Some(shape) => shape,
            None => self.random_shape(),
        };
        self.pending = Some(upcoming);
        live
    }

    /// Forget the pending shape; the next draw seeds it again
    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    /// Current RNG state (for restarting with the same stream)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for ShapeQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
