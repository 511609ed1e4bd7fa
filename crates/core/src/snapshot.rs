//! Read-only view of a session for renderers and tests

use arrayvec::ArrayVec;

use crate::pieces::MAX_CUBES;
use crate::types::{CellIndex, PieceShape, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub shape: PieceShape,
    pub cells: ArrayVec<CellIndex, MAX_CUBES>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub planes: usize,
    pub rows: usize,
    pub cols: usize,
    /// Frozen cubes, `[plane][row][col]` flattened
    pub occupied: Vec<bool>,
    pub active: Option<ActiveSnapshot>,
    pub next: Option<PieceShape>,
    pub state: SessionState,
    pub score: u32,
    pub high_score: u32,
    pub timeout_secs: f32,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn is_occupied(&self, plane: usize, row: usize, col: usize) -> bool {
        let idx = (plane * self.rows + row) * self.cols + col;
        self.occupied.get(idx).copied().unwrap_or(false)
    }

    /// True if a cube of the active piece is at the cell
    pub fn is_active(&self, plane: usize, row: usize, col: usize) -> bool {
        let cell = CellIndex::new(plane as i32, row as i32, col as i32);
        self.active
            .as_ref()
            .is_some_and(|a| a.cells.contains(&cell))
    }

    pub fn fill_count(&self, plane: usize) -> usize {
        let per_plane = self.rows * self.cols;
        self.occupied
            .iter()
            .skip(plane * per_plane)
            .take(per_plane)
            .filter(|&&o| o)
            .count()
    }

    pub fn playable(&self) -> bool {
        self.state == SessionState::Playing
    }
}
