//! Grid module - the 3D occupancy store
//!
//! The grid is a stack of planes, each `rows x columns` cells. Every cell is
//! either empty or holds the handle of the frozen cube sitting in it.
//! Uses a flat array (plane-major, then row, then column) plus a per-plane fill
//! counter that is maintained incrementally and never recomputed by a scan.
//!
//! Coordinates: `[plane][row][col]`, plane 0 is the floor.

use crate::types::{CellIndex, CubeId, GameEvent, Settings, SoundCue};

/// Cell in the grid (None = empty, Some = frozen cube)
pub type Slot = Option<CubeId>;

/// The occupancy store
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    planes: usize,
    rows: usize,
    cols: usize,
    /// Flat array of cells, `(plane * rows + row) * cols + col`
    cells: Vec<Slot>,
    /// Number of occupied cells in each plane
    plane_fill: Vec<usize>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(planes: usize, rows: usize, cols: usize) -> Self {
        assert!(planes > 0 && rows > 0 && cols > 0, "grid dimensions must be non-zero");
        Self {
            planes,
            rows,
            cols,
            cells: vec![None; planes * rows * cols],
            plane_fill: vec![0; planes],
        }
    }

    /// Create an empty grid sized by the given settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.planes as usize,
            settings.rows as usize,
            settings.columns as usize,
        )
    }

    pub fn planes(&self) -> usize {
        self.planes
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Capacity of one plane
    pub fn cells_per_plane(&self) -> usize {
        self.rows * self.cols
    }

    /// Flat index of an in-range cell. Out-of-range input is a caller bug.
    #[inline(always)]
    fn index(&self, plane: usize, row: usize, col: usize) -> usize {
        assert!(
            plane < self.planes && row < self.rows && col < self.cols,
            "grid index [{plane}][{row}][{col}] out of range"
        );
        (plane * self.rows + row) * self.cols + col
    }

    /// Check whether a signed cell index lies inside the grid
    pub fn in_bounds(&self, cell: CellIndex) -> bool {
        self.plane_in_bounds(cell.plane) && self.row_in_bounds(cell.row) && self.col_in_bounds(cell.col)
    }

    pub fn plane_in_bounds(&self, plane: i32) -> bool {
        plane >= 0 && (plane as usize) < self.planes
    }

    pub fn row_in_bounds(&self, row: i32) -> bool {
        row >= 0 && (row as usize) < self.rows
    }

    pub fn col_in_bounds(&self, col: i32) -> bool {
        col >= 0 && (col as usize) < self.cols
    }

    /// Check if a cell holds a frozen cube.
    ///
    /// Callers bounds-check first; an out-of-range index panics.
    pub fn is_occupied(&self, plane: usize, row: usize, col: usize) -> bool {
        self.cells[self.index(plane, row, col)].is_some()
    }

    /// Same as [`Grid::is_occupied`] for a signed cell already known to be in bounds
    pub fn is_occupied_at(&self, cell: CellIndex) -> bool {
        self.is_occupied(cell.plane as usize, cell.row as usize, cell.col as usize)
    }

    /// Handle of the cube occupying a cell, if any
    pub fn occupant(&self, plane: usize, row: usize, col: usize) -> Slot {
        self.cells[self.index(plane, row, col)]
    }

    /// Mark a cell as occupied by `cube`.
    ///
    /// # Panics
    ///
    /// If the cell was already occupied or the plane would exceed its
    /// capacity. Either means the occupancy model is corrupt.
    pub fn occupy(&mut self, plane: usize, row: usize, col: usize, cube: CubeId) {
        let idx = self.index(plane, row, col);
        assert!(
            self.cells[idx].is_none(),
            "cell [{plane}][{row}][{col}] already holds {:?}",
            self.cells[idx]
        );
        self.cells[idx] = Some(cube);
        self.plane_fill[plane] += 1;
        assert!(
            self.plane_fill[plane] <= self.cells_per_plane(),
            "plane {plane} fill count {} exceeds capacity {}",
            self.plane_fill[plane],
            self.cells_per_plane()
        );
    }

    /// Cached number of occupied cells in a plane
    pub fn fill_count(&self, plane: usize) -> usize {
        self.plane_fill[plane]
    }

    /// Count occupied cells in a plane by scanning it.
    ///
    /// Only used to verify the cached counter; the engine never needs it.
    pub fn scan_plane(&self, plane: usize) -> usize {
        let start = self.index(plane, 0, 0);
        let end = start + self.cells_per_plane();
        self.cells[start..end].iter().filter(|c| c.is_some()).count()
    }

    /// A plane is full when every one of its cells is occupied
    pub fn is_plane_full(&self, plane: usize) -> bool {
        self.plane_fill[plane] == self.cells_per_plane()
    }

    /// Number of full planes
    pub fn full_plane_count(&self) -> usize {
        (0..self.planes).filter(|&p| self.is_plane_full(p)).count()
    }

    /// Topmost full plane, if any
    pub fn topmost_full_plane(&self) -> Option<usize> {
        (0..self.planes).rev().find(|&p| self.is_plane_full(p))
    }

    /// Empty every cell of a plane.
    ///
    /// Emits one `CubeExploded` per destroyed cube and a single
    /// `PlaneCleared` cue for the whole plane.
    ///
    /// # Panics
    ///
    /// If the cached fill count disagrees with what is found in the plane.
    pub fn clear_plane(&mut self, plane: usize, events: &mut Vec<GameEvent>) {
        let expected = self.plane_fill[plane];
        let mut destroyed = 0usize;

        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = self.index(plane, row, col);
                if let Some(cube) = self.cells[idx].take() {
                    destroyed += 1;
                    events.push(GameEvent::CubeExploded {
                        cube,
                        cell: CellIndex::new(plane as i32, row as i32, col as i32),
                    });
                }
            }
        }

        assert_eq!(
            destroyed, expected,
            "plane {plane} held {destroyed} cubes but its counter said {expected}"
        );
        self.plane_fill[plane] = 0;
        events.push(GameEvent::Sound(SoundCue::PlaneCleared));
    }

    /// Shift every plane above `plane` down by one index.
    ///
    /// Cell `[i][j][k]` moves to `[i-1][j][k]` for all `i > plane`, fill
    /// counters follow, and the topmost plane ends up empty. The target plane
    /// must already be empty (see [`Grid::clear_plane`]).
    pub fn collapse_above(&mut self, plane: usize, events: &mut Vec<GameEvent>) {
        assert_eq!(
            self.plane_fill[plane], 0,
            "collapsing onto non-empty plane {plane}"
        );
        let width = self.cells_per_plane();

        for upper in plane + 1..self.planes {
            let src = upper * width;
            let dst = (upper - 1) * width;
            for offset in 0..width {
                if let Some(cube) = self.cells[src + offset].take() {
                    self.cells[dst + offset] = Some(cube);
                    let row = offset / self.cols;
                    let col = offset % self.cols;
                    events.push(GameEvent::CubeShifted {
                        cube,
                        to: CellIndex::new((upper - 1) as i32, row as i32, col as i32),
                    });
                }
            }
            self.plane_fill[upper - 1] = self.plane_fill[upper];
            self.plane_fill[upper] = 0;
        }
    }

    /// Iterate all occupied cells with their cube handles
    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellIndex, CubeId)> + '_ {
        let rows = self.rows;
        let cols = self.cols;
        self.cells.iter().enumerate().filter_map(move |(i, slot)| {
            slot.map(|cube| {
                let plane = i / (rows * cols);
                let row = (i / cols) % rows;
                let col = i % cols;
                (CellIndex::new(plane as i32, row as i32, col as i32), cube)
            })
        })
    }

    /// Total number of frozen cubes
    pub fn cube_count(&self) -> usize {
        self.plane_fill.iter().sum()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Slot] {
        &self.cells
    }

    /// Empty the whole grid
    pub fn clear(&mut self) {
        self.cells.fill(None);
        self.plane_fill.fill(0);
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::from_settings(&Settings::STANDARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_plane(grid: &mut Grid, plane: usize, next_id: &mut u32) {
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                grid.occupy(plane, row, col, CubeId(*next_id));
                *next_id += 1;
            }
        }
    }

    fn assert_counters_consistent(grid: &Grid) {
        for p in 0..grid.planes() {
            assert_eq!(grid.fill_count(p), grid.scan_plane(p), "plane {p}");
        }
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(15, 5, 5);
        assert_eq!(grid.index(0, 0, 0), 0);
        assert_eq!(grid.index(0, 0, 4), 4);
        assert_eq!(grid.index(0, 1, 0), 5);
        assert_eq!(grid.index(1, 0, 0), 25);
        assert_eq!(grid.index(14, 4, 4), 374);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_grid_index_out_of_range_panics() {
        let grid = Grid::new(15, 5, 5);
        grid.is_occupied(0, 5, 0);
    }

    #[test]
    fn test_occupy_updates_fill_count() {
        let mut grid = Grid::default();
        grid.occupy(3, 1, 2, CubeId(7));

        assert!(grid.is_occupied(3, 1, 2));
        assert_eq!(grid.occupant(3, 1, 2), Some(CubeId(7)));
        assert_eq!(grid.fill_count(3), 1);
        assert_eq!(grid.cells()[(3 * 5 + 1) * 5 + 2], Some(CubeId(7)));
        assert_counters_consistent(&grid);
    }

    #[test]
    #[should_panic(expected = "already holds")]
    fn test_occupy_twice_is_fatal() {
        let mut grid = Grid::default();
        grid.occupy(0, 0, 0, CubeId(1));
        grid.occupy(0, 0, 0, CubeId(2));
    }

    #[test]
    fn test_full_plane_detection() {
        let mut grid = Grid::new(4, 2, 2);
        let mut id = 0;
        fill_plane(&mut grid, 1, &mut id);

        assert!(grid.is_plane_full(1));
        assert!(!grid.is_plane_full(0));
        assert_eq!(grid.full_plane_count(), 1);
        assert_eq!(grid.topmost_full_plane(), Some(1));
    }

    #[test]
    fn test_clear_plane_emits_single_cue() {
        let mut grid = Grid::new(4, 2, 2);
        let mut id = 0;
        fill_plane(&mut grid, 0, &mut id);

        let mut events = Vec::new();
        grid.clear_plane(0, &mut events);

        assert_eq!(grid.fill_count(0), 0);
        let cues = events
            .iter()
            .filter(|e| **e == GameEvent::Sound(SoundCue::PlaneCleared))
            .count();
        let explosions = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CubeExploded { .. }))
            .count();
        assert_eq!(cues, 1);
        assert_eq!(explosions, 4);
        assert_counters_consistent(&grid);
    }

    #[test]
    fn test_collapse_above_moves_everything_down() {
        let mut grid = Grid::new(4, 2, 2);
        grid.occupy(2, 0, 1, CubeId(10));
        grid.occupy(3, 1, 1, CubeId(11));

        let mut events = Vec::new();
        grid.collapse_above(0, &mut events);

        assert_eq!(grid.occupant(1, 0, 1), Some(CubeId(10)));
        assert_eq!(grid.occupant(2, 1, 1), Some(CubeId(11)));
        assert_eq!(grid.fill_count(3), 0);
        assert_eq!(grid.fill_count(2), 1);
        assert_eq!(grid.fill_count(1), 1);
        assert_eq!(events.len(), 2);
        assert_counters_consistent(&grid);
    }

    #[test]
    fn test_occupied_cells_reports_coordinates() {
        let mut grid = Grid::default();
        grid.occupy(14, 4, 3, CubeId(1));
        grid.occupy(0, 2, 0, CubeId(2));

        let mut cells: Vec<_> = grid.occupied_cells().collect();
        cells.sort();
        assert_eq!(
            cells,
            vec![
                (CellIndex::new(0, 2, 0), CubeId(2)),
                (CellIndex::new(14, 4, 3), CubeId(1)),
            ]
        );
        assert_eq!(grid.cube_count(), 2);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut grid = Grid::new(3, 2, 2);
        let mut id = 0;
        fill_plane(&mut grid, 2, &mut id);
        grid.clear();
        assert_eq!(grid.cube_count(), 0);
        assert!(grid.cells().iter().all(|c| c.is_none()));
    }
}
