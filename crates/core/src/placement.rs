//! Placement module - collision engine for the active piece
//!
//! [`Placement`] owns the [`Grid`] and the active [`Piece`]. It decides whether
//! moves and rotations are legal, freezes pieces into the grid and clears full
//! planes. Side effects for the rendering and audio collaborators are pushed
//! into the caller's event buffer.

use glam::IVec3;
use tracing::{debug, info};

use crate::grid::Grid;
use crate::pieces::{spawn_anchor, Piece};
use crate::scoring::plane_clear_score;
use crate::types::{Axis, CellIndex, CubeId, GameEvent, PieceShape, RotationAxis, Settings, SoundCue};

/// Result of one full-plane pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearReport {
    pub planes: u32,
    pub score: u32,
}

/// How a spawn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The piece is active and falling.
    Placed,
    /// The spawn overlapped the stack and had to be pushed upward.
    Collided,
    /// The piece froze where it spawned.
    FrozeOnSpawn,
}

impl SpawnOutcome {
    pub fn is_game_over(self) -> bool {
        !matches!(self, SpawnOutcome::Placed)
    }
}

fn axis_delta(axis: Axis, amount: i32) -> IVec3 {
    match axis {
        Axis::X => IVec3::new(amount, 0, 0),
        Axis::Y => IVec3::new(0, amount, 0),
        Axis::Z => IVec3::new(0, 0, amount),
    }
}

/// Occupancy lookup where cells outside the grid count as empty
fn occupied_in_grid(grid: &Grid, cell: CellIndex) -> bool {
    grid.in_bounds(cell) && grid.is_occupied_at(cell)
}

fn cells_fit(grid: &Grid, cells: &[CellIndex], ignore_vertical_overflow: bool) -> bool {
    cells.iter().all(|&cell| {
        if !grid.row_in_bounds(cell.row) || !grid.col_in_bounds(cell.col) {
            return false;
        }
        if cell.plane < 0 {
            return false;
        }
        if cell.plane >= grid.planes() as i32 {
            return ignore_vertical_overflow;
        }
        !grid.is_occupied_at(cell)
    })
}

fn rests_on_stack(grid: &Grid, piece: &Piece) -> bool {
    piece
        .cells()
        .iter()
        .any(|cell| cell.plane == 0 || occupied_in_grid(grid, cell.below()))
}

fn can_translate(grid: &Grid, piece: &Piece, axis: Axis, amount: i32) -> bool {
    match axis {
        // Falling only checks the floor and ceiling; resting on the stack is
        // the freeze check's job. Raising must not pass into frozen cubes.
        Axis::Y => {
            let ceiling = 2 * grid.planes() as i32;
            let in_range = piece.center_heights().all(|h| {
                let next = h + 2 * amount;
                !(amount < 0 && next < 0) && next < ceiling
            });
            in_range
                && (amount < 0
                    || piece.cells().iter().all(|cell| {
                        let next = CellIndex::new(cell.plane + amount, cell.row, cell.col);
                        !occupied_in_grid(grid, next)
                    }))
        }
        Axis::X => piece.cells().iter().all(|cell| {
            let next = CellIndex::new(cell.plane, cell.row + amount, cell.col);
            grid.row_in_bounds(next.row) && !occupied_in_grid(grid, next)
        }),
        Axis::Z => piece.cells().iter().all(|cell| {
            let next = CellIndex::new(cell.plane, cell.row, cell.col + amount);
            grid.col_in_bounds(next.col) && !occupied_in_grid(grid, next)
        }),
    }
}

/// Collision engine: the only writer of the grid
#[derive(Debug, Clone)]
pub struct Placement {
    settings: Settings,
    grid: Grid,
    active: Option<Piece>,
    next_cube_id: u32,
    last_clear: Option<ClearReport>,
}

impl Placement {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            grid: Grid::from_settings(&settings),
            active: None,
            next_cube_id: 0,
            last_clear: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    /// Drop the active piece without committing it
    pub fn discard_active(&mut self) -> Option<Piece> {
        self.active.take()
    }

    /// Make `piece` the active piece, replacing any other
    pub fn set_active(&mut self, piece: Piece) {
        assert!(piece.is_playable(), "preview pieces never enter the grid");
        self.active = Some(piece);
    }

    fn alloc_cube_id(&mut self) -> CubeId {
        let id = CubeId(self.next_cube_id);
        self.next_cube_id = self.next_cube_id.wrapping_add(1);
        id
    }

    /// Build a piece with fresh cube handles, without activating it
    pub fn new_piece(&mut self, shape: PieceShape, anchor: CellIndex) -> Piece {
        let count = crate::pieces::shape_cells(shape).len();
        let ids: Vec<CubeId> = (0..count).map(|_| self.alloc_cube_id()).collect();
        Piece::new(shape, anchor, ids)
    }

    /// Commit a loose cube into the grid (stack setup, replays)
    pub fn place_cube(&mut self, cell: CellIndex) -> CubeId {
        assert!(self.grid.in_bounds(cell), "cube placed outside the grid: {cell:?}");
        let id = self.alloc_cube_id();
        self.grid
            .occupy(cell.plane as usize, cell.row as usize, cell.col as usize, id);
        id
    }

    /// True if every cube of `piece` sits on a free in-bounds cell.
    ///
    /// With `ignore_vertical_overflow`, cubes at or above the ceiling count as
    /// free; only the spawn escape loop uses it.
    pub fn is_valid_position(&self, piece: &Piece, ignore_vertical_overflow: bool) -> bool {
        cells_fit(&self.grid, &piece.cells(), ignore_vertical_overflow)
    }

    /// True if `piece` would freeze where it is
    fn should_freeze(&self, piece: &Piece) -> bool {
        rests_on_stack(&self.grid, piece)
    }

    /// Move the active piece by `amount` along `axis` if nothing is in the way
    pub fn attempt_translate(&mut self, axis: Axis, amount: i32, events: &mut Vec<GameEvent>) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        if !can_translate(&self.grid, piece, axis, amount) {
            events.push(GameEvent::Sound(SoundCue::Blocked));
            return false;
        }

        piece.translate(axis_delta(axis, amount));
        events.push(GameEvent::Sound(SoundCue::Move));
        events.push(GameEvent::PieceTranslated { axis, amount });
        true
    }

    /// Turn the active piece +90° about `axis`, checking the path at 45°.
    ///
    /// A rejected rotation leaves the piece exactly as it was.
    pub fn attempt_rotate(&mut self, axis: RotationAxis, events: &mut Vec<GameEvent>) -> bool {
        let Some(piece) = self.active.as_ref() else {
            return false;
        };
        if !piece.can_rotate() {
            return false;
        }

        if !cells_fit(&self.grid, &piece.cells_mid_turn(axis), false) {
            events.push(GameEvent::Sound(SoundCue::Blocked));
            return false;
        }

        let turned = piece.turned(axis);
        if !cells_fit(&self.grid, &turned.cells(), false) {
            events.push(GameEvent::Sound(SoundCue::Blocked));
            return false;
        }

        self.active = Some(turned);
        events.push(GameEvent::Sound(SoundCue::Move));
        events.push(GameEvent::PieceRotated { axis });
        true
    }

    /// Freeze the active piece if it rests on the floor or the stack.
    ///
    /// Freezing commits every cube to the grid and runs the full-plane pass.
    pub fn check_freeze(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let rests = self.active.as_ref().is_some_and(|piece| self.should_freeze(piece));
        if !rests {
            return false;
        }
        let Some(piece) = self.active.take() else {
            return false;
        };

        for (cell, cube) in piece.cells().iter().zip(piece.cubes()) {
            assert!(
                self.grid.in_bounds(*cell),
                "frozen cube {:?} outside the grid at {cell:?}",
                cube.id
            );
            self.grid
                .occupy(cell.plane as usize, cell.row as usize, cell.col as usize, cube.id);
        }
        debug!(shape = piece.shape().as_str(), cells = ?piece.cells(), "piece frozen");
        events.push(GameEvent::PieceFrozen {
            cubes: piece.cube_ids(),
        });

        self.process_full_planes(events);
        true
    }

    /// Clear every full plane, topmost first, collapsing after each.
    pub fn process_full_planes(&mut self, events: &mut Vec<GameEvent>) -> ClearReport {
        let full = self.grid.full_plane_count() as u32;
        let report = ClearReport {
            planes: full,
            score: plane_clear_score(self.settings.score_per_plane, full),
        };

        let mut cleared = 0;
        while cleared < full {
            let Some(plane) = self.grid.topmost_full_plane() else {
                break;
            };
            self.grid.clear_plane(plane, events);
            self.grid.collapse_above(plane, events);
            cleared += 1;
            info!(plane, "plane cleared");
        }
        assert_eq!(cleared, full, "full planes vanished while clearing");

        if full > 0 {
            self.last_clear = Some(report);
        }
        report
    }

    /// Create the next active piece at its spawn anchor.
    ///
    /// An overlapping spawn is pushed up until it no longer overlaps and is
    /// left uncommitted above the stack.
    pub fn spawn(&mut self, shape: PieceShape, events: &mut Vec<GameEvent>) -> SpawnOutcome {
        let anchor = spawn_anchor(shape, &self.settings);
        let mut piece = self.new_piece(shape, anchor);

        let mut collided = false;
        while !self.is_valid_position(&piece, true) {
            piece.translate(IVec3::Y);
            collided = true;
        }

        debug!(shape = shape.as_str(), collided, "piece spawned");
        events.push(GameEvent::PieceSpawned {
            shape,
            cubes: piece.cube_ids(),
        });
        self.active = Some(piece);

        if collided {
            SpawnOutcome::Collided
        } else if self.check_freeze(events) {
            SpawnOutcome::FrozeOnSpawn
        } else {
            SpawnOutcome::Placed
        }
    }

    /// Timed drop: one plane down with no feasibility check, then the freeze check
    pub fn gravity_step(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        piece.translate(IVec3::NEG_Y);
        events.push(GameEvent::PieceTranslated {
            axis: Axis::Y,
            amount: -1,
        });
        self.check_freeze(events)
    }

    /// Drop the active piece until it freezes.
    ///
    /// Returns `true` if the piece froze, `false` if the drop was refused.
    pub fn hard_drop(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        if !can_translate(&self.grid, piece, Axis::Y, -1) {
            events.push(GameEvent::Sound(SoundCue::Blocked));
            return false;
        }
        events.push(GameEvent::Sound(SoundCue::Move));

        let mut fallen = 0;
        while !rests_on_stack(&self.grid, piece) {
            piece.translate(IVec3::NEG_Y);
            fallen += 1;
        }
        if fallen > 0 {
            events.push(GameEvent::PieceTranslated {
                axis: Axis::Y,
                amount: -fallen,
            });
        }
        self.check_freeze(events)
    }

    /// Take the last plane-clear report, if any
    pub fn take_last_clear(&mut self) -> Option<ClearReport> {
        self.last_clear.take()
    }

    /// Empty the grid and forget the active piece
    pub fn reset(&mut self) {
        self.grid.clear();
        self.active = None;
        self.last_clear = None;
        self.next_cube_id = 0;
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Settings::STANDARD)
    }
}
