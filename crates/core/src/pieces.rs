//! Pieces module - shape definitions and piece geometry
//!
//! Positions are kept in half-unit integers so that both cube centers and
//! cube vertices are exact. A cube whose lowest vertex sits at grid cell
//! `(plane, row, col)` has its center at half-unit `(2*row+1, 2*plane+1, 2*col+1)`
//! (world X = row, world Y = plane, world Z = col).
//!
//! A piece is a pivot plus one offset per cube. Every 90° turn is an exact
//! integer permutation of the offsets; the 45° midpoint of a turn is only
//! ever evaluated, never stored.

use arrayvec::ArrayVec;
use glam::{IVec3, Vec3};

use crate::types::{CellIndex, CubeId, PieceShape, RotationAxis, Settings};

/// Maximum cubes in a piece
pub const MAX_CUBES: usize = 4;

/// Cube layout of a shape as `(row, plane, col)` cells relative to the shape origin
pub type ShapeCells = &'static [(i32, i32, i32)];

/// sin(45°) == cos(45°); one constant for both keeps symmetric terms exact.
const HALF_TURN_FACTOR: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Get the cube cells for a shape
pub fn shape_cells(shape: PieceShape) -> ShapeCells {
    match shape {
        PieceShape::L => &[(0, 0, 0), (0, 0, 1), (0, 0, 2), (1, 0, 2)],
        PieceShape::Z => &[(0, 0, 0), (0, 0, 1), (1, 0, 1), (1, 0, 2)],
        PieceShape::T => &[(0, 0, 0), (0, 0, 1), (0, 0, 2), (1, 0, 1)],
        PieceShape::I => &[(0, 0, 0), (0, 0, 1), (0, 0, 2), (0, 0, 3)],
        PieceShape::O => &[(0, 0, 0), (0, 0, 1), (1, 0, 0), (1, 0, 1)],
        PieceShape::Single => &[(0, 0, 0)],
    }
}

/// Rotation pivot of a shape in half units relative to the shape origin.
///
/// Line-like shapes turn around the center of their second cube; the O turns
/// around the vertex its four cubes share on their bottom face.
pub fn shape_pivot(shape: PieceShape) -> IVec3 {
    match shape {
        PieceShape::L | PieceShape::Z | PieceShape::T | PieceShape::I => IVec3::new(1, 1, 3),
        PieceShape::O => IVec3::new(2, 0, 2),
        PieceShape::Single => IVec3::new(1, 1, 1),
    }
}

/// Grid cell where the shape origin `(0, 0, 0)` lands at spawn
pub fn spawn_anchor(shape: PieceShape, settings: &Settings) -> CellIndex {
    let top = settings.planes as i32 - 1;
    match shape {
        PieceShape::L | PieceShape::Z | PieceShape::T | PieceShape::O => CellIndex::new(top - 1, 1, 1),
        PieceShape::I => CellIndex::new(top - 1, 2, 1),
        PieceShape::Single => CellIndex::new(top, 2, 2),
    }
}

/// Half-unit center of the cube at `cell`
pub fn cell_center(cell: CellIndex) -> IVec3 {
    IVec3::new(2 * cell.row + 1, 2 * cell.plane + 1, 2 * cell.col + 1)
}

/// Grid cell of a cube given its half-unit center (center → lowest vertex → index)
pub fn cell_of_center(center: IVec3) -> CellIndex {
    CellIndex::new(
        (center.y - 1).div_euclid(2),
        (center.x - 1).div_euclid(2),
        (center.z - 1).div_euclid(2),
    )
}

/// Grid cell of a cube whose center is only known approximately (mid-rotation)
pub fn cell_of_center_f32(center: Vec3) -> CellIndex {
    let vertex = (center - Vec3::ONE) * 0.5;
    CellIndex::new(
        vertex.y.floor() as i32,
        vertex.x.floor() as i32,
        vertex.z.floor() as i32,
    )
}

/// Offset turned by +90° about `axis` (right-handed)
pub fn quarter_turn(offset: IVec3, axis: RotationAxis) -> IVec3 {
    match axis {
        RotationAxis::X => IVec3::new(offset.x, -offset.z, offset.y),
        RotationAxis::Y => IVec3::new(offset.z, offset.y, -offset.x),
    }
}

/// Offset turned by +45° about `axis`
pub fn eighth_turn(offset: IVec3, axis: RotationAxis) -> Vec3 {
    let o = offset.as_vec3();
    match axis {
        RotationAxis::X => Vec3::new(
            o.x,
            (o.y - o.z) * HALF_TURN_FACTOR,
            (o.y + o.z) * HALF_TURN_FACTOR,
        ),
        RotationAxis::Y => Vec3::new(
            (o.x + o.z) * HALF_TURN_FACTOR,
            o.y,
            (o.z - o.x) * HALF_TURN_FACTOR,
        ),
    }
}

/// One cube of a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cube {
    pub id: CubeId,
    /// Center relative to the pivot, in half units
    pub offset: IVec3,
}

/// A falling (or preview) piece
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    shape: PieceShape,
    /// Pivot position in half units
    pivot: IVec3,
    cubes: ArrayVec<Cube, MAX_CUBES>,
    /// Preview pieces never touch the grid
    playable: bool,
}

impl Piece {
    /// Build a piece with its shape origin at `anchor`.
    ///
    /// `ids` supplies one handle per cube, in shape order.
    pub fn new(shape: PieceShape, anchor: CellIndex, ids: impl IntoIterator<Item = CubeId>) -> Self {
        let pivot = cell_center(anchor) - IVec3::ONE + shape_pivot(shape);
        let cells = shape_cells(shape);
        let cubes: ArrayVec<Cube, MAX_CUBES> = cells
            .iter()
            .zip(ids)
            .map(|(&(row, plane, col), id)| {
                let center = cell_center(CellIndex::new(anchor.plane + plane, anchor.row + row, anchor.col + col));
                Cube {
                    id,
                    offset: center - pivot,
                }
            })
            .collect();
        assert_eq!(cubes.len(), cells.len(), "one cube id per shape cell");

        Self {
            shape,
            pivot,
            cubes,
            playable: true,
        }
    }

    /// A decorative piece for the next-piece display
    pub fn preview(shape: PieceShape) -> Self {
        let mut piece = Self::new(shape, CellIndex::new(0, 0, 0), (0..).map(CubeId));
        piece.set_unplayable();
        piece
    }

    pub fn set_unplayable(&mut self) {
        self.playable = false;
    }

    pub fn is_playable(&self) -> bool {
        self.playable
    }

    pub fn shape(&self) -> PieceShape {
        self.shape
    }

    pub fn can_rotate(&self) -> bool {
        self.shape.is_rotatable()
    }

    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    pub fn cube_ids(&self) -> Vec<CubeId> {
        self.cubes.iter().map(|c| c.id).collect()
    }

    /// Half-unit centers of all cubes
    pub fn centers(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.cubes.iter().map(move |c| self.pivot + c.offset)
    }

    /// Grid cells of all cubes
    pub fn cells(&self) -> ArrayVec<CellIndex, MAX_CUBES> {
        self.centers().map(cell_of_center).collect()
    }

    /// Grid cells the cubes pass through halfway into a +90° turn
    pub fn cells_mid_turn(&self, axis: RotationAxis) -> ArrayVec<CellIndex, MAX_CUBES> {
        let pivot = self.pivot.as_vec3();
        self.cubes
            .iter()
            .map(|c| cell_of_center_f32(pivot + eighth_turn(c.offset, axis)))
            .collect()
    }

    /// Copy of the piece turned +90° about `axis`
    pub fn turned(&self, axis: RotationAxis) -> Self {
        let mut next = self.clone();
        for cube in next.cubes.iter_mut() {
            cube.offset = quarter_turn(cube.offset, axis);
        }
        next
    }

    /// Move by whole world units
    pub fn translate(&mut self, delta: IVec3) {
        self.pivot += delta * 2;
    }

    /// World Y coordinate (in half units) of every cube center
    pub fn center_heights(&self) -> impl Iterator<Item = i32> + '_ {
        self.centers().map(|c| c.y)
    }
}
