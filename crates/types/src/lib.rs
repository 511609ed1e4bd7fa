//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine logic, terminal rendering, key mapping).
//!
//! # Grid Dimensions
//!
//! The playfield is a stack of horizontal planes:
//!
//! - **Planes**: 15 (indexed 0-14, plane 0 is the floor)
//! - **Rows per plane**: 5 (world X axis)
//! - **Columns per plane**: 5 (world Z axis)
//!
//! # Scoring and Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SCORE_PER_PLANE` | 10 | Base points per cleared plane (squared by the clear count) |
//! | `SCORE_TIMEOUT_TRIGGER` | 50 | Every positive multiple of this score speeds up gravity |
//! | `TIME_TIMEOUT_TRIGGER_SECS` | 40.0 | Play time after which gravity speeds up |
//! | `START_TIMEOUT_SECS` | 2.0 | Gravity interval at session start |
//! | `MIN_TIMEOUT_SECS` | 0.3 | Gravity interval floor |
//! | `TIMEOUT_STEP_SECS` | 0.1 | Amount removed from the interval per trigger |
//! | `TICK_MS` | 16 | Fixed timestep of the terminal driver (~60 FPS) |
//!
//! # Examples
//!
//! ```
//! use tetris3d_types::{CellIndex, GameAction, PieceShape, Settings};
//!
//! let settings = Settings::STANDARD;
//! assert_eq!(settings.cells_per_plane(), 25);
//!
//! let shape = PieceShape::from_str("single").unwrap();
//! assert!(!shape.is_rotatable());
//!
//! assert!(GameAction::RotateX.is_piece_action());
//! assert!(!GameAction::Pause.is_piece_action());
//!
//! let floor = CellIndex::new(0, 2, 2);
//! assert_eq!(floor.below(), CellIndex::new(-1, 2, 2));
//! ```

/// Number of horizontal planes in the grid (15)
pub const NUMBER_OF_PLANES: u8 = 15;

/// Rows in each plane (5)
pub const ROWS_PER_PLANE: u8 = 5;

/// Columns in each plane (5)
pub const COLUMNS_PER_PLANE: u8 = 5;

/// Points awarded per cleared plane before the clear-count multiplier
pub const SCORE_PER_PLANE: u32 = 10;

/// Gravity speeds up whenever the score lands on a positive multiple of this
pub const SCORE_TIMEOUT_TRIGGER: u32 = 50;

/// Gravity speeds up after this many seconds of play time
pub const TIME_TIMEOUT_TRIGGER_SECS: f32 = 40.0;

/// Gravity interval at the start of a session (seconds per plane)
pub const START_TIMEOUT_SECS: f32 = 2.0;

/// Gravity interval floor
pub const MIN_TIMEOUT_SECS: f32 = 0.3;

/// Amount removed from the gravity interval per trigger
pub const TIMEOUT_STEP_SECS: f32 = 0.1;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Build-time game configuration.
///
/// The binary always plays with [`Settings::STANDARD`]; other values exist so
/// tests can shrink the grid or enable debug controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub planes: u8,
    pub rows: u8,
    pub columns: u8,
    pub score_per_plane: u32,
    pub score_timeout_trigger: u32,
    pub time_timeout_trigger_secs: f32,
    pub start_timeout_secs: f32,
    pub min_timeout_secs: f32,
    pub timeout_step_secs: f32,
    /// Enables the debug-only upward move.
    pub debug_mode: bool,
}

impl Settings {
    pub const STANDARD: Settings = Settings {
        planes: NUMBER_OF_PLANES,
        rows: ROWS_PER_PLANE,
        columns: COLUMNS_PER_PLANE,
        score_per_plane: SCORE_PER_PLANE,
        score_timeout_trigger: SCORE_TIMEOUT_TRIGGER,
        time_timeout_trigger_secs: TIME_TIMEOUT_TRIGGER_SECS,
        start_timeout_secs: START_TIMEOUT_SECS,
        min_timeout_secs: MIN_TIMEOUT_SECS,
        timeout_step_secs: TIMEOUT_STEP_SECS,
        debug_mode: false,
    };

    /// Number of cells in one plane; a plane holding this many cubes is full.
    pub const fn cells_per_plane(&self) -> usize {
        (self.rows as usize) * (self.columns as usize)
    }

    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::STANDARD
    }
}


/// The six piece shapes
///
/// Every shape except [`PieceShape::Single`] is made of four cubes laid out on
/// a single plane when spawned:
/// - **L**: three in a line plus one at the end
/// - **Z**: two offset pairs
/// - **T**: three in a line plus one in the middle
/// - **I**: four in a line
/// - **O**: 2x2 square
/// - **Single**: one cube, cannot rotate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceShape {
    L,
    Z,
    T,
    I,
    O,
    Single,
}

impl PieceShape {
    /// All shapes in draw order; the random next-shape index selects from this.
    pub const ALL: [PieceShape; 6] = [
        PieceShape::L,
        PieceShape::Z,
        PieceShape::T,
        PieceShape::I,
        PieceShape::O,
        PieceShape::Single,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            PieceShape::L => 0,
            PieceShape::Z => 1,
            PieceShape::T => 2,
            PieceShape::I => 3,
            PieceShape::O => 4,
            PieceShape::Single => 5,
        }
    }

    /// Only the single cube is locked in orientation.
    pub fn is_rotatable(self) -> bool {
        self != PieceShape::Single
    }

    /// Parse shape from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris3d_types::PieceShape;
    ///
    /// assert_eq!(PieceShape::from_str("l"), Some(PieceShape::L));
    /// assert_eq!(PieceShape::from_str("Single"), Some(PieceShape::Single));
    /// assert_eq!(PieceShape::from_str("s"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "l" => Some(PieceShape::L),
            "z" => Some(PieceShape::Z),
            "t" => Some(PieceShape::T),
            "i" => Some(PieceShape::I),
            "o" => Some(PieceShape::O),
            "single" => Some(PieceShape::Single),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceShape::L => "l",
            PieceShape::Z => "z",
            PieceShape::T => "t",
            PieceShape::I => "i",
            PieceShape::O => "o",
            PieceShape::Single => "single",
        }
    }
}

/// World translation axes.
///
/// - **X**: moves between rows of a plane
/// - **Y**: vertical, moves between planes
/// - **Z**: moves between columns of a plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Axes a piece can rotate about (always +90°).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationAxis {
    X,
    Y,
}

/// Integer grid coordinates of one cube.
///
/// Fields are signed because candidate positions may fall outside the grid;
/// only in-bounds indices ever reach the occupancy store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex {
    pub plane: i32,
    pub row: i32,
    pub col: i32,
}

impl CellIndex {
    pub const fn new(plane: i32, row: i32, col: i32) -> Self {
        Self { plane, row, col }
    }

    /// The cell directly underneath (plane - 1).
    pub const fn below(self) -> Self {
        Self {
            plane: self.plane - 1,
            ..self
        }
    }
}

/// Opaque handle of one cube.
///
/// Handles are allocated when a piece spawns and keep identifying the cube
/// after it freezes into the grid, so the rendering side can follow it
/// through plane collapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeId(pub u32);

/// Session states. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

impl SessionState {
    /// Lowercase label for status lines and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Playing => "playing",
            SessionState::Paused => "paused",
            SessionState::GameOver => "game over",
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// Movement actions are named after the world axis they travel along.
/// At most one of them is consumed per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// One row towards -X
    MoveXNeg,
    /// One row towards +X
    MoveXPos,
    /// One column towards -Z
    MoveZNeg,
    /// One column towards +Z
    MoveZPos,
    /// Lay the piece down: fall until it freezes
    Drop,
    /// Move one plane up (debug builds of the settings only)
    Raise,
    /// Rotate +90° about the X axis
    RotateX,
    /// Rotate +90° about the Y axis
    RotateY,
    /// Toggle pause state
    Pause,
    /// Throw away the session and start over
    Restart,
}

impl GameAction {
    /// Actions that act on the falling piece (as opposed to the session).
    pub fn is_piece_action(&self) -> bool {
        !matches!(self, GameAction::Pause | GameAction::Restart)
    }
}

/// Fire-and-forget audio cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A move or rotation was accepted
    Move,
    /// A move or rotation was rejected
    Blocked,
    /// One plane was cleared (once per plane, never once per cube)
    PlaneCleared,
    GameOver,
}

/// Side effects produced by the engine for the external collaborators
/// (renderer, audio, UI).
///
/// The engine only ever appends these to a buffer; it never reads them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A new active piece was created; `cubes` are its cube handles in shape order.
    PieceSpawned {
        shape: PieceShape,
        cubes: Vec<CubeId>,
    },
    /// The active piece moved by `amount` world units along `axis`.
    PieceTranslated { axis: Axis, amount: i32 },
    /// The active piece turned +90° about `axis`.
    PieceRotated { axis: RotationAxis },
    /// The active piece is gone; its cubes now belong to the grid.
    PieceFrozen { cubes: Vec<CubeId> },
    /// A frozen cube was destroyed by a plane clear.
    CubeExploded { cube: CubeId, cell: CellIndex },
    /// A frozen cube moved one plane down during a collapse.
    CubeShifted { cube: CubeId, to: CellIndex },
    /// The next-piece preview shows a new shape (`None` removes it).
    PreviewChanged(Option<PieceShape>),
    Sound(SoundCue),
    ScoreChanged { score: u32, high_score: u32 },
    StateChanged(SessionState),
}
