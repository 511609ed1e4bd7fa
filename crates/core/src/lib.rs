//! Core game logic - pure, deterministic, and testable
//!
//! Everything that decides what happens in a game of 3D falling blocks lives
//! here. There is no terminal, file or clock access: the driver calls
//! [`GameState::tick`] with the elapsed time and reads back events and
//! snapshots.
//!
//! # Module Structure
//!
//! - [`grid`]: 15x5x5 occupancy store with per-plane fill counters
//! - [`pieces`]: shape tables, spawn anchors, half-unit piece geometry
//! - [`placement`]: collision engine (moves, staged rotation, freeze, plane clears)
//! - [`scoring`]: quadratic plane-clear points and the drop timeout ladder
//! - [`rng`]: seeded LCG and the live/pending shape queue
//! - [`highscore`]: persistence contract for the high score
//! - [`snapshot`]: read-only view for renderers
//! - [`game_state`]: session/timing controller
//!
//! # Game Rules
//!
//! - A piece falls one plane every timeout (2.0 s at start).
//! - A piece freezes as soon as one of its cubes reaches plane 0 or rests on
//!   a frozen cube.
//! - Full planes are cleared topmost first; everything above drops by one.
//!   Clearing `n` planes at once scores `10 * n * n`.
//! - Every 40 s of play, and every time the score hits a multiple of 50, the
//!   timeout drops by 0.1 s, down to 0.3 s.
//! - A spawn that overlaps the stack, or freezes on the spot, ends the game.
//!
//! # Example
//!
//! ```
//! use tetris3d_core::GameState;
//! use tetris3d_types::{GameAction, SessionState};
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveXPos);
//! game.apply_action(GameAction::Drop);
//!
//! // The dropped piece is frozen into the grid and a new one is falling.
//! assert!(game.engine().grid().cube_count() > 0);
//! assert_eq!(game.state(), SessionState::Playing);
//! ```

pub mod game_state;
pub mod grid;
pub mod highscore;
pub mod pieces;
pub mod placement;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris3d_types as types;

// Re-export commonly used types for convenience
pub use game_state::GameState;
pub use grid::Grid;
pub use highscore::{HighScoreStore, MemoryHighScore};
pub use pieces::Piece;
pub use placement::{ClearReport, Placement, SpawnOutcome};
pub use rng::{ShapeQueue, SimpleRng};
pub use snapshot::GameSnapshot;
