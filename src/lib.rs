//! 3D falling blocks (workspace facade crate).
//!
//! Re-exports the member crates as `tetris3d::{core,input,term,types}` and
//! holds the pieces only the binary needs: environment configuration and the
//! on-disk high score.

pub mod config;
pub mod persist;

pub use tetris3d_core as core;
pub use tetris3d_input as input;
pub use tetris3d_term as term;
pub use tetris3d_types as types;
