//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer: the game view draws a snapshot
//! into a framebuffer, and the terminal renderer flushes only what changed.
//! No widget toolkit; cell aspect ratio is under direct control (2 chars
//! wide per grid cell by default).

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetris3d_core as core;
pub use tetris3d_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Layout, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
