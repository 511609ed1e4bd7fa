//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Only
//! key-down events matter: every action is a discrete press and the driver
//! consumes at most one per tick.

pub mod map;

pub use tetris3d_types as types;

pub use map::{first_action, handle_key_event, is_high_score_reset, should_quit};
