//! Key mapping from terminal events to game actions.
//!
//! | Key | Action |
//! |-----|--------|
//! | ←/→ | move along X |
//! | ↓/↑ | move along Z |
//! | Space | drop |
//! | `_` | raise (debug settings only) |
//! | `x` / `z` | rotate about X / Y |
//! | `p` / `h` | pause (help screen) |
//! | `n` | new game |
//! | `R` | reset high score |
//! | `q`, Ctrl-C | quit |

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        KeyCode::Left => Some(GameAction::MoveXNeg),
        KeyCode::Right => Some(GameAction::MoveXPos),
        KeyCode::Down => Some(GameAction::MoveZNeg),
        KeyCode::Up => Some(GameAction::MoveZPos),

        KeyCode::Char(' ') => Some(GameAction::Drop),
        KeyCode::Char('_') => Some(GameAction::Raise),

        KeyCode::Char('x') | KeyCode::Char('X') => Some(GameAction::RotateX),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(GameAction::RotateY),

        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(GameAction::Pause)
        }
        KeyCode::Char('n') | KeyCode::Char('N') => Some(GameAction::Restart),

        _ => None,
    }
}

/// First key in `keys` that maps to an action; the rest are dropped.
pub fn first_action<I>(keys: I) -> Option<GameAction>
where
    I: IntoIterator<Item = KeyEvent>,
{
    keys.into_iter().find_map(handle_key_event)
}

/// Shift-R wipes the stored high score.
pub fn is_high_score_reset(key: KeyEvent) -> bool {
    key.kind != KeyEventKind::Release && key.code == KeyCode::Char('R')
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
