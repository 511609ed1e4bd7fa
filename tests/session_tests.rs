//! Session tests - state machine, timers and the key-to-tick loop

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use tetris3d::core::{GameState, MemoryHighScore};
use tetris3d::input::first_action;
use tetris3d::types::{Axis, GameAction, GameEvent, SessionState, Settings, SoundCue};

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

fn started(seed: u32) -> GameState {
    let mut game = GameState::new(seed);
    game.start();
    game
}

/// Hard-drop pieces in place until the stack reaches the spawn area.
fn drop_until_game_over(game: &mut GameState) {
    for _ in 0..500 {
        if game.game_over() {
            return;
        }
        game.apply_action(GameAction::Drop);
    }
    panic!("stack never reached the top");
}

#[test]
fn test_start_announces_session() {
    let mut game = GameState::new(42);
    game.start();
    let events = game.drain_events();

    assert!(events.contains(&GameEvent::StateChanged(SessionState::Playing)));
    assert!(events.contains(&GameEvent::ScoreChanged {
        score: 0,
        high_score: 0,
    }));
    assert!(events.iter().any(|e| matches!(e, GameEvent::PieceSpawned { .. })));
    assert!(events.iter().any(|e| matches!(e, GameEvent::PreviewChanged(Some(_)))));
    assert!(game.drain_events().is_empty());
}

#[test]
fn test_same_seed_same_shapes() {
    let a = started(99);
    let b = started(99);
    assert_eq!(
        a.engine().active().map(|p| p.shape()),
        b.engine().active().map(|p| p.shape())
    );
    assert_eq!(a.next_shape(), b.next_shape());
}

#[test]
fn test_keys_drive_the_piece() {
    let mut game = started(11);
    game.drain_events();

    let keys = [press(KeyCode::Char('q')), press(KeyCode::Right), press(KeyCode::Left)];
    let action = first_action(keys);
    assert_eq!(action, Some(GameAction::MoveXPos));

    assert!(game.tick(0.016, action));
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::PieceTranslated {
        axis: Axis::X,
        amount: 1,
    }));
    assert!(events.contains(&GameEvent::Sound(SoundCue::Move)));
}

#[test]
fn test_gravity_follows_the_timeout() {
    let mut game = started(5);
    game.drain_events();

    for _ in 0..3 {
        game.tick(0.5, None);
    }
    assert!(game.drain_events().is_empty());

    game.tick(0.5, None);
    assert!(game.drain_events().contains(&GameEvent::PieceTranslated {
        axis: Axis::Y,
        amount: -1,
    }));
}

#[test]
fn test_score_triggers_walk_timeout_down_to_floor() {
    let mut game = started(1);
    let mut last = game.timeout_secs();
    for k in 1..=20 {
        game.set_score(50 * k);
        assert!(game.timeout_secs() <= last);
        last = game.timeout_secs();
    }
    assert_eq!(game.timeout_secs(), 0.3);
    assert_eq!(game.high_score(), 1000);
}

#[test]
fn test_score_speed_up_survives_a_play_time_speed_up() {
    let mut game = started(1);
    for _ in 0..3 {
        game.tick(0.0, None);
    }
    game.tick(40.0, None);
    assert!((game.timeout_secs() - 1.9).abs() < 1e-6);

    game.set_score(50);
    assert!((game.timeout_secs() - 1.8).abs() < 1e-6);
    game.set_score(100);
    assert!((game.timeout_secs() - 1.7).abs() < 1e-6);
}

#[test]
fn test_non_trigger_scores_keep_timeout() {
    let mut game = started(1);
    game.increment_score(10);
    game.increment_score(30);
    assert_eq!(game.timeout_secs(), 2.0);

    game.increment_score(10);
    assert!((game.timeout_secs() - 1.9).abs() < 1e-6);
}

#[test]
fn test_paused_session_ignores_piece_actions() {
    let mut game = started(8);
    game.tick(0.0, Some(GameAction::Pause));
    let before = game.snapshot();

    assert!(!game.tick(5.0, Some(GameAction::Drop)));
    assert!(!game.apply_action(GameAction::RotateX));
    assert_eq!(game.snapshot(), before);
    assert!(!before.playable());
}

#[test]
fn test_game_over_then_restart() {
    let mut game = started(3);
    drop_until_game_over(&mut game);

    assert_eq!(game.state(), SessionState::GameOver);
    assert_eq!(game.next_shape(), None);
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::StateChanged(SessionState::GameOver)));
    assert!(events.contains(&GameEvent::Sound(SoundCue::GameOver)));

    assert!(!game.tick(10.0, Some(GameAction::MoveZPos)));
    assert!(!game.apply_action(GameAction::Pause));
    assert_eq!(game.state(), SessionState::GameOver);

    assert!(game.tick(0.0, Some(GameAction::Restart)));
    assert_eq!(game.state(), SessionState::Playing);
    assert_eq!(game.score(), 0);
    assert_eq!(game.timeout_secs(), 2.0);
    assert_eq!(game.engine().grid().cube_count(), 0);
    assert!(game.engine().active().is_some());
    assert!(game.next_shape().is_some());
}

#[test]
fn test_raise_in_debug_mode() {
    let settings = Settings::STANDARD.with_debug_mode(true);
    let mut game = GameState::with_store(settings, 4, MemoryHighScore::default());
    game.start();

    // Lower the spawned piece first; raising past the ceiling is refused.
    let lowest = |g: &GameState| {
        g.engine()
            .active()
            .map(|p| p.cells().iter().map(|c| c.plane).min().unwrap_or(0))
    };
    let start = lowest(&game);
    game.tick(2.0, None);
    assert_eq!(lowest(&game), start.map(|p| p - 1));
    assert!(game.apply_action(GameAction::Raise));
    assert_eq!(lowest(&game), start);
}
