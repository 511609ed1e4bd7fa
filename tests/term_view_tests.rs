//! Terminal view tests - whole-screen rendering of real sessions

use tetris3d::core::GameState;
use tetris3d::term::{encode_diff_into, FrameBuffer, GameView, Viewport};
use tetris3d::types::GameAction;

fn screen_text(fb: &FrameBuffer) -> String {
    (0..fb.height())
        .map(|y| fb.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_game_over_screen() {
    let mut game = GameState::new(21);
    game.start();
    for _ in 0..500 {
        if game.game_over() {
            break;
        }
        game.apply_action(GameAction::Drop);
    }
    assert!(game.game_over());

    let fb = GameView::default().render(&game.snapshot(), Viewport::new(100, 30));
    let text = screen_text(&fb);
    assert!(text.contains("GAME OVER"));
    assert!(text.contains("n: new game"));
    assert!(text.contains("NEXT -"));
    assert!(text.contains("game over"));
}

#[test]
fn test_every_plane_has_a_label() {
    let mut game = GameState::new(1);
    game.start();
    let fb = GameView::default().render(&game.snapshot(), Viewport::new(100, 30));
    let text = screen_text(&fb);
    for plane in 0..15 {
        assert!(text.contains(&format!("P{plane}")), "missing label P{plane}");
    }
}

#[test]
fn test_moving_piece_only_redraws_changed_rows() {
    let mut game = GameState::new(1);
    game.start();
    let view = GameView::default();
    let viewport = Viewport::new(100, 30);

    let before = view.render(&game.snapshot(), viewport);
    let mut same = Vec::new();
    encode_diff_into(&before, &before, &mut same).unwrap();

    game.apply_action(GameAction::MoveXPos);
    let after = view.render(&game.snapshot(), viewport);
    let mut diff = Vec::new();
    encode_diff_into(&before, &after, &mut diff).unwrap();

    assert!(diff.len() > same.len());
    assert!(!String::from_utf8_lossy(&diff).contains("SCORE"));
}
