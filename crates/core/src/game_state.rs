//! Game state module - session and timing controller
//!
//! Ties the collision engine, the shape queue, scoring and the high score
//! store together. Owns the session state machine (Playing ⇄ Paused, →
//! GameOver), the drop timer and the speed-up rules.

use tracing::{debug, info};

use crate::highscore::{HighScoreStore, MemoryHighScore};
use crate::placement::{Placement, SpawnOutcome};
use crate::rng::ShapeQueue;
use crate::scoring::{is_score_trigger, next_timeout};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{Axis, GameAction, GameEvent, PieceShape, RotationAxis, SessionState, Settings, SoundCue};

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState<S: HighScoreStore = MemoryHighScore> {
    settings: Settings,
    engine: Placement,
    queue: ShapeQueue,
    store: S,
    state: SessionState,
    started: bool,
    score: u32,
    timeout_secs: f32,
    /// Play time since the last time-based speed-up
    play_time_secs: f32,
    /// Time since the last gravity step
    drop_timer_secs: f32,
    /// Set while `tick` runs; speed-ups outside a tick are never merged
    in_tick: bool,
    /// At most one speed-up per tick
    sped_up_this_tick: bool,
    events: Vec<GameEvent>,
}

impl GameState<MemoryHighScore> {
    /// Create a new game with the given RNG seed and standard settings
    pub fn new(seed: u32) -> Self {
        Self::with_store(Settings::STANDARD, seed, MemoryHighScore::default())
    }
}

impl<S: HighScoreStore> GameState<S> {
    pub fn with_store(settings: Settings, seed: u32, store: S) -> Self {
        Self {
            settings,
            engine: Placement::new(settings),
            queue: ShapeQueue::new(seed),
            store,
            state: SessionState::Playing,
            started: false,
            score: 0,
            timeout_secs: settings.start_timeout_secs,
            play_time_secs: 0.0,
            drop_timer_secs: 0.0,
            in_tick: false,
            sped_up_this_tick: false,
            events: Vec::new(),
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.state = SessionState::Playing;
        self.events.push(GameEvent::StateChanged(SessionState::Playing));
        self.set_score(0);
        self.spawn_next();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    pub fn game_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.store.high_score()
    }

    pub fn timeout_secs(&self) -> f32 {
        self.timeout_secs
    }

    pub fn next_shape(&self) -> Option<PieceShape> {
        self.queue.peek()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn engine(&self) -> &Placement {
        &self.engine
    }

    /// Mutable engine access for setting up positions in tests and tools
    pub fn engine_mut(&mut self) -> &mut Placement {
        &mut self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the session by `dt_secs`, then consume at most one action.
    ///
    /// Session actions (pause, restart) are handled first. While playing, the
    /// speed-up timer runs, then gravity, then the piece action. A gravity
    /// step that freezes the piece swallows the piece action for this tick.
    /// Returns `true` if anything changed.
    pub fn tick(&mut self, dt_secs: f32, action: Option<GameAction>) -> bool {
        if !self.started {
            return false;
        }
        self.in_tick = true;
        self.sped_up_this_tick = false;
        let changed = self.advance(dt_secs, action);
        self.in_tick = false;
        changed
    }

    fn advance(&mut self, dt_secs: f32, action: Option<GameAction>) -> bool {
        let mut changed = false;
        if let Some(a) = action.filter(|a| !a.is_piece_action()) {
            changed |= self.apply_action(a);
        }

        if self.state != SessionState::Playing {
            return changed;
        }

        self.play_time_secs += dt_secs;
        if self.play_time_secs >= self.settings.time_timeout_trigger_secs {
            self.update_timeout();
            self.play_time_secs = 0.0;
        }

        self.drop_timer_secs += dt_secs;
        if self.drop_timer_secs >= self.timeout_secs {
            self.drop_timer_secs = 0.0;
            changed = true;
            if self.engine.gravity_step(&mut self.events) {
                self.after_freeze();
                return true;
            }
        }

        if let Some(a) = action.filter(GameAction::is_piece_action) {
            changed |= self.apply_action(a);
        }
        changed
    }

    /// Apply a single action immediately.
    ///
    /// Piece actions are ignored unless the session is playing. Returns
    /// `true` if the action was accepted.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Pause => return self.toggle_pause(),
            GameAction::Restart => {
                self.restart();
                return true;
            }
            _ => {}
        }

        if self.state != SessionState::Playing || self.engine.active().is_none() {
            return false;
        }

        let moved = match action {
            GameAction::Drop => {
                if self.engine.hard_drop(&mut self.events) {
                    self.after_freeze();
                    return true;
                }
                return false;
            }
            GameAction::Raise if self.settings.debug_mode => {
                self.engine.attempt_translate(Axis::Y, 1, &mut self.events)
            }
            GameAction::Raise => return false,
            GameAction::MoveXNeg => self.engine.attempt_translate(Axis::X, -1, &mut self.events),
            GameAction::MoveXPos => self.engine.attempt_translate(Axis::X, 1, &mut self.events),
            GameAction::MoveZNeg => self.engine.attempt_translate(Axis::Z, -1, &mut self.events),
            GameAction::MoveZPos => self.engine.attempt_translate(Axis::Z, 1, &mut self.events),
            GameAction::RotateX => self.engine.attempt_rotate(RotationAxis::X, &mut self.events),
            GameAction::RotateY => self.engine.attempt_rotate(RotationAxis::Y, &mut self.events),
            GameAction::Pause | GameAction::Restart => false,
        };

        if moved && self.engine.check_freeze(&mut self.events) {
            self.after_freeze();
        }
        moved
    }

    /// Playing ⇄ Paused. Does nothing after game over.
    pub fn toggle_pause(&mut self) -> bool {
        let next = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => return false,
        };
        self.state = next;
        self.events.push(GameEvent::StateChanged(next));
        self.emit_score();
        true
    }

    /// Throw the session away and start a fresh one.
    ///
    /// The shape queue keeps its RNG stream, so a restarted game does not
    /// replay the previous one.
    pub fn restart(&mut self) {
        let seed = self.queue.seed();
        self.engine.reset();
        self.queue = ShapeQueue::new(seed);
        self.score = 0;
        self.timeout_secs = self.settings.start_timeout_secs;
        self.play_time_secs = 0.0;
        self.drop_timer_secs = 0.0;
        self.started = false;
        debug!(seed, "session restarted");
        self.start();
    }

    /// Set the persisted high score back to zero
    pub fn reset_high_score(&mut self) {
        self.store.set_high_score(0);
        self.emit_score();
    }

    pub fn increment_score(&mut self, amount: u32) {
        self.set_score(self.score.saturating_add(amount));
    }

    /// Replace the score, persisting a new high score and speeding up on
    /// multiples of the score interval.
    pub fn set_score(&mut self, score: u32) {
        self.score = score;
        if score > self.store.high_score() {
            self.store.set_high_score(score);
        }
        self.emit_score();
        if is_score_trigger(score, self.settings.score_timeout_trigger) {
            self.update_timeout();
        }
    }

    /// Step the drop timeout down once.
    ///
    /// Inside [`GameState::tick`] only the first trigger counts; the play-time
    /// and score triggers never stack within one tick.
    pub fn update_timeout(&mut self) {
        if self.in_tick {
            if self.sped_up_this_tick {
                return;
            }
            self.sped_up_this_tick = true;
        }

        let next = next_timeout(
            self.timeout_secs,
            self.settings.timeout_step_secs,
            self.settings.min_timeout_secs,
        );
        if next != self.timeout_secs {
            debug!(from = self.timeout_secs, to = next, "timeout updated");
        }
        self.timeout_secs = next;
    }

    fn emit_score(&mut self) {
        self.events.push(GameEvent::ScoreChanged {
            score: self.score,
            high_score: self.store.high_score(),
        });
    }

    /// Score the freeze that just happened and bring in the next piece
    fn after_freeze(&mut self) {
        self.collect_clear();
        self.spawn_next();
    }

    fn collect_clear(&mut self) {
        if let Some(report) = self.engine.take_last_clear() {
            info!(planes = report.planes, score = report.score, "planes cleared");
            self.increment_score(report.score);
        }
    }

    /// Promote the pending shape to a live piece
    fn spawn_next(&mut self) {
        let shape = self.queue.draw();
        self.events.push(GameEvent::PreviewChanged(self.queue.peek()));
        self.drop_timer_secs = 0.0;

        let outcome = self.engine.spawn(shape, &mut self.events);
        if outcome == SpawnOutcome::FrozeOnSpawn {
            self.collect_clear();
        }
        if outcome.is_game_over() {
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        self.queue.discard_pending();
        self.events.push(GameEvent::PreviewChanged(None));
        self.state = SessionState::GameOver;
        self.events.push(GameEvent::StateChanged(SessionState::GameOver));
        self.emit_score();
        self.events.push(GameEvent::Sound(SoundCue::GameOver));
        info!(score = self.score, high_score = self.store.high_score(), "game over");
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let grid = self.engine.grid();
        GameSnapshot {
            planes: grid.planes(),
            rows: grid.rows(),
            cols: grid.cols(),
            occupied: grid.cells().iter().map(Option::is_some).collect(),
            active: self.engine.active().map(|piece| ActiveSnapshot {
                shape: piece.shape(),
                cells: piece.cells(),
            }),
            next: self.queue.peek(),
            state: self.state,
            score: self.score,
            high_score: self.store.high_score(),
            timeout_secs: self.timeout_secs,
            seed: self.queue.seed(),
        }
    }
}

impl Default for GameState<MemoryHighScore> {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellIndex;

    fn started(seed: u32) -> GameState {
        let mut game = GameState::new(seed);
        game.start();
        game
    }

    #[test]
    fn test_start_spawns_piece_and_preview() {
        let game = started(12345);
        assert_eq!(game.state(), SessionState::Playing);
        assert!(game.engine().active().is_some());
        assert!(game.next_shape().is_some());
        assert_eq!(game.timeout_secs(), 2.0);
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let mut game = GameState::new(1);
        assert!(!game.tick(10.0, Some(GameAction::Drop)));
        assert!(game.engine().active().is_none());
    }

    #[test]
    fn test_gravity_moves_piece_down_after_timeout() {
        let mut game = started(7);
        let before = game.engine().active().map(|p| p.cells()[0].plane);
        assert!(!game.tick(1.0, None));
        assert!(game.tick(1.0, None));
        let after = game.engine().active().map(|p| p.cells()[0].plane);
        assert_eq!(after, before.map(|p| p - 1));
    }

    #[test]
    fn test_pause_freezes_timers() {
        let mut game = started(7);
        let before = game.engine().active().cloned();
        assert!(game.tick(0.0, Some(GameAction::Pause)));
        assert!(game.paused());
        for _ in 0..100 {
            game.tick(1.0, Some(GameAction::MoveXPos));
        }
        assert_eq!(game.engine().active().cloned(), before);
        assert_eq!(game.timeout_secs(), 2.0);

        game.tick(0.0, Some(GameAction::Pause));
        assert_eq!(game.state(), SessionState::Playing);
    }

    #[test]
    fn test_drop_freezes_and_spawns_next() {
        let mut game = started(3);
        assert!(game.apply_action(GameAction::Drop));
        assert!(game.engine().grid().cube_count() > 0);
        assert!(game.engine().active().is_some());
    }

    #[test]
    fn test_raise_needs_debug_mode() {
        let mut game = started(3);
        game.tick(2.0, None);
        assert!(!game.apply_action(GameAction::Raise));

        let mut debug = GameState::with_store(
            Settings::STANDARD.with_debug_mode(true),
            3,
            MemoryHighScore::default(),
        );
        debug.start();
        debug.tick(2.0, None);
        assert!(debug.apply_action(GameAction::Raise));
    }

    #[test]
    fn test_play_time_speeds_up() {
        let mut game = started(11);
        // A little over 40 s of play in small steps.
        for _ in 0..4100 {
            game.tick(0.01, None);
            if game.game_over() {
                break;
            }
        }
        assert!(game.timeout_secs() < 2.0);
    }

    #[test]
    fn test_score_multiple_of_interval_speeds_up() {
        let mut game = started(1);
        game.set_score(40);
        assert_eq!(game.timeout_secs(), 2.0);
        game.set_score(50);
        assert!((game.timeout_secs() - 1.9).abs() < 1e-6);
        assert_eq!(game.high_score(), 50);
    }

    #[test]
    fn test_speed_ups_do_not_stack_within_a_tick() {
        let mut game = started(1);
        game.set_score(40);
        game.engine_mut().discard_active();
        for row in 0..5 {
            for col in 0..5 {
                if (row, col) != (2, 2) {
                    game.engine_mut().place_cube(CellIndex::new(0, row, col));
                }
            }
        }
        let piece = game
            .engine_mut()
            .new_piece(PieceShape::Single, CellIndex::new(1, 2, 2));
        game.engine_mut().set_active(piece);

        // One tick crosses the play-time trigger and clears plane 0 for 10
        // points, landing the score on 50.
        assert!(game.tick(40.0, None));
        assert_eq!(game.score(), 50);
        assert!((game.timeout_secs() - 1.9).abs() < 1e-6);

        // Outside a tick every trigger counts.
        game.set_score(100);
        assert!((game.timeout_secs() - 1.8).abs() < 1e-6);
        game.increment_score(50);
        assert!((game.timeout_secs() - 1.7).abs() < 1e-6);
    }

    #[test]
    fn test_score_trigger_after_play_time_speed_up() {
        let mut game = started(1);
        assert!(game.tick(40.0, None));
        assert!((game.timeout_secs() - 1.9).abs() < 1e-6);

        game.set_score(50);
        assert!((game.timeout_secs() - 1.8).abs() < 1e-6);
        game.set_score(100);
        assert!((game.timeout_secs() - 1.7).abs() < 1e-6);
    }

    #[test]
    fn test_collided_spawn_ends_game() {
        let mut game = started(5);
        game.engine_mut().discard_active();
        for row in 0..5 {
            for col in 0..5 {
                game.engine_mut().place_cube(CellIndex::new(13, row, col));
                if (row, col) != (0, 0) {
                    game.engine_mut().place_cube(CellIndex::new(14, row, col));
                }
            }
        }
        game.drain_events();
        game.spawn_next();

        assert!(game.game_over());
        assert_eq!(game.next_shape(), None);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::Sound(SoundCue::GameOver)));
        assert!(events.contains(&GameEvent::PreviewChanged(None)));

        // Only restart leaves game over.
        assert!(!game.apply_action(GameAction::Pause));
        assert!(!game.apply_action(GameAction::MoveXPos));
        game.apply_action(GameAction::Restart);
        assert_eq!(game.state(), SessionState::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.engine().grid().cube_count(), 0);
    }

    #[test]
    fn test_high_score_survives_restart() {
        let mut game = started(9);
        game.increment_score(30);
        game.restart();
        assert_eq!(game.score(), 0);
        assert_eq!(game.high_score(), 30);
        game.reset_high_score();
        assert_eq!(game.high_score(), 0);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut game = started(2);
        game.engine_mut().place_cube(CellIndex::new(0, 1, 1));
        let snap = game.snapshot();
        assert_eq!((snap.planes, snap.rows, snap.cols), (15, 5, 5));
        assert!(snap.is_occupied(0, 1, 1));
        assert_eq!(snap.fill_count(0), 1);
        assert!(snap.active.is_some());
        assert!(snap.playable());
    }
}
