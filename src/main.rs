//! Terminal 3D block game runner (default binary).
//!
//! Fixed-timestep loop: collect keys for one tick, feed the first mapped
//! action to the session, react to its events, redraw.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tetris3d::config::RunConfig;
use tetris3d::core::{GameState, HighScoreStore, MemoryHighScore};
use tetris3d::input::{first_action, is_high_score_reset, should_quit};
use tetris3d::persist::JsonFileHighScore;
use tetris3d::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tetris3d::types::{GameEvent, Settings, SoundCue, TICK_MS};

type Store = Box<dyn HighScoreStore>;

fn main() -> Result<()> {
    let config = RunConfig::from_env()?;
    init_tracing(&config)?;
    info!(seed = config.seed, "starting");

    let store = open_store(&config);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config.seed, store);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Logs go to a file only; the terminal is the game screen.
fn init_tracing(config: &RunConfig) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| "tetris3d=info".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_store(config: &RunConfig) -> Store {
    let Some(path) = &config.highscore_path else {
        return Box::new(MemoryHighScore::default());
    };
    match JsonFileHighScore::open(path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "falling back to in-memory high score");
            Box::new(MemoryHighScore::default())
        }
    }
}

fn run(term: &mut TerminalRenderer, seed: u32, store: Store) -> Result<()> {
    let mut game = GameState::with_store(Settings::STANDARD, seed, store);
    game.start();

    let view = GameView::default();
    let tick = Duration::from_millis(TICK_MS as u64);
    let mut fb = FrameBuffer::new(0, 0);
    let mut keys: Vec<KeyEvent> = Vec::with_capacity(8);
    let mut last_tick = Instant::now();

    loop {
        // Input until the next tick is due.
        keys.clear();
        loop {
            let timeout = tick.saturating_sub(last_tick.elapsed());
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        info!(score = game.score(), "quit");
                        return Ok(());
                    }
                    if is_high_score_reset(key) {
                        game.reset_high_score();
                    } else {
                        keys.push(key);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f32();
        last_tick = now;

        game.tick(dt, first_action(keys.iter().copied()));

        for ev in game.drain_events() {
            handle_event(term, &ev)?;
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&game.snapshot(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;
    }
}

fn handle_event(term: &mut TerminalRenderer, ev: &GameEvent) -> Result<()> {
    match ev {
        GameEvent::Sound(SoundCue::PlaneCleared | SoundCue::GameOver) => term.bell(),
        GameEvent::StateChanged(state) => {
            info!(?state, "state changed");
            Ok(())
        }
        other => {
            debug!(event = ?other);
            Ok(())
        }
    }
}
