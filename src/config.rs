//! Runtime configuration of the binary.
//!
//! Game rules are compile-time constants (`types::Settings::STANDARD`); only
//! the process-level knobs come from the environment:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `TETRIS3D_SEED` | RNG seed (u32) | derived from the clock |
//! | `TETRIS3D_HIGHSCORE_PATH` | high score JSON file | `$HOME/.tetris3d_highscore.json` |
//! | `TETRIS3D_LOG_FILE` | write logs to this file | logging off |
//! | `TETRIS3D_LOG` | log filter directives | `tetris3d=info` |

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

pub const SEED_VAR: &str = "TETRIS3D_SEED";
pub const HIGHSCORE_PATH_VAR: &str = "TETRIS3D_HIGHSCORE_PATH";
pub const LOG_FILE_VAR: &str = "TETRIS3D_LOG_FILE";
pub const LOG_FILTER_VAR: &str = "TETRIS3D_LOG";

pub const DEFAULT_LOG_FILTER: &str = "tetris3d=info,tetris3d_core=info";
const HIGHSCORE_FILE_NAME: &str = ".tetris3d_highscore.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub seed: u32,
    /// `None` keeps the high score in memory only.
    pub highscore_path: Option<PathBuf>,
    /// `None` disables logging (stdout belongs to the game screen).
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

impl RunConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let seed = match lookup(SEED_VAR).filter(|s| !s.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("{SEED_VAR} must be a u32, got {raw:?}"))?,
            None => clock_seed(),
        };

        let highscore_path = lookup(HIGHSCORE_PATH_VAR)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .or_else(|| lookup("HOME").map(|home| PathBuf::from(home).join(HIGHSCORE_FILE_NAME)));

        let log_file = lookup(LOG_FILE_VAR)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let log_filter = lookup(LOG_FILTER_VAR)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            seed,
            highscore_path,
            log_file,
            log_filter,
        })
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
