//! High score file store.
//!
//! The file holds a single JSON object, `{"high_score": N}`. Reads happen
//! once at startup; every new high score is written straight back. A failed
//! write is logged and the game carries on with the in-memory value.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::HighScoreStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct HighScoreFile {
    high_score: u32,
}

#[derive(Debug, Clone)]
pub struct JsonFileHighScore {
    path: PathBuf,
    value: u32,
}

impl JsonFileHighScore {
    /// Load the store; a missing file counts as a high score of 0.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let value = match fs::read_to_string(&path) {
            Ok(text) => {
                let file: HighScoreFile = serde_json::from_str(&text)
                    .with_context(|| format!("parse high score file {}", path.display()))?;
                file.high_score
            }
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => {
                return Err(e).with_context(|| format!("read high score file {}", path.display()))
            }
        };
        debug!(path = %path.display(), value, "high score loaded");
        Ok(Self { path, value })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string(&HighScoreFile {
            high_score: self.value,
        })?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("create directory {}", dir.display()))?;
        }
        fs::write(&self.path, json)
            .with_context(|| format!("write high score file {}", self.path.display()))
    }
}

impl HighScoreStore for JsonFileHighScore {
    fn high_score(&self) -> u32 {
        self.value
    }

    fn set_high_score(&mut self, score: u32) {
        self.value = score;
        if let Err(err) = self.save() {
            warn!(error = %format!("{err:#}"), "high score not saved");
        }
    }
}
