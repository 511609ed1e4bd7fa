//! High score persistence contract
//!
//! The core only reads and writes a single integer through [`HighScoreStore`];
//! where it lives is up to the embedder.

/// Get/set access to the persisted high score
pub trait HighScoreStore {
    fn high_score(&self) -> u32;
    fn set_high_score(&mut self, score: u32);
}

/// In-memory store, lost when the process exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryHighScore {
    value: u32,
}

impl MemoryHighScore {
    pub fn new(value: u32) -> Self {
        Self { value }
    }
}

impl HighScoreStore for MemoryHighScore {
    fn high_score(&self) -> u32 {
        self.value
    }

    fn set_high_score(&mut self, score: u32) {
        self.value = score;
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn high_score(&self) -> u32 {
        (**self).high_score()
    }

    fn set_high_score(&mut self, score: u32) {
        (**self).set_high_score(score)
    }
}
