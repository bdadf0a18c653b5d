//! Score accounting and submission
//!
//! The score is the number of completed cuts. After a run ends the player
//! may submit it once under a name; the saved flag blocks duplicates.

use crate::persistence::{PersistenceError, ScorePersistence, ScoreRecord};

/// Why a save attempt did nothing
#[derive(Debug)]
pub enum SaveError {
    /// Saving is only offered after a run ends
    NotGameOver,
    /// This run was already submitted
    AlreadySaved,
    /// Name was empty or whitespace
    EmptyName,
    /// Backend failed; the player may retry
    Persistence(PersistenceError),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::NotGameOver => write!(f, "the game is still running"),
            SaveError::AlreadySaved => write!(f, "score already saved"),
            SaveError::EmptyName => write!(f, "please enter a name"),
            SaveError::Persistence(e) => write!(f, "error saving score: {e}"),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<PersistenceError> for SaveError {
    fn from(e: PersistenceError) -> Self {
        SaveError::Persistence(e)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    saved: bool,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// One point per completed cut
    #[inline]
    pub fn score(round: u32) -> u32 {
        round
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// New run, new chance to save
    pub fn reset(&mut self) {
        self.saved = false;
    }

    /// Hand `(name, score, timestamp)` to the persistence port
    pub fn submit(
        &mut self,
        persistence: &mut dyn ScorePersistence,
        name: &str,
        round: u32,
        timestamp: f64,
    ) -> Result<ScoreRecord, SaveError> {
        if self.saved {
            return Err(SaveError::AlreadySaved);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(SaveError::EmptyName);
        }

        let record = ScoreRecord {
            name: name.to_string(),
            score: Self::score(round),
            timestamp,
        };
        match persistence.save(&record) {
            Ok(()) => {
                self.saved = true;
                log::info!("Score {} saved for {}", record.score, record.name);
                Ok(record)
            }
            Err(e) => {
                log::error!("Error saving score: {}", e);
                Err(e.into())
            }
        }
    }
}

/// Current wall-clock time as Unix milliseconds
pub fn unix_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
