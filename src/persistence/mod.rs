//! Score persistence port
//!
//! The game hands finished runs to a [`ScorePersistence`] implementation.
//! Failures are reported to the player but never change game state.

use serde::{Deserialize, Serialize};

/// A finished run as submitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
    /// Unix timestamp (ms)
    pub timestamp: f64,
}

/// Why a score could not be stored
#[derive(Debug)]
pub enum PersistenceError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Backend refused the record
    Rejected(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "IO error: {e}"),
            PersistenceError::Json(e) => write!(f, "JSON error: {e}"),
            PersistenceError::Rejected(msg) => write!(f, "rejected: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> Self {
        PersistenceError::Json(e)
    }
}

/// Where finished runs go
pub trait ScorePersistence {
    fn save(&mut self, record: &ScoreRecord) -> Result<(), PersistenceError>;
}
