//! Leaderboard
//!
//! Persisted as JSON next to the game, tracks the top 10 runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistenceError, ScorePersistence, ScoreRecord};

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// Leaderboard table, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<ScoreRecord>,
    /// Backing file (none = in-memory only)
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Leaderboard {
    /// Create empty in-memory leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a record (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn add(&mut self, record: ScoreRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        // Find insertion point (sorted descending by score, ties keep order)
        let pos = self.entries.iter().position(|e| record.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, record);
                i + 1
            }
            None => {
                self.entries.push(record);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top entry (if any)
    pub fn top(&self) -> Option<&ScoreRecord> {
        self.entries.first()
    }

    /// Load from a JSON file. Missing or corrupt files start fresh.
    pub fn load(path: &Path) -> Self {
        let loaded = std::fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str::<Leaderboard>(&json).ok());

        let mut board = match loaded {
            Some(board) => {
                log::info!("Loaded {} leaderboard entries", board.entries.len());
                board
            }
            None => {
                log::info!("No leaderboard found, starting fresh");
                Self::new()
            }
        };
        board.path = Some(path.to_path_buf());
        board
    }

    /// Write to the backing file (no-op for in-memory boards)
    pub fn persist(&self) -> Result<(), PersistenceError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

impl ScorePersistence for Leaderboard {
    /// Records that miss the top ten (or score zero) are refused, not dropped
    fn save(&mut self, record: &ScoreRecord) -> Result<(), PersistenceError> {
        let Some(rank) = self.add(record.clone()) else {
            log::info!("{} scored {} (not ranked)", record.name, record.score);
            return Err(PersistenceError::Rejected(format!(
                "score {} does not make the top {}",
                record.score, MAX_ENTRIES
            )));
        };
        log::info!("{} placed #{} with {}", record.name, rank, record.score);
        self.persist()
    }
}

/// Relative age of a record, e.g. "3 days ago". Timestamps are Unix ms.
pub fn format_date(timestamp: f64, now: f64) -> String {
    const UNITS: [(f64, &str, &str); 3] = [
        (86_400.0, "day", "Yesterday"),
        (3_600.0, "hour", "1 hour ago"),
        (60.0, "min", "1 min ago"),
    ];

    let age_secs = (now - timestamp) / 1000.0;
    for (unit_secs, unit, single) in UNITS {
        let count = (age_secs / unit_secs).floor();
        if count >= 2.0 {
            return format!("{} {}s ago", count as u64, unit);
        }
        if count >= 1.0 {
            return single.to_string();
        }
    }
    "Just now".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, score: u32) -> ScoreRecord {
        ScoreRecord {
            name: name.into(),
            score,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_sorted_insert_and_rank() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add(record("a", 5)), Some(1));
        assert_eq!(board.add(record("b", 9)), Some(1));
        assert_eq!(board.add(record("c", 7)), Some(2));
        let scores: Vec<u32> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![9, 7, 5]);
        assert_eq!(board.top().map(|e| e.name.as_str()), Some("b"));
    }

    #[test]
    fn test_capped_at_max() {
        let mut board = Leaderboard::new();
        for i in 1..=15 {
            board.add(record("p", i));
        }
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert!(!board.qualifies(3));
        assert_eq!(board.potential_rank(100), Some(1));
        assert_eq!(board.entries.last().map(|e| e.score), Some(6));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let board = Leaderboard::new();
        assert!(!board.qualifies(0));
        assert_eq!(board.potential_rank(0), None);
    }

    #[test]
    fn test_save_refuses_unranked_records() {
        let mut board = Leaderboard::new();
        assert!(matches!(
            board.save(&record("nil", 0)),
            Err(PersistenceError::Rejected(_))
        ));
        assert!(board.entries.is_empty());

        for i in 1..=MAX_ENTRIES as u32 {
            board.add(record("p", i + 10));
        }
        assert!(matches!(
            board.save(&record("low", 3)),
            Err(PersistenceError::Rejected(_))
        ));
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert!(board.entries.iter().all(|e| e.name == "p"));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("tower_stack_lb_{}.json", std::process::id()));
        let mut board = Leaderboard::load(&path);
        board.save(&record("zed", 4)).unwrap();

        let reloaded = Leaderboard::load(&path);
        assert_eq!(reloaded.entries.len(), 1);
        assert_eq!(reloaded.entries[0].name, "zed");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(0.0, 30_000.0), "Just now");
        assert_eq!(format_date(0.0, 90_000.0), "1 min ago");
        assert_eq!(format_date(0.0, 2.0 * 3_600_000.0), "2 hours ago");
        assert_eq!(format_date(0.0, 3.0 * 86_400_000.0), "3 days ago");
        assert_eq!(format_date(0.0, 86_400_000.0), "Yesterday");
    }
}
