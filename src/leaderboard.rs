//! Leaderboard of evaluated controllers
//!
//! Keeps the best candidates by mean fitness, highest first. Persisted as a
//! JSON file next to benchmark output.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::agent::EpisodeReport;

/// Default number of entries to keep
pub const DEFAULT_CAPACITY: usize = 10;

/// One evaluated candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Human-readable candidate name
    pub label: String,
    /// Mean fitness across every evaluated seed
    pub fitness: f32,
    /// Best single-episode score
    pub best_score: u32,
    /// Seed that produced `best_score`
    pub best_seed: u64,
    /// Paddle hits summed over all episodes
    pub total_hits: u32,
    pub episodes: usize,
}

impl LeaderboardEntry {
    /// Summarize a candidate's episodes (None when there are none)
    pub fn from_reports(label: impl Into<String>, reports: &[EpisodeReport]) -> Option<Self> {
        let best = reports.iter().max_by_key(|r| r.score)?;
        Some(Self {
            label: label.into(),
            fitness: crate::agent::mean_fitness(reports),
            best_score: best.score,
            best_seed: best.seed,
            total_hits: reports.iter().map(|r| r.ball_hits).sum(),
            episodes: reports.len(),
        })
    }
}

/// Bounded, fitness-sorted list of candidates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaderboard {
    pub capacity: usize,
    pub entries: Vec<LeaderboardEntry>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Check if a fitness would make the board
    pub fn qualifies(&self, fitness: f32) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.entries.len() < self.capacity {
            return true;
        }
        // Must beat the lowest entry
        self.entries.last().map(|e| fitness > e.fitness).unwrap_or(true)
    }

    /// Rank a fitness would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, fitness: f32) -> Option<usize> {
        if !self.qualifies(fitness) {
            return None;
        }
        let rank = self.entries.iter().position(|e| fitness > e.fitness);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry if it qualifies, replacing any entry with the same label
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        if let Some(i) = self.entries.iter().position(|e| e.label == entry.label) {
            log::debug!("Replacing leaderboard entry {}", entry.label);
            self.entries.remove(i);
        }
        let rank = self.potential_rank(entry.fitness)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(self.capacity);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best entry (if any)
    pub fn top(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    /// Load a leaderboard file, or an empty board if the file doesn't exist
    pub fn load(path: impl AsRef<Path>, capacity: usize) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No leaderboard at {}, starting fresh", path.display());
            return Ok(Self::new(capacity));
        }
        let json = fs::read_to_string(path)?;
        let mut board: Self = serde_json::from_str(&json)?;
        board.capacity = capacity;
        board.entries.truncate(capacity);
        log::info!("Loaded {} leaderboard entries", board.entries.len());
        Ok(board)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}
