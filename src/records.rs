//! Best-run leaderboard
//!
//! Tracks the top 10 completed runs per stage. Fewer moves ranks higher;
//! ties go to the faster run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::PuzzleState;

/// Maximum number of runs kept per stage
pub const MAX_BEST_RUNS: usize = 10;

/// A single completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEntry {
    /// Completed drags
    pub moves: u32,
    /// Simulation ticks from start to completion
    pub ticks: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

impl RunEntry {
    /// True if a run of `moves`/`ticks` ranks strictly ahead of this one.
    /// Ties keep the earlier run in front.
    fn beaten_by(&self, moves: u32, ticks: u64) -> bool {
        (moves, ticks) < (self.moves, self.ticks)
    }
}

/// Leaderboard for one stage, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BestRuns {
    pub entries: Vec<RunEntry>,
}

impl BestRuns {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a run would make the board
    pub fn qualifies(&self, moves: u32, ticks: u64) -> bool {
        if moves == 0 {
            return false;
        }
        if self.entries.len() < MAX_BEST_RUNS {
            return true;
        }
        // Must beat the slowest entry
        self.entries.last().map(|e| e.beaten_by(moves, ticks)).unwrap_or(true)
    }

    /// Rank a run would achieve (1-indexed), None if it doesn't qualify
    pub fn potential_rank(&self, moves: u32, ticks: u64) -> Option<usize> {
        if !self.qualifies(moves, ticks) {
            return None;
        }
        let rank = self.entries.iter().position(|e| e.beaten_by(moves, ticks));
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run; returns the rank achieved or None if it didn't qualify
    pub fn add_run(&mut self, moves: u32, ticks: u64, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(moves, ticks)?;
        self.entries.insert(
            rank - 1,
            RunEntry {
                moves,
                ticks,
                timestamp,
            },
        );
        self.entries.truncate(MAX_BEST_RUNS);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&RunEntry> {
        self.entries.first()
    }
}

/// Leaderboards for every stage, keyed by stage id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StageRecords {
    pub stages: BTreeMap<u32, BestRuns>,
}

impl StageRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self, stage_id: u32) -> Option<&BestRuns> {
        self.stages.get(&stage_id)
    }

    /// Record a solved puzzle. Unsolved states are ignored.
    pub fn record(&mut self, stage_id: u32, state: &PuzzleState, timestamp: f64) -> Option<usize> {
        if !state.is_complete() {
            return None;
        }
        let rank = self
            .stages
            .entry(stage_id)
            .or_default()
            .add_run(state.moves, state.time_ticks, timestamp);
        if let Some(rank) = rank {
            log::info!("Stage {} run ranked #{} ({} moves)", stage_id, rank, state.moves);
        }
        rank
    }

    /// Load records from a JSON file; a missing file starts fresh
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No records found, starting fresh");
            return Ok(Self::new());
        }
        let records: Self = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        log::info!("Loaded records for {} stages", records.stages.len());
        Ok(records)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), serde_json::to_string(self)?)?;
        log::info!("Records saved ({} stages)", self.stages.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_prefers_fewer_moves_then_ticks() {
        let mut board = BestRuns::new();
        assert_eq!(board.add_run(12, 900, 0.0), Some(1));
        assert_eq!(board.add_run(10, 2000, 1.0), Some(1));
        assert_eq!(board.add_run(12, 500, 2.0), Some(2));
        let moves: Vec<(u32, u64)> = board.entries.iter().map(|e| (e.moves, e.ticks)).collect();
        assert_eq!(moves, vec![(10, 2000), (12, 500), (12, 900)]);
        assert_eq!(board.best().map(|e| e.moves), Some(10));
    }

    #[test]
    fn test_board_is_capped() {
        let mut board = BestRuns::new();
        for i in 0..MAX_BEST_RUNS as u32 {
            board.add_run(10 + i, 100, 0.0);
        }
        assert!(!board.qualifies(50, 100));
        assert_eq!(board.add_run(50, 100, 0.0), None);
        assert_eq!(board.potential_rank(5, 100), Some(1));
        assert_eq!(board.add_run(5, 100, 0.0), Some(1));
        assert_eq!(board.entries.len(), MAX_BEST_RUNS);
        assert_eq!(board.entries.last().map(|e| e.moves), Some(18));
    }

    #[test]
    fn test_tie_ranks_after_existing_run() {
        let mut board = BestRuns::new();
        board.add_run(10, 600, 1.0);
        board.add_run(8, 900, 2.0);
        assert_eq!(board.potential_rank(10, 600), Some(3));
        assert_eq!(board.add_run(10, 600, 3.0), Some(3));
        let stamps: Vec<f64> = board.entries.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_tie_with_last_place_does_not_qualify_when_full() {
        let mut board = BestRuns::new();
        for i in 0..MAX_BEST_RUNS as u32 {
            board.add_run(10 + i, 100, 0.0);
        }
        assert!(!board.qualifies(19, 100));
        assert!(board.qualifies(19, 99));
    }

    #[test]
    fn test_zero_moves_never_qualifies() {
        assert!(!BestRuns::new().qualifies(0, 10));
    }

    #[test]
    fn test_record_requires_completion() {
        let config = crate::stages::stage_by_id(1).unwrap().config();
        let state = PuzzleState::new(&config, 1).unwrap();
        let mut records = StageRecords::new();
        assert_eq!(records.record(1, &state, 0.0), None);
        assert!(records.board(1).is_none());
    }

    #[test]
    fn test_records_file_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("shard-puzzle-records-{}.json", std::process::id()));
        let mut records = StageRecords::new();
        records.stages.entry(2).or_default().add_run(14, 1200, 5.0);
        records.save(&path).unwrap();
        let loaded = StageRecords::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, records);

        let fresh = StageRecords::load(path.with_extension("missing")).unwrap();
        assert!(fresh.stages.is_empty());
    }
}
