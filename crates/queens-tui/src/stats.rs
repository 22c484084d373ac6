use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Aggregates for one board size
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizeStats {
    pub games: usize,
    pub solved: usize,
    /// Solves that used auto-solve
    pub assisted: usize,
    pub best_time_secs: Option<u64>,
    pub total_solve_time_secs: u64,
    pub total_hints: usize,
}

impl SizeStats {
    pub fn avg_time_secs(&self) -> Option<u64> {
        let unassisted = self.solved.saturating_sub(self.assisted);
        if unassisted > 0 {
            Some(self.total_solve_time_secs / unassisted as u64)
        } else {
            None
        }
    }
}

/// Persisted player statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_games: usize,
    pub total_solved: usize,
    pub by_size: HashMap<String, SizeStats>,
}

/// Loads, updates, and saves player statistics
pub struct StatsManager {
    path: PathBuf,
    pub stats: PlayerStats,
}

impl StatsManager {
    /// Load stats from the local data directory (missing or unreadable
    /// files start fresh)
    pub fn load() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("queens_stats.json");
        Self::at_path(path)
    }

    /// Load stats from a specific file
    pub fn at_path(path: PathBuf) -> Self {
        let stats = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => PlayerStats::default(),
        };
        Self { path, stats }
    }

    fn save(&self) {
        if let Ok(json) = serde_json::to_string_pretty(&self.stats) {
            let _ = fs::write(&self.path, json);
        }
    }

    fn size_entry(&mut self, size: usize) -> &mut SizeStats {
        self.stats
            .by_size
            .entry(format!("{0}x{0}", size))
            .or_default()
    }

    /// Record a new board being started
    pub fn record_started(&mut self, size: usize) {
        self.stats.total_games += 1;
        self.size_entry(size).games += 1;
        self.save();
    }

    /// Record a solved board. Assisted solves are counted but never update
    /// the best time.
    pub fn record_solved(&mut self, size: usize, time_secs: u64, hints: usize, assisted: bool) {
        self.stats.total_solved += 1;
        let entry = self.size_entry(size);
        entry.solved += 1;
        entry.total_hints += hints;
        if assisted {
            entry.assisted += 1;
        } else {
            entry.total_solve_time_secs += time_secs;
            entry.best_time_secs = Some(match entry.best_time_secs {
                Some(best) => best.min(time_secs),
                None => time_secs,
            });
        }
        self.save();
    }

    /// Size keys in ascending order, for the stats screen
    pub fn sizes(&self) -> Vec<&String> {
        let mut keys: Vec<&String> = self.stats.by_size.keys().collect();
        keys.sort();
        keys
    }
}

/// Format seconds as MM:SS
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_manager(name: &str) -> StatsManager {
        let path = std::env::temp_dir().join(format!(
            "queens_stats_test_{}_{}.json",
            std::process::id(),
            name
        ));
        fs::remove_file(&path).ok();
        StatsManager::at_path(path)
    }

    #[test]
    fn test_records_games_and_solves() {
        let mut manager = scratch_manager("records");
        manager.record_started(7);
        manager.record_started(7);
        manager.record_solved(7, 90, 1, false);

        let entry = &manager.stats.by_size["7x7"];
        assert_eq!(entry.games, 2);
        assert_eq!(entry.solved, 1);
        assert_eq!(entry.best_time_secs, Some(90));
        assert_eq!(entry.total_hints, 1);

        fs::remove_file(&manager.path).ok();
    }

    #[test]
    fn test_best_time_keeps_minimum_and_skips_assisted() {
        let mut manager = scratch_manager("best_time");
        manager.record_started(5);
        manager.record_solved(5, 120, 0, false);
        manager.record_solved(5, 80, 0, false);
        manager.record_solved(5, 10, 0, true);

        let entry = &manager.stats.by_size["5x5"];
        assert_eq!(entry.best_time_secs, Some(80));
        assert_eq!(entry.assisted, 1);
        assert_eq!(entry.avg_time_secs(), Some(100));

        fs::remove_file(&manager.path).ok();
    }

    #[test]
    fn test_stats_round_trip_through_disk() {
        let mut manager = scratch_manager("round_trip");
        manager.record_started(6);
        manager.record_solved(6, 45, 0, false);

        let reloaded = StatsManager::at_path(manager.path.clone());
        assert_eq!(reloaded.stats.total_solved, 1);
        assert_eq!(reloaded.stats.by_size["6x6"].best_time_secs, Some(45));

        fs::remove_file(&manager.path).ok();
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(3601), "60:01");
    }
}
