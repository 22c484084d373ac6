//! Uniqueness sampler: retries random partitions until one solves uniquely.

use crate::grid::Puzzle;
use crate::partition::{partition, PartitionError};
use crate::rng::SimpleRng;
use crate::solver::Solver;
use crate::storage::{self, StorageError};
use std::path::Path;

/// Configuration for the sampling loop
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Maximum partition attempts before giving up
    pub max_attempts: usize,
    /// Number of unique puzzles to collect
    pub want: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2000,
            want: 1,
        }
    }
}

/// Outcome of a sampling run.
///
/// Exhausting the attempts with fewer puzzles than wanted is a normal,
/// non-fatal outcome — uniqueness is a statistical property of random
/// partitions — so callers must check [`found`](Self::found).
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Accepted puzzles, in acceptance order
    pub puzzles: Vec<Puzzle>,
    /// Partition attempts consumed
    pub attempts: usize,
}

impl GenerationReport {
    pub fn found(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}

/// Errors from a persisting sampling run
#[derive(Debug, Clone)]
pub enum GenerateError {
    Partition(PartitionError),
    Storage(StorageError),
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Partition(e) => write!(f, "{}", e),
            Self::Storage(e) => write!(f, "{}", e),
        }
    }
}

impl From<PartitionError> for GenerateError {
    fn from(err: PartitionError) -> Self {
        Self::Partition(err)
    }
}

impl From<StorageError> for GenerateError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

/// Puzzle sampler driving the partitioner and the solver
pub struct Generator {
    config: GeneratorConfig,
    rng: SimpleRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a sampler with the default configuration
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::new(),
        }
    }

    /// Create a sampler with a custom configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(),
        }
    }

    /// Create a sampler with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Create a seeded sampler with a custom configuration
    pub fn with_config_and_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Sample partitions of a `width` x `height` grid (one region per
    /// column) until `want` of them solve uniquely or the attempt budget is
    /// spent.
    ///
    /// Each attempt partitions afresh and probes the solver with limit 2; a
    /// partition is accepted exactly when the count comes back 1, and the
    /// probe's witness becomes the puzzle's canonical solution.
    pub fn find_unique(
        &mut self,
        width: usize,
        height: usize,
    ) -> Result<GenerationReport, PartitionError> {
        let solver = Solver::new();
        let mut report = GenerationReport::default();

        while report.attempts < self.config.max_attempts && report.found() < self.config.want {
            report.attempts += 1;
            let regions = partition(width, height, width, &mut self.rng)?;
            let outcome = solver.solve(&regions, Some(2));
            if outcome.count == 1 {
                if let Some(solution) = outcome.witnesses.into_iter().next() {
                    report.puzzles.push(Puzzle { regions, solution });
                }
            }
        }
        Ok(report)
    }

    /// Like [`find_unique`](Self::find_unique), persisting each accepted
    /// puzzle into `dir` as it is found. The first accepted puzzle also
    /// becomes the active hand-off file `dir/puzzle.csv`.
    pub fn find_unique_and_save(
        &mut self,
        width: usize,
        height: usize,
        dir: &Path,
    ) -> Result<GenerationReport, GenerateError> {
        let solver = Solver::new();
        let mut report = GenerationReport::default();

        while report.attempts < self.config.max_attempts && report.found() < self.config.want {
            report.attempts += 1;
            let regions = partition(width, height, width, &mut self.rng)?;
            let outcome = solver.solve(&regions, Some(2));
            if outcome.count != 1 {
                continue;
            }
            let Some(solution) = outcome.witnesses.into_iter().next() else {
                continue;
            };
            let puzzle = Puzzle { regions, solution };
            storage::save_puzzle(&puzzle, report.found() + 1, dir)?;
            if report.is_empty() {
                storage::save_active_puzzle(&puzzle.regions, &dir.join("puzzle.csv"))?;
            }
            report.puzzles.push(puzzle);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Board, CellMark};
    use crate::validator::{validate_complete, CompletionStatus};

    #[test]
    fn test_find_unique_accepts_only_unique_partitions() {
        let mut generator = Generator::with_config_and_seed(
            GeneratorConfig {
                max_attempts: 5000,
                want: 2,
            },
            42,
        );
        let report = generator.find_unique(6, 6).unwrap();
        assert_eq!(report.found(), 2);
        assert!(report.attempts >= 2);

        let solver = Solver::new();
        for puzzle in &report.puzzles {
            assert!(solver.has_unique_solution(&puzzle.regions));
            assert_eq!(puzzle.solution.len(), 6);
        }
    }

    #[test]
    fn test_accepted_witness_satisfies_all_constraints() {
        let mut generator = Generator::with_seed(7);
        let report = generator.find_unique(5, 5).unwrap();
        assert_eq!(report.found(), 1);

        let puzzle = &report.puzzles[0];
        let mut board = Board::new();
        for &crown in &puzzle.solution {
            board.set_mark(crown, CellMark::Crown);
        }
        assert_eq!(
            validate_complete(&board, &puzzle.regions),
            CompletionStatus::Complete
        );
    }

    #[test]
    fn test_same_seed_reproduces_the_same_puzzle() {
        let first = Generator::with_seed(123).find_unique(6, 6).unwrap();
        let second = Generator::with_seed(123).find_unique(6, 6).unwrap();
        assert_eq!(first.attempts, second.attempts);
        assert_eq!(first.puzzles, second.puzzles);
    }

    #[test]
    fn test_exhausted_attempts_is_a_partial_result_not_an_error() {
        // A 2x2 board has no valid placement at all (everything touches),
        // so no partition can ever be unique.
        let mut generator = Generator::with_config_and_seed(
            GeneratorConfig {
                max_attempts: 50,
                want: 1,
            },
            9,
        );
        let report = generator.find_unique(2, 2).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.attempts, 50);
    }

    #[test]
    fn test_insufficient_cells_is_surfaced() {
        // region_count = width exceeds width * height when height = 0
        let mut generator = Generator::with_seed(1);
        assert!(generator.find_unique(3, 0).is_err());
    }

    #[test]
    fn test_find_unique_and_save_writes_tables_and_active_file() {
        let dir = std::env::temp_dir().join(format!(
            "queens_generator_test_{}_save",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();

        let mut generator = Generator::with_seed(42);
        let report = generator.find_unique_and_save(5, 5, &dir).unwrap();
        assert_eq!(report.found(), 1);

        assert!(dir.join("queens_puzzle_1_regions.csv").exists());
        assert!(dir.join("queens_puzzle_1_solution.csv").exists());
        let active = crate::storage::load_active_puzzle(&dir.join("puzzle.csv")).unwrap();
        assert_eq!(active, report.puzzles[0].regions);

        std::fs::remove_dir_all(&dir).ok();
    }
}
