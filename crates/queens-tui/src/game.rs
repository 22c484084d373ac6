use queens_core::{
    validate_complete, validate_partial, Board, CellMark, CompletionStatus, Generator,
    GeneratorConfig, PlacementViolation, Position, Puzzle, RegionMatrix, Solver,
};
use rand::seq::SliceRandom;
use std::path::Path;
use std::time::{Duration, Instant};

/// Why a new game could not be produced
#[derive(Debug, Clone)]
pub enum NewGameError {
    /// The sampler exhausted its attempt budget; a normal statistical
    /// outcome, reported rather than crashed on
    NoUniquePuzzle { attempts: usize },
    /// A loaded board has no solution to play toward
    Unsolvable,
    /// Partition or persistence failure from the core
    Core(String),
}

impl std::fmt::Display for NewGameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoUniquePuzzle { attempts } => {
                write!(
                    f,
                    "no unique-solution puzzle found after {} attempts",
                    attempts
                )
            }
            Self::Unsolvable => write!(f, "loaded puzzle has no solution"),
            Self::Core(e) => write!(f, "{}", e),
        }
    }
}

/// The current-puzzle handle: one puzzle, its play board, and timing.
///
/// Regeneration replaces the whole value; nothing in here is mutated
/// field-by-field across puzzles.
pub struct Game {
    regions: RegionMatrix,
    board: Board,
    solution: Vec<Position>,
    start_time: Instant,
    frozen_elapsed: Option<Duration>,
    completed: bool,
    hints_used: usize,
    assisted: bool,
    attempts_taken: usize,
}

impl Game {
    /// Generate a fresh unique puzzle. When `out_dir` is given, the accepted
    /// puzzle's tables and the active hand-off file are persisted there as a
    /// side effect of the sampling loop.
    pub fn generate(
        size: usize,
        max_attempts: usize,
        seed: Option<u64>,
        out_dir: Option<&Path>,
    ) -> Result<Self, NewGameError> {
        let config = GeneratorConfig {
            max_attempts,
            want: 1,
        };
        let mut generator = match seed {
            Some(seed) => Generator::with_config_and_seed(config, seed),
            None => Generator::with_config(config),
        };

        let report = match out_dir {
            Some(dir) => generator
                .find_unique_and_save(size, size, dir)
                .map_err(|e| NewGameError::Core(e.to_string()))?,
            None => generator
                .find_unique(size, size)
                .map_err(|e| NewGameError::Core(e.to_string()))?,
        };

        let attempts = report.attempts;
        match report.puzzles.into_iter().next() {
            Some(puzzle) => Ok(Self::from_puzzle(puzzle, attempts)),
            None => Err(NewGameError::NoUniquePuzzle { attempts }),
        }
    }

    /// Start a game from a loaded region matrix, recomputing the solution
    /// (solutions are never read back from disk).
    pub fn from_matrix(regions: RegionMatrix) -> Result<Self, NewGameError> {
        let solution = Solver::new()
            .solve_one(&regions)
            .ok_or(NewGameError::Unsolvable)?;
        Ok(Self::from_puzzle(Puzzle { regions, solution }, 0))
    }

    fn from_puzzle(puzzle: Puzzle, attempts_taken: usize) -> Self {
        Self {
            regions: puzzle.regions,
            board: Board::new(),
            solution: puzzle.solution,
            start_time: Instant::now(),
            frozen_elapsed: None,
            completed: false,
            hints_used: 0,
            assisted: false,
            attempts_taken,
        }
    }

    pub fn regions(&self) -> &RegionMatrix {
        &self.regions
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn width(&self) -> usize {
        self.regions.width()
    }

    pub fn height(&self) -> usize {
        self.regions.height()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    pub fn was_assisted(&self) -> bool {
        self.assisted
    }

    pub fn attempts_taken(&self) -> usize {
        self.attempts_taken
    }

    pub fn elapsed(&self) -> Duration {
        match self.frozen_elapsed {
            Some(frozen) => frozen,
            None => self.start_time.elapsed(),
        }
    }

    /// Cycle a cell: empty -> excluded -> crown -> empty.
    ///
    /// The excluded-to-crown step goes through the partial validator; a
    /// rejected crown leaves the board untouched (the cell keeps its
    /// scratch mark) and returns the violated constraint.
    pub fn cycle_cell(&mut self, pos: Position) -> Result<Option<CellMark>, PlacementViolation> {
        if self.completed {
            return Ok(self.board.mark(pos));
        }
        match self.board.mark(pos) {
            None => {
                self.board.set_mark(pos, CellMark::Excluded);
                Ok(Some(CellMark::Excluded))
            }
            Some(CellMark::Excluded) => {
                self.try_place_crown(pos)?;
                Ok(Some(CellMark::Crown))
            }
            Some(CellMark::Crown) => {
                self.board.clear_mark(pos);
                Ok(None)
            }
        }
    }

    fn try_place_crown(&mut self, pos: Position) -> Result<(), PlacementViolation> {
        let mut candidate = self.board.clone();
        candidate.set_mark(pos, CellMark::Crown);
        validate_partial(&candidate, &self.regions)?;
        self.board = candidate;
        self.refresh_completed();
        Ok(())
    }

    /// Remove any mark from a cell
    pub fn clear_cell(&mut self, pos: Position) {
        if !self.completed {
            self.board.clear_mark(pos);
        }
    }

    /// Completion status of the current board
    pub fn check(&self) -> CompletionStatus {
        validate_complete(&self.board, &self.regions)
    }

    /// Exhaustive solution count for the current puzzle
    pub fn count_all_solutions(&self) -> usize {
        Solver::new().solve(&self.regions, None).count
    }

    /// Fill the board with the known solution
    pub fn apply_solution(&mut self) {
        self.board.clear();
        for &crown in &self.solution {
            self.board.set_mark(crown, CellMark::Crown);
        }
        self.assisted = true;
        self.refresh_completed();
    }

    /// Reveal one crown of the solution not yet on the board
    pub fn hint(&mut self) -> Option<Position> {
        if self.completed {
            return None;
        }
        let missing: Vec<Position> = self
            .solution
            .iter()
            .copied()
            .filter(|&crown| self.board.mark(crown) != Some(CellMark::Crown))
            .collect();
        let &pick = missing.choose(&mut rand::thread_rng())?;
        self.board.set_mark(pick, CellMark::Crown);
        self.hints_used += 1;
        self.refresh_completed();
        Some(pick)
    }

    /// Clear every mark, keeping the puzzle and the running clock
    pub fn reset(&mut self) {
        self.board.clear();
        self.completed = false;
        self.frozen_elapsed = None;
    }

    fn refresh_completed(&mut self) {
        if !self.completed && self.check().is_complete() {
            self.completed = true;
            self.frozen_elapsed = Some(self.start_time.elapsed());
        }
    }
}
