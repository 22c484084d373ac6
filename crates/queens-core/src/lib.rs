//! Core engine for one-crown-per-row/column/region puzzles.
//!
//! A puzzle is a partition of an N x N grid into N connected regions such
//! that placing one crown per row, per column, and per region, with no two
//! crowns touching (even diagonally), has exactly one solution. This crate
//! holds the combinatorial core: the region partitioner, the exact-constraint
//! backtracking solver, the uniqueness sampler that retries partitions until
//! one solves uniquely, the stateless board validator, and the CSV
//! persistence boundary. Rendering and interaction live in a separate
//! consumer crate built on this API.

pub mod generator;
pub mod grid;
pub mod partition;
pub mod rng;
pub mod solver;
pub mod storage;
pub mod validator;

pub use generator::{GenerateError, GenerationReport, Generator, GeneratorConfig};
pub use grid::{Board, CellMark, Position, Puzzle, RegionMap, RegionMatrix};
pub use partition::{partition, PartitionError};
pub use rng::SimpleRng;
pub use solver::{SolveOutcome, Solver};
pub use storage::{
    load_active_puzzle, save_active_puzzle, save_puzzle, StorageError,
};
pub use validator::{
    is_partial_valid, validate_complete, validate_partial, CompletionStatus, PlacementViolation,
};
