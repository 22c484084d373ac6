//! Persisted puzzle format: CSV tables for regions and solutions.
//!
//! Each accepted puzzle is two companion tables correlated by an id in the
//! file name; a separate active-puzzle file (one board's regions, same
//! schema, no id) is the hand-off artifact an interactive consumer reads at
//! startup. Solutions are never read back; consumers recompute them with the
//! solver. All format validation happens here, before a `RegionMatrix` is
//! constructed — the core never re-checks a constructed matrix.

use crate::grid::{Puzzle, RegionMatrix};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One cell of the regions table
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RegionRow {
    x: usize,
    y: usize,
    region: u16,
}

/// One crown of the solution table
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct SolutionRow {
    x: usize,
    y: usize,
}

/// Errors at the persistence boundary
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Filesystem error
    Io(String),
    /// Malformed persisted data (wrong columns, non-integer fields, ragged
    /// or missing rows)
    Format(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "storage I/O error: {}", e),
            Self::Format(e) => write!(f, "malformed puzzle data: {}", e),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<csv::Error> for StorageError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            Self::Io(err.to_string())
        } else {
            Self::Format(err.to_string())
        }
    }
}

/// File names of one persisted puzzle's companion tables
pub fn puzzle_paths(dir: &Path, id: usize) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("queens_puzzle_{}_regions.csv", id)),
        dir.join(format!("queens_puzzle_{}_solution.csv", id)),
    )
}

fn write_regions(matrix: &RegionMatrix, path: &Path) -> Result<(), StorageError> {
    let mut writer = csv::Writer::from_path(path)?;
    for pos in matrix.positions() {
        writer.serialize(RegionRow {
            x: pos.x,
            y: pos.y,
            region: matrix.region_at(pos),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Persist one accepted puzzle as its two companion tables.
///
/// Returns the paths written. Overwrites any previous puzzle with the same
/// id — regeneration is the only way a persisted puzzle is destroyed.
pub fn save_puzzle(
    puzzle: &Puzzle,
    id: usize,
    dir: &Path,
) -> Result<(PathBuf, PathBuf), StorageError> {
    let (regions_path, solution_path) = puzzle_paths(dir, id);
    write_regions(&puzzle.regions, &regions_path)?;

    let mut writer = csv::Writer::from_path(&solution_path)?;
    for crown in &puzzle.solution {
        writer.serialize(SolutionRow {
            x: crown.x,
            y: crown.y,
        })?;
    }
    writer.flush()?;
    Ok((regions_path, solution_path))
}

/// Write the active-puzzle hand-off file: one board's regions, same schema
/// as the regions table, unqualified by id.
pub fn save_active_puzzle(matrix: &RegionMatrix, path: &Path) -> Result<(), StorageError> {
    write_regions(matrix, path)
}

/// Load the active-puzzle file, rejecting malformed input before a
/// `RegionMatrix` is built.
pub fn load_active_puzzle(path: &Path) -> Result<RegionMatrix, StorageError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize::<RegionRow>() {
        rows.push(row?);
    }
    if rows.is_empty() {
        return Err(StorageError::Format("no cells in puzzle file".into()));
    }

    let width = rows.iter().map(|row| row.x).max().unwrap_or(0) + 1;
    let height = rows.iter().map(|row| row.y).max().unwrap_or(0) + 1;
    if rows.len() != width * height {
        return Err(StorageError::Format(format!(
            "expected {} cells for a {}x{} board, found {}",
            width * height,
            width,
            height,
            rows.len()
        )));
    }

    let mut cells: Vec<Option<u16>> = vec![None; width * height];
    for row in &rows {
        let slot = &mut cells[row.y * width + row.x];
        if slot.is_some() {
            return Err(StorageError::Format(format!(
                "duplicate cell ({}, {})",
                row.x, row.y
            )));
        }
        *slot = Some(row.region);
    }
    // rows.len() == width * height and no duplicates, so every slot is set
    let cells: Vec<u16> = cells.into_iter().map(Option::unwrap_or_default).collect();

    let region_count = usize::from(*cells.iter().max().unwrap_or(&0)) + 1;
    let mut present = vec![false; region_count];
    for &id in &cells {
        present[usize::from(id)] = true;
    }
    if let Some(missing) = present.iter().position(|&p| !p) {
        return Err(StorageError::Format(format!(
            "region ids not contiguous: id {} missing below {}",
            missing,
            region_count - 1
        )));
    }

    Ok(RegionMatrix::from_cells(width, height, cells))
}
