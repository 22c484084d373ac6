//! Grid data model: positions, region matrices, boards, and accepted puzzles.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A cell coordinate on the board
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    /// Create a new position
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The 4 orthogonal neighbors inside a `width` x `height` grid
    pub fn neighbors4(self, width: usize, height: usize) -> impl Iterator<Item = Position> {
        const ORTHOGONAL: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        ORTHOGONAL
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy, width, height))
    }

    /// All 8 surrounding neighbors inside a `width` x `height` grid
    pub fn neighbors8(self, width: usize, height: usize) -> impl Iterator<Item = Position> {
        const AROUND: [(isize, isize); 8] = [
            (-1, -1), (0, -1), (1, -1),
            (-1, 0), (1, 0),
            (-1, 1), (0, 1), (1, 1),
        ];
        AROUND
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy, width, height))
    }

    /// Whether two positions touch, including diagonally (Chebyshev distance <= 1)
    pub fn is_adjacent(self, other: Position) -> bool {
        self != other && self.x.abs_diff(other.x) <= 1 && self.y.abs_diff(other.y) <= 1
    }

    fn offset(self, dx: isize, dy: isize, width: usize, height: usize) -> Option<Position> {
        let nx = self.x.checked_add_signed(dx)?;
        let ny = self.y.checked_add_signed(dy)?;
        if nx < width && ny < height {
            Some(Position::new(nx, ny))
        } else {
            None
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A full partition of the grid into regions, one id per cell.
///
/// Invariants (established by the partitioner, or by the storage boundary
/// when loading from disk): ids are contiguous `0..region_count`, every
/// region is non-empty and 4-connected, and the regions cover the grid
/// exactly. The matrix is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMatrix {
    width: usize,
    height: usize,
    region_count: usize,
    /// Row-major cell ids
    cells: Vec<u16>,
}

impl RegionMatrix {
    /// Build a matrix from row-major cell ids.
    ///
    /// The region count is taken to be one past the highest id present, so
    /// callers feeding a matrix with a hole in its id range get the empty
    /// region they asked for.
    pub fn from_cells(width: usize, height: usize, cells: Vec<u16>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        let region_count = cells.iter().max().map_or(0, |&max| usize::from(max) + 1);
        Self {
            width,
            height,
            region_count,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn region_count(&self) -> usize {
        self.region_count
    }

    /// Region id of a cell
    pub fn region_at(&self, pos: Position) -> u16 {
        self.cells[pos.y * self.width + pos.x]
    }

    /// All positions in raster (row-major) order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }
}

impl std::fmt::Display for RegionMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let id = self.region_at(Position::new(x, y));
                let glyph = match id {
                    0..=9 => (b'0' + id as u8) as char,
                    10..=35 => (b'a' + (id - 10) as u8) as char,
                    _ => '?',
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Read-only view of a matrix: region id -> its cells in raster order.
///
/// Built once per matrix and never mutated; a region change means a new
/// matrix and a new map.
#[derive(Debug, Clone)]
pub struct RegionMap {
    regions: Vec<Vec<Position>>,
}

impl RegionMap {
    /// Collect the cells of each region. Ids missing from the matrix (a
    /// degenerate input) produce an empty cell list rather than an error.
    pub fn from_matrix(matrix: &RegionMatrix) -> Self {
        let mut regions = vec![Vec::new(); matrix.region_count()];
        for pos in matrix.positions() {
            regions[usize::from(matrix.region_at(pos))].push(pos);
        }
        Self { regions }
    }

    /// Number of regions (including empty ones for degenerate matrices)
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Cells of one region, in raster order
    pub fn region(&self, id: usize) -> &[Position] {
        &self.regions[id]
    }
}

/// A user-visible mark on a cell.
///
/// Cells without a mark are empty. `Excluded` is a scratch mark with no
/// constraint effect; only `Crown` counts toward constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellMark {
    Excluded,
    Crown,
}

/// A sparse, mutable play board: marked cells only.
#[derive(Debug, Clone, Default)]
pub struct Board {
    marks: HashMap<Position, CellMark>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self, pos: Position) -> Option<CellMark> {
        self.marks.get(&pos).copied()
    }

    pub fn set_mark(&mut self, pos: Position, mark: CellMark) {
        self.marks.insert(pos, mark);
    }

    pub fn clear_mark(&mut self, pos: Position) {
        self.marks.remove(&pos);
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    /// Positions holding a crown, in arbitrary order
    pub fn crowns(&self) -> impl Iterator<Item = Position> + '_ {
        self.marks
            .iter()
            .filter(|(_, &mark)| mark == CellMark::Crown)
            .map(|(&pos, _)| pos)
    }

    pub fn crown_count(&self) -> usize {
        self.crowns().count()
    }

    pub fn is_blank(&self) -> bool {
        self.marks.is_empty()
    }
}

/// An accepted puzzle: a region matrix together with its unique solution.
///
/// Immutable once produced by the sampler; regeneration replaces the whole
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub regions: RegionMatrix,
    /// Crown positions, sorted by x then y
    pub solution: Vec<Position>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors4_corner() {
        let corner = Position::new(0, 0);
        let mut neighbors: Vec<_> = corner.neighbors4(5, 5).collect();
        neighbors.sort();
        assert_eq!(neighbors, vec![Position::new(0, 1), Position::new(1, 0)]);
    }

    #[test]
    fn test_neighbors8_center() {
        let center = Position::new(2, 2);
        assert_eq!(center.neighbors8(5, 5).count(), 8);
        assert!(!center.neighbors8(5, 5).any(|n| n == center));
    }

    #[test]
    fn test_neighbors8_edge_clipped() {
        let edge = Position::new(0, 2);
        assert_eq!(edge.neighbors8(5, 5).count(), 5);
    }

    #[test]
    fn test_adjacency_is_chebyshev() {
        let pos = Position::new(3, 3);
        assert!(pos.is_adjacent(Position::new(4, 4)));
        assert!(pos.is_adjacent(Position::new(2, 3)));
        assert!(!pos.is_adjacent(Position::new(5, 3)));
        assert!(!pos.is_adjacent(pos));
    }

    #[test]
    fn test_region_map_groups_cells() {
        // 2x2 grid, two vertical stripes
        let matrix = RegionMatrix::from_cells(2, 2, vec![0, 1, 0, 1]);
        let map = RegionMap::from_matrix(&matrix);
        assert_eq!(map.len(), 2);
        assert_eq!(map.region(0), &[Position::new(0, 0), Position::new(0, 1)]);
        assert_eq!(map.region(1), &[Position::new(1, 0), Position::new(1, 1)]);
    }

    #[test]
    fn test_region_map_keeps_missing_id_empty() {
        // Ids 0 and 2 present, 1 missing: the map still has three buckets.
        let matrix = RegionMatrix::from_cells(2, 1, vec![0, 2]);
        let map = RegionMap::from_matrix(&matrix);
        assert_eq!(map.len(), 3);
        assert!(map.region(1).is_empty());
    }

    #[test]
    fn test_board_marks() {
        let mut board = Board::new();
        let pos = Position::new(1, 1);
        board.set_mark(pos, CellMark::Excluded);
        assert_eq!(board.mark(pos), Some(CellMark::Excluded));
        assert_eq!(board.crown_count(), 0);

        board.set_mark(pos, CellMark::Crown);
        assert_eq!(board.crown_count(), 1);

        board.clear_mark(pos);
        assert!(board.is_blank());
    }

    #[test]
    fn test_puzzle_serde_round_trip() {
        let puzzle = Puzzle {
            regions: RegionMatrix::from_cells(2, 2, vec![0, 1, 0, 1]),
            solution: vec![Position::new(0, 0), Position::new(1, 1)],
        };
        let json = serde_json::to_string(&puzzle).unwrap();
        let back: Puzzle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, puzzle);
    }
}
