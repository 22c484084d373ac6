//! Exact-constraint backtracking search over region matrices.
//!
//! Assigns one crown per region under row, column, and 8-neighbor adjacency
//! exclusivity, counting solutions up to an optional limit and collecting
//! each completed assignment as a witness.

use crate::grid::{Position, RegionMap, RegionMatrix};

/// Result of one solver invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    /// Number of solutions found (capped at the limit, when one was given)
    pub count: usize,
    /// One witness per counted solution, each sorted by x then y
    pub witnesses: Vec<Vec<Position>>,
}

/// Search state threaded by mutable reference through the recursion.
///
/// Row and column occupancy are bitmasks; the placed-crown stack doubles as
/// the occupied-cell set for the adjacency test and as the witness source.
/// All mutation is scoped to one candidate and undone on backtrack.
struct SearchState<'a> {
    map: &'a RegionMap,
    rows: u64,
    cols: u64,
    placed: Vec<Position>,
    count: usize,
    witnesses: Vec<Vec<Position>>,
    limit: Option<usize>,
}

impl SearchState<'_> {
    fn at_limit(&self) -> bool {
        self.limit.is_some_and(|limit| self.count >= limit)
    }

    fn search(&mut self, region: usize) {
        if self.at_limit() {
            return;
        }
        if region == self.map.len() {
            self.count += 1;
            let mut witness = self.placed.clone();
            witness.sort_unstable();
            self.witnesses.push(witness);
            return;
        }

        // A region with no eligible candidate (including a degenerate empty
        // region) simply fails this branch; that is a search dead-end, not
        // an error.
        for &pos in self.map.region(region) {
            if self.rows & (1 << pos.y) != 0 || self.cols & (1 << pos.x) != 0 {
                continue;
            }
            if self.placed.iter().any(|&crown| crown.is_adjacent(pos)) {
                continue;
            }

            self.rows |= 1 << pos.y;
            self.cols |= 1 << pos.x;
            self.placed.push(pos);
            self.search(region + 1);
            self.placed.pop();
            self.cols &= !(1 << pos.x);
            self.rows &= !(1 << pos.y);

            if self.at_limit() {
                return;
            }
        }
    }
}

/// Stateless solver; all search state is per call.
pub struct Solver;

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self
    }

    /// Count solutions and collect witnesses.
    ///
    /// `limit = None` counts exhaustively; `limit = Some(k)` unwinds the
    /// whole search as soon as `k` solutions have been seen, which is the
    /// cheap "is it unique" probe with `k = 2`. Regions are processed in id
    /// order, so the outcome is deterministic for a given matrix.
    ///
    /// Supports boards up to 64x64 (the row/column occupancy bitmasks).
    pub fn solve(&self, matrix: &RegionMatrix, limit: Option<usize>) -> SolveOutcome {
        assert!(
            matrix.width() <= 64 && matrix.height() <= 64,
            "solver supports boards up to 64x64"
        );
        let map = RegionMap::from_matrix(matrix);
        let mut state = SearchState {
            map: &map,
            rows: 0,
            cols: 0,
            placed: Vec::with_capacity(map.len()),
            count: 0,
            witnesses: Vec::new(),
            limit,
        };
        state.search(0);
        SolveOutcome {
            count: state.count,
            witnesses: state.witnesses,
        }
    }

    /// Count solutions up to a limit.
    pub fn count_solutions(&self, matrix: &RegionMatrix, limit: usize) -> usize {
        self.solve(matrix, Some(limit)).count
    }

    /// Check if the matrix has exactly one solution.
    pub fn has_unique_solution(&self, matrix: &RegionMatrix) -> bool {
        self.count_solutions(matrix, 2) == 1
    }

    /// Find one solution, if any exists.
    pub fn solve_one(&self, matrix: &RegionMatrix) -> Option<Vec<Position>> {
        self.solve(matrix, Some(1)).witnesses.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RegionMatrix;

    /// 4x4 grid, one horizontal stripe per region. With regions equal to
    /// rows, the region constraint is free and the count is exactly the
    /// number of column permutations whose consecutive entries differ by at
    /// least 2: `1,3,0,2` and `2,0,3,1`.
    fn stripes_4x4() -> RegionMatrix {
        RegionMatrix::from_cells(4, 4, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3])
    }

    #[test]
    fn test_single_cell_grid_has_one_solution() {
        let matrix = RegionMatrix::from_cells(1, 1, vec![0]);
        let outcome = Solver::new().solve(&matrix, None);
        assert_eq!(outcome.count, 1);
        assert_eq!(outcome.witnesses, vec![vec![Position::new(0, 0)]]);
    }

    #[test]
    fn test_stripes_4x4_has_two_solutions() {
        let outcome = Solver::new().solve(&stripes_4x4(), None);
        assert_eq!(outcome.count, 2);
        assert_eq!(
            outcome.witnesses[0],
            vec![
                Position::new(0, 2),
                Position::new(1, 0),
                Position::new(2, 3),
                Position::new(3, 1),
            ]
        );
        assert_eq!(
            outcome.witnesses[1],
            vec![
                Position::new(0, 1),
                Position::new(1, 3),
                Position::new(2, 0),
                Position::new(3, 2),
            ]
        );
    }

    #[test]
    fn test_count_is_deterministic() {
        let solver = Solver::new();
        let matrix = stripes_4x4();
        assert_eq!(
            solver.solve(&matrix, None),
            solver.solve(&matrix, None),
        );
    }

    #[test]
    fn test_limit_caps_the_count() {
        let solver = Solver::new();
        let matrix = stripes_4x4();
        assert_eq!(solver.count_solutions(&matrix, 1), 1);
        assert_eq!(solver.solve(&matrix, Some(1)).witnesses.len(), 1);
        assert_eq!(solver.count_solutions(&matrix, 0), 0);
    }

    #[test]
    fn test_limit_at_or_above_true_count_is_exhaustive() {
        let solver = Solver::new();
        let matrix = stripes_4x4();
        let exhaustive = solver.solve(&matrix, None).count;
        assert_eq!(solver.count_solutions(&matrix, exhaustive), exhaustive);
        assert_eq!(solver.count_solutions(&matrix, exhaustive + 5), exhaustive);
    }

    #[test]
    fn test_missing_region_id_yields_zero() {
        // 4x4 stripes with row 2 folded into region 1: ids {0, 1, 3}, id 2
        // missing. The empty region dead-ends every branch.
        let matrix = RegionMatrix::from_cells(
            4,
            4,
            vec![0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 3, 3, 3, 3],
        );
        let outcome = Solver::new().solve(&matrix, None);
        assert_eq!(outcome.count, 0);
        assert!(outcome.witnesses.is_empty());
    }

    #[test]
    fn test_adjacency_blocks_touching_rows() {
        // 2x2, two horizontal stripes: any row-distinct, column-distinct
        // pair of cells still touches diagonally, so no solution exists.
        let matrix = RegionMatrix::from_cells(2, 2, vec![0, 0, 1, 1]);
        assert_eq!(Solver::new().solve(&matrix, None).count, 0);
    }

    #[test]
    fn test_solve_one_matches_first_witness() {
        let solver = Solver::new();
        let matrix = stripes_4x4();
        let one = solver.solve_one(&matrix).unwrap();
        let all = solver.solve(&matrix, None);
        assert_eq!(one, all.witnesses[0]);
    }

    #[test]
    fn test_dead_end_region_is_not_an_error() {
        // Region 1 is a single cell adjacent to every cell of region 0 on a
        // 2x1 strip; the row constraint alone already kills all branches.
        let matrix = RegionMatrix::from_cells(2, 1, vec![0, 1]);
        assert_eq!(Solver::new().solve(&matrix, None).count, 0);
    }
}
