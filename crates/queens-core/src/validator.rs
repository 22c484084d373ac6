//! Stateless constraint checks against a partial or complete play board.
//!
//! These are the solver's exclusivity rules re-exposed as cheap,
//! non-recursive checks so an interactive consumer can reject an illegal
//! placement immediately, without a backtracking pass. Only crowns count;
//! scratch marks are ignored.

use crate::grid::{Board, Position, RegionMatrix};

/// The first constraint broken by a pair of crowns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementViolation {
    RowConflict { first: Position, second: Position },
    ColumnConflict { first: Position, second: Position },
    RegionConflict { region: u16, first: Position, second: Position },
    AdjacentCrowns { first: Position, second: Position },
}

impl std::fmt::Display for PlacementViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RowConflict { first, second } => {
                write!(f, "crowns {} and {} share row {}", first, second, first.y)
            }
            Self::ColumnConflict { first, second } => {
                write!(f, "crowns {} and {} share column {}", first, second, first.x)
            }
            Self::RegionConflict {
                region,
                first,
                second,
            } => write!(f, "crowns {} and {} share region {}", first, second, region),
            Self::AdjacentCrowns { first, second } => {
                write!(f, "crowns {} and {} touch", first, second)
            }
        }
    }
}

/// Why a board is not yet a finished solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    /// Every row, column, and region holds exactly one crown, with no two
    /// crowns touching
    Complete,
    /// A pairwise constraint is broken
    Violation(PlacementViolation),
    /// A row has no crown yet
    RowUnfilled { y: usize },
    /// A column has no crown yet
    ColumnUnfilled { x: usize },
    /// A region has no crown yet
    RegionUnfilled { region: u16 },
}

impl CompletionStatus {
    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }
}

impl std::fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete => write!(f, "solved"),
            Self::Violation(violation) => write!(f, "{}", violation),
            Self::RowUnfilled { y } => write!(f, "row {} has no crown", y),
            Self::ColumnUnfilled { x } => write!(f, "column {} has no crown", x),
            Self::RegionUnfilled { region } => write!(f, "region {} has no crown", region),
        }
    }
}

/// Check the crowns of a partial board against row, column, region, and
/// adjacency exclusivity, reporting the first violation.
///
/// Crowns are scanned in x-then-y order so the reported violation is
/// deterministic for a given board.
pub fn validate_partial(
    board: &Board,
    matrix: &RegionMatrix,
) -> Result<(), PlacementViolation> {
    let mut crowns: Vec<Position> = board.crowns().collect();
    crowns.sort_unstable();

    let mut row_first: Vec<Option<Position>> = vec![None; matrix.height()];
    let mut col_first: Vec<Option<Position>> = vec![None; matrix.width()];
    let mut region_first: Vec<Option<Position>> = vec![None; matrix.region_count()];

    for (index, &crown) in crowns.iter().enumerate() {
        if let Some(first) = row_first[crown.y] {
            return Err(PlacementViolation::RowConflict {
                first,
                second: crown,
            });
        }
        if let Some(first) = col_first[crown.x] {
            return Err(PlacementViolation::ColumnConflict {
                first,
                second: crown,
            });
        }
        let region = matrix.region_at(crown);
        if let Some(first) = region_first[usize::from(region)] {
            return Err(PlacementViolation::RegionConflict {
                region,
                first,
                second: crown,
            });
        }
        for &other in &crowns[..index] {
            if other.is_adjacent(crown) {
                return Err(PlacementViolation::AdjacentCrowns {
                    first: other,
                    second: crown,
                });
            }
        }
        row_first[crown.y] = Some(crown);
        col_first[crown.x] = Some(crown);
        region_first[usize::from(region)] = Some(crown);
    }
    Ok(())
}

/// Boolean form of [`validate_partial`].
pub fn is_partial_valid(board: &Board, matrix: &RegionMatrix) -> bool {
    validate_partial(board, matrix).is_ok()
}

/// Check whether a board is a finished solution: partial validity plus one
/// crown in every row, column, and region.
pub fn validate_complete(board: &Board, matrix: &RegionMatrix) -> CompletionStatus {
    if let Err(violation) = validate_partial(board, matrix) {
        return CompletionStatus::Violation(violation);
    }

    // Partial validity caps every count at one, so only shortfalls remain.
    let mut rows = vec![false; matrix.height()];
    let mut cols = vec![false; matrix.width()];
    let mut regions = vec![false; matrix.region_count()];
    for crown in board.crowns() {
        rows[crown.y] = true;
        cols[crown.x] = true;
        regions[usize::from(matrix.region_at(crown))] = true;
    }
    if let Some(y) = rows.iter().position(|&filled| !filled) {
        return CompletionStatus::RowUnfilled { y };
    }
    if let Some(x) = cols.iter().position(|&filled| !filled) {
        return CompletionStatus::ColumnUnfilled { x };
    }
    if let Some(region) = regions.iter().position(|&filled| !filled) {
        return CompletionStatus::RegionUnfilled {
            region: region as u16,
        };
    }
    CompletionStatus::Complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellMark, RegionMatrix};

    fn stripes_4x4() -> RegionMatrix {
        RegionMatrix::from_cells(4, 4, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3])
    }

    fn board_with_crowns(crowns: &[(usize, usize)]) -> Board {
        let mut board = Board::new();
        for &(x, y) in crowns {
            board.set_mark(Position::new(x, y), CellMark::Crown);
        }
        board
    }

    #[test]
    fn test_rejects_shared_row() {
        let board = board_with_crowns(&[(0, 1), (3, 1)]);
        let err = validate_partial(&board, &stripes_4x4()).unwrap_err();
        assert_eq!(
            err,
            PlacementViolation::RowConflict {
                first: Position::new(0, 1),
                second: Position::new(3, 1),
            }
        );
    }

    #[test]
    fn test_rejects_shared_column() {
        let board = board_with_crowns(&[(2, 0), (2, 3)]);
        let err = validate_partial(&board, &stripes_4x4()).unwrap_err();
        assert!(matches!(err, PlacementViolation::ColumnConflict { .. }));
    }

    #[test]
    fn test_rejects_shared_region() {
        // Vertical stripes so two crowns in one column-region differ in row
        let matrix =
            RegionMatrix::from_cells(4, 4, vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]);
        // In a stripe region the column conflict fires first
        let board = board_with_crowns(&[(1, 0), (1, 2)]);
        assert!(matches!(
            validate_partial(&board, &matrix),
            Err(PlacementViolation::ColumnConflict { .. })
        ));

        // Region conflict without any row/column/adjacency conflict needs an
        // L-shaped region with two cells at Chebyshev distance 2.
        let l_matrix =
            RegionMatrix::from_cells(3, 3, vec![0, 0, 0, 1, 1, 0, 1, 2, 2]);
        let l_board = board_with_crowns(&[(0, 0), (2, 1)]);
        let err = validate_partial(&l_board, &l_matrix).unwrap_err();
        assert!(matches!(
            err,
            PlacementViolation::RegionConflict { region: 0, .. }
        ));
    }

    #[test]
    fn test_rejects_adjacent_crowns_despite_distinct_lines() {
        let board = board_with_crowns(&[(1, 1), (2, 2)]);
        let err = validate_partial(&board, &stripes_4x4()).unwrap_err();
        assert_eq!(
            err,
            PlacementViolation::AdjacentCrowns {
                first: Position::new(1, 1),
                second: Position::new(2, 2),
            }
        );
    }

    #[test]
    fn test_excluded_marks_carry_no_constraint() {
        let mut board = board_with_crowns(&[(1, 0)]);
        board.set_mark(Position::new(2, 0), CellMark::Excluded);
        board.set_mark(Position::new(1, 1), CellMark::Excluded);
        assert!(is_partial_valid(&board, &stripes_4x4()));
    }

    #[test]
    fn test_valid_partial_board_passes() {
        let board = board_with_crowns(&[(1, 0), (3, 2)]);
        assert!(is_partial_valid(&board, &stripes_4x4()));
    }

    #[test]
    fn test_complete_solution_reported_complete() {
        // One of the two known stripe solutions
        let board = board_with_crowns(&[(1, 0), (3, 1), (0, 2), (2, 3)]);
        assert_eq!(
            validate_complete(&board, &stripes_4x4()),
            CompletionStatus::Complete
        );
    }

    #[test]
    fn test_incomplete_board_names_missing_row() {
        let board = board_with_crowns(&[(1, 0), (3, 1)]);
        assert_eq!(
            validate_complete(&board, &stripes_4x4()),
            CompletionStatus::RowUnfilled { y: 2 }
        );
    }

    #[test]
    fn test_completion_surfaces_violation() {
        let board = board_with_crowns(&[(0, 0), (3, 0)]);
        assert!(matches!(
            validate_complete(&board, &stripes_4x4()),
            CompletionStatus::Violation(PlacementViolation::RowConflict { .. })
        ));
    }
}
