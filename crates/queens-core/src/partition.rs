//! Region partitioner: grows randomly-shaped connected regions over the grid.

use crate::grid::{Position, RegionMatrix};
use crate::rng::SimpleRng;
use std::collections::VecDeque;

/// Errors from a partition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// More regions requested than there are cells (or zero regions for a
    /// non-empty grid)
    InsufficientCells { requested: usize, available: usize },
}

impl std::fmt::Display for PartitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientCells {
                requested,
                available,
            } => write!(
                f,
                "cannot seed {} regions on a grid of {} cells",
                requested, available
            ),
        }
    }
}

/// Partition a `width` x `height` grid into `region_count` connected regions.
///
/// Seeds are drawn uniformly without replacement, then every region grows one
/// frontier cell per round, claiming unclaimed 4-orthogonal neighbors. The
/// region order is reshuffled each round so no region dominates by going
/// first; that reshuffle is what produces organic shapes.
///
/// The result always satisfies the `RegionMatrix` invariants: ids
/// `0..region_count`, every region non-empty and 4-connected, cells
/// partitioned exactly.
pub fn partition(
    width: usize,
    height: usize,
    region_count: usize,
    rng: &mut SimpleRng,
) -> Result<RegionMatrix, PartitionError> {
    let total = width * height;
    if region_count == 0 || region_count > total {
        return Err(PartitionError::InsufficientCells {
            requested: region_count,
            available: total,
        });
    }

    let all_cells: Vec<Position> = (0..height)
        .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
        .collect();
    let seeds = rng.sample(&all_cells, region_count);

    let mut claimed: Vec<Option<u16>> = vec![None; total];
    let mut frontiers: Vec<VecDeque<Position>> = vec![VecDeque::new(); region_count];
    for (rid, &seed) in seeds.iter().enumerate() {
        claimed[seed.y * width + seed.x] = Some(rid as u16);
        frontiers[rid].push_back(seed);
    }

    let mut active: Vec<usize> = (0..region_count).collect();
    while frontiers.iter().any(|frontier| !frontier.is_empty()) {
        rng.shuffle(&mut active);
        for &rid in &active {
            let Some(cell) = frontiers[rid].pop_front() else {
                continue;
            };
            for neighbor in cell.neighbors4(width, height) {
                let slot = &mut claimed[neighbor.y * width + neighbor.x];
                if slot.is_none() {
                    *slot = Some(rid as u16);
                    frontiers[rid].push_back(neighbor);
                }
            }
        }
    }

    // Every cell is reachable from some seed through 4-connectivity, so the
    // frontier loop cannot stall with unclaimed cells left.
    let cells = claimed
        .into_iter()
        .map(|id| id.unwrap_or_default())
        .collect();
    Ok(RegionMatrix::from_cells(width, height, cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Flood-fill one region's cells and check they form a single
    /// 4-connected component.
    fn is_connected(cells: &[Position], width: usize, height: usize) -> bool {
        let Some(&start) = cells.first() else {
            return false;
        };
        let members: std::collections::HashSet<Position> = cells.iter().copied().collect();
        let mut seen = std::collections::HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            for neighbor in cell.neighbors4(width, height) {
                if members.contains(&neighbor) && seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        seen.len() == cells.len()
    }

    #[test]
    fn test_partition_covers_grid_exactly() {
        for (width, height, regions) in [(5, 5, 5), (7, 7, 7), (9, 9, 9), (6, 4, 3), (8, 5, 8)] {
            let mut rng = SimpleRng::with_seed(1234);
            let matrix = partition(width, height, regions, &mut rng).unwrap();
            assert_eq!(matrix.width(), width);
            assert_eq!(matrix.height(), height);
            assert_eq!(matrix.region_count(), regions);

            let mut counts = vec![0usize; regions];
            for pos in matrix.positions() {
                counts[usize::from(matrix.region_at(pos))] += 1;
            }
            assert_eq!(counts.iter().sum::<usize>(), width * height);
            assert!(counts.iter().all(|&c| c > 0), "empty region in {counts:?}");
        }
    }

    #[test]
    fn test_partition_regions_are_connected() {
        for seed in 0..20 {
            let mut rng = SimpleRng::with_seed(seed);
            let matrix = partition(7, 7, 7, &mut rng).unwrap();
            let map = crate::grid::RegionMap::from_matrix(&matrix);
            for id in 0..map.len() {
                assert!(
                    is_connected(map.region(id), 7, 7),
                    "region {id} disconnected for seed {seed}"
                );
            }
        }
    }

    #[test]
    fn test_partition_single_region() {
        let mut rng = SimpleRng::with_seed(3);
        let matrix = partition(4, 4, 1, &mut rng).unwrap();
        assert!(matrix.positions().all(|pos| matrix.region_at(pos) == 0));
    }

    #[test]
    fn test_partition_one_region_per_cell() {
        let mut rng = SimpleRng::with_seed(3);
        let matrix = partition(3, 3, 9, &mut rng).unwrap();
        let mut ids: Vec<u16> = matrix.positions().map(|p| matrix.region_at(p)).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn test_partition_rejects_too_many_regions() {
        let mut rng = SimpleRng::with_seed(3);
        let err = partition(3, 3, 10, &mut rng).unwrap_err();
        assert_eq!(
            err,
            PartitionError::InsufficientCells {
                requested: 10,
                available: 9
            }
        );
    }

    #[test]
    fn test_partition_is_deterministic_under_seed() {
        let mut a = SimpleRng::with_seed(99);
        let mut b = SimpleRng::with_seed(99);
        let first = partition(8, 8, 8, &mut a).unwrap();
        let second = partition(8, 8, 8, &mut b).unwrap();
        assert_eq!(first, second);
    }
}
