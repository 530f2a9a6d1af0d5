//! Spawn and destination selection.
//!
//! The destination is not simply the farthest cell from the spawn: it is
//! the cell whose path is the most *complicated*, a weighted blend of
//! normalized path length and turn count. Candidates are scored in
//! ascending index order so ties resolve to the first-found cell and the
//! whole selection is reproducible.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::grid::GridGraph;
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::rng::MapRng;

/// How the spawn cell is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnPolicy {
    /// Uniformly random among active cells.
    #[default]
    Randomized,
    /// The cell containing a given world position.
    FromPosition(Vec2Fixed),
}

/// Weights for the destination path-cost heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCostWeights {
    /// Weight on normalized path length.
    #[serde(with = "fixed_serde")]
    pub distance: Fixed,
    /// Weight on waypoint (turn) count.
    #[serde(with = "fixed_serde")]
    pub turns: Fixed,
}

impl Default for PathCostWeights {
    fn default() -> Self {
        Self {
            distance: Fixed::from_num(0.25),
            turns: Fixed::from_num(0.75),
        }
    }
}

/// A scored destination candidate. Ephemeral: computed during selection
/// and discarded once the winner is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathCandidate {
    /// Grid index of the candidate cell.
    pub target: usize,
    /// Heuristic path cost from the spawn to this cell.
    pub cost: Fixed,
}

/// Choose the spawn cell.
///
/// Randomized spawning rejection-samples uniform indices until an active
/// one is drawn. That only terminates when at least one cell is active,
/// so an empty graph is rejected up front with [`MapError::NoActiveCells`]
/// instead of looping forever.
///
/// # Errors
///
/// - [`MapError::NoActiveCells`] when the graph has no active cells.
/// - [`MapError::SpawnOutsideGrid`] when a fixed position maps to no
///   active cell.
pub fn select_spawn(graph: &GridGraph, policy: &SpawnPolicy, rng: &mut MapRng) -> Result<usize> {
    if graph.active_count() == 0 {
        return Err(MapError::NoActiveCells);
    }

    match policy {
        SpawnPolicy::Randomized => loop {
            let index = rng.range_usize(graph.cells().len());
            if graph.cells()[index].is_active {
                return Ok(index);
            }
        },
        SpawnPolicy::FromPosition(position) => {
            let index = graph.index_at_position(*position).ok_or_else(|| {
                MapError::SpawnOutsideGrid {
                    x: position.x,
                    y: position.y,
                }
            })?;
            if graph.cells()[index].is_active {
                Ok(index)
            } else {
                Err(MapError::SpawnOutsideGrid {
                    x: position.x,
                    y: position.y,
                })
            }
        }
    }
}

/// Score one path by the destination heuristic.
///
/// `cost = (total segment length / cell size) * distance_weight
///        + waypoint_count * turns_weight`
#[must_use]
pub fn path_cost(waypoints: &[Vec2Fixed], cell_size: Fixed, weights: &PathCostWeights) -> Fixed {
    let mut distance = Fixed::ZERO;
    for pair in waypoints.windows(2) {
        distance += pair[0].distance(pair[1]) / cell_size;
    }
    distance * weights.distance + Fixed::from_num(waypoints.len()) * weights.turns
}

/// Choose the destination: the active cell whose path from the spawn has
/// the strictly greatest cost.
///
/// Cells are visited in ascending index order, so equal costs keep the
/// first-found candidate. A candidate whose path query fails is skipped
/// with a warning rather than aborting generation. When no other active
/// cell exists (or none is reachable) the destination degenerates to the
/// spawn cell itself.
pub fn select_destination<Q>(
    graph: &GridGraph,
    spawn: usize,
    weights: &PathCostWeights,
    mut query: Q,
) -> PathCandidate
where
    Q: FnMut(Vec2Fixed, Vec2Fixed) -> Result<Vec<Vec2Fixed>>,
{
    let spawn_center = graph.cell_center(spawn);
    let mut worst = PathCandidate {
        target: spawn,
        cost: Fixed::ZERO,
    };

    for index in graph.active_indices() {
        if index == spawn {
            continue;
        }
        let waypoints = match query(spawn_center, graph.cell_center(index)) {
            Ok(waypoints) => waypoints,
            Err(error) => {
                tracing::warn!(
                    spawn,
                    candidate = index,
                    %error,
                    "skipping unreachable destination candidate"
                );
                continue;
            }
        };
        let cost = path_cost(&waypoints, graph.cell_size(), weights);
        if cost > worst.cost {
            worst = PathCandidate {
                target: index,
                cost,
            };
        }
    }

    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MapLayout;

    fn graph_for(text: &str) -> GridGraph {
        GridGraph::build(&MapLayout::parse(text).unwrap())
    }

    const SAMPLE_3X2: &str = "3,2,1\n1,1,0\n1,0,1";

    #[test]
    fn test_randomized_spawn_lands_on_active_cell() {
        let graph = graph_for(SAMPLE_3X2);
        let mut rng = MapRng::new(11);
        for _ in 0..100 {
            let spawn = select_spawn(&graph, &SpawnPolicy::Randomized, &mut rng).unwrap();
            assert!(graph.cells()[spawn].is_active);
        }
    }

    #[test]
    fn test_no_active_cells_is_fatal() {
        let graph = graph_for("2,1,1\n0,0");
        let mut rng = MapRng::new(11);
        let result = select_spawn(&graph, &SpawnPolicy::Randomized, &mut rng);
        assert!(matches!(result, Err(MapError::NoActiveCells)));
    }

    #[test]
    fn test_fixed_spawn_maps_position_to_cell() {
        let graph = graph_for(SAMPLE_3X2);
        let mut rng = MapRng::new(11);
        let position = Vec2Fixed::new(Fixed::from_num(2.5), Fixed::from_num(0.5));
        let spawn =
            select_spawn(&graph, &SpawnPolicy::FromPosition(position), &mut rng).unwrap();
        assert_eq!(spawn, 4);
    }

    #[test]
    fn test_fixed_spawn_rejects_inactive_and_outside() {
        let graph = graph_for(SAMPLE_3X2);
        let mut rng = MapRng::new(11);
        // (1,0) is inactive.
        let inactive = Vec2Fixed::new(Fixed::from_num(1.5), Fixed::from_num(0.5));
        assert!(matches!(
            select_spawn(&graph, &SpawnPolicy::FromPosition(inactive), &mut rng),
            Err(MapError::SpawnOutsideGrid { .. })
        ));
        let outside = Vec2Fixed::new(Fixed::from_num(9), Fixed::from_num(9));
        assert!(matches!(
            select_spawn(&graph, &SpawnPolicy::FromPosition(outside), &mut rng),
            Err(MapError::SpawnOutsideGrid { .. })
        ));
    }

    #[test]
    fn test_path_cost_formula() {
        let cell = Fixed::from_num(2);
        let waypoints = [
            Vec2Fixed::new(Fixed::ZERO, Fixed::ZERO),
            Vec2Fixed::new(Fixed::from_num(4), Fixed::ZERO),
            Vec2Fixed::new(Fixed::from_num(4), Fixed::from_num(6)),
        ];
        let weights = PathCostWeights::default();
        // Length (4 + 6) / 2 = 5, waypoints = 3:
        // 5 * 0.25 + 3 * 0.75 = 3.5
        let cost = path_cost(&waypoints, cell, &weights);
        let epsilon = Fixed::from_num(1) / Fixed::from_num(1000);
        assert!((cost - Fixed::from_num(3.5)).abs() < epsilon);
    }

    #[test]
    fn test_destination_prefers_twisty_path() {
        let graph = graph_for(SAMPLE_3X2);
        let center_1 = graph.cell_center(1);
        let center_3 = graph.cell_center(3);
        // Stub query: index 1 gets a long straight path, index 3 a
        // shorter path with more turns that outweighs it, index 4 fails.
        let query = move |_from: Vec2Fixed, to: Vec2Fixed| {
            let straight = vec![Vec2Fixed::ZERO, Vec2Fixed::new(Fixed::from_num(6), Fixed::ZERO)];
            let twisty = vec![
                Vec2Fixed::ZERO,
                Vec2Fixed::new(Fixed::from_num(1), Fixed::ZERO),
                Vec2Fixed::new(Fixed::from_num(1), Fixed::from_num(1)),
                Vec2Fixed::new(Fixed::from_num(2), Fixed::from_num(1)),
            ];
            if to == center_1 {
                Ok(straight)
            } else if to == center_3 {
                Ok(twisty)
            } else {
                Err(MapError::PathQueryFailed { from: 0, to: 4 })
            }
        };
        let chosen = select_destination(&graph, 0, &PathCostWeights::default(), query);
        // straight: 6 * 0.25 + 2 * 0.75 = 3.0
        // twisty:   3 * 0.25 + 4 * 0.75 = 3.75
        assert_eq!(chosen.target, 3);
    }

    #[test]
    fn test_destination_deterministic_for_fixed_inputs() {
        let graph = graph_for(SAMPLE_3X2);
        let query = |from: Vec2Fixed, to: Vec2Fixed| Ok(vec![from, to]);
        let a = select_destination(&graph, 0, &PathCostWeights::default(), query);
        let b = select_destination(&graph, 0, &PathCostWeights::default(), query);
        assert_eq!(a, b);
    }

    #[test]
    fn test_tie_keeps_first_found() {
        let graph = graph_for(SAMPLE_3X2);
        // Every candidate scores identically.
        let query = |_from: Vec2Fixed, _to: Vec2Fixed| {
            Ok(vec![Vec2Fixed::ZERO, Vec2Fixed::new(Fixed::ONE, Fixed::ZERO)])
        };
        let chosen = select_destination(&graph, 0, &PathCostWeights::default(), query);
        // Active cells in ascending order are 0,1,3,4; spawn 0 skipped.
        assert_eq!(chosen.target, 1);
    }

    #[test]
    fn test_single_active_cell_degenerates_to_spawn() {
        let graph = graph_for("1,1,1\n1");
        let mut rng = MapRng::new(1);
        let spawn = select_spawn(&graph, &SpawnPolicy::Randomized, &mut rng).unwrap();
        assert_eq!(spawn, 0);
        let chosen = select_destination(&graph, spawn, &PathCostWeights::default(), |_, _| {
            panic!("no candidates should be queried")
        });
        assert_eq!(chosen.target, spawn);
        assert_eq!(chosen.cost, Fixed::ZERO);
    }

    #[test]
    fn test_all_queries_failing_degenerates_to_spawn() {
        let graph = graph_for(SAMPLE_3X2);
        let chosen = select_destination(&graph, 0, &PathCostWeights::default(), |_, _| {
            Err(MapError::PathQueryFailed { from: 0, to: 0 })
        });
        assert_eq!(chosen.target, 0);
    }
}
