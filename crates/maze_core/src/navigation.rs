//! Navigable surface construction and path queries.
//!
//! The core only sequences navigation: the surface must be built strictly
//! after walls and obstacles are placed, because geometry affects
//! walkability. The actual service sits behind the [`Navigator`] trait so
//! an embedder can delegate to an engine navmesh; [`GridNavigator`] is the
//! built-in implementation, an A* over the maze adjacency.
//!
//! All calculations use fixed-point math for deterministic results
//! across different platforms.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{MapError, Result};
use crate::grid::{Direction, GridGraph};
use crate::math::{Fixed, Vec2Fixed};

/// External navigation capability.
///
/// `build_surface` consumes the finished graph plus the indices of cells
/// that received an obstacle; `query_path` returns ordered waypoints from
/// start to goal (both included).
pub trait Navigator {
    /// Walkability data produced by `build_surface`.
    type Surface;

    /// Build a walkable surface over the materialized cells.
    fn build_surface(&mut self, graph: &GridGraph, obstacle_cells: &[usize])
        -> Result<Self::Surface>;

    /// Compute a path between two world positions.
    fn query_path(
        &self,
        surface: &Self::Surface,
        from: Vec2Fixed,
        to: Vec2Fixed,
    ) -> Result<Vec<Vec2Fixed>>;
}

/// Per-cell traversal cost on the built surface.
///
/// Obstacle-bearing cells stay reachable but cost double, the same way
/// rough terrain does on an engine navmesh: paths prefer to flow around
/// the prop when an alternative exists.
fn step_cost(has_obstacle: bool) -> Fixed {
    if has_obstacle {
        Fixed::from_num(2)
    } else {
        Fixed::ONE
    }
}

/// Walkability snapshot of one generated maze.
#[derive(Debug, Clone)]
pub struct NavSurface {
    height: u32,
    cell_size: Fixed,
    /// Adjacency copied from the graph, by [`Direction`] slot.
    adjacency: Vec<[Option<usize>; 4]>,
    /// Traversal cost per cell; `None` for inactive slots.
    cost: Vec<Option<Fixed>>,
    /// Coordinates per cell, for heuristics and waypoint output.
    coords: Vec<(u32, u32)>,
    width: u32,
}

impl NavSurface {
    /// Grid index containing a world position, when that cell is walkable.
    fn walkable_index_at(&self, position: Vec2Fixed) -> Option<usize> {
        if position.x < Fixed::ZERO || position.y < Fixed::ZERO {
            return None;
        }
        let x = (position.x / self.cell_size).to_num::<i64>();
        let y = (position.y / self.cell_size).to_num::<i64>();
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let index = (x as usize) * (self.height as usize) + (y as usize);
        self.cost[index].map(|_| index)
    }

    /// World position of a cell's center.
    fn center(&self, index: usize) -> Vec2Fixed {
        let (x, y) = self.coords[index];
        let half = self.cell_size / Fixed::from_num(2);
        Vec2Fixed::new(
            Fixed::from_num(x) * self.cell_size + half,
            Fixed::from_num(y) * self.cell_size + half,
        )
    }
}

/// Built-in grid navigator: 4-directional A* over the maze adjacency.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridNavigator;

impl Navigator for GridNavigator {
    type Surface = NavSurface;

    fn build_surface(
        &mut self,
        graph: &GridGraph,
        obstacle_cells: &[usize],
    ) -> Result<Self::Surface> {
        let mut cost = Vec::with_capacity(graph.cells().len());
        let mut adjacency = Vec::with_capacity(graph.cells().len());
        let mut coords = Vec::with_capacity(graph.cells().len());
        for cell in graph.cells() {
            adjacency.push(cell.neighbors);
            coords.push(cell.coords);
            if cell.is_active {
                cost.push(Some(step_cost(obstacle_cells.contains(&cell.index))));
            } else {
                cost.push(None);
            }
        }
        Ok(NavSurface {
            width: graph.width(),
            height: graph.height(),
            cell_size: graph.cell_size(),
            adjacency,
            cost,
            coords,
        })
    }

    fn query_path(
        &self,
        surface: &NavSurface,
        from: Vec2Fixed,
        to: Vec2Fixed,
    ) -> Result<Vec<Vec2Fixed>> {
        let start = surface
            .walkable_index_at(from)
            .ok_or(MapError::PositionOffSurface { x: from.x, y: from.y })?;
        let goal = surface
            .walkable_index_at(to)
            .ok_or(MapError::PositionOffSurface { x: to.x, y: to.y })?;

        if start == goal {
            return Ok(vec![surface.center(start)]);
        }

        find_path_cells(surface, start, goal).map(|cells| corner_waypoints(surface, &cells))
    }
}

/// A node in the A* open set priority queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct AStarNode {
    index: usize,
    /// f_score = g_score + heuristic.
    f_score: Fixed,
    /// Tie-breaker for determinism: lower coordinates first.
    tie_breaker: u64,
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so reverse the comparison for
        // min-heap behavior.
        match other.f_score.cmp(&self.f_score) {
            Ordering::Equal => other.tie_breaker.cmp(&self.tie_breaker),
            ord => ord,
        }
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Manhattan distance heuristic, admissible for 4-directional movement.
fn manhattan_heuristic(a: (u32, u32), b: (u32, u32)) -> Fixed {
    Fixed::from_num(a.0.abs_diff(b.0) + a.1.abs_diff(b.1))
}

fn coords_to_tie_breaker(coords: (u32, u32)) -> u64 {
    (u64::from(coords.1) << 32) | u64::from(coords.0)
}

/// A* over cell indices. Returns the cell sequence from start to goal.
fn find_path_cells(surface: &NavSurface, start: usize, goal: usize) -> Result<Vec<usize>> {
    let slots = surface.adjacency.len();
    let mut open_set: BinaryHeap<AStarNode> = BinaryHeap::new();
    let mut came_from: Vec<Option<usize>> = vec![None; slots];
    let mut g_score: Vec<Option<Fixed>> = vec![None; slots];

    g_score[start] = Some(Fixed::ZERO);
    open_set.push(AStarNode {
        index: start,
        f_score: manhattan_heuristic(surface.coords[start], surface.coords[goal]),
        tie_breaker: coords_to_tie_breaker(surface.coords[start]),
    });

    while let Some(current) = open_set.pop() {
        if current.index == goal {
            return Ok(reconstruct_cells(&came_from, goal));
        }

        let current_g = g_score[current.index].unwrap_or(Fixed::MAX);

        for direction in Direction::ALL {
            let Some(next) = surface.adjacency[current.index][direction.index()] else {
                continue;
            };
            let Some(cell_cost) = surface.cost[next] else {
                continue;
            };

            let tentative_g = current_g + cell_cost;
            let next_g = g_score[next].unwrap_or(Fixed::MAX);
            if tentative_g < next_g {
                came_from[next] = Some(current.index);
                g_score[next] = Some(tentative_g);
                open_set.push(AStarNode {
                    index: next,
                    f_score: tentative_g
                        + manhattan_heuristic(surface.coords[next], surface.coords[goal]),
                    tie_breaker: coords_to_tie_breaker(surface.coords[next]),
                });
            }
        }
    }

    Err(MapError::PathQueryFailed {
        from: start,
        to: goal,
    })
}

fn reconstruct_cells(came_from: &[Option<usize>], goal: usize) -> Vec<usize> {
    let mut cells = vec![goal];
    let mut current = goal;
    while let Some(prev) = came_from[current] {
        cells.push(prev);
        current = prev;
    }
    cells.reverse();
    cells
}

/// Collapse a cell sequence to its corner waypoints.
///
/// Straight runs contribute no intermediate waypoints; the result keeps
/// the start, every turn, and the goal. This matches the corner
/// semantics of engine navmesh paths, which the destination selector's
/// turn count relies on.
fn corner_waypoints(surface: &NavSurface, cells: &[usize]) -> Vec<Vec2Fixed> {
    let mut waypoints = Vec::new();
    for (i, &index) in cells.iter().enumerate() {
        if i == 0 || i == cells.len() - 1 {
            waypoints.push(surface.center(index));
            continue;
        }
        let prev = surface.coords[cells[i - 1]];
        let here = surface.coords[index];
        let next = surface.coords[cells[i + 1]];
        let incoming = (here.0 as i64 - prev.0 as i64, here.1 as i64 - prev.1 as i64);
        let outgoing = (next.0 as i64 - here.0 as i64, next.1 as i64 - here.1 as i64);
        if incoming != outgoing {
            waypoints.push(surface.center(index));
        }
    }
    waypoints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MapLayout;

    fn fixed(n: i32) -> Fixed {
        Fixed::from_num(n)
    }

    fn surface_for(text: &str, obstacles: &[usize]) -> NavSurface {
        let graph = GridGraph::build(&MapLayout::parse(text).unwrap());
        GridNavigator.build_surface(&graph, obstacles).unwrap()
    }

    fn center(graph_text: &str, index: usize) -> Vec2Fixed {
        let graph = GridGraph::build(&MapLayout::parse(graph_text).unwrap());
        graph.cell_center(index)
    }

    // A 3x3 ring corridor: center cell inactive.
    const RING_3X3: &str = "3,3,1\n1,1,1\n1,0,1\n1,1,1";

    #[test]
    fn test_straight_corridor_has_two_waypoints() {
        // 5x1 corridor, no turns.
        let text = "5,1,1\n1,1,1,1,1";
        let surface = surface_for(text, &[]);
        let path = GridNavigator
            .query_path(&surface, center(text, 0), center(text, 4))
            .unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[0], center(text, 0));
        assert_eq!(path[1], center(text, 4));
    }

    #[test]
    fn test_ring_path_turns_at_corners() {
        let surface = surface_for(RING_3X3, &[]);
        // From (0,0) to (2,2): two legs of the ring, one corner.
        let path = GridNavigator
            .query_path(&surface, center(RING_3X3, 0), center(RING_3X3, 8))
            .unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_same_cell_query() {
        let surface = surface_for(RING_3X3, &[]);
        let path = GridNavigator
            .query_path(&surface, center(RING_3X3, 0), center(RING_3X3, 0))
            .unwrap();
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_no_path_between_components() {
        // Two active cells separated by an inactive column.
        let text = "3,1,1\n1,0,1";
        let surface = surface_for(text, &[]);
        let result = GridNavigator.query_path(&surface, center(text, 0), center(text, 2));
        assert!(matches!(
            result,
            Err(MapError::PathQueryFailed { from: 0, to: 2 })
        ));
    }

    #[test]
    fn test_off_surface_query() {
        let surface = surface_for(RING_3X3, &[]);
        let off = Vec2Fixed::new(fixed(-5), fixed(0));
        let result = GridNavigator.query_path(&surface, off, center(RING_3X3, 0));
        assert!(matches!(result, Err(MapError::PositionOffSurface { .. })));
        // Inactive center cell is not walkable either.
        let result = GridNavigator.query_path(&surface, center(RING_3X3, 4), center(RING_3X3, 0));
        assert!(matches!(result, Err(MapError::PositionOffSurface { .. })));
    }

    #[test]
    fn test_obstacles_raise_cost_but_keep_reachability() {
        // 3x3 fully active. Obstacle in the middle column pushes the
        // path around it.
        let text = "3,3,1\n1,1,1\n1,1,1\n1,1,1";
        let surface = surface_for(text, &[4]);
        let path = GridNavigator
            .query_path(&surface, center(text, 1), center(text, 7))
            .unwrap();
        // Straight through (1,0)->(1,1)->(1,2) would be 2 waypoints; the
        // obstacle at (1,1) makes the detour equally cheap at best, so
        // the path must still exist and end at the goal.
        assert_eq!(path.first().copied(), Some(center(text, 1)));
        assert_eq!(path.last().copied(), Some(center(text, 7)));
        // And a path to the obstacle cell itself still succeeds.
        let to_obstacle = GridNavigator
            .query_path(&surface, center(text, 1), center(text, 4))
            .unwrap();
        assert_eq!(to_obstacle.last().copied(), Some(center(text, 4)));
    }

    #[test]
    fn test_query_is_deterministic() {
        let surface = surface_for(RING_3X3, &[]);
        let run = || {
            GridNavigator
                .query_path(&surface, center(RING_3X3, 0), center(RING_3X3, 8))
                .unwrap()
        };
        assert_eq!(run(), run());
        assert_eq!(run(), run());
    }

    #[test]
    fn test_walls_block_even_adjacent_cells() {
        // Two active cells in the same row of a 2x2 map but with the
        // second row inactive; (0,0) and (1,0) are adjacent and linked,
        // while (0,1)/(1,1) are absent entirely.
        let text = "2,2,1\n0,0\n1,1";
        let surface = surface_for(text, &[]);
        let path = GridNavigator
            .query_path(&surface, center(text, 0), center(text, 2))
            .unwrap();
        assert_eq!(path.len(), 2);
    }
}
