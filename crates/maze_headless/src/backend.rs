//! In-memory stand-in for the engine's cell instantiation.
//!
//! The simulated backend records every visual state change the core
//! pushes through the [`CellFactory`] seam, which is all the headless
//! runner needs to render and verify a generated maze.

use maze_core::cell::{ActiveObstacle, CellFactory, WallState};
use maze_core::grid::Direction;
use maze_core::math::Vec2Fixed;

/// Visual state of one simulated cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimCell {
    /// World position of the cell center.
    pub center: Vec2Fixed,
    /// Wall state per [`Direction`] slot.
    pub walls: [WallState; 4],
    /// Currently shown obstacle, if any.
    pub obstacle: Option<ActiveObstacle>,
    /// Whether the room light is on.
    pub light_on: bool,
    /// Whether the destination marker is visible.
    pub destination: bool,
    /// Whether walls use the dirty material.
    pub dirty_walls: bool,
    /// Whether ambient particles are shown.
    pub particles: bool,
    /// False once the cell was destroyed by a rebuild.
    pub alive: bool,
}

impl SimCell {
    fn new(center: Vec2Fixed) -> Self {
        Self {
            center,
            walls: [WallState::Closed; 4],
            obstacle: None,
            light_on: false,
            destination: false,
            dirty_walls: false,
            particles: false,
            alive: true,
        }
    }
}

/// Simulated engine backend: a [`CellFactory`] that records state.
#[derive(Debug, Default)]
pub struct SimBackend {
    cells: Vec<SimCell>,
}

impl SimBackend {
    /// All cells ever created, including destroyed ones.
    #[must_use]
    pub fn cells(&self) -> &[SimCell] {
        &self.cells
    }

    /// Cells from the current generation.
    pub fn live_cells(&self) -> impl Iterator<Item = &SimCell> {
        self.cells.iter().filter(|cell| cell.alive)
    }

    /// Number of live cells.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live_cells().count()
    }
}

impl CellFactory for SimBackend {
    type Handle = usize;

    fn create_cell(&mut self, center: Vec2Fixed) -> usize {
        self.cells.push(SimCell::new(center));
        self.cells.len() - 1
    }

    fn destroy_cell(&mut self, cell: usize) {
        self.cells[cell].alive = false;
    }

    fn set_wall(&mut self, cell: &usize, direction: Direction, state: WallState) {
        self.cells[*cell].walls[direction.index()] = state;
    }

    fn show_obstacle(&mut self, cell: &usize, obstacle: Option<&ActiveObstacle>) {
        self.cells[*cell].obstacle = obstacle.copied();
    }

    fn set_light(&mut self, cell: &usize, lit: bool) {
        self.cells[*cell].light_on = lit;
    }

    fn set_destination_marker(&mut self, cell: &usize, visible: bool) {
        self.cells[*cell].destination = visible;
    }

    fn set_dirty_walls(&mut self, cell: &usize, dirty: bool) {
        self.cells[*cell].dirty_walls = dirty;
    }

    fn set_particles(&mut self, cell: &usize, visible: bool) {
        self.cells[*cell].particles = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_core::math::Fixed;

    #[test]
    fn test_backend_records_lifecycle() {
        let mut backend = SimBackend::default();
        let a = backend.create_cell(Vec2Fixed::ZERO);
        let b = backend.create_cell(Vec2Fixed::new(Fixed::ONE, Fixed::ZERO));
        assert_eq!(backend.live_count(), 2);

        backend.set_wall(&a, Direction::East, WallState::Open);
        backend.set_light(&b, true);
        assert_eq!(backend.cells()[a].walls[Direction::East.index()], WallState::Open);
        assert!(backend.cells()[b].light_on);

        backend.destroy_cell(a);
        assert_eq!(backend.live_count(), 1);
    }
}
