//! Test fixtures and helpers.
//!
//! Canonical map layouts, a recording cell factory and a counting event
//! sink, for consistent testing across crates.

use fixed::types::I32F32;

use maze_core::cell::{ActiveObstacle, CellFactory, WallState};
use maze_core::controller::{GenerationEvents, GenerationOutcome, MapControllerConfig, MapSource};
use maze_core::grid::Direction;
use maze_core::math::Vec2Fixed;
use maze_core::settings::Feature;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real generation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// The worked 3×2 example from the map file format documentation.
pub const SAMPLE_3X2: &str = "3,2,1\n1,1,0\n1,0,1";

/// A 7-cell straight corridor, no branches.
pub const CORRIDOR_7X1: &str = "7,1,1\n1,1,1,1,1,1,1";

/// A 3×3 ring with an inactive center.
pub const RING_3X3: &str = "3,3,1\n1,1,1\n1,0,1\n1,1,1";

/// A single active cell.
pub const SINGLE_1X1: &str = "1,1,1\n1";

/// A 5×5 spiral-ish layout with dead ends, good for path-cost spread.
pub const TWISTY_5X5: &str = "5,5,2\n1,1,1,1,1\n1,0,0,0,1\n1,1,1,0,1\n0,0,1,0,1\n1,1,1,1,1";

/// Build a controller config around one inline map with fixed seed and
/// no source randomization.
#[must_use]
pub fn test_config(map_text: &str, seed: u64) -> MapControllerConfig {
    MapControllerConfig {
        sources: vec![MapSource {
            name: "test-map".to_string(),
            text: map_text.to_string(),
        }],
        randomize_source: false,
        seed,
        ..MapControllerConfig::default()
    }
}

/// A [`CellFactory`] that only counts what it was asked to do.
///
/// Handles are sequence numbers; every mutator bumps `mutations`, so
/// idempotence tests can assert that a redundant toggle touched nothing.
#[derive(Debug, Default)]
pub struct RecordingFactory {
    /// Number of cells created so far (also the next handle).
    pub created: usize,
    /// Number of cells destroyed.
    pub destroyed: usize,
    /// Total per-cell mutator calls (walls, obstacles, lights, markers…).
    pub mutations: usize,
}

impl CellFactory for RecordingFactory {
    type Handle = usize;

    fn create_cell(&mut self, _center: Vec2Fixed) -> usize {
        self.created += 1;
        self.created - 1
    }

    fn destroy_cell(&mut self, _cell: usize) {
        self.destroyed += 1;
    }

    fn set_wall(&mut self, _cell: &usize, _direction: Direction, _state: WallState) {
        self.mutations += 1;
    }

    fn show_obstacle(&mut self, _cell: &usize, _obstacle: Option<&ActiveObstacle>) {
        self.mutations += 1;
    }

    fn set_light(&mut self, _cell: &usize, _lit: bool) {
        self.mutations += 1;
    }

    fn set_destination_marker(&mut self, _cell: &usize, _visible: bool) {
        self.mutations += 1;
    }

    fn set_dirty_walls(&mut self, _cell: &usize, _dirty: bool) {
        self.mutations += 1;
    }

    fn set_particles(&mut self, _cell: &usize, _visible: bool) {
        self.mutations += 1;
    }
}

/// An event sink that records what it saw.
#[derive(Debug, Default)]
pub struct CountingEvents {
    /// Outcomes received through `generation_complete`.
    pub completions: Vec<GenerationOutcome>,
    /// `(feature, value)` pairs received through `setting_changed`.
    pub setting_changes: Vec<(Feature, bool)>,
}

impl GenerationEvents for CountingEvents {
    fn generation_complete(&mut self, outcome: &GenerationOutcome) {
        self.completions.push(outcome.clone());
    }

    fn setting_changed(&mut self, feature: Feature, value: bool) {
        self.setting_changes.push((feature, value));
    }
}
