//! Map controller: full generation orchestration.
//!
//! Owns the grid exclusively and exposes read-only views; collaborators
//! (cell factory, navigator, event sink) are injected at construction,
//! never looked up globally. Generation is synchronous and runs once at
//! load time:
//!
//! parse → graph → materialize (walls, obstacles, lights) → navigation
//! surface → spawn & destination → settings.
//!
//! Failure discipline: the incoming map is parsed and validated *before*
//! any existing cells are destroyed, so a failed generation leaves the
//! previous map fully intact. Nothing partial is ever committed.

use serde::{Deserialize, Serialize};

use crate::cell::{
    roll_light, roll_obstacle, CellFactory, MaterializedCell, ObstacleCatalog, WallState,
};
use crate::error::{MapError, Result};
use crate::grid::{Direction, GridGraph};
use crate::layout::MapLayout;
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::navigation::Navigator;
use crate::rng::MapRng;
use crate::selection::{select_destination, select_spawn, PathCostWeights, SpawnPolicy};
use crate::settings::{Feature, MapSettings};

/// One loadable map file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSource {
    /// Display name, usually the file stem.
    pub name: String,
    /// Raw map file text.
    pub text: String,
}

/// Everything the controller needs to generate a map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapControllerConfig {
    /// Candidate map files. Generation fails without at least one.
    pub sources: Vec<MapSource>,
    /// Pick a source uniformly at random instead of the first.
    pub randomize_source: bool,
    /// How the spawn cell is chosen.
    pub spawn_policy: SpawnPolicy,
    /// Destination path-cost weights.
    pub weights: PathCostWeights,
    /// Obstacle variants cells may spawn.
    pub obstacle_catalog: ObstacleCatalog,
    /// Per-cell obstacle spawn probability in `[0, 1]`.
    #[serde(with = "fixed_serde")]
    pub obstacle_spawn_rate: Fixed,
    /// Per-cell light spawn probability in `[0, 1]`.
    #[serde(with = "fixed_serde")]
    pub light_spawn_rate: Fixed,
    /// Initial feature toggles.
    pub settings: MapSettings,
    /// Seed for all generation randomness.
    pub seed: u64,
}

impl Default for MapControllerConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            randomize_source: true,
            spawn_policy: SpawnPolicy::Randomized,
            weights: PathCostWeights::default(),
            obstacle_catalog: ObstacleCatalog::standard(),
            obstacle_spawn_rate: Fixed::from_num(0.3),
            light_spawn_rate: Fixed::from_num(0.5),
            settings: MapSettings::default(),
            seed: 0,
        }
    }
}

/// What a finished generation produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// Name of the map source that was used.
    pub source: String,
    /// Seed the run was generated with.
    pub seed: u64,
    /// Grid index of the spawn cell.
    pub spawn_index: usize,
    /// World position of the spawn cell center.
    pub spawn_position: Vec2Fixed,
    /// Spawn yaw in degrees, uniform in `[0, 360)`.
    #[serde(with = "fixed_serde")]
    pub spawn_rotation_degrees: Fixed,
    /// Grid index of the chosen destination cell.
    pub destination_index: usize,
    /// Path cost of the winning destination candidate.
    #[serde(with = "fixed_serde")]
    pub destination_cost: Fixed,
}

/// Callbacks the controller raises toward the embedder.
///
/// Generation completes before `generation_complete` fires, so anything
/// observed from the callback sees the finished map.
pub trait GenerationEvents {
    /// A new map finished generating.
    fn generation_complete(&mut self, outcome: &GenerationOutcome) {
        let _ = outcome;
    }

    /// A feature toggle changed value and was propagated to all cells.
    fn setting_changed(&mut self, feature: Feature, value: bool) {
        let _ = (feature, value);
    }
}

/// Event sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEvents;

impl GenerationEvents for NullEvents {}

/// State of one committed generation.
struct GeneratedMapState<H> {
    graph: GridGraph,
    cells: Vec<Option<MaterializedCell<H>>>,
    outcome: GenerationOutcome,
}

/// Orchestrates maze generation and owns the generated state.
pub struct MapController<F: CellFactory, N: Navigator, E: GenerationEvents> {
    config: MapControllerConfig,
    factory: F,
    navigator: N,
    events: E,
    rng: MapRng,
    state: Option<GeneratedMapState<F::Handle>>,
}

impl<F: CellFactory, N: Navigator, E: GenerationEvents> MapController<F, N, E> {
    /// Create a controller with its injected collaborators.
    pub fn new(config: MapControllerConfig, factory: F, navigator: N, events: E) -> Self {
        let rng = MapRng::new(config.seed);
        Self {
            config,
            factory,
            navigator,
            events,
            rng,
            state: None,
        }
    }

    /// Generate a fresh maze, replacing any previous one.
    ///
    /// On parse or precondition failure the previous maze is left fully
    /// intact and the error is returned.
    ///
    /// # Errors
    ///
    /// - [`MapError::MissingAsset`] when no map sources are configured.
    /// - Any parse error from [`MapLayout::parse`].
    /// - [`MapError::NoActiveCells`] / [`MapError::SpawnOutsideGrid`]
    ///   from spawn selection.
    /// - Navigation surface errors from the injected [`Navigator`].
    pub fn initialize_grid(&mut self) -> Result<GenerationOutcome> {
        if self.config.sources.is_empty() {
            return Err(MapError::MissingAsset("map sources".to_string()));
        }

        // Validate everything that can fail before touching the old map.
        let source_index = if self.config.randomize_source {
            self.rng.range_usize(self.config.sources.len())
        } else {
            0
        };
        let source = &self.config.sources[source_index];
        let source_name = source.name.clone();
        let layout = MapLayout::parse(&source.text)?;
        let graph = GridGraph::build(&layout);
        tracing::info!(
            source = %source_name,
            width = graph.width(),
            height = graph.height(),
            active = graph.active_count(),
            "parsed map layout"
        );

        let spawn_index = select_spawn(&graph, &self.config.spawn_policy, &mut self.rng)?;

        // Point of no return: tear down the previous map and rebuild.
        self.teardown();

        let mut cells: Vec<Option<MaterializedCell<F::Handle>>> = Vec::new();
        cells.resize_with(graph.cells().len(), || None);
        let mut obstacle_cells = Vec::new();
        for index in graph.active_indices() {
            let handle = self.factory.create_cell(graph.cell_center(index));
            let mut cell = MaterializedCell::new(handle);

            // Wall state is purely a function of the graph, applied once.
            let grid_cell = &graph.cells()[index];
            for direction in Direction::ALL {
                let state = if grid_cell.has_neighbor(direction) {
                    WallState::Open
                } else {
                    WallState::Closed
                };
                cell.walls[direction.index()] = state;
                self.factory.set_wall(&cell.handle, direction, state);
            }

            cell.obstacle = roll_obstacle(
                &self.config.obstacle_catalog,
                self.config.obstacle_spawn_rate,
                &self.config.settings,
                &mut self.rng,
            );
            if let Some(obstacle) = cell.obstacle.as_ref() {
                self.factory.show_obstacle(&cell.handle, Some(obstacle));
                obstacle_cells.push(index);
            }

            cell.light = roll_light(self.config.light_spawn_rate, &mut self.rng);
            if cell.light {
                self.factory.set_light(&cell.handle, true);
            }

            cells[index] = Some(cell);
        }

        // Walkability depends on the geometry placed above, so the
        // surface is built only now.
        let surface = self.navigator.build_surface(&graph, &obstacle_cells)?;

        let destination = {
            let navigator = &self.navigator;
            select_destination(&graph, spawn_index, &self.config.weights, |from, to| {
                navigator.query_path(&surface, from, to)
            })
        };

        // The destination must always be traversable and unobstructed,
        // overriding the probabilistic placement above.
        if let Some(cell) = cells[destination.target].as_mut() {
            cell.is_destination = true;
            self.factory.set_destination_marker(&cell.handle, true);
            if cell.obstacle.take().is_some() {
                self.factory.show_obstacle(&cell.handle, None);
            }
            if cell.light {
                cell.light = false;
                self.factory.set_light(&cell.handle, false);
            }
        }

        let outcome = GenerationOutcome {
            source: source_name,
            seed: self.config.seed,
            spawn_index,
            spawn_position: graph.cell_center(spawn_index),
            spawn_rotation_degrees: self.rng.uniform(Fixed::ZERO, Fixed::from_num(360)),
            destination_index: destination.target,
            destination_cost: destination.cost,
        };
        tracing::info!(
            spawn = outcome.spawn_index,
            destination = outcome.destination_index,
            cost = %outcome.destination_cost,
            "generation complete"
        );

        self.state = Some(GeneratedMapState {
            graph,
            cells,
            outcome: outcome.clone(),
        });

        // Apply the configured toggles uniformly across the fresh cells.
        self.apply_all_settings();

        self.events.generation_complete(&outcome);
        Ok(outcome)
    }

    /// Replace the candidate map sources used by future generations.
    ///
    /// The current map is untouched until the next `initialize_grid`.
    pub fn set_sources(&mut self, sources: Vec<MapSource>) {
        self.config.sources = sources;
    }

    /// Destroy all materialized cells of the previous generation.
    fn teardown(&mut self) {
        if let Some(state) = self.state.take() {
            let mut destroyed = 0usize;
            for cell in state.cells.into_iter().flatten() {
                self.factory.destroy_cell(cell.handle);
                destroyed += 1;
            }
            tracing::debug!(destroyed, "tore down previous map");
        }
    }

    /// Toggle the dirty-wall material everywhere.
    pub fn set_dirty_walls(&mut self, dirty: bool) {
        self.set_feature(Feature::DirtyWalls, dirty);
    }

    /// Toggle spawned obstacles everywhere.
    pub fn set_obstacles(&mut self, active: bool) {
        self.set_feature(Feature::Obstacles, active);
    }

    /// Toggle room lights everywhere.
    pub fn set_room_lights(&mut self, on: bool) {
        self.set_feature(Feature::RoomLights, on);
    }

    /// Toggle ambient particles everywhere.
    pub fn set_particles(&mut self, visible: bool) {
        self.set_feature(Feature::Particles, visible);
    }

    /// Re-apply every current toggle to every materialized cell.
    pub fn apply_all_settings(&mut self) {
        let settings = self.config.settings;
        for feature in Feature::ALL {
            self.propagate(feature, settings.enabled(feature));
        }
    }

    /// Set one feature toggle and propagate it to all cells.
    ///
    /// Idempotent: setting a feature to its current value does nothing
    /// observable (no factory calls, no event).
    pub fn set_feature(&mut self, feature: Feature, value: bool) {
        if self.config.settings.enabled(feature) == value {
            return;
        }
        self.config.settings.set(feature, value);
        self.propagate(feature, value);
        self.events.setting_changed(feature, value);
    }

    fn propagate(&mut self, feature: Feature, value: bool) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        for cell in state.cells.iter().flatten() {
            match feature {
                Feature::DirtyWalls => self.factory.set_dirty_walls(&cell.handle, value),
                Feature::Particles => self.factory.set_particles(&cell.handle, value),
                Feature::Obstacles => {
                    // Only cells that actually rolled an obstacle react.
                    if let Some(obstacle) = cell.obstacle.as_ref() {
                        let shown = if value { Some(obstacle) } else { None };
                        self.factory.show_obstacle(&cell.handle, shown);
                    }
                }
                Feature::RoomLights => {
                    if cell.light {
                        self.factory.set_light(&cell.handle, value);
                    }
                }
            }
        }
    }

    /// The current generation's graph, if one is committed.
    #[must_use]
    pub fn graph(&self) -> Option<&GridGraph> {
        self.state.as_ref().map(|state| &state.graph)
    }

    /// The current generation's outcome, if one is committed.
    #[must_use]
    pub fn outcome(&self) -> Option<&GenerationOutcome> {
        self.state.as_ref().map(|state| &state.outcome)
    }

    /// Materialized state of one cell, if that slot is active.
    #[must_use]
    pub fn cell_state(&self, index: usize) -> Option<&MaterializedCell<F::Handle>> {
        self.state
            .as_ref()
            .and_then(|state| state.cells.get(index))
            .and_then(Option::as_ref)
    }

    /// Current feature toggles.
    #[must_use]
    pub const fn settings(&self) -> &MapSettings {
        &self.config.settings
    }

    /// Grid index containing a world position on the current map.
    #[must_use]
    pub fn index_at_position(&self, position: Vec2Fixed) -> Option<usize> {
        self.graph().and_then(|graph| graph.index_at_position(position))
    }

    /// Access the injected factory (e.g. to inspect a simulated backend).
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Access the injected event sink.
    #[must_use]
    pub const fn events(&self) -> &E {
        &self.events
    }
}
