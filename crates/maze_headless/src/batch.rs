//! Batch generation runs for tuning and balance checks.
//!
//! Sweeps a seed range over one scenario in parallel and aggregates
//! destination path-cost statistics. Costs leave the fixed-point world
//! here: reports are for humans and dashboards, not for simulation.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use maze_core::controller::{MapController, MapControllerConfig, NullEvents};
use maze_core::error::MapError;
use maze_core::navigation::GridNavigator;

use crate::backend::SimBackend;
use crate::scenario::GenScenario;

/// Batch run parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of generations to run.
    pub count: u32,
    /// Seed of the first run; run `i` uses `base_seed + i`.
    pub base_seed: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            count: 100,
            base_seed: 0,
        }
    }
}

/// Result of one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenReport {
    /// Seed used for this run.
    pub seed: u64,
    /// Name of the map source.
    pub source: String,
    /// Active cells in the maze.
    pub active_cells: usize,
    /// Cells that spawned an obstacle.
    pub obstacles: usize,
    /// Cells that spawned a light.
    pub lights: usize,
    /// Spawn cell index.
    pub spawn_index: usize,
    /// Destination cell index.
    pub destination_index: usize,
    /// Winning destination path cost.
    pub destination_cost: f64,
}

/// Aggregated batch statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of successful runs.
    pub runs: u32,
    /// Smallest winning path cost.
    pub min_cost: f64,
    /// Largest winning path cost.
    pub max_cost: f64,
    /// Mean winning path cost.
    pub mean_cost: f64,
}

/// Full batch output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Per-run reports, in seed order.
    pub reports: Vec<GenReport>,
    /// Aggregated statistics.
    pub summary: BatchSummary,
}

/// Run one generation and summarize it.
fn run_once(config: MapControllerConfig, seed: u64) -> Result<GenReport, MapError> {
    let config = MapControllerConfig { seed, ..config };
    let mut controller =
        MapController::new(config, SimBackend::default(), GridNavigator, NullEvents);
    let outcome = controller.initialize_grid()?;

    let graph = controller
        .graph()
        .ok_or_else(|| MapError::MissingAsset("generated graph".to_string()))?;
    let active_cells = graph.active_count();
    let indices: Vec<usize> = graph.active_indices().collect();
    let obstacles = indices
        .iter()
        .filter(|&&i| controller.cell_state(i).is_some_and(|c| c.obstacle.is_some()))
        .count();
    let lights = indices
        .iter()
        .filter(|&&i| controller.cell_state(i).is_some_and(|c| c.light))
        .count();

    Ok(GenReport {
        seed,
        source: outcome.source,
        active_cells,
        obstacles,
        lights,
        spawn_index: outcome.spawn_index,
        destination_index: outcome.destination_index,
        destination_cost: outcome.destination_cost.to_num::<f64>(),
    })
}

/// Run a scenario across a seed range in parallel.
///
/// Individual runs that fail are logged and dropped from the results;
/// scenario resolution errors surface before any run starts.
pub fn run_batch(
    scenario: &GenScenario,
    batch: &BatchConfig,
) -> Result<BatchResults, crate::scenario::ScenarioError> {
    let config = scenario.to_config()?;

    let mut reports: Vec<GenReport> = (0..batch.count)
        .into_par_iter()
        .map(|i| run_once(config.clone(), batch.base_seed + u64::from(i)))
        .filter_map(|result| match result {
            Ok(report) => Some(report),
            Err(error) => {
                tracing::warn!(%error, "generation run failed");
                None
            }
        })
        .collect();
    reports.sort_by_key(|report| report.seed);

    let runs = reports.len() as u32;
    let costs: Vec<f64> = reports.iter().map(|r| r.destination_cost).collect();
    let min_cost = costs.iter().copied().fold(f64::INFINITY, f64::min);
    let max_cost = costs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean_cost = if costs.is_empty() {
        0.0
    } else {
        costs.iter().sum::<f64>() / costs.len() as f64
    };

    Ok(BatchResults {
        reports,
        summary: BatchSummary {
            runs,
            min_cost: if costs.is_empty() { 0.0 } else { min_cost },
            max_cost: if costs.is_empty() { 0.0 } else { max_cost },
            mean_cost,
        },
    })
}
