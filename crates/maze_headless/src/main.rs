//! Headless maze generation runner.
//!
//! Runs the full generation pipeline without an engine and prints the
//! result as ASCII, or sweeps seeds and writes statistics for tuning.
//!
//! # Usage
//!
//! ```bash
//! # Generate the built-in map with a given seed
//! cargo run -p maze_headless -- run --seed 42
//!
//! # Generate from a scenario file
//! cargo run -p maze_headless -- run --scenario scenarios/cellar.ron
//!
//! # Generate straight from a map file
//! cargo run -p maze_headless -- run --map maps/cellar.map
//!
//! # Sweep 500 seeds and write statistics as JSON
//! cargo run -p maze_headless -- batch --count 500 --output results/batch.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use maze_core::controller::{MapController, NullEvents};
use maze_core::navigation::GridNavigator;

use maze_headless::{
    ascii::{render_maze, AsciiConfig},
    batch::{run_batch, BatchConfig},
    backend::SimBackend,
    scenario::GenScenario,
};

#[derive(Parser)]
#[command(name = "maze_headless")]
#[command(about = "Headless maze generation runner for CI and tuning")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a single maze and print it as ASCII
    Run {
        /// Scenario file to load
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Map file to generate from (overrides the scenario's map)
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Override the scenario's seed
        #[arg(long)]
        seed: Option<u64>,

        /// Hide obstacle and light glyphs
        #[arg(long)]
        plain: bool,
    },

    /// Run a batch of generations for tuning statistics
    Batch {
        /// Scenario file to load
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Number of generations to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Starting random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Output JSON file for the results
        #[arg(short, long, default_value = "results/batch.json")]
        output: PathBuf,
    },
}

/// Boxed-error alias; the binary only reports errors, it never matches
/// on them.
type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

fn load_scenario(path: Option<PathBuf>, map: Option<PathBuf>) -> AppResult<GenScenario> {
    let scenario = match (path, map) {
        (Some(path), None) => GenScenario::load(path)?,
        (Some(path), Some(map)) => {
            let mut scenario = GenScenario::load(path)?;
            scenario.map_text = None;
            scenario.map_file = Some(map);
            scenario
        }
        (None, Some(map)) => GenScenario::for_map_file(map),
        (None, None) => GenScenario::default(),
    };
    Ok(scenario)
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Run {
            scenario,
            map,
            seed,
            plain,
        } => cmd_run(scenario, map, seed, plain),
        Commands::Batch {
            scenario,
            count,
            seed,
            output,
        } => cmd_batch(scenario, count, seed, output),
    };

    if let Err(e) = result {
        tracing::error!("Run failed: {e}");
        std::process::exit(1);
    }
}

fn cmd_run(
    scenario: Option<PathBuf>,
    map: Option<PathBuf>,
    seed: Option<u64>,
    plain: bool,
) -> AppResult<()> {
    let mut scenario = load_scenario(scenario, map)?;
    if let Some(seed) = seed {
        scenario.seed = seed;
    }
    tracing::info!(name = %scenario.name, seed = scenario.seed, "generating maze");

    let config = scenario.to_config()?;
    let mut controller =
        MapController::new(config, SimBackend::default(), GridNavigator, NullEvents);
    let outcome = controller.initialize_grid()?;

    let ascii_config = AsciiConfig {
        show_obstacles: !plain,
        show_lights: !plain,
    };
    print!("{}", render_maze(&controller, &ascii_config));
    tracing::info!(
        spawn = outcome.spawn_index,
        destination = outcome.destination_index,
        cost = outcome.destination_cost.to_num::<f64>(),
        "generation complete"
    );
    Ok(())
}

fn cmd_batch(
    scenario: Option<PathBuf>,
    count: u32,
    seed: u64,
    output: PathBuf,
) -> AppResult<()> {
    let scenario = load_scenario(scenario, None)?;
    tracing::info!(name = %scenario.name, count, base_seed = seed, "running batch");

    let results = run_batch(
        &scenario,
        &BatchConfig {
            count,
            base_seed: seed,
        },
    )?;

    if let Some(dir) = output.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&output, serde_json::to_string_pretty(&results)?)?;

    tracing::info!(
        runs = results.summary.runs,
        min_cost = results.summary.min_cost,
        max_cost = results.summary.max_cost,
        mean_cost = results.summary.mean_cost,
        output = %output.display(),
        "batch complete"
    );
    Ok(())
}
