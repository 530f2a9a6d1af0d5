//! Headless maze generation runner for CI verification and tuning.
//!
//! This crate runs the full generation pipeline without an engine:
//! an in-memory cell backend stands in for scene instantiation, the
//! built-in grid navigator answers path queries, and the result is
//! rendered as ASCII for quick terminal review. This enables:
//!
//! - **CI verification**: generation determinism and map validity checks
//! - **Tuning**: batch runs across seeds with path-cost statistics
//! - **Authoring**: eyeballing a map file's maze before shipping it
//!
//! # Example
//!
//! ```bash
//! # Generate one maze and print it
//! cargo run -p maze_headless -- run --scenario scenarios/cellar.ron
//!
//! # Sweep 100 seeds and write statistics
//! cargo run -p maze_headless -- batch --scenario scenarios/cellar.ron \
//!     --count 100 --output results/batch.json
//! ```

pub mod ascii;
pub mod backend;
pub mod batch;
pub mod scenario;

pub use ascii::{render_maze, AsciiConfig};
pub use backend::{SimBackend, SimCell};
pub use batch::{run_batch, BatchConfig, BatchResults, BatchSummary, GenReport};
pub use scenario::{GenScenario, ScenarioError};
