//! # Maze Core
//!
//! Deterministic maze generation core for Nightmaze.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! This separation enables:
//! - Headless generation and CI verification
//! - Reproducible mazes from a seed
//! - Engine-agnostic embedding behind narrow trait seams
//!
//! ## Crate Structure
//!
//! - [`layout`] - Map file parsing
//! - [`grid`] - Active-cell grid graph
//! - [`cell`] - Cell factory seam and decoration rolls
//! - [`navigation`] - Navigable surface and path queries
//! - [`selection`] - Spawn and destination selection
//! - [`controller`] - Generation orchestration
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod cell;
pub mod controller;
pub mod error;
pub mod grid;
pub mod layout;
pub mod math;
pub mod navigation;
pub mod rng;
pub mod selection;
pub mod settings;
pub mod transitions;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cell::{CellFactory, ObstacleCatalog, ObstacleSpec, WallState};
    pub use crate::controller::{
        GenerationEvents, GenerationOutcome, MapController, MapControllerConfig, MapSource,
        NullEvents,
    };
    pub use crate::error::{MapError, Result};
    pub use crate::grid::{Direction, GridGraph};
    pub use crate::layout::MapLayout;
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::navigation::{GridNavigator, Navigator};
    pub use crate::rng::MapRng;
    pub use crate::selection::{PathCostWeights, SpawnPolicy};
    pub use crate::settings::{Feature, MapSettings};
}
