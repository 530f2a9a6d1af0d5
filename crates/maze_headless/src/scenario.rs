//! Scenario loading and configuration.
//!
//! Scenarios define one headless generation setup: which map file to
//! use, the seed, spawn rates and cost weights. They are RON files so
//! hand-tuning stays friendly; rates and weights are plain floats here
//! and converted to fixed-point at the core boundary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use maze_core::controller::{MapControllerConfig, MapSource};
use maze_core::math::Fixed;
use maze_core::selection::PathCostWeights;
use maze_core::settings::MapSettings;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read a file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Scenario names neither an inline map nor a map file.
    #[error("Scenario {0:?} has no map_text and no map_file")]
    MissingMap(String),
}

fn default_obstacle_rate() -> f32 {
    0.3
}

fn default_light_rate() -> f32 {
    0.5
}

fn default_distance_weight() -> f32 {
    0.25
}

fn default_turns_weight() -> f32 {
    0.75
}

fn default_true() -> bool {
    true
}

/// A complete generation scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenScenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Inline map file text. Takes precedence over `map_file`.
    #[serde(default)]
    pub map_text: Option<String>,
    /// Path to a `.map` file, relative to the scenario file's directory.
    #[serde(default)]
    pub map_file: Option<PathBuf>,
    /// Generation seed.
    #[serde(default)]
    pub seed: u64,
    /// Per-cell obstacle spawn probability.
    #[serde(default = "default_obstacle_rate")]
    pub obstacle_spawn_rate: f32,
    /// Per-cell light spawn probability.
    #[serde(default = "default_light_rate")]
    pub light_spawn_rate: f32,
    /// Weight on normalized path length in destination scoring.
    #[serde(default = "default_distance_weight")]
    pub distance_weight: f32,
    /// Weight on waypoint count in destination scoring.
    #[serde(default = "default_turns_weight")]
    pub turns_weight: f32,
    /// Dirty-wall material toggle.
    #[serde(default = "default_true")]
    pub dirty_walls: bool,
    /// Obstacle toggle.
    #[serde(default = "default_true")]
    pub spawn_obstacles: bool,
    /// Room light toggle.
    #[serde(default = "default_true")]
    pub room_lights: bool,
    /// Particle toggle.
    #[serde(default = "default_true")]
    pub show_particles: bool,
}

impl Default for GenScenario {
    fn default() -> Self {
        Self {
            name: "Default Cellar".to_string(),
            description: "A small built-in maze for smoke testing".to_string(),
            map_text: Some(DEFAULT_MAP.to_string()),
            map_file: None,
            seed: 0,
            obstacle_spawn_rate: default_obstacle_rate(),
            light_spawn_rate: default_light_rate(),
            distance_weight: default_distance_weight(),
            turns_weight: default_turns_weight(),
            dirty_walls: true,
            spawn_obstacles: true,
            room_lights: true,
            show_particles: true,
        }
    }
}

/// Built-in 5×5 map used when no scenario is given.
const DEFAULT_MAP: &str = "5,5,2\n1,1,1,1,1\n1,0,0,0,1\n1,1,1,0,1\n0,0,1,0,1\n1,1,1,1,1";

impl GenScenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let mut scenario: Self = ron::from_str(&contents)?;
        // Map files travel with their scenario file.
        if let (Some(map_file), Some(dir)) = (scenario.map_file.as_ref(), path.parent()) {
            if map_file.is_relative() {
                scenario.map_file = Some(dir.join(map_file));
            }
        }
        Ok(scenario)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// Build a scenario around a single map file on disk.
    #[must_use]
    pub fn for_map_file(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .map_or_else(|| "map".to_string(), |s| s.to_string_lossy().into_owned());
        Self {
            name,
            map_text: None,
            map_file: Some(path),
            ..Self::default()
        }
    }

    /// Resolve this scenario into a core controller config.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::MissingMap`] when neither `map_text` nor
    /// `map_file` is set, or IO errors reading the map file.
    pub fn to_config(&self) -> Result<MapControllerConfig, ScenarioError> {
        let (name, text) = if let Some(text) = &self.map_text {
            (self.name.clone(), text.clone())
        } else if let Some(path) = &self.map_file {
            let text = std::fs::read_to_string(path)?;
            let name = path
                .file_stem()
                .map_or_else(|| self.name.clone(), |s| s.to_string_lossy().into_owned());
            (name, text)
        } else {
            return Err(ScenarioError::MissingMap(self.name.clone()));
        };

        Ok(MapControllerConfig {
            sources: vec![MapSource { name, text }],
            randomize_source: false,
            weights: PathCostWeights {
                distance: Fixed::from_num(self.distance_weight),
                turns: Fixed::from_num(self.turns_weight),
            },
            obstacle_spawn_rate: Fixed::from_num(self.obstacle_spawn_rate),
            light_spawn_rate: Fixed::from_num(self.light_spawn_rate),
            settings: MapSettings {
                dirty_walls: self.dirty_walls,
                spawn_obstacles: self.spawn_obstacles,
                room_lights: self.room_lights,
                show_particles: self.show_particles,
            },
            seed: self.seed,
            ..MapControllerConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_resolves() {
        let scenario = GenScenario::default();
        let config = scenario.to_config().unwrap();
        assert_eq!(config.sources.len(), 1);
        assert!(!config.randomize_source);
    }

    #[test]
    fn test_ron_round_trip_with_sparse_fields() {
        let ron_text = r#"(
            name: "sparse",
            map_text: Some("1,1,1\n1"),
            seed: 7,
        )"#;
        let scenario = GenScenario::from_ron_str(ron_text).unwrap();
        assert_eq!(scenario.name, "sparse");
        assert_eq!(scenario.seed, 7);
        // Defaults fill the rest.
        assert!((scenario.obstacle_spawn_rate - 0.3).abs() < f32::EPSILON);
        assert!(scenario.room_lights);
    }

    #[test]
    fn test_missing_map_is_an_error() {
        let scenario = GenScenario {
            map_text: None,
            map_file: None,
            ..GenScenario::default()
        };
        assert!(matches!(
            scenario.to_config(),
            Err(ScenarioError::MissingMap(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = GenScenario::load("definitely/not/here.ron");
        assert!(matches!(result, Err(ScenarioError::FileNotFound(_))));
    }
}
