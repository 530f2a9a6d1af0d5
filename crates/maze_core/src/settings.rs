//! Global map feature toggles.
//!
//! These are the settings the options menu exposes that actually reach
//! the maze: wall grime, obstacle spawning, room lights and ambient
//! particles. They are applied uniformly across all materialized cells,
//! both right after generation and on demand when the player flips a
//! toggle mid-run.

use serde::{Deserialize, Serialize};

/// A toggleable map feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Grimy wall material instead of the clean variant.
    DirtyWalls,
    /// Per-cell obstacle props.
    Obstacles,
    /// Per-cell room lights.
    RoomLights,
    /// Ambient dust particles.
    Particles,
}

impl Feature {
    /// All features in a fixed order.
    pub const ALL: [Self; 4] = [
        Self::DirtyWalls,
        Self::Obstacles,
        Self::RoomLights,
        Self::Particles,
    ];
}

/// Current values for all map feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSettings {
    /// Use the dirty wall material.
    pub dirty_walls: bool,
    /// Show spawned obstacles.
    pub spawn_obstacles: bool,
    /// Light rooms that rolled a light.
    pub room_lights: bool,
    /// Show ambient particles.
    pub show_particles: bool,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            dirty_walls: true,
            spawn_obstacles: true,
            room_lights: true,
            show_particles: true,
        }
    }
}

impl MapSettings {
    /// Current value of a feature toggle.
    #[must_use]
    pub const fn enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::DirtyWalls => self.dirty_walls,
            Feature::Obstacles => self.spawn_obstacles,
            Feature::RoomLights => self.room_lights,
            Feature::Particles => self.show_particles,
        }
    }

    /// Set a feature toggle.
    pub fn set(&mut self, feature: Feature, value: bool) {
        match feature {
            Feature::DirtyWalls => self.dirty_walls = value,
            Feature::Obstacles => self.spawn_obstacles = value,
            Feature::RoomLights => self.room_lights = value,
            Feature::Particles => self.show_particles = value,
        }
    }
}
