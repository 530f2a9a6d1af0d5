//! Materialized cells: the factory seam and per-cell decoration rolls.
//!
//! Actual object creation is out of core scope. The [`CellFactory`] trait
//! is the narrow interface an embedder implements to instantiate cell
//! geometry and flip its visual state; the core keeps its own mirror of
//! each cell's state so toggles and destination clearing never need to
//! query the engine back.

use serde::{Deserialize, Serialize};

use crate::grid::Direction;
use crate::math::{Fixed, Vec2Fixed};
use crate::rng::MapRng;
use crate::settings::{Feature, MapSettings};

/// Per-direction wall state, derived from neighbor adjacency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallState {
    /// Passage to a linked neighbor.
    Open,
    /// Wall present (no neighbor link in that direction).
    Closed,
}

/// External capability for creating and decorating cell geometry.
///
/// One handle is created per active grid position. Rebuilds are
/// destructive: every previously created handle is destroyed before a
/// new generation materializes cells.
pub trait CellFactory {
    /// Opaque reference to an instantiated cell.
    type Handle;

    /// Instantiate a cell at the world position of its geometric center.
    fn create_cell(&mut self, center: Vec2Fixed) -> Self::Handle;

    /// Tear down a previously instantiated cell.
    fn destroy_cell(&mut self, cell: Self::Handle);

    /// Open or close one of the cell's four walls.
    fn set_wall(&mut self, cell: &Self::Handle, direction: Direction, state: WallState);

    /// Show or hide an obstacle prop. `None` hides any obstacle.
    fn show_obstacle(&mut self, cell: &Self::Handle, obstacle: Option<&ActiveObstacle>);

    /// Turn the cell's room light on or off.
    fn set_light(&mut self, cell: &Self::Handle, lit: bool);

    /// Show or hide the destination marker.
    fn set_destination_marker(&mut self, cell: &Self::Handle, visible: bool);

    /// Switch between dirty and clean wall materials.
    fn set_dirty_walls(&mut self, cell: &Self::Handle, dirty: bool);

    /// Show or hide the cell's ambient particles.
    fn set_particles(&mut self, cell: &Self::Handle, visible: bool);
}

/// One obstacle variant an active cell may spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    /// Jitter the prop's position and rotation inside the cell.
    pub randomize_position: bool,
    /// Feature this variant depends on. When the feature is disabled at
    /// roll time the variant is cancelled even if the spawn roll passed.
    pub requires: Option<Feature>,
}

/// The set of obstacle variants available to every cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleCatalog {
    /// Variant specs, indexed by variant id.
    pub specs: Vec<ObstacleSpec>,
}

impl ObstacleCatalog {
    /// Number of variants in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the catalog has no variants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// A small default prop set: two free-standing variants plus one
    /// hanging fixture that only exists when room lights are on.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            specs: vec![
                ObstacleSpec {
                    randomize_position: true,
                    requires: None,
                },
                ObstacleSpec {
                    randomize_position: true,
                    requires: None,
                },
                ObstacleSpec {
                    randomize_position: false,
                    requires: Some(Feature::RoomLights),
                },
            ],
        }
    }
}

/// An obstacle that actually spawned in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveObstacle {
    /// Catalog variant index.
    pub variant: usize,
    /// Local offset from the cell center.
    pub offset: Vec2Fixed,
    /// Yaw in degrees.
    #[serde(with = "crate::math::fixed_serde")]
    pub rotation_degrees: Fixed,
}

/// Half-extent of the obstacle jitter range, in world units.
const OBSTACLE_JITTER: f64 = 1.5;

/// Roll one obstacle spawn for a cell.
///
/// One uniform sample is drawn against `spawn_rate`; on success one of
/// the catalog variants is chosen uniformly. A variant whose `requires`
/// feature is disabled yields no obstacle at all despite the successful
/// roll.
pub fn roll_obstacle(
    catalog: &ObstacleCatalog,
    spawn_rate: Fixed,
    settings: &MapSettings,
    rng: &mut MapRng,
) -> Option<ActiveObstacle> {
    if catalog.is_empty() || !rng.chance(spawn_rate) {
        return None;
    }

    let variant = rng.range_usize(catalog.len());
    let spec = catalog.specs[variant];
    if let Some(feature) = spec.requires {
        if !settings.enabled(feature) {
            return None;
        }
    }

    let (offset, rotation_degrees) = if spec.randomize_position {
        let jitter = Fixed::from_num(OBSTACLE_JITTER);
        let offset = Vec2Fixed::new(rng.uniform(-jitter, jitter), rng.uniform(-jitter, jitter));
        (offset, rng.uniform(Fixed::ZERO, Fixed::from_num(360)))
    } else {
        (Vec2Fixed::ZERO, Fixed::ZERO)
    };

    Some(ActiveObstacle {
        variant,
        offset,
        rotation_degrees,
    })
}

/// Roll one light spawn for a cell, independent of the obstacle roll.
pub fn roll_light(spawn_rate: Fixed, rng: &mut MapRng) -> bool {
    rng.chance(spawn_rate)
}

/// Core-owned state of one materialized cell.
///
/// Mirrors what the factory was told, so settings toggles and the
/// destination-clearing pass are pure lookups.
#[derive(Debug)]
pub struct MaterializedCell<H> {
    /// Factory handle for the instantiated geometry.
    pub handle: H,
    /// Wall state per [`Direction`] slot.
    pub walls: [WallState; 4],
    /// Obstacle that spawned here, if any.
    pub obstacle: Option<ActiveObstacle>,
    /// Whether this cell rolled a room light.
    pub light: bool,
    /// Whether this cell is the current destination.
    pub is_destination: bool,
}

impl<H> MaterializedCell<H> {
    /// Wrap a fresh factory handle with default decoration state.
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            walls: [WallState::Closed; 4],
            obstacle: None,
            light: false,
            is_destination: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one() -> Fixed {
        Fixed::from_num(1)
    }

    #[test]
    fn test_zero_rate_never_spawns() {
        let catalog = ObstacleCatalog::standard();
        let settings = MapSettings::default();
        let mut rng = MapRng::new(1);
        for _ in 0..200 {
            assert!(roll_obstacle(&catalog, Fixed::ZERO, &settings, &mut rng).is_none());
        }
    }

    #[test]
    fn test_full_rate_spawns_unless_dependency_blocks() {
        let catalog = ObstacleCatalog::standard();
        let settings = MapSettings::default();
        let mut rng = MapRng::new(2);
        let spawned = (0..100)
            .filter(|_| roll_obstacle(&catalog, one(), &settings, &mut rng).is_some())
            .count();
        // All dependencies enabled, so every successful roll must spawn.
        assert_eq!(spawned, 100);
    }

    #[test]
    fn test_dependent_variant_cancelled_when_feature_off() {
        let catalog = ObstacleCatalog {
            specs: vec![ObstacleSpec {
                randomize_position: false,
                requires: Some(Feature::RoomLights),
            }],
        };
        let mut settings = MapSettings::default();
        settings.set(Feature::RoomLights, false);
        let mut rng = MapRng::new(3);
        // Spawn roll always succeeds at rate 1, but the single variant's
        // dependency is off, so no obstacle must ever appear.
        for _ in 0..200 {
            assert!(roll_obstacle(&catalog, one(), &settings, &mut rng).is_none());
        }
    }

    #[test]
    fn test_empty_catalog_spawns_nothing() {
        let catalog = ObstacleCatalog::default();
        let settings = MapSettings::default();
        let mut rng = MapRng::new(4);
        assert!(roll_obstacle(&catalog, one(), &settings, &mut rng).is_none());
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let catalog = ObstacleCatalog {
            specs: vec![ObstacleSpec {
                randomize_position: true,
                requires: None,
            }],
        };
        let settings = MapSettings::default();
        let mut rng = MapRng::new(5);
        let jitter = Fixed::from_num(OBSTACLE_JITTER);
        for _ in 0..100 {
            let obstacle = roll_obstacle(&catalog, one(), &settings, &mut rng).unwrap();
            assert!(obstacle.offset.x >= -jitter && obstacle.offset.x < jitter);
            assert!(obstacle.offset.y >= -jitter && obstacle.offset.y < jitter);
            assert!(
                obstacle.rotation_degrees >= Fixed::ZERO
                    && obstacle.rotation_degrees < Fixed::from_num(360)
            );
        }
    }

    #[test]
    fn test_fixed_variant_has_no_jitter() {
        let catalog = ObstacleCatalog {
            specs: vec![ObstacleSpec {
                randomize_position: false,
                requires: None,
            }],
        };
        let settings = MapSettings::default();
        let mut rng = MapRng::new(6);
        let obstacle = roll_obstacle(&catalog, one(), &settings, &mut rng).unwrap();
        assert_eq!(obstacle.offset, Vec2Fixed::ZERO);
        assert_eq!(obstacle.rotation_degrees, Fixed::ZERO);
    }

    #[test]
    fn test_rolls_are_deterministic() {
        let catalog = ObstacleCatalog::standard();
        let settings = MapSettings::default();
        let run = || {
            let mut rng = MapRng::new(42);
            (0..50)
                .map(|_| roll_obstacle(&catalog, Fixed::from_num(0.3), &settings, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
