//! Determinism testing utilities.
//!
//! Provides a harness for verifying that map generation produces
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Generated mazes must be 100% reproducible from their seed. Sources of
//! non-determinism include:
//!
//! - **Floating-point math**: Different CPUs can produce different
//!   results. Generation uses fixed-point arithmetic via
//!   [`maze_core::math::Fixed`] throughout.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Generation iterates cells in ascending grid-index order.
//!
//! - **System randomness**: No calls to `rand()` without explicit seeds.
//!   All "random" behavior flows through the seeded
//!   [`maze_core::rng::MapRng`].

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic generation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that generation was deterministic, with a detailed error
    /// message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Generation is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a generation closure multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `generate` - Closure producing the value to compare
/// * `hash` - Function computing a hash of the produced value
///
/// # Example
///
/// ```ignore
/// let result = verify_determinism(
///     5,
///     || generate_maze(42),
///     |maze| compute_hash(maze),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<T, G, H>(runs: usize, generate: G, hash: H) -> DeterminismResult
where
    G: Fn() -> T,
    H: Fn(&T) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);
    for _ in 0..runs {
        let value = generate();
        hashes.push(hash(&value));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for generation testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of parsing and generation determinism.
pub mod strategies {
    use proptest::prelude::*;

    /// Generate a random map file text with at least one active cell.
    ///
    /// Dimensions range over `1..=max_width` × `1..=max_height` with
    /// cell size 1..=4.
    pub fn arb_layout_text(max_width: u32, max_height: u32) -> impl Strategy<Value = String> {
        (1..=max_width, 1..=max_height, 1u32..=4).prop_flat_map(|(width, height, cell_size)| {
            proptest::collection::vec(any::<bool>(), (width * height) as usize).prop_map(
                move |mut bits| {
                    if !bits.iter().any(|&b| b) {
                        bits[0] = true;
                    }
                    layout_text(width, height, cell_size, &bits)
                },
            )
        })
    }

    /// Generate an arbitrary seed.
    pub fn arb_seed() -> impl Strategy<Value = u64> {
        any::<u64>()
    }

    /// Render bits (indexed `x * height + y`) as map file text.
    fn layout_text(width: u32, height: u32, cell_size: u32, bits: &[bool]) -> String {
        let mut out = format!("{width},{height},{cell_size}");
        for n in 1..=height {
            let y = height - n;
            out.push('\n');
            for x in 0..width {
                if x > 0 {
                    out.push(',');
                }
                let index = (x * height + y) as usize;
                out.push(if bits[index] { '1' } else { '0' });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{test_config, RecordingFactory, SAMPLE_3X2};
    use maze_core::controller::{MapController, NullEvents};
    use maze_core::navigation::GridNavigator;

    #[test]
    fn test_verify_determinism_simple() {
        let result = verify_determinism(3, || 7u64, |n| *n);
        assert!(result.is_deterministic);
        assert_eq!(result.hashes, vec![7, 7, 7]);
    }

    #[test]
    fn test_verify_determinism_detects_divergence() {
        let counter = std::cell::Cell::new(0u64);
        let result = verify_determinism(
            3,
            || {
                counter.set(counter.get() + 1);
                counter.get()
            },
            |n| *n,
        );
        assert!(!result.is_deterministic);
        assert_eq!(result.unique_hashes().len(), 3);
    }

    #[test]
    fn test_generation_is_deterministic_across_controllers() {
        let result = verify_determinism(
            4,
            || {
                let mut controller = MapController::new(
                    test_config(SAMPLE_3X2, 1234),
                    RecordingFactory::default(),
                    GridNavigator,
                    NullEvents,
                );
                controller.initialize_grid().expect("generation succeeds")
            },
            compute_hash,
        );
        result.assert_deterministic();
    }
}
