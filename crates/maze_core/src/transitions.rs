//! Timed effect state machines.
//!
//! Menu fades, camera fades and cell shakes are long-running visual
//! effects that advance once per frame. Instead of engine coroutines they
//! are explicit state machines: an embedder calls [`Transition::tick`]
//! with the current time each frame and drives its visuals from the
//! returned progress. The progress math is a pure function, so the
//! machines are trivially testable without a frame loop.

use crate::math::{Fixed, Vec2Fixed};
use crate::rng::MapRng;

/// Pure progress function: fraction of `duration` covered by `elapsed`,
/// clamped to `[0, 1]`. Non-positive durations complete immediately.
#[must_use]
pub fn progress(elapsed: Fixed, duration: Fixed) -> Fixed {
    if duration <= Fixed::ZERO || elapsed >= duration {
        return Fixed::ONE;
    }
    if elapsed <= Fixed::ZERO {
        return Fixed::ZERO;
    }
    elapsed / duration
}

/// Result of advancing a [`Transition`] by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStatus {
    /// No transition is active.
    Idle,
    /// The transition is running; carries current progress in `[0, 1)`.
    Running(Fixed),
    /// The transition crossed its duration on this tick and reset to idle.
    Finished,
}

/// A one-shot timed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Nothing running.
    #[default]
    Idle,
    /// Running since `started_at` for `duration` time units.
    Running {
        /// Time the transition started.
        started_at: Fixed,
        /// Total duration of the transition.
        duration: Fixed,
    },
}

impl Transition {
    /// Start (or restart) the transition at the given time.
    pub fn start(&mut self, now: Fixed, duration: Fixed) {
        *self = Self::Running {
            started_at: now,
            duration,
        };
    }

    /// Advance to the given time.
    ///
    /// Returns the current progress while running; when the duration is
    /// crossed the machine resets to idle and reports
    /// [`TransitionStatus::Finished`] exactly once.
    pub fn tick(&mut self, now: Fixed) -> TransitionStatus {
        match *self {
            Self::Idle => TransitionStatus::Idle,
            Self::Running {
                started_at,
                duration,
            } => {
                let p = progress(now - started_at, duration);
                if p >= Fixed::ONE {
                    *self = Self::Idle;
                    TransitionStatus::Finished
                } else {
                    TransitionStatus::Running(p)
                }
            }
        }
    }

    /// Whether a transition is currently running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// Shake envelope: amplitude rises to full strength at the midpoint and
/// falls back to zero, evaluated as a pure function of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShakeEnvelope {
    /// Total shake duration.
    pub duration: Fixed,
    /// Peak displacement strength.
    pub strength: Fixed,
}

impl ShakeEnvelope {
    /// Displacement amplitude at the given elapsed time.
    #[must_use]
    pub fn amplitude(&self, elapsed: Fixed) -> Fixed {
        let p = progress(elapsed, self.duration);
        if p >= Fixed::ONE {
            return Fixed::ZERO;
        }
        let half = Fixed::from_num(0.5);
        let envelope = if p < half {
            p / half
        } else {
            (Fixed::ONE - p) / half
        };
        envelope * self.strength
    }

    /// A random displacement with the envelope's current amplitude.
    ///
    /// Draws two uniform samples, matching one shake frame.
    pub fn sample_offset(&self, elapsed: Fixed, rng: &mut MapRng) -> Vec2Fixed {
        let amplitude = self.amplitude(elapsed);
        Vec2Fixed::new(
            rng.uniform(-amplitude, amplitude),
            rng.uniform(-amplitude, amplitude),
        )
    }
}
