//! Reproducible pseudo-randomness for pilot-reaction jitter and airwork decisions.
//!
//! Grounded on `omniatc-store`'s dependency on `rand` 0.9 for reproducible simulation state;
//! seeded per-[`crate::nav::Nav`] rather than drawn from a shared global RNG so that replaying a
//! tick sequence with the same seed reproduces the same trajectory (see the determinism
//! property in the design notes).

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::NavConfig;

/// A per-aircraft pseudo-random source. Deliberately excluded from [`crate::nav::snapshot`]:
/// replaying a snapshot should not replay the controller-visible randomness it already
/// consumed (see the open question recorded in DESIGN.md).
#[derive(Debug, Clone)]
pub struct Rand {
    rng: StdRng,
}

impl Rand {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self { Self { rng: StdRng::seed_from_u64(seed) } }

    /// Draws a pilot reaction delay, faster when switching away from LNAV than onto it.
    pub fn reaction_delay(&mut self, config: &NavConfig, from_lnav: bool) -> Duration {
        let min = config.reaction_delay_min.as_secs_f32();
        let max = config.reaction_delay_max.as_secs_f32();
        let base = self.rng.random_range(min..=max);
        let scaled = if from_lnav { base * config.lnav_to_heading_factor } else { base };
        Duration::from_secs_f32(scaled)
    }

    /// Draws a uniform value in `[low, high]`, used by airwork to pick maneuver parameters.
    pub fn uniform(&mut self, low: f32, high: f32) -> f32 { self.rng.random_range(low..=high) }
}
