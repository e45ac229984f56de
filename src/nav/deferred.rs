//! Pilot-reaction jitter: a controller instruction that changes the lateral mode takes a few
//! seconds to actually be flown, modeling the radio/readback/control-input delay.
//!
//! Grounded on the teacher's `level::nav::DeferredHeading`-style staging (a command writes to a
//! pending slot, a system flushes it once due) but reworked into a single optional field on
//! [`super::Nav`] rather than a separate ECS component, since timers here are tracked against the
//! tick-driver's own simulated clock instead of a Bevy `Time` resource.

use std::time::Duration;

use super::command::TurnMethod;
use super::hold::Hold;
use crate::units::Heading;
use crate::waypoint::Waypoint;

/// A lateral-mode change waiting for the pilot reaction delay to elapse. At most one of
/// `heading`/`waypoints`/`hold` is populated, mirroring why the aircraft deferred in the first
/// place (a heading assignment, a direct-to, or a hold entry).
#[derive(Debug, Clone)]
pub struct DeferredNavHeading {
    pub remaining: Duration,
    pub heading: Option<(Heading, TurnMethod)>,
    pub waypoints: Option<Vec<Waypoint>>,
    pub hold: Option<Hold>,
}

impl DeferredNavHeading {
    #[must_use]
    pub fn heading_change(heading: Heading, turn: TurnMethod, delay: Duration) -> Self {
        Self { remaining: delay, heading: Some((heading, turn)), waypoints: None, hold: None }
    }

    #[must_use]
    pub fn waypoints_change(waypoints: Vec<Waypoint>, delay: Duration) -> Self {
        Self { remaining: delay, heading: None, waypoints: Some(waypoints), hold: None }
    }

    #[must_use]
    pub fn hold_change(hold: Hold, delay: Duration) -> Self {
        Self { remaining: delay, heading: None, waypoints: None, hold: Some(hold) }
    }

    /// Counts down by one tick, returning `true` once the reaction delay has fully elapsed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }
}
