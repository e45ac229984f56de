//! The navigation core: a single per-aircraft autopilot.
//!
//! [`Nav`] is the aggregate root described by the data model: it owns the aircraft's physical
//! [`FlightState`], its performance envelope, its route, and every autopilot sub-mode (vertical,
//! speed, lateral, approach, procedure-turn, hold). Mutation only ever happens through the
//! command surface ([`command`]) or the tick driver ([`tick`]); waypoint advancement happens as
//! a side effect of [`Nav::update`].
//!
//! Grounded structurally on the teacher's `level::nav.rs` (which this module's name mirrors) and
//! `level::route.rs`'s `Node`/`CompletionCondition` pattern, but reworked from a tree of ECS
//! components mutated by systems into plain owned fields mutated by methods, since a `Nav` here
//! models exactly one aircraft rather than a slot in a shared `World`.

pub mod altitude;
pub mod approach;
pub mod command;
pub mod deferred;
pub mod heading;
pub mod hold;
pub mod procedure_turn;
pub mod speed;
pub mod tick;

#[cfg(test)]
mod tests;

use bevy_math::Vec2;

use crate::config::NavConfig;
use crate::flight_state::FlightState;
use crate::perf::AircraftPerformance;
use crate::rand_jitter::Rand;
use crate::units::{Angle, Position};
use crate::waypoint::Waypoint;

pub use altitude::NavAltitude;
pub use approach::{InterceptState, NavApproach};
pub use command::{Command, CommandIntent, TurnMethod, UnableReason};
pub use deferred::DeferredNavHeading;
pub use heading::NavHeading;
pub use hold::{Hold, HoldState};
pub use procedure_turn::{Racetrack45State, RacetrackPt, RacetrackState, Standard45Pt};
pub use speed::NavSpeed;

/// An in-progress training maneuver block, flown within a cylinder around a center point.
#[derive(Debug, Clone)]
pub struct Airwork {
    pub center: Position<Vec2>,
    pub radius: crate::units::Distance<f32>,
    pub altitude_low: Position<f32>,
    pub altitude_high: Position<f32>,
    pub remaining: std::time::Duration,
    pub target_heading: crate::units::Heading,
}

/// Per-fix controller instructions staged to take effect when the aircraft reaches that fix,
/// rather than immediately.
#[derive(Debug, Clone, Default)]
pub struct FixAssignment {
    pub cross_altitude: Option<crate::waypoint::AltitudeRestriction>,
    pub cross_speed: Option<crate::units::Speed<f32>>,
    pub depart_direct: Option<String>,
    pub depart_heading: Option<crate::units::Heading>,
    pub enter_hold: Option<Hold>,
}

/// The filed final/cruise altitude, retained separately from [`NavAltitude`] so that a cleared
/// climb can never be capped above what was actually filed (invariant: `Cleared` is always
/// clamped to `FinalAltitude`).
#[derive(Debug, Clone, Copy)]
pub struct FinalAltitude(pub Position<f32>);

/// The aggregate autopilot state of a single aircraft.
pub struct Nav {
    pub flight_state: FlightState,
    pub perf: AircraftPerformance,
    pub final_altitude: FinalAltitude,
    pub waypoints: Vec<Waypoint>,
    pub altitude: NavAltitude,
    pub speed: NavSpeed,
    pub heading: NavHeading,
    pub approach: NavApproach,
    pub fix_assignments: std::collections::HashMap<String, FixAssignment>,
    pub deferred: Option<DeferredNavHeading>,
    pub airwork: Option<Airwork>,
    pub rand: Rand,
    pub config: NavConfig,
    pub departure_airport: Option<crate::navdb::Airport>,
    pub arrival_airport: Option<crate::navdb::Airport>,
}

impl Nav {
    /// Constructs a `Nav` for an aircraft departing `departure_airport`, climbing via SID.
    #[must_use]
    pub fn new_departure(
        flight_state: FlightState,
        perf: AircraftPerformance,
        final_altitude: Position<f32>,
        waypoints: Vec<Waypoint>,
        departure_airport: crate::navdb::Airport,
        seed: u64,
    ) -> Self {
        let mut nav = Self::new_bare(flight_state, perf, final_altitude, waypoints, seed);
        nav.flight_state.initial_departure_climb = true;
        nav.departure_airport = Some(departure_airport);
        nav
    }

    /// Constructs a `Nav` for an aircraft already established on its arrival route.
    #[must_use]
    pub fn new_arrival(
        flight_state: FlightState,
        perf: AircraftPerformance,
        final_altitude: Position<f32>,
        waypoints: Vec<Waypoint>,
        arrival_airport: crate::navdb::Airport,
        seed: u64,
    ) -> Self {
        let mut nav = Self::new_bare(flight_state, perf, final_altitude, waypoints, seed);
        nav.arrival_airport = Some(arrival_airport);
        nav
    }

    /// Constructs a `Nav` for an aircraft that is not landing at either endpoint of the route
    /// (overflight).
    #[must_use]
    pub fn new_overflight(
        flight_state: FlightState,
        perf: AircraftPerformance,
        final_altitude: Position<f32>,
        waypoints: Vec<Waypoint>,
        seed: u64,
    ) -> Self {
        Self::new_bare(flight_state, perf, final_altitude, waypoints, seed)
    }

    fn new_bare(
        flight_state: FlightState,
        perf: AircraftPerformance,
        final_altitude: Position<f32>,
        waypoints: Vec<Waypoint>,
        seed: u64,
    ) -> Self {
        let mut waypoints: Vec<Waypoint> = waypoints
            .into_iter()
            .filter(|wp| wp.position.get().is_finite())
            .collect();
        for wp in &mut waypoints {
            if let Some(restriction) = wp.altitude {
                let (low, high) = restriction.bounds(final_altitude);
                if !low.get().is_finite() || !high.get().is_finite() {
                    tracing::warn!(fix = %wp.fix, "dropping non-finite altitude restriction at construction");
                    wp.altitude = None;
                }
            }
        }

        Self {
            flight_state,
            perf,
            final_altitude: FinalAltitude(final_altitude),
            waypoints,
            altitude: NavAltitude::default(),
            speed: NavSpeed::default(),
            heading: NavHeading::Lnav,
            approach: NavApproach::default(),
            fix_assignments: std::collections::HashMap::new(),
            deferred: None,
            airwork: None,
            rand: Rand::from_seed(seed),
            config: NavConfig::default(),
            departure_airport: None,
            arrival_airport: None,
        }
    }

    /// The waypoint list as it would be reported to a controller display: the deferred list if
    /// one is pending (invariant 4), else the live list.
    #[must_use]
    pub fn assigned_waypoints(&self) -> &[Waypoint] {
        match &self.deferred {
            Some(d) if d.waypoints.is_some() => d.waypoints.as_deref().unwrap(),
            _ => &self.waypoints,
        }
    }

    /// The heading assignment as it would be reported to a controller display (invariant 4).
    #[must_use]
    pub fn assigned_heading(&self) -> Option<Angle<f32>> {
        match &self.deferred {
            Some(d) if d.heading.is_some() => d.heading.map(|(h, _)| h.radians()),
            _ => match &self.heading {
                NavHeading::Assigned { heading, .. } => Some(heading.radians()),
                _ => None,
            },
        }
    }

    /// Validates the structural invariants documented on the data model. Debug-only: these
    /// invariants are enforced by construction (tagged `NavHeading`/`NavApproach` variants), so
    /// a violation here indicates a bug in a command handler, not bad external input.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_assert_invariants(&self) {
        debug_assert!(
            !self.approach.cleared || self.approach.assigned.is_some(),
            "NavApproach.Cleared requires Assigned to be set"
        );
        debug_assert!(
            self.flight_state.heading.degrees() >= 0. && self.flight_state.heading.degrees() < 360.,
            "heading must be normalized to [0, 360)"
        );
        debug_assert!(self.deferred.iter().count() <= 1, "at most one deferred reaction may exist");
    }
}
