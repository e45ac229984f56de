//! Route waypoints and the per-fix annotations the planners react to.
//!
//! Grounded on the teacher's `level::waypoint::Waypoint` component and the fix-restriction
//! fields threaded through `level::route::navigation::DirectWaypointNode`, flattened from an ECS
//! component plus referenced route nodes into a single owned value since `Waypoints` here is a
//! plain `Vec`, not a graph of entities.

use bevy_math::Vec2;

use crate::units::{Angle, Distance, Heading, Position, Speed};

/// Whether a waypoint may be cut inside ("fly-by") or must be physically overflown ("fly-over")
/// before the aircraft turns onto the next leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    FlyBy,
    FlyOver,
}

/// A charted or controller-issued altitude restriction at a waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AltitudeRestriction {
    At(Position<f32>),
    AtOrAbove(Position<f32>),
    AtOrBelow(Position<f32>),
    Between(Position<f32>, Position<f32>),
}

impl AltitudeRestriction {
    /// Returns `(low, high)` bounds, using `ceiling`/[`crate::math::SEA_ALTITUDE`] for the open
    /// side of one-sided restrictions.
    #[must_use]
    pub fn bounds(self, ceiling: Position<f32>) -> (Position<f32>, Position<f32>) {
        match self {
            Self::At(alt) => (alt, alt),
            Self::AtOrAbove(alt) => (alt, ceiling),
            Self::AtOrBelow(alt) => (crate::math::SEA_ALTITUDE, alt),
            Self::Between(low, high) => (low, high),
        }
    }
}

/// One element of the ordered route the aircraft is flying (or, while splicing an approach,
/// being spliced onto).
#[derive(Debug, Clone)]
pub struct Waypoint {
    pub fix: String,
    pub position: Position<Vec2>,
    pub proximity: Proximity,
    pub altitude: Option<AltitudeRestriction>,
    pub speed: Option<Speed<f32>>,
    /// Charted outbound heading to fly after passing this fix, absent `DepartFixHeading`.
    pub outbound_heading: Option<Heading>,
    pub no_pt: bool,
    pub on_sid: bool,
    pub on_star: bool,
    pub on_approach: bool,
    pub faf: bool,
    pub land: bool,
    pub clear_approach: bool,
    pub arc: Option<DmeArc>,
    pub procedure_turn: Option<ProcedureTurnSpec>,
    pub airwork_minutes: Option<f32>,
    pub present_heading: bool,
    pub handoff: bool,
}

impl Waypoint {
    #[must_use]
    pub fn simple(fix: impl Into<String>, position: Position<Vec2>) -> Self {
        Self {
            fix: fix.into(),
            position,
            proximity: Proximity::FlyBy,
            altitude: None,
            speed: None,
            outbound_heading: None,
            no_pt: false,
            on_sid: false,
            on_star: false,
            on_approach: false,
            faf: false,
            land: false,
            clear_approach: false,
            arc: None,
            procedure_turn: None,
            airwork_minutes: None,
            present_heading: false,
            handoff: false,
        }
    }

    #[must_use]
    pub fn bearing_to(&self, other: &Waypoint) -> Heading {
        Heading::bearing_between(self.position, other.position)
    }
}

/// A DME arc segment: fly a constant radius around `center` in `rotation` direction.
#[derive(Debug, Clone, Copy)]
pub struct DmeArc {
    pub center: Position<Vec2>,
    pub radius: Distance<f32>,
    pub rotation: crate::units::TurnDirection,
}

/// Geometry parameters for a procedure turn anchored at this waypoint.
#[derive(Debug, Clone, Copy)]
pub struct ProcedureTurnSpec {
    pub inbound_course: Angle<f32>,
    pub turn_direction: crate::units::TurnDirection,
    pub kind: ProcedureTurnKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureTurnKind {
    Racetrack,
    Standard45,
}
