//! Read-only interfaces into the navigation/airport/procedure database and approach charts.
//!
//! The core never owns this data; it only borrows it for the duration of a tick. Grounded on
//! the shape of the teacher's `level::waypoint::Waypoint` and the route-splicing logic in
//! `level::route::{altitude,heading}.rs`, generalized from ECS entities into plain values since
//! this crate has no `World` to look entities up in.

use bevy_math::Vec2;

use crate::units::{Angle, Position};
use crate::waypoint::Waypoint;

/// An airport referenced by a flight plan.
#[derive(Debug, Clone)]
pub struct Airport {
    pub icao: String,
    pub position: Position<Vec2>,
    pub elevation: Position<f32>,
}

/// The kind of approach procedure, determining how intercept geometry is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ApproachKind {
    #[strum(serialize = "ILS")]
    Ils,
    #[strum(serialize = "LOC")]
    Localizer,
    #[strum(serialize = "RNAV")]
    Rnav,
    #[strum(serialize = "VOR")]
    Vor,
    #[strum(serialize = "CHARTED VISUAL")]
    ChartedVisual,
}

impl ApproachKind {
    #[must_use]
    pub fn has_glideslope(self) -> bool { matches!(self, Self::Ils) }
}

/// A single named approach procedure, including its runway-specific waypoint branches.
#[derive(Debug, Clone)]
pub struct Approach {
    pub id: String,
    pub kind: ApproachKind,
    pub runway_heading: Angle<f32>,
    pub runway_threshold: Position<Vec2>,
    /// Direction pointing outward from the runway along the extended centerline.
    pub extended_centerline: Angle<f32>,
    /// The final-approach-fix index within each branch's waypoint list, if published.
    pub faf_index: Option<usize>,
    /// Alternative routings onto the same approach (e.g. with/without a procedure turn),
    /// each a full waypoint sequence ending at the runway.
    pub branches: Vec<Vec<Waypoint>>,
}

impl Approach {
    /// Returns the branch containing a procedure turn waypoint, if any, else the first branch.
    #[must_use]
    pub fn preferred_branch(&self) -> Option<&[Waypoint]> {
        self.branches
            .iter()
            .find(|branch| branch.iter().any(|wp| wp.procedure_turn.is_some()))
            .or_else(|| self.branches.first())
            .map(Vec::as_slice)
    }

    /// Finds the first branch containing `fix`, returning the branch and the fix's index.
    #[must_use]
    pub fn branch_containing(&self, fix: &str) -> Option<(&[Waypoint], usize)> {
        self.branches.iter().find_map(|branch| {
            branch.iter().position(|wp| wp.fix == fix).map(|idx| (branch.as_slice(), idx))
        })
    }
}

/// A published holding pattern.
#[derive(Debug, Clone, Copy)]
pub struct Hold {
    pub inbound_course: Angle<f32>,
    pub turn_direction: crate::units::TurnDirection,
    /// Leg length, mutually exclusive interpretations.
    pub leg: HoldLeg,
}

#[derive(Debug, Clone, Copy)]
pub enum HoldLeg {
    Distance(crate::units::Distance<f32>),
    Time(std::time::Duration),
}

/// Read-only view of the navigation database needed by the core: fix lookup, airports, and
/// published holds. Scenario loading and the on-disk format are out of scope; implementations
/// of this trait live in the external collaborator that owns the database.
pub trait NavDb {
    fn lookup_waypoint(&self, name: &str) -> Option<Position<Vec2>>;
    fn airport(&self, icao: &str) -> Option<&Airport>;
    fn enroute_hold(&self, fix: &str) -> Option<Hold>;
    fn approach(&self, id: &str) -> Option<&Approach>;
}
