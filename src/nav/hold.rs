//! C8: the holding-pattern engine, a racetrack flown indefinitely around a fix until cancelled.
//!
//! Grounded on the same `level::route::heading.rs` node shape as [`super::procedure_turn`]; a
//! hold differs from a procedure turn only in that it loops rather than terminating, and in
//! carrying its own cancel flag instead of handing control back to LNAV after one circuit.

use std::time::Duration;

use bevy_math::Vec2;

use crate::navdb::HoldLeg;
use crate::units::{Angle, Heading, Position, TurnDirection};
use crate::waypoint::{ProcedureTurnKind, ProcedureTurnSpec};
use crate::weather::Sample;

use super::command::TurnMethod;
use super::procedure_turn::RacetrackEntry;
use super::Nav;

const HEADING_ESTABLISHED_TOLERANCE_DEG: f32 = 5.;
/// Base outbound leg duration for a parallel entry, before wind adjustment.
const PARALLEL_ENTRY_OUTBOUND_SECS: u64 = 70;
/// Offset from the inbound course flown while cutting back across to rejoin it after a parallel
/// entry, rather than turning directly onto the inbound course.
const PARALLEL_INTERCEPT_OFFSET_DEG: f32 = 40.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldState {
    ApproachingFix,
    TurningForParallelEntry,
    FlyingParallelOutbound(Duration),
    TurningParallelInbound,
    TurningForTeardropEntry,
    FlyingTeardropOutbound(Duration),
    TurningOutbound,
    FlyingOutbound(Duration),
    TurningInbound,
    FlyingInbound,
}

/// A holding pattern flown around `fix`, looping until [`Self::cancel`] is set.
#[derive(Debug, Clone)]
pub struct Hold {
    pub fix: Position<Vec2>,
    pub inbound_course: crate::units::Angle<f32>,
    pub turn_direction: TurnDirection,
    pub leg: HoldLeg,
    pub state: HoldState,
    /// Set once the controller cancels the hold; the aircraft completes the current inbound leg
    /// and resumes LNAV the next time it crosses the fix, rather than stopping mid-turn.
    pub cancel: bool,
}

impl Hold {
    #[must_use]
    pub fn from_published(published: crate::navdb::Hold, fix: Position<Vec2>) -> Self {
        Self {
            fix,
            inbound_course: published.inbound_course,
            turn_direction: published.turn_direction,
            leg: published.leg,
            state: HoldState::ApproachingFix,
            cancel: false,
        }
    }

    fn inbound(&self) -> Heading { Heading::from_radians(self.inbound_course) }
    fn outbound(&self) -> Heading { self.inbound().opposite() }

    fn spec(&self) -> ProcedureTurnSpec {
        ProcedureTurnSpec {
            inbound_course: self.inbound_course,
            turn_direction: self.turn_direction,
            kind: ProcedureTurnKind::Racetrack,
        }
    }

    /// Wind component along the inbound course, in knots, added directly as a seconds offset to
    /// the nominal leg duration (a positive component — tailwind on the inbound course, i.e.
    /// headwind outbound — lengthens the outbound leg so the inbound leg comes out to the
    /// charted duration).
    fn wind_component_secs(&self, weather: &Sample) -> f32 {
        weather.component(self.inbound_course).into_knots()
    }

    fn wind_adjusted(&self, base: Duration, weather: &Sample) -> Duration {
        let adjusted = base.as_secs_f32() + self.wind_component_secs(weather);
        Duration::from_secs_f32(adjusted.max(1.))
    }

    fn leg_duration(&self, nav: &Nav, weather: &Sample) -> Duration {
        match self.leg {
            HoldLeg::Time(duration) => self.wind_adjusted(duration, weather),
            HoldLeg::Distance(distance) => {
                let gs = nav.flight_state.ground_speed.into_knots().max(1.);
                Duration::from_secs_f32(distance.into_nm() / gs * 3600.)
            }
        }
    }

    fn parallel_outbound_duration(&self, weather: &Sample) -> Duration {
        self.wind_adjusted(Duration::from_secs(PARALLEL_ENTRY_OUTBOUND_SECS), weather)
    }

    /// Advances the hold by one simulated second, returning the heading to steer towards, the
    /// turn method to steer with, the next state, and whether the aircraft has just completed
    /// its final inbound leg and should resume LNAV (only possible once [`Self::cancel`] has
    /// been set).
    #[must_use]
    pub fn step(&self, nav: &Nav, weather: &Sample) -> (Heading, TurnMethod, HoldState, bool) {
        match self.state {
            HoldState::ApproachingFix => {
                let reached = nav.flight_state.position.distance_cmp(self.fix)
                    < nav.config.fly_over_tolerance;
                if !reached {
                    let heading = Heading::bearing_between(nav.flight_state.position, self.fix);
                    return (heading, TurnMethod::Closest, self.state, false);
                }
                let entry = RacetrackEntry::decide(nav.flight_state.heading, &self.spec());
                match entry {
                    RacetrackEntry::DirectShort | RacetrackEntry::DirectLong => {
                        (self.outbound(), TurnMethod::Closest, HoldState::TurningOutbound, false)
                    }
                    RacetrackEntry::Teardrop => (
                        self.teardrop_outbound(),
                        TurnMethod::Closest,
                        HoldState::TurningForTeardropEntry,
                        false,
                    ),
                    RacetrackEntry::Parallel => (
                        self.outbound(),
                        turn_method(-self.turn_direction),
                        HoldState::TurningForParallelEntry,
                        false,
                    ),
                }
            }
            // Parallel entry: parallel the inbound course on the non-holding side by turning the
            // wrong way (away from `turn_direction`) onto the outbound heading first.
            HoldState::TurningForParallelEntry => {
                let target = self.outbound();
                let next = established(nav.flight_state.heading, target)
                    .then_some(HoldState::FlyingParallelOutbound(Duration::ZERO))
                    .unwrap_or(self.state);
                (target, turn_method(-self.turn_direction), next, false)
            }
            HoldState::FlyingParallelOutbound(elapsed) => {
                let elapsed = elapsed + Duration::from_secs(1);
                let next = if elapsed >= self.parallel_outbound_duration(weather) {
                    HoldState::TurningParallelInbound
                } else {
                    HoldState::FlyingParallelOutbound(elapsed)
                };
                (self.outbound(), turn_method(-self.turn_direction), next, false)
            }
            // Cut back across at a 40-degree offset from the inbound course rather than turning
            // directly onto it, so the aircraft rejoins the centerline instead of overshooting it.
            HoldState::TurningParallelInbound => {
                let target =
                    self.inbound().add_direction(self.turn_direction, Angle::from_degrees(PARALLEL_INTERCEPT_OFFSET_DEG));
                let next = established(nav.flight_state.heading, target)
                    .then_some(HoldState::FlyingInbound)
                    .unwrap_or(self.state);
                (target, turn_method(self.turn_direction), next, false)
            }
            HoldState::TurningForTeardropEntry => {
                let target = self.teardrop_outbound();
                let next = established(nav.flight_state.heading, target)
                    .then_some(HoldState::FlyingTeardropOutbound(Duration::ZERO))
                    .unwrap_or(self.state);
                (target, TurnMethod::Closest, next, false)
            }
            HoldState::FlyingTeardropOutbound(elapsed) => {
                let elapsed = elapsed + Duration::from_secs(1);
                let next = if elapsed >= self.leg_duration(nav, weather) / 2 {
                    HoldState::TurningInbound
                } else {
                    HoldState::FlyingTeardropOutbound(elapsed)
                };
                (self.teardrop_outbound(), TurnMethod::Closest, next, false)
            }
            HoldState::TurningOutbound => {
                let target = self.outbound();
                let next = established(nav.flight_state.heading, target)
                    .then_some(HoldState::FlyingOutbound(Duration::ZERO))
                    .unwrap_or(self.state);
                (target, TurnMethod::Closest, next, false)
            }
            HoldState::FlyingOutbound(elapsed) => {
                let elapsed = elapsed + Duration::from_secs(1);
                let next = if elapsed >= self.leg_duration(nav, weather) {
                    HoldState::TurningInbound
                } else {
                    HoldState::FlyingOutbound(elapsed)
                };
                (self.outbound(), TurnMethod::Closest, next, false)
            }
            HoldState::TurningInbound => {
                let target = self.inbound();
                let next = established(nav.flight_state.heading, target)
                    .then_some(HoldState::FlyingInbound)
                    .unwrap_or(self.state);
                (target, TurnMethod::Closest, next, false)
            }
            HoldState::FlyingInbound => {
                let target = Heading::bearing_between(nav.flight_state.position, self.fix);
                let reached = nav.flight_state.position.distance_cmp(self.fix)
                    < nav.config.fly_over_tolerance;
                if reached {
                    if self.cancel {
                        (self.inbound(), TurnMethod::Closest, HoldState::FlyingInbound, true)
                    } else {
                        (self.outbound(), TurnMethod::Closest, HoldState::TurningOutbound, false)
                    }
                } else {
                    (target, TurnMethod::Closest, HoldState::FlyingInbound, false)
                }
            }
        }
    }

    fn teardrop_outbound(&self) -> Heading {
        self.outbound().add_direction(-self.turn_direction, crate::units::Angle::from_degrees(30.))
    }
}

fn turn_method(dir: TurnDirection) -> TurnMethod {
    match dir {
        TurnDirection::Clockwise => TurnMethod::Right,
        TurnDirection::CounterClockwise => TurnMethod::Left,
    }
}

fn established(current: Heading, target: Heading) -> bool {
    current.closest_distance(target).into_degrees().abs() <= HEADING_ESTABLISHED_TOLERANCE_DEG
}
