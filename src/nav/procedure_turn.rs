//! C7: procedure-turn engines flown outbound from a charted PT fix on a non-precision approach
//! that was not cleared straight-in.
//!
//! Grounded on `level::route::heading.rs`'s `AlignLocalizer`/`AlignGlidePath` node shape — the
//! `todo!()` stubs left there for the procedure-turn case are exactly the logic implemented here,
//! reworked from route nodes into explicit state machines owned inline by
//! [`super::heading::NavHeading`] rather than resynced against a `Route` queue.

use std::time::Duration;

use crate::units::{Angle, Heading, TurnDirection};
use crate::waypoint::ProcedureTurnSpec;

use super::Nav;

const HEADING_ESTABLISHED_TOLERANCE_DEG: f32 = 5.;

/// How the aircraft enters a racetrack procedure turn, chosen from the angle between the inbound
/// course and the aircraft's heading at the PT fix (the classic "70/110" entry rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacetrackEntry {
    DirectShort,
    DirectLong,
    Parallel,
    Teardrop,
}

impl RacetrackEntry {
    /// Picks an entry from the angle between the current heading and the reversed (outbound)
    /// course, on the side of [`ProcedureTurnSpec::turn_direction`].
    #[must_use]
    pub fn decide(current_heading: Heading, spec: &ProcedureTurnSpec) -> Self {
        let inbound = Heading::from_radians(spec.inbound_course);
        let outbound = inbound.opposite();
        let offset = current_heading.distance(outbound, spec.turn_direction).into_degrees();

        if (0. ..=70.).contains(&offset) {
            Self::DirectShort
        } else if (70. ..=110.).contains(&offset) {
            Self::Teardrop
        } else if (110. ..=180.).contains(&offset) {
            Self::Parallel
        } else {
            Self::DirectLong
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacetrackState {
    TurningOutbound,
    FlyingOutbound(Duration),
    TurningInbound,
    FlyingParallelInbound(Duration),
    TurningToIntercept,
    Done,
}

/// A racetrack (direct/parallel/teardrop) procedure-turn in progress. `step` assumes it is
/// called once per simulated second, matching the tick driver's fixed integration step.
#[derive(Debug, Clone)]
pub struct RacetrackPt {
    pub state: RacetrackState,
    pub spec: ProcedureTurnSpec,
    pub entry: RacetrackEntry,
    pub leg_duration: Duration,
    /// Charted descent target for the turn, from the PT fix's altitude restriction. Applies to
    /// every sub-state (there is no `Approaching` state here: a `RacetrackPt` only exists once
    /// the fix has already been crossed).
    pub exit_altitude: Option<crate::units::Position<f32>>,
}

impl RacetrackPt {
    #[must_use]
    pub fn new(
        spec: ProcedureTurnSpec,
        entry: RacetrackEntry,
        leg_duration: Duration,
        exit_altitude: Option<crate::units::Position<f32>>,
    ) -> Self {
        Self { state: RacetrackState::TurningOutbound, spec, entry, leg_duration, exit_altitude }
    }

    fn inbound(&self) -> Heading { Heading::from_radians(self.spec.inbound_course) }

    /// Heading flown on the outbound leg, offset from the reciprocal course according to entry.
    fn outbound_heading(&self) -> Heading {
        let reciprocal = self.inbound().opposite();
        match self.entry {
            RacetrackEntry::DirectShort | RacetrackEntry::DirectLong => reciprocal,
            RacetrackEntry::Teardrop => {
                reciprocal.add_direction(-self.spec.turn_direction, Angle::from_degrees(30.))
            }
            RacetrackEntry::Parallel => reciprocal,
        }
    }

    #[must_use]
    pub fn step(&self, nav: &Nav) -> (Heading, RacetrackState) {
        let heading = nav.flight_state.heading;
        match self.state {
            RacetrackState::TurningOutbound => {
                let target = self.outbound_heading();
                let next = if established(heading, target) {
                    RacetrackState::FlyingOutbound(Duration::ZERO)
                } else {
                    RacetrackState::TurningOutbound
                };
                (target, next)
            }
            RacetrackState::FlyingOutbound(elapsed) => {
                let target = self.outbound_heading();
                let elapsed = elapsed + Duration::from_secs(1);
                let next = if elapsed >= self.leg_duration {
                    RacetrackState::TurningInbound
                } else {
                    RacetrackState::FlyingOutbound(elapsed)
                };
                (target, next)
            }
            RacetrackState::TurningInbound => match self.entry {
                RacetrackEntry::Parallel => {
                    let target = self.inbound().opposite();
                    let next = if established(heading, target) {
                        RacetrackState::FlyingParallelInbound(Duration::ZERO)
                    } else {
                        RacetrackState::TurningInbound
                    };
                    (target, next)
                }
                _ => {
                    let target = self.inbound();
                    let next = if established(heading, target) {
                        RacetrackState::Done
                    } else {
                        RacetrackState::TurningInbound
                    };
                    (target, next)
                }
            },
            RacetrackState::FlyingParallelInbound(elapsed) => {
                let target = self.inbound().opposite();
                let elapsed = elapsed + Duration::from_secs(1);
                let next = if elapsed >= self.leg_duration {
                    RacetrackState::TurningToIntercept
                } else {
                    RacetrackState::FlyingParallelInbound(elapsed)
                };
                (target, next)
            }
            RacetrackState::TurningToIntercept => {
                let target = self.inbound();
                let next =
                    if established(heading, target) { RacetrackState::Done } else { RacetrackState::TurningToIntercept };
                (target, next)
            }
            RacetrackState::Done => (self.inbound(), RacetrackState::Done),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Racetrack45State {
    TurningOutbound,
    FlyingOutbound(Duration),
    TurningAway,
    FlyingAway(Duration),
    TurningToIntercept,
    Done,
}

/// A standard 45°/180° procedure turn in progress. `step` assumes one call per simulated second.
#[derive(Debug, Clone)]
pub struct Standard45Pt {
    pub state: Racetrack45State,
    pub spec: ProcedureTurnSpec,
    pub leg_duration: Duration,
}

impl Standard45Pt {
    #[must_use]
    pub fn new(spec: ProcedureTurnSpec, leg_duration: Duration) -> Self {
        Self { state: Racetrack45State::TurningOutbound, spec, leg_duration }
    }

    fn inbound(&self) -> Heading { Heading::from_radians(self.spec.inbound_course) }

    fn outbound_45(&self) -> Heading {
        self.inbound().opposite().add_direction(self.spec.turn_direction, Angle::from_degrees(45.))
    }

    #[must_use]
    pub fn step(&self, nav: &Nav) -> (Heading, Racetrack45State) {
        let heading = nav.flight_state.heading;
        match self.state {
            Racetrack45State::TurningOutbound => {
                let target = self.outbound_45();
                let next = if established(heading, target) {
                    Racetrack45State::FlyingOutbound(Duration::ZERO)
                } else {
                    Racetrack45State::TurningOutbound
                };
                (target, next)
            }
            Racetrack45State::FlyingOutbound(elapsed) => {
                let target = self.outbound_45();
                let elapsed = elapsed + Duration::from_secs(1);
                // Resolved open question: the outbound leg ends strictly on a timer, not on a
                // distance check, since the aircraft flies away from the fix with no DME source
                // guaranteed on a standard (non-RNAV) procedure.
                let next = if elapsed >= self.leg_duration {
                    Racetrack45State::TurningAway
                } else {
                    Racetrack45State::FlyingOutbound(elapsed)
                };
                (target, next)
            }
            Racetrack45State::TurningAway => {
                let target = self.outbound_45().opposite();
                // Resolved open question: the turn-away completes once the heading matches the
                // reciprocal course within tolerance, not on a fixed timer, since the turn itself
                // is flown at standard rate and its duration depends on the entry angle.
                let next = if established(heading, target) {
                    Racetrack45State::FlyingAway(Duration::ZERO)
                } else {
                    Racetrack45State::TurningAway
                };
                (target, next)
            }
            Racetrack45State::FlyingAway(elapsed) => {
                let target = self.outbound_45().opposite();
                let elapsed = elapsed + Duration::from_secs(1);
                let next = if elapsed >= self.leg_duration / 2 {
                    Racetrack45State::TurningToIntercept
                } else {
                    Racetrack45State::FlyingAway(elapsed)
                };
                (target, next)
            }
            Racetrack45State::TurningToIntercept => {
                let target = self.inbound();
                let next = if established(heading, target) {
                    Racetrack45State::Done
                } else {
                    Racetrack45State::TurningToIntercept
                };
                (target, next)
            }
            Racetrack45State::Done => (self.inbound(), Racetrack45State::Done),
        }
    }
}

fn established(current: Heading, target: Heading) -> bool {
    current.closest_distance(target).into_degrees().abs() <= HEADING_ESTABLISHED_TOLERANCE_DEG
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Angle;
    use crate::waypoint::ProcedureTurnKind;

    fn spec() -> ProcedureTurnSpec {
        ProcedureTurnSpec {
            inbound_course: Angle::from_degrees(360.),
            turn_direction: TurnDirection::Clockwise,
            kind: ProcedureTurnKind::Racetrack,
        }
    }

    #[test]
    fn direct_entry_chosen_when_aligned_with_outbound() {
        let entry = RacetrackEntry::decide(Heading::from_degrees(180.), &spec());
        assert_eq!(entry, RacetrackEntry::DirectShort);
    }

    #[test]
    fn teardrop_entry_chosen_at_right_angle() {
        let entry = RacetrackEntry::decide(Heading::from_degrees(270.), &spec());
        assert_eq!(entry, RacetrackEntry::Teardrop);
    }
}
