//! C5: the lateral planner and heading/bank integration.
//!
//! Grounded on `level::nav.rs`'s `ground_heading_control_system`/`TargetGroundDirection` for the
//! bank-towards-target integration, and on `level::route::{navigation,heading}.rs` for the
//! waypoint-advance / localizer-alignment shape — reworked from route "nodes" resynced against
//! an ECS `Route` queue into a single [`NavHeading`] tagged enum, matching the data-model design
//! note that mutually-exclusive modes should be structural rather than a struct of optionals.

use std::time::Duration;

use bevy_math::Vec2;

use super::command::TurnMethod;
use super::procedure_turn::{Racetrack45State, RacetrackEntry, RacetrackPt, RacetrackState, Standard45Pt};
use super::{hold::Hold, Nav};
use crate::flight_state::FlightState;
use crate::math::STANDARD_RATE_TURN_DEG_PER_SEC;
use crate::navdb::{ApproachKind, NavDb};
use crate::perf::AircraftPerformance;
use crate::units::{Angle, AngularSpeed, Distance, Heading, Position, TurnDirection};
use crate::waypoint::{DmeArc, ProcedureTurnKind, Waypoint};
use crate::weather::Sample;

/// The aircraft's current lateral sub-mode. At most one of these is active at a time; LNAV
/// (follow [`Nav::waypoints`]) is simply the absence of any other mode (invariant 1).
#[derive(Debug, Clone)]
pub enum NavHeading {
    Lnav,
    Assigned { heading: Heading, turn: TurnMethod },
    Arc { arc: DmeArc, joined: bool },
    RacetrackPt(RacetrackPt),
    Standard45Pt(Standard45Pt),
    Hold(Hold),
}

/// The result of one lateral-planning pass: the heading to steer towards, how aggressively to
/// turn onto it, and the turn-rate cap for this tick.
#[derive(Debug, Clone, Copy)]
pub struct HeadingTarget {
    pub heading: Heading,
    pub turn: TurnMethod,
    pub max_turn_rate: AngularSpeed<f32>,
}

impl Nav {
    /// Applies a pending deferred reaction once its pilot-reaction delay has elapsed. Called once
    /// per tick by the tick driver, ahead of [`Self::target_heading`], so invariant 4 only governs
    /// the window while the reaction is still pending.
    pub fn flush_deferred(&mut self, dt: std::time::Duration) {
        let due = match &mut self.deferred {
            Some(deferred) => deferred.tick(dt),
            None => return,
        };
        if !due {
            return;
        }
        let deferred = self.deferred.take().expect("checked Some above");
        if let Some((heading, turn)) = deferred.heading {
            self.heading = NavHeading::Assigned { heading, turn };
        }
        if let Some(waypoints) = deferred.waypoints {
            self.waypoints = waypoints;
            self.heading = NavHeading::Lnav;
        }
        if let Some(hold) = deferred.hold {
            self.heading = NavHeading::Hold(hold);
        }
    }

    /// C5 entry point: decide the target heading for this tick, honoring the precedence order
    /// (airwork > approach intercept > PT > hold > assigned heading > DME arc > LNAV). Any due
    /// deferred reaction must already have been flushed via [`Self::flush_deferred`] before this
    /// runs.
    pub fn target_heading(&mut self, weather: &Sample) -> HeadingTarget {
        if let Some(airwork) = &self.airwork {
            return HeadingTarget {
                heading: airwork.target_heading,
                turn: TurnMethod::Closest,
                max_turn_rate: self.standard_rate_cap(),
            };
        }

        if self.approach.intercept_state != super::approach::InterceptState::NotIntercepting {
            return self.approach_heading_target(weather);
        }

        match &self.heading {
            NavHeading::RacetrackPt(pt) => self.racetrack_heading_target(&pt.clone(), weather),
            NavHeading::Standard45Pt(pt) => self.standard45_heading_target(&pt.clone(), weather),
            NavHeading::Hold(hold) => self.hold_heading_target(&hold.clone(), weather),
            NavHeading::Assigned { heading, turn } => HeadingTarget {
                heading: *heading,
                turn: *turn,
                max_turn_rate: self.standard_rate_cap(),
            },
            NavHeading::Arc { arc, joined } => self.arc_heading_target(*arc, *joined, weather),
            NavHeading::Lnav => self.lnav_heading_target(weather),
        }
    }

    pub(super) fn standard_rate_cap(&self) -> AngularSpeed<f32> {
        AngularSpeed::from_degrees_per_sec(STANDARD_RATE_TURN_DEG_PER_SEC)
    }

    fn arc_heading_target(&self, arc: DmeArc, joined: bool, weather: &Sample) -> HeadingTarget {
        let to_center = arc.center - self.flight_state.position;
        let current_radius = to_center.magnitude_exact();
        let bearing_to_center = to_center.heading();

        let heading = if !joined {
            // Fly towards the arc's initial join radial until within tolerance.
            bearing_to_center.opposite()
        } else {
            // Chase a point slightly further around the arc in the rotation direction, biasing
            // for the radius error so the aircraft converges back onto the arc.
            let lead = Angle::from_degrees(10.) * arc.rotation;
            let radius_error = (current_radius - arc.radius).into_nm();
            let correction = Angle::from_degrees((radius_error * 40.).clamp(-20., 20.));
            bearing_to_center.opposite() + lead + correction * -arc.rotation
        };

        let _ = weather;
        HeadingTarget { heading, turn: TurnMethod::Closest, max_turn_rate: self.standard_rate_cap() }
    }

    fn lnav_heading_target(&self, weather: &Sample) -> HeadingTarget {
        let heading = self
            .waypoints
            .first()
            .map_or(self.flight_state.heading, |wp| {
                Heading::bearing_between(self.flight_state.position, wp.position)
            });
        HeadingTarget {
            heading: self.wind_corrected(heading, weather),
            turn: TurnMethod::Closest,
            max_turn_rate: self.standard_rate_cap(),
        }
    }

    /// Corrects a desired ground track for crosswind drift, returning the heading to fly so the
    /// resulting ground track matches `desired_track` (the "crab angle", see glossary).
    #[must_use]
    pub fn wind_corrected(&self, desired_track: Heading, weather: &Sample) -> Heading {
        let tas = self.flight_state.true_airspeed();
        if tas.is_zero() {
            return desired_track;
        }
        let crab = self.crab_angle(desired_track, weather);
        desired_track + crab
    }

    /// Computes the crab angle required to hold `desired_track` over the ground given `weather`.
    #[must_use]
    pub fn crab_angle(&self, desired_track: Heading, weather: &Sample) -> Angle<f32> {
        let tas = self.flight_state.true_airspeed().into_knots();
        if tas <= 0. {
            return Angle(0.);
        }
        let wind = weather.wind.into_knots();
        let track_dir = Vec2::new(desired_track.radians().sin(), desired_track.radians().cos());
        let crosswind = wind.x * track_dir.y - wind.y * track_dir.x;
        Angle((crosswind / tas).clamp(-1., 1.).asin())
    }

    /// Integrates bank angle towards the bank that would complete the required heading change
    /// exactly as the aircraft rolls level, then derives the turn rate and integrates heading.
    ///
    /// Mirrors `level::nav.rs`'s `ground_heading_control_system`, generalized from a
    /// once-per-`App::Update` Bevy system into a plain per-second step function.
    pub fn integrate_heading(&mut self, target: HeadingTarget, dt_secs: f32) {
        integrate_heading_state(&mut self.flight_state, &self.perf, target, dt_secs);
    }

    /// C5 waypoint-advance: decide whether the current waypoint has been passed, and if so,
    /// apply its fix-crossing side effects and drop it.
    ///
    /// Grounded on `level::route::navigation::DirectWaypointNode`'s `WaypointProximity::FlyOver`
    /// (distance-based) / `FlyBy` (heading-based) completion conditions, generalized to also
    /// cover the simulated "ghost aircraft" crossing check described in the design notes for
    /// fly-by waypoints with a charted outbound course.
    pub fn update_waypoints(&mut self, navdb: &dyn NavDb, weather: &Sample) -> Option<Waypoint> {
        if !matches!(self.heading, NavHeading::Lnav) {
            return None;
        }
        let Some(current) = self.waypoints.first().cloned() else { return None };

        let passed = match current.proximity {
            crate::waypoint::Proximity::FlyOver => {
                self.eta_seconds(self.flight_state.position.distance_exact(current.position)) < 2.
            }
            crate::waypoint::Proximity::FlyBy => {
                let outbound = self.outbound_heading_after(&current);
                self.should_turn_for_outbound(current.position, outbound, weather)
            }
        };

        if !passed {
            return None;
        }

        self.waypoints.remove(0);
        self.apply_fix_crossing(&current, navdb);
        Some(current)
    }

    fn outbound_heading_after(&self, wp: &Waypoint) -> Heading {
        if let Some(fix) = &self.approach.at_fix_cleared_route {
            if fix == &wp.fix {
                // The waypoint list is about to be spliced onto the approach branch, so the
                // outbound track is whatever heads towards the new first waypoint.
                if let Some(next) = self.waypoints.get(1) {
                    return wp.bearing_to(next);
                }
            }
        }
        if let Some(assignment) = self.fix_assignments.get(&wp.fix) {
            if let Some(h) = assignment.depart_heading {
                return h;
            }
        }
        if let Some(h) = wp.outbound_heading {
            return h;
        }
        self.waypoints.get(1).map_or(self.flight_state.heading, |next| wp.bearing_to(next))
    }

    /// Determines whether the aircraft should begin the turn to intercept `outbound` at `fix`,
    /// by simulating a short "ghost" continuation under the candidate heading and checking
    /// whether it would cross the outbound line within heading tolerance (including the crab
    /// angle induced by crosswind). See the design-note on ghost-aircraft simulation.
    #[must_use]
    pub fn should_turn_for_outbound(
        &self,
        fix: Position<Vec2>,
        outbound: Heading,
        weather: &Sample,
    ) -> bool {
        let target = HeadingTarget {
            heading: outbound,
            turn: TurnMethod::Closest,
            max_turn_rate: self.standard_rate_cap(),
        };
        self.ghost_crosses_line(fix, outbound, target, weather)
    }

    /// Determines whether the aircraft should begin turning to intercept `radial`, an absolute
    /// course passing through `line_point`, analogous to [`Self::should_turn_for_outbound`] but
    /// for course-based intercepts (localizer, arc).
    #[must_use]
    pub fn should_turn_to_intercept(
        &self,
        line_point: Position<Vec2>,
        radial: Heading,
        turn: TurnMethod,
        weather: &Sample,
    ) -> bool {
        let target =
            HeadingTarget { heading: radial, turn, max_turn_rate: self.standard_rate_cap() };
        self.ghost_crosses_line(line_point, radial, target, weather)
    }

    /// Simulates a ghost continuation of this aircraft, flown under `target`, for up to
    /// `1 + turnAngle/3` one-second ticks, and checks whether it crosses the line through
    /// `anchor` along `line_heading` while within heading tolerance (10° plus the crab angle this
    /// crosswind induces on that line). The ghost copies only [`FlightState`] (which is `Clone`)
    /// and reuses this `Nav`'s performance envelope and the already-sampled weather, rather than
    /// cloning the whole `Nav` — see the design note on ghost-aircraft simulation.
    fn ghost_crosses_line(
        &self,
        anchor: Position<Vec2>,
        line_heading: Heading,
        target: HeadingTarget,
        weather: &Sample,
    ) -> bool {
        let turn_angle =
            self.flight_state.heading.closest_distance(target.heading).into_degrees().abs();
        let max_ticks = (1. + turn_angle / 3.).ceil().max(1.) as u32;
        let tolerance = Angle::from_degrees(self.config.intercept_heading_tolerance_deg)
            + self.crab_angle(line_heading, weather).abs();

        let line_dir = line_heading.into_dir2();
        let side = |pos: Position<Vec2>| {
            let rel = (pos - anchor).0;
            rel.x * line_dir.y - rel.y * line_dir.x
        };

        let mut ghost = self.flight_state.clone();
        let start_side = side(ghost.position);

        for _ in 0..max_ticks {
            integrate_heading_state(&mut ghost, &self.perf, target, 1.);
            let tas_vector = ghost.true_airspeed() * ghost.heading.into_dir2();
            let ground_velocity = tas_vector + weather.wind;
            ghost.position += ground_velocity * Duration::from_secs(1);

            let crossed = side(ghost.position).signum() != start_side.signum();
            if crossed {
                let aligned =
                    ghost.heading.closest_distance(line_heading).into_degrees().abs() <= tolerance.into_degrees();
                if aligned {
                    return true;
                }
            }
        }
        false
    }

    fn eta_seconds(&self, distance: Distance<f32>) -> f32 {
        let gs = self.flight_state.ground_speed.into_knots().max(1.);
        distance.into_nm() / gs * 3600.
    }

    /// Outbound-leg duration for a procedure turn just entered at a charted PT fix. RNAV
    /// approaches publish the leg as a DME distance rather than a time, since they don't rely on
    /// station-passage timing; everything else (including every standard 45°/180°) is timed.
    fn pt_leg_duration(&self, kind: ProcedureTurnKind) -> std::time::Duration {
        if matches!(kind, ProcedureTurnKind::Standard45) {
            return self.config.pt45_outbound_leg_time;
        }
        let is_rnav =
            self.approach.assigned.as_ref().is_some_and(|a| matches!(a.kind, ApproachKind::Rnav));
        if is_rnav {
            let gs = self.flight_state.ground_speed.into_knots().max(1.);
            std::time::Duration::from_secs_f32(
                self.config.pt_outbound_leg_distance.into_nm() / gs * 3600.,
            )
        } else {
            self.config.pt_outbound_leg_time
        }
    }

    fn apply_fix_crossing(&mut self, wp: &Waypoint, navdb: &dyn NavDb) {
        if let Some(restriction) = wp.altitude {
            self.altitude.restriction = Some(restriction);
        }
        if let Some(speed) = wp.speed {
            self.speed.restriction = Some(speed);
        }
        if wp.clear_approach {
            self.approach.cleared = true;
        }
        if wp.faf {
            self.approach.passed_faf = true;
            self.altitude.restriction = None;
        }

        if self.approach.at_fix_cleared_route.as_deref() == Some(wp.fix.as_str()) {
            self.approach.at_fix_cleared_route = None;
            self.cleared_approach();
        }
        if self.approach.at_fix_intercept.as_deref() == Some(wp.fix.as_str()) {
            self.approach.at_fix_intercept = None;
            self.intercept_approach();
        }

        if wp.land {
            // Terminal waypoint; nothing further to splice.
            return;
        }

        if let Some(assignment) = self.fix_assignments.remove(&wp.fix) {
            if let Some(fix) = assignment.depart_direct {
                if let Some(pos) = navdb.lookup_waypoint(&fix) {
                    self.waypoints.insert(0, Waypoint::simple(fix, pos));
                }
            } else if let Some(heading) = assignment.depart_heading {
                self.heading = NavHeading::Assigned { heading, turn: TurnMethod::Closest };
            }
            if let Some(hold) = assignment.enter_hold {
                self.heading = NavHeading::Hold(hold);
            }
        }

        if let Some(arc) = wp.arc {
            self.heading = NavHeading::Arc { arc, joined: false };
        }

        if let Some(spec) = wp.procedure_turn {
            if !wp.no_pt && !self.approach.cleared {
                let entry = RacetrackEntry::decide(self.flight_state.heading, &spec);
                let leg_duration = self.pt_leg_duration(spec.kind);
                let exit_altitude = wp.altitude.map(|r| r.bounds(self.final_altitude.0).0);
                self.heading = match spec.kind {
                    ProcedureTurnKind::Racetrack => NavHeading::RacetrackPt(RacetrackPt::new(
                        spec,
                        entry,
                        leg_duration,
                        exit_altitude,
                    )),
                    ProcedureTurnKind::Standard45 => {
                        NavHeading::Standard45Pt(Standard45Pt::new(spec, leg_duration))
                    }
                };
            }
        }

        if let Some(minutes) = wp.airwork_minutes {
            self.airwork = Some(super::Airwork {
                center: wp.position,
                radius: Distance::from_nm(5.),
                altitude_low: self.flight_state.altitude - Distance::from_feet(1000.),
                altitude_high: self.flight_state.altitude + Distance::from_feet(1000.),
                remaining: std::time::Duration::from_secs_f32(minutes * 60.),
                target_heading: self.flight_state.heading,
            });
        }
    }

    fn racetrack_heading_target(&mut self, pt: &RacetrackPt, weather: &Sample) -> HeadingTarget {
        let (heading, next_state) = pt.step(self);
        if let NavHeading::RacetrackPt(stored) = &mut self.heading {
            stored.state = next_state;
        }
        if matches!(next_state, RacetrackState::Done) {
            self.heading = NavHeading::Lnav;
        }
        HeadingTarget {
            heading: self.wind_corrected(heading, weather),
            turn: TurnMethod::Closest,
            max_turn_rate: self.standard_rate_cap(),
        }
    }

    fn standard45_heading_target(&mut self, pt: &Standard45Pt, weather: &Sample) -> HeadingTarget {
        let (heading, next_state) = pt.step(self);
        if let NavHeading::Standard45Pt(stored) = &mut self.heading {
            stored.state = next_state;
        }
        if matches!(next_state, Racetrack45State::Done) {
            self.heading = NavHeading::Lnav;
        }
        HeadingTarget {
            heading: self.wind_corrected(heading, weather),
            turn: TurnMethod::Closest,
            max_turn_rate: self.standard_rate_cap(),
        }
    }

    fn hold_heading_target(&mut self, hold: &Hold, weather: &Sample) -> HeadingTarget {
        let (heading, turn, next_state, exit) = hold.step(self, weather);
        if let NavHeading::Hold(stored) = &mut self.heading {
            stored.state = next_state;
        }
        if exit {
            self.heading = NavHeading::Lnav;
        }
        HeadingTarget {
            heading: self.wind_corrected(heading, weather),
            turn,
            max_turn_rate: self.standard_rate_cap(),
        }
    }
}

/// The bank/turn-rate integration core shared by [`Nav::integrate_heading`] and the ghost-aircraft
/// simulation in [`Nav::ghost_crosses_line`], which needs to run the same physics against a cloned
/// [`FlightState`] rather than the live one.
fn integrate_heading_state(
    state: &mut FlightState,
    perf: &AircraftPerformance,
    target: HeadingTarget,
    dt_secs: f32,
) {
    // `GRAVITY` is expressed in nm/s^2 (see math::consts), so true airspeed must stay in the
    // Speed newtype's native nm/s rather than being converted to knots here.
    let tas = state.true_airspeed().0.max(0.00001);
    let max_bank = perf.max_bank_angle;
    let max_bank_rate = perf.max_bank_rate;

    let delta = state.heading.distance(
        target.heading,
        match target.turn {
            TurnMethod::Left => TurnDirection::CounterClockwise,
            TurnMethod::Right => TurnDirection::Clockwise,
            TurnMethod::Closest => state.heading.closer_direction_to(target.heading),
        },
    );

    // The heading the aircraft would still sweep through while rolling to wings-level at
    // max_bank_rate from the current bank ("level-out delta").
    let rollout_time = (state.bank.abs().into_degrees() / max_bank_rate.into_degrees_per_sec().max(0.1)).max(0.);
    let bank_turn_rate = AngularSpeed(crate::math::GRAVITY * state.bank.tan() / tas);
    let level_out_delta = bank_turn_rate.into_degrees_per_sec().abs() * rollout_time / 2.;

    let delta_deg = delta.into_degrees().abs();
    let desired_bank = if delta_deg <= level_out_delta.abs() || delta_deg < 0.5 { Angle(0.) } else { max_bank };
    let desired_bank_signed = if delta.is_negative() { -desired_bank } else { desired_bank };

    let max_step = max_bank_rate.into_degrees_per_sec() * dt_secs;
    let bank_delta = (desired_bank_signed - state.bank).into_degrees();
    let bank_delta = bank_delta.clamp(-max_step, max_step);
    state.bank += Angle::from_degrees(bank_delta);

    let mut turn_rate = AngularSpeed(crate::math::GRAVITY * state.bank.tan() / tas);
    let cap = target.max_turn_rate.into_degrees_per_sec();
    let turn_rate_deg = turn_rate.into_degrees_per_sec().clamp(-cap, cap);
    turn_rate = AngularSpeed::from_degrees_per_sec(turn_rate_deg);

    let step = Angle::from_degrees(turn_rate.into_degrees_per_sec() * dt_secs);
    if delta.abs() < step.abs() {
        state.heading = target.heading;
    } else {
        state.heading = state.heading.add_direction(
            if delta.is_negative() { TurnDirection::CounterClockwise } else { TurnDirection::Clockwise },
            step.abs(),
        );
    }
}
