//! C2: the command surface through which a controller mutates a [`Nav`].
//!
//! Grounded on the teacher's `level::instr.rs` `Instruction`/`Kind` trait pattern, where every
//! instruction both mutates the world and produces a renderable message; here every command
//! method returns a [`CommandIntent`] instead of rendering a string directly (string rendering
//! is out of scope, see SPEC_FULL.md §6). Error classification mirrors `omniatc-store`'s use of
//! `thiserror` for its schema-validation errors.

use super::deferred::DeferredNavHeading;
use super::heading::NavHeading;
use super::{FixAssignment, Hold, Nav};
use crate::navdb::NavDb;
use crate::units::{Angle, Distance, Heading, Position, Speed};
use crate::waypoint::Waypoint;

/// How aggressively to turn onto an assigned heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnMethod {
    Left,
    Right,
    Closest,
}

/// A controller instruction. Each variant corresponds to one command method on [`Nav`]; this
/// enum exists so callers that dispatch commands generically (e.g. a scripted scenario replay)
/// don't need a match arm per method name.
#[derive(Debug, Clone)]
pub enum Command {
    AssignAltitude { altitude: Position<f32>, after_speed: Option<Speed<f32>> },
    AssignSpeed { speed: Speed<f32>, after_altitude: Option<Position<f32>> },
    MaintainSlowestPractical,
    MaintainMaximumForward,
    ExpediteDescent,
    ExpediteClimb,
    AssignHeading { heading: Heading, turn: TurnMethod },
    FlyPresentHeading,
    DirectFix { fix: String },
    HoldAtFix { fix: String, hold: Option<Hold> },
    DepartFixDirect { fix: String, via: String },
    DepartFixHeading { fix: String, heading: Heading },
    CrossFixAt { fix: String, altitude: Option<crate::waypoint::AltitudeRestriction>, speed: Option<Speed<f32>> },
    ExpectApproach { id: String },
    InterceptApproach,
    ClearedApproach,
    AtFixCleared { fix: String },
    AtFixIntercept { fix: String },
    ClearedDirectVisual { runway_heading: Angle<f32> },
    CancelApproachClearance,
    ClimbViaSid,
    DescendViaStar,
    GoAround,
    ResumeOwnNavigation,
    AltitudeOurDiscretion,
    DivertToAirport { icao: String },
}

/// Why a command could not be carried out.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UnableReason {
    #[error("approach {0} is not a valid procedure at this airport")]
    InvalidApproach(String),
    #[error("approach {0} is unknown")]
    UnknownApproach(String),
    #[error("fix {0} is not known to the navigation database")]
    InvalidFix(String),
    #[error("fix {0} is not part of the current route")]
    FixNotInRoute(String),
    #[error("fix {0} is too far away to navigate directly")]
    FixIsTooFarAway(String),
    #[error("aircraft is not cleared for an approach")]
    NotClearedForApproach,
    #[error("aircraft is not flying a published route")]
    NotFlyingRoute,
    #[error("unable to comply with instruction")]
    UnableCommand,
    #[error("cleared for an approach the aircraft did not expect")]
    ClearedForUnexpectedApproach,
}

/// A structured, renderable outcome of a command: either an intent to read back, or a reason the
/// instruction could not be followed.
#[derive(Debug, Clone)]
pub enum CommandIntent {
    AssignedAltitude(Position<f32>),
    AssignedSpeed(Speed<f32>),
    AssignedHeading(Heading),
    ClearedDirect(String),
    ClearedHold(String),
    ExpectApproach(String),
    InterceptApproach,
    JoinApproach,
    ClearedApproach(String),
    AtFixCleared(String),
    AtFixIntercept(String),
    Acknowledged,
    Unable(UnableReason),
}

const MAX_DIRECT_FIX_DISTANCE: crate::units::Distance<f32> = crate::units::Distance(150.);

impl Nav {
    /// Dispatches a [`Command`] to the matching method. Never mutates partial state on failure
    /// (§7): every branch either fully applies the instruction or returns `Unable` untouched.
    pub fn command(&mut self, command: Command, navdb: &dyn NavDb) -> CommandIntent {
        match command {
            Command::AssignAltitude { altitude, after_speed } => {
                self.assign_altitude(altitude, after_speed)
            }
            Command::AssignSpeed { speed, after_altitude } => {
                self.assign_speed(speed, after_altitude)
            }
            Command::MaintainSlowestPractical => {
                self.speed.slowest_practical = true;
                self.speed.maximum_forward = false;
                CommandIntent::Acknowledged
            }
            Command::MaintainMaximumForward => {
                self.speed.maximum_forward = true;
                self.speed.slowest_practical = false;
                CommandIntent::Acknowledged
            }
            Command::ExpediteDescent | Command::ExpediteClimb => {
                if self.altitude.cleared.is_none() && self.altitude.assigned.is_none() {
                    CommandIntent::Unable(UnableReason::UnableCommand)
                } else {
                    self.altitude.expedite = true;
                    CommandIntent::Acknowledged
                }
            }
            Command::AssignHeading { heading, turn } => self.assign_heading(heading, turn),
            Command::FlyPresentHeading => {
                self.assign_heading(self.flight_state.heading, TurnMethod::Closest)
            }
            Command::DirectFix { fix } => self.direct_fix(&fix, navdb),
            Command::HoldAtFix { fix, hold } => self.hold_at_fix(&fix, hold, navdb),
            Command::DepartFixDirect { fix, via } => {
                self.fix_assignments.entry(fix).or_default().depart_direct = Some(via);
                CommandIntent::Acknowledged
            }
            Command::DepartFixHeading { fix, heading } => {
                self.fix_assignments.entry(fix).or_default().depart_heading = Some(heading);
                CommandIntent::Acknowledged
            }
            Command::CrossFixAt { fix, altitude, speed } => {
                let assignment = self.fix_assignments.entry(fix).or_default();
                assignment.cross_altitude = altitude;
                assignment.cross_speed = speed;
                self.altitude.assigned = None;
                self.speed.assigned = None;
                CommandIntent::Acknowledged
            }
            Command::ExpectApproach { id } => self.expect_approach(&id, navdb),
            Command::InterceptApproach => self.intercept_approach(),
            Command::ClearedApproach => self.cleared_approach(),
            Command::AtFixCleared { fix } => {
                self.approach.at_fix_cleared_route = Some(fix.clone());
                CommandIntent::AtFixCleared(fix)
            }
            Command::AtFixIntercept { fix } => {
                self.approach.at_fix_intercept = Some(fix.clone());
                CommandIntent::AtFixIntercept(fix)
            }
            Command::ClearedDirectVisual { runway_heading } => {
                self.cleared_direct_visual(runway_heading)
            }
            Command::CancelApproachClearance => {
                self.approach.cleared = false;
                CommandIntent::Acknowledged
            }
            Command::ClimbViaSid | Command::DescendViaStar => {
                self.altitude.assigned = None;
                self.altitude.cleared = Some(self.final_altitude.0);
                CommandIntent::Acknowledged
            }
            Command::GoAround => self.go_around(),
            Command::ResumeOwnNavigation => {
                self.heading = NavHeading::Lnav;
                CommandIntent::Acknowledged
            }
            Command::AltitudeOurDiscretion => {
                self.altitude.cleared = Some(self.final_altitude.0);
                self.altitude.assigned = None;
                CommandIntent::Acknowledged
            }
            Command::DivertToAirport { icao } => {
                if let Some(airport) = navdb.airport(&icao) {
                    self.waypoints = vec![Waypoint::simple(icao, airport.position)];
                    CommandIntent::Acknowledged
                } else {
                    CommandIntent::Unable(UnableReason::InvalidFix(icao))
                }
            }
        }
    }

    fn assign_altitude(
        &mut self,
        altitude: Position<f32>,
        after_speed: Option<Speed<f32>>,
    ) -> CommandIntent {
        if altitude > self.perf.ceiling {
            return CommandIntent::Unable(UnableReason::UnableCommand);
        }
        if let Some(threshold) = after_speed {
            if self.speed.assigned.is_some() && self.flight_state.ias > threshold {
                self.altitude.pending_after_speed = Some((threshold, altitude));
                return CommandIntent::AssignedAltitude(altitude);
            }
        }
        self.altitude.assigned = Some(altitude);
        self.altitude.cleared = None;
        CommandIntent::AssignedAltitude(altitude)
    }

    fn assign_speed(
        &mut self,
        speed: Speed<f32>,
        after_altitude: Option<Position<f32>>,
    ) -> CommandIntent {
        if speed.is_zero() {
            self.speed.assigned = None;
            self.speed.restriction = None;
            return CommandIntent::Acknowledged;
        }
        if speed < self.perf.landing_speed || speed > self.perf.max_ias_at(self.flight_state.altitude) {
            return CommandIntent::Unable(UnableReason::UnableCommand);
        }
        if let Some(threshold) = after_altitude {
            self.speed.pending_after_altitude = Some((threshold, speed));
            return CommandIntent::AssignedSpeed(speed);
        }
        self.speed.assigned = Some(speed);
        CommandIntent::AssignedSpeed(speed)
    }

    fn assign_heading(&mut self, heading: Heading, turn: TurnMethod) -> CommandIntent {
        if !matches!(self.heading, NavHeading::Assigned { .. }) {
            self.approach.cleared = false;
        }

        if self.altitude.cleared.is_some() && self.flight_state.vertical_rate.is_negative() {
            self.altitude.cleared = Some(self.flight_state.altitude);
        }

        let from_lnav = matches!(self.heading, NavHeading::Lnav);
        let delay = self.rand.reaction_delay(&self.config.clone(), from_lnav);
        self.deferred = Some(DeferredNavHeading::heading_change(heading, turn, delay));
        CommandIntent::AssignedHeading(heading)
    }

    fn direct_fix(&mut self, fix: &str, navdb: &dyn NavDb) -> CommandIntent {
        if matches!(self.heading, NavHeading::Hold(_)) {
            self.fix_assignments.entry(fix.to_string()).or_default().depart_direct =
                Some(fix.to_string());
            return CommandIntent::ClearedDirect(fix.to_string());
        }

        if let Some(idx) = self.waypoints.iter().position(|wp| wp.fix == fix) {
            let tail = self.waypoints.split_off(idx);
            let delay = self.rand.reaction_delay(&self.config.clone(), false);
            self.deferred = Some(DeferredNavHeading::waypoints_change(tail, delay));
            return CommandIntent::ClearedDirect(fix.to_string());
        }

        if let Some(approach) = &self.approach.assigned {
            if let Some((branch, idx)) = approach.branch_containing(fix) {
                let tail = branch[idx..].to_vec();
                let delay = self.rand.reaction_delay(&self.config.clone(), false);
                self.deferred = Some(DeferredNavHeading::waypoints_change(tail, delay));
                return CommandIntent::ClearedDirect(fix.to_string());
            }
        }

        let Some(pos) = navdb.lookup_waypoint(fix) else {
            return CommandIntent::Unable(UnableReason::InvalidFix(fix.to_string()));
        };
        if self.flight_state.position.distance_cmp(pos) > MAX_DIRECT_FIX_DISTANCE {
            return CommandIntent::Unable(UnableReason::FixIsTooFarAway(fix.to_string()));
        }

        let tail = vec![Waypoint::simple(fix.to_string(), pos)];
        let delay = self.rand.reaction_delay(&self.config.clone(), false);
        self.deferred = Some(DeferredNavHeading::waypoints_change(tail, delay));
        CommandIntent::ClearedDirect(fix.to_string())
    }

    fn hold_at_fix(&mut self, fix: &str, hold: Option<Hold>, navdb: &dyn NavDb) -> CommandIntent {
        let position = self
            .waypoints
            .iter()
            .find(|wp| wp.fix == fix)
            .map(|wp| wp.position)
            .or_else(|| navdb.lookup_waypoint(fix));
        let Some(position) = position else {
            return CommandIntent::Unable(UnableReason::InvalidFix(fix.to_string()));
        };
        let hold = hold.or_else(|| navdb.enroute_hold(fix).map(|h| Hold::from_published(h, position)));
        let Some(hold) = hold else {
            return CommandIntent::Unable(UnableReason::UnableCommand);
        };

        if self.waypoints.first().is_some_and(|wp| wp.fix == fix) {
            self.heading = NavHeading::Hold(hold);
        } else {
            self.fix_assignments.entry(fix.to_string()).or_default().enter_hold = Some(hold);
        }
        CommandIntent::ClearedHold(fix.to_string())
    }

    fn go_around(&mut self) -> CommandIntent {
        self.heading = NavHeading::Assigned { heading: self.flight_state.heading, turn: TurnMethod::Closest };
        self.speed.assigned = None;
        self.speed.restriction = None;
        self.approach = super::approach::NavApproach::default();

        if let Some(airport) = &self.arrival_airport {
            let floor = airport.elevation + crate::units::Distance::from_feet(2500.);
            let step = crate::units::Distance::from_feet(1000.);
            let steps = (floor.into_nm() / step.into_nm()).ceil();
            self.altitude.assigned = Some(Position::new(steps * step.into_nm()));
            self.waypoints = vec![Waypoint::simple(airport.icao.clone(), airport.position)];
        }

        CommandIntent::Acknowledged
    }

    fn cleared_direct_visual(&mut self, runway_heading: Angle<f32>) -> CommandIntent {
        let Some(approach) = &self.approach.assigned else {
            return CommandIntent::Unable(UnableReason::NotClearedForApproach);
        };
        let threshold = approach.runway_threshold;
        let inbound = Heading::from_radians(runway_heading);
        let outbound = inbound.opposite();
        let base_leg = threshold + Distance::from_nm(4.5).with_heading(outbound);
        let three_mile = threshold + Distance::from_nm(3.).with_heading(outbound);

        let leading_error =
            self.flight_state.heading.closest_distance(Heading::bearing_between(
                self.flight_state.position,
                base_leg,
            ));
        if leading_error.into_degrees().abs() > 90. {
            return self.go_around();
        }

        let cross_track = self.flight_state.position.distance_exact(base_leg);
        let mut spliced = Vec::new();
        if cross_track > Distance::from_nm(1.5) {
            spliced.push(Waypoint::simple("BASE", base_leg));
        }
        let mut final_wp = Waypoint::simple("3MI FINAL", three_mile);
        final_wp.altitude =
            Some(crate::waypoint::AltitudeRestriction::At(Position::new(900. / crate::math::FEET_PER_NM)));
        spliced.push(final_wp);
        let mut threshold_wp = Waypoint::simple("THRESHOLD", threshold);
        threshold_wp.proximity = crate::waypoint::Proximity::FlyOver;
        threshold_wp.land = true;
        spliced.push(threshold_wp);

        self.waypoints = spliced;
        self.heading = NavHeading::Lnav;
        self.approach.intercept_state = super::approach::InterceptState::OnApproachCourse;
        self.approach.cleared = true;
        CommandIntent::JoinApproach
    }
}
