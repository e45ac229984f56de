//! End-to-end scenario tests for the navigation core, in the teacher's `#[cfg(test)] mod tests`
//! style (one module per component plus a crate-level integration module here).

use std::time::Duration;

use bevy_math::Vec2;

use crate::navdb::{Airport, Approach, ApproachKind, Hold as PublishedHold, HoldLeg, NavDb};
use crate::perf::{AircraftPerformance, ClimbProfile, EngineCategory};
use crate::units::{Accel, Angle, AngularSpeed, Distance, Heading, Position, Speed};
use crate::waypoint::{Proximity, Waypoint};
use crate::weather::{Sample, Weather};

use super::command::{Command, CommandIntent, TurnMethod};
use super::heading::NavHeading;
use super::hold::{Hold, HoldState};
use super::Nav;

struct FakeNavDb {
    waypoints: Vec<(String, Position<Vec2>)>,
    airports: Vec<Airport>,
    holds: Vec<(String, PublishedHold)>,
    approaches: Vec<Approach>,
}

impl NavDb for FakeNavDb {
    fn lookup_waypoint(&self, name: &str) -> Option<Position<Vec2>> {
        self.waypoints.iter().find(|(fix, _)| fix == name).map(|(_, pos)| *pos)
    }
    fn airport(&self, icao: &str) -> Option<&Airport> {
        self.airports.iter().find(|a| a.icao == icao)
    }
    fn enroute_hold(&self, fix: &str) -> Option<PublishedHold> {
        self.holds.iter().find(|(f, _)| f == fix).map(|(_, h)| *h)
    }
    fn approach(&self, id: &str) -> Option<&Approach> {
        self.approaches.iter().find(|a| a.id == id)
    }
}

fn jet_perf() -> AircraftPerformance {
    AircraftPerformance {
        ceiling: Position::new(Distance::from_feet(41000.).into_nm()),
        standard_climb: ClimbProfile::uniform(Speed::from_fpm(2000.)),
        standard_descent: ClimbProfile::uniform(Speed::from_fpm(-2000.)),
        expedite_climb: ClimbProfile::uniform(Speed::from_fpm(3000.)),
        expedite_descent: ClimbProfile::uniform(Speed::from_fpm(-3000.)),
        accel: Accel::from_knots_per_sec(3.),
        decel: Accel::from_knots_per_sec(5.),
        min_speed: Speed::from_knots(130.),
        landing_speed: Speed::from_knots(135.),
        v2_speed: Speed::from_knots(150.),
        cruise_ias: Speed::from_knots(290.),
        max_bank_angle: Angle::from_degrees(25.),
        max_bank_rate: AngularSpeed::from_degrees_per_sec(5.),
        engine_category: EngineCategory::Jet,
    }
}

fn empty_db() -> FakeNavDb {
    FakeNavDb { waypoints: Vec::new(), airports: Vec::new(), holds: Vec::new(), approaches: Vec::new() }
}

fn no_wind_weather() -> Weather {
    Weather {
        regions: Vec::new(),
        sea_level_temperature: 288.15,
        sea_level_pressure: 1013.25,
        relative_humidity: 0.5,
    }
}

fn make_nav(position: Position<Vec2>, altitude_ft: f32, heading_deg: f32) -> Nav {
    let flight_state = crate::flight_state::FlightState::new(
        position,
        Position::new(Distance::from_feet(altitude_ft).into_nm()),
        Heading::from_degrees(heading_deg),
    );
    let mut nav =
        Nav::new_overflight(flight_state, jet_perf(), Position::new(Distance::from_feet(altitude_ft).into_nm()), Vec::new(), 42);
    nav.flight_state.ias = Speed::from_knots(250.);
    nav.flight_state.ground_speed = Speed::from_knots(250.);
    nav
}

#[test]
fn heading_stays_normalized_after_integration() {
    let mut nav = make_nav(Position::new(Vec2::ZERO), 5000., 350.);
    let weather = no_wind_weather();
    for _ in 0..60 {
        nav.flight_state.heading = nav.flight_state.heading.opposite();
        let sample = weather.lookup(nav.flight_state.position, nav.flight_state.altitude);
        let target = nav.target_heading(&sample);
        nav.integrate_heading(target, 1.0);
        let degrees = nav.flight_state.heading.degrees();
        assert!((0. ..360.).contains(&degrees), "heading {degrees} out of range");
    }
}

#[test]
fn cleared_approach_requires_assigned_approach() {
    let mut nav = make_nav(Position::new(Vec2::ZERO), 3000., 90.);
    let outcome = nav.cleared_approach();
    assert!(matches!(outcome, CommandIntent::Unable(_)));
}

/// Scenario 5: `DirectFix` updates the reported waypoints immediately but the live route only
/// after the scheduled pilot-reaction delay.
#[test]
fn direct_fix_applies_after_reaction_delay() {
    let mut nav = make_nav(Position::new(Vec2::ZERO), 5000., 90.);
    nav.waypoints = vec![
        Waypoint::simple("ALPHA", Position::new(Vec2::new(10., 0.))),
        Waypoint::simple("CHARLIE", Position::new(Vec2::new(20., 0.))),
    ];
    let db = empty_db();

    let intent = nav.command(Command::DirectFix { fix: "CHARLIE".to_string() }, &db);
    assert!(matches!(intent, CommandIntent::ClearedDirect(fix) if fix == "CHARLIE"));

    assert_eq!(nav.assigned_waypoints()[0].fix, "CHARLIE");
    assert_eq!(nav.waypoints[0].fix, "ALPHA");

    for _ in 0..10 {
        nav.flush_deferred(Duration::from_secs(1));
    }
    assert_eq!(nav.waypoints[0].fix, "CHARLIE");
}

/// Scenario 4: descending through 10,000ft above 250kt is clamped to 250kt.
#[test]
fn speed_clamped_to_250_below_10000() {
    let mut nav = make_nav(Position::new(Vec2::ZERO), 10500., 90.);
    nav.flight_state.ias = Speed::from_knots(300.);
    nav.flight_state.vertical_rate = Speed::from_fpm(-2000.);
    nav.altitude.cleared = Some(Position::new(Distance::from_feet(8000.).into_nm()));

    let weather = no_wind_weather();
    for _ in 0..60 {
        let sample = weather.lookup(nav.flight_state.position, nav.flight_state.altitude);
        nav.integrate_airspeed(&sample, 1.0);
    }
    assert!(nav.flight_state.ias <= Speed::from_knots(250.1));
}

/// Scenario 6: go-around rounds the assigned altitude up to the next 1,000ft above (field
/// elevation + 2,500ft).
#[test]
fn go_around_assigns_rounded_altitude() {
    let mut nav = make_nav(Position::new(Vec2::new(-3., 0.)), 1500., 90.);
    nav.flight_state.ias = Speed::from_knots(140.);
    nav.arrival_airport = Some(Airport {
        icao: "KTST".to_string(),
        position: Position::new(Vec2::ZERO),
        elevation: Position::new(Distance::from_feet(100.).into_nm()),
    });
    nav.approach.assigned = Some(Approach {
        id: "I09".to_string(),
        kind: ApproachKind::Ils,
        runway_heading: Angle::from_degrees(90.),
        runway_threshold: Position::new(Vec2::ZERO),
        extended_centerline: Angle::from_degrees(90.),
        faf_index: None,
        branches: Vec::new(),
    });
    nav.approach.cleared = true;

    let outcome = nav.go_around();
    assert!(matches!(outcome, CommandIntent::Acknowledged));
    let assigned = nav.altitude.assigned.expect("go-around must assign a climb altitude");
    // Field elevation 100ft + 2,500ft = 2,600ft, rounded up to the next 1,000ft: 3,000ft.
    assert!((assigned.into_nm() - Distance::from_feet(3000.).into_nm()).abs() < 1e-3);
    assert!(!nav.approach.cleared);
    assert!(matches!(nav.heading, NavHeading::Assigned { .. }));
}

/// Scenario 1 (abridged): entering a hold directly overhead cycles the racetrack states.
#[test]
fn hold_entry_cycles_racetrack_states() {
    let fix = Position::new(Vec2::new(0.1, 0.));
    let mut nav = make_nav(fix, 5000., 90.);
    nav.waypoints = vec![Waypoint::simple("ALPHA", fix)];
    let published = PublishedHold {
        inbound_course: Angle::from_degrees(270.),
        turn_direction: crate::units::TurnDirection::Clockwise,
        leg: HoldLeg::Time(Duration::from_secs(60)),
    };
    let db = FakeNavDb {
        waypoints: Vec::new(),
        airports: Vec::new(),
        holds: vec![("ALPHA".to_string(), published)],
        approaches: Vec::new(),
    };

    let intent = nav.command(Command::HoldAtFix { fix: "ALPHA".to_string(), hold: None }, &db);
    assert!(matches!(intent, CommandIntent::ClearedHold(fix) if fix == "ALPHA"));
    assert!(matches!(nav.heading, NavHeading::Hold(_)));

    let weather = no_wind_weather();
    let mut seen_flying_outbound = false;
    for _ in 0..150 {
        let sample = weather.lookup(nav.flight_state.position, nav.flight_state.altitude);
        let target = nav.target_heading(&sample);
        nav.integrate_heading(target, 1.0);
        if let NavHeading::Hold(hold) = &nav.heading {
            if matches!(hold.state, HoldState::FlyingOutbound(_)) {
                seen_flying_outbound = true;
            }
        }
    }
    assert!(seen_flying_outbound, "expected the hold to reach FlyingOutbound within 150s");
}

#[test]
fn assign_heading_clears_approach_clearance() {
    let mut nav = make_nav(Position::new(Vec2::ZERO), 5000., 90.);
    nav.approach.cleared = true;
    let _ = nav.command(
        Command::AssignHeading { heading: Heading::from_degrees(180.), turn: TurnMethod::Left },
        &empty_db(),
    );
    assert!(!nav.approach.cleared);
}

/// Crossing a waypoint flagged as the FAF marks `passed_faf` and drops whatever restriction was
/// carried into it, handing vertical control to the glidepath-style blend in `integrate_altitude`.
#[test]
fn crossing_faf_waypoint_sets_passed_faf_and_clears_restriction() {
    let mut nav = make_nav(Position::new(Vec2::ZERO), 3000., 90.);
    nav.flight_state.ground_speed = Speed::from_knots(250.);
    nav.altitude.restriction = Some(crate::waypoint::AltitudeRestriction::AtOrAbove(
        Position::new(Distance::from_feet(2000.).into_nm()),
    ));

    let mut faf = Waypoint::simple("FAFIX", Position::new(Vec2::new(0.0005, 0.)));
    faf.proximity = Proximity::FlyOver;
    faf.faf = true;
    nav.waypoints = vec![faf];

    let weather = no_wind_weather();
    let sample = weather.lookup(nav.flight_state.position, nav.flight_state.altitude);
    let crossed = nav.update_waypoints(&empty_db(), &sample);

    assert!(crossed.is_some());
    assert!(nav.approach.passed_faf);
    assert!(nav.altitude.restriction.is_none());
}

/// `AtFixCleared`/`AtFixIntercept` stage a fix name that only takes effect once that fix is
/// actually crossed; before this wiring existed, crossing the fix never read either field back.
#[test]
fn at_fix_intercept_fires_on_crossing() {
    let mut nav = make_nav(Position::new(Vec2::ZERO), 5000., 90.);
    nav.flight_state.ground_speed = Speed::from_knots(250.);
    nav.approach.assigned = Some(Approach {
        id: "I09".to_string(),
        kind: ApproachKind::Ils,
        runway_heading: Angle::from_degrees(90.),
        runway_threshold: Position::new(Vec2::new(20., 0.)),
        extended_centerline: Angle::from_degrees(90.),
        faf_index: None,
        branches: Vec::new(),
    });
    nav.approach.at_fix_intercept = Some("ALPHA".to_string());
    let mut alpha = Waypoint::simple("ALPHA", Position::new(Vec2::new(0.0005, 0.)));
    alpha.proximity = Proximity::FlyOver;
    nav.waypoints = vec![alpha];

    let weather = no_wind_weather();
    let sample = weather.lookup(nav.flight_state.position, nav.flight_state.altitude);
    nav.update_waypoints(&empty_db(), &sample);

    assert!(nav.approach.at_fix_intercept.is_none());
    assert_ne!(nav.approach.intercept_state, super::approach::InterceptState::NotIntercepting);
}

/// A ghost continuation a thousand miles from the target line should never report a crossing —
/// a handful of one-second ticks of flight can't possibly reach it, regardless of turn dynamics.
#[test]
fn should_turn_to_intercept_false_when_line_is_far_away() {
    let nav = make_nav(Position::new(Vec2::ZERO), 5000., 90.);
    let far_anchor = Position::new(Vec2::new(1000., 0.));
    let weather = no_wind_weather();
    let sample = weather.lookup(nav.flight_state.position, nav.flight_state.altitude);
    let should_turn = nav.should_turn_to_intercept(
        far_anchor,
        Heading::from_degrees(0.),
        TurnMethod::Closest,
        &sample,
    );
    assert!(!should_turn);
}

fn run_hold_until_turning_inbound(mut hold: Hold, nav: &Nav, weather: &Sample) -> u32 {
    let mut ticks = 0;
    loop {
        let (_, _, next, _) = hold.step(nav, weather);
        ticks += 1;
        if matches!(next, HoldState::TurningInbound) {
            break;
        }
        hold.state = next;
    }
    ticks
}

/// A tailwind on the inbound course is a headwind outbound, so the outbound leg is lengthened by
/// the wind component (in seconds) rather than flown for the nominal charted duration unchanged.
#[test]
fn tailwind_on_inbound_lengthens_outbound_leg() {
    let nav = make_nav(Position::new(Vec2::ZERO), 5000., 0.);
    let base = Hold {
        fix: Position::new(Vec2::ZERO),
        inbound_course: Angle::from_degrees(0.),
        turn_direction: crate::units::TurnDirection::Clockwise,
        leg: HoldLeg::Time(Duration::from_secs(60)),
        state: HoldState::FlyingOutbound(Duration::ZERO),
        cancel: false,
    };

    let calm = no_wind_weather().lookup(nav.flight_state.position, nav.flight_state.altitude);
    assert_eq!(run_hold_until_turning_inbound(base.clone(), &nav, &calm), 60);

    // 20kt blowing towards the inbound course's direction of travel (north): a tailwind inbound.
    let tailwind = Sample { wind: Speed(Vec2::new(0., 20. / 3600.)), ..calm };
    assert_eq!(run_hold_until_turning_inbound(base, &nav, &tailwind), 80);
}

/// A parallel hold entry turns onto the outbound heading the "wrong" way first — away from
/// `turn_direction`, on the non-holding side — rather than cutting directly across the pattern.
#[test]
fn hold_entry_turns_wrong_way_first_on_parallel_entry() {
    let fix = Position::new(Vec2::ZERO);
    let nav = make_nav(fix, 5000., 10.);
    let hold = Hold {
        fix,
        inbound_course: Angle::from_degrees(0.),
        turn_direction: crate::units::TurnDirection::Clockwise,
        leg: HoldLeg::Time(Duration::from_secs(60)),
        state: HoldState::ApproachingFix,
        cancel: false,
    };

    let weather = no_wind_weather();
    let sample = weather.lookup(nav.flight_state.position, nav.flight_state.altitude);
    let (heading, turn, next_state, exit) = hold.step(&nav, &sample);

    assert_eq!(turn, TurnMethod::Left);
    assert_eq!(next_state, HoldState::TurningForParallelEntry);
    assert!(!exit);
    assert!((heading.degrees() - 180.).abs() < 1e-3);
}
