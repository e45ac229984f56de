//! C6: the approach engine — expecting, intercepting, and flying a published instrument or
//! visual approach to landing.
//!
//! Grounded on `level::route::heading.rs`'s `AlignLocalizer`/`AlignGlidePath` nodes (the
//! `CompletionCondition`-driven localizer/glideslope capture logic) and `level::nav.rs`'s
//! target-course machinery, reworked from route nodes chained in a `Route` queue into inline
//! state carried directly on [`super::Nav`].

use bevy_math::Vec2;

use crate::navdb::{Approach, ApproachKind, NavDb};
use crate::units::{AngularSpeed, Distance, Heading, Position};
use crate::waypoint::Waypoint;
use crate::weather::Sample;

use super::command::{CommandIntent, TurnMethod, UnableReason};
use super::heading::{HeadingTarget, NavHeading};
use super::Nav;

/// Cross-track distance from the extended centerline within which the aircraft is considered
/// established and the final segment is joined (see [`Nav::join_final_approach`]).
const CENTERLINE_CAPTURE: Distance<f32> = Distance::from_nm(0.2);
/// How closely a leading waypoint's own track must already align with the approach course to be
/// pruned when splicing the final segment.
const ALIGNED_TRACK_TOLERANCE_DEG: f32 = 5.;
/// How closely a waypoint must sit ahead of the aircraft's heading to be considered a usable
/// direct geometric intercept point for a charted-visual approach.
const GEOMETRIC_INTERCEPT_TOLERANCE_DEG: f32 = 30.;

/// Progress intercepting the final approach course. A cross-cutting flag checked ahead of the
/// ordinary [`NavHeading`] dispatch: the assigned heading an aircraft flies while turning to
/// intercept is still reported (and integrated) as `NavHeading::Assigned` underneath, so this is
/// deliberately not itself a `NavHeading` variant (see the data-model design note).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterceptState {
    #[default]
    NotIntercepting,
    /// Flying the assigned (or present) heading towards the approach course.
    InitialHeading,
    /// Within intercept geometry; actively turning to capture the course.
    TurningToJoin,
    /// Established on the approach course, tracking it inbound.
    OnApproachCourse,
}

/// Approach-related autopilot state.
#[derive(Debug, Clone, Default)]
pub struct NavApproach {
    pub assigned: Option<Approach>,
    pub cleared: bool,
    pub intercept_state: InterceptState,
    pub passed_approach_fix: bool,
    pub passed_faf: bool,
    pub no_pt: bool,
    pub at_fix_cleared_route: Option<String>,
    pub at_fix_intercept: Option<String>,
}

fn standard_rate() -> AngularSpeed<f32> {
    AngularSpeed::from_degrees_per_sec(crate::math::STANDARD_RATE_TURN_DEG_PER_SEC)
}

impl Nav {
    /// C6: the controller tells the pilot which approach to expect, without yet clearing it.
    pub fn expect_approach(&mut self, id: &str, navdb: &dyn NavDb) -> CommandIntent {
        let Some(approach) = navdb.approach(id) else {
            return CommandIntent::Unable(UnableReason::UnknownApproach(id.to_string()));
        };
        self.approach = NavApproach { assigned: Some(approach.clone()), ..NavApproach::default() };
        CommandIntent::ExpectApproach(id.to_string())
    }

    /// C6: the aircraft begins turning to intercept the expected approach's final course.
    pub fn intercept_approach(&mut self) -> CommandIntent {
        if self.approach.assigned.is_none() {
            return CommandIntent::Unable(UnableReason::NotClearedForApproach);
        }
        self.prepare_for_approach(false);
        CommandIntent::InterceptApproach
    }

    /// C6: the aircraft is cleared to fly the expected approach to landing.
    pub fn cleared_approach(&mut self) -> CommandIntent {
        let Some(approach) = self.approach.assigned.clone() else {
            return CommandIntent::Unable(UnableReason::NotClearedForApproach);
        };
        self.approach.cleared = true;
        if !matches!(self.heading, NavHeading::Assigned { .. }) {
            if let Some(branch) = approach.preferred_branch() {
                self.splice_branch(branch);
            }
        }
        CommandIntent::ClearedApproach(approach.id)
    }

    fn splice_branch(&mut self, branch: &[Waypoint]) {
        self.waypoints = branch.to_vec();
        self.heading = NavHeading::Lnav;
    }

    /// Decides how to establish the aircraft onto the expected approach: geometric intercept for
    /// charted-visual approaches (no published course to vector onto), a direct splice for any
    /// other approach whose route already shares a fix with the current route, else the ordinary
    /// heading-intercept state machine. Sets [`NavApproach::no_pt`] per the rule that a procedure
    /// turn is skipped when cleared straight-in, already flying an assigned heading, or arriving
    /// from a hold.
    pub(super) fn prepare_for_approach(&mut self, straight_in: bool) {
        let Some(approach) = self.approach.assigned.clone() else { return };
        let on_heading = matches!(self.heading, NavHeading::Assigned { .. });
        let coming_from_hold = matches!(self.heading, NavHeading::Hold(_));
        self.approach.no_pt = straight_in || on_heading || coming_from_hold;

        if approach.kind == ApproachKind::ChartedVisual {
            if let Some(branch) = approach.preferred_branch() {
                if let Some(idx) = self.first_aligned_waypoint(branch) {
                    self.splice_branch(&branch[idx..]);
                    self.approach.intercept_state = InterceptState::OnApproachCourse;
                    return;
                }
                if let Some(point) = self.first_intersecting_segment(branch) {
                    let mut spliced = vec![Waypoint::simple("INTERCEPT", point)];
                    spliced.extend_from_slice(branch);
                    self.waypoints = spliced;
                    self.heading = NavHeading::Lnav;
                    self.approach.intercept_state = InterceptState::OnApproachCourse;
                    return;
                }
            }
            self.approach.intercept_state = InterceptState::InitialHeading;
            return;
        }

        if let Some(branch) = approach.preferred_branch() {
            if let Some(idx) = self.first_common_fix(branch) {
                self.splice_branch(&branch[idx..]);
                self.approach.intercept_state = InterceptState::OnApproachCourse;
                return;
            }
        }
        self.approach.intercept_state = InterceptState::InitialHeading;
    }

    /// First waypoint in `branch` reachable on a direct course within
    /// [`GEOMETRIC_INTERCEPT_TOLERANCE_DEG`] of the current heading.
    fn first_aligned_waypoint(&self, branch: &[Waypoint]) -> Option<usize> {
        branch.iter().position(|wp| {
            let bearing = Heading::bearing_between(self.flight_state.position, wp.position);
            self.flight_state.heading.closest_distance(bearing).into_degrees().abs()
                <= GEOMETRIC_INTERCEPT_TOLERANCE_DEG
        })
    }

    /// First fix the current route already shares with `branch`, i.e. a direct transition onto
    /// the approach without needing to vector.
    fn first_common_fix(&self, branch: &[Waypoint]) -> Option<usize> {
        let current = self.waypoints.first()?;
        branch.iter().position(|wp| wp.fix == current.fix)
    }

    /// First point at which the current ground track crosses a segment of `branch`, used as a
    /// geometric intercept point for charted-visual approaches with no waypoint directly ahead.
    fn first_intersecting_segment(&self, branch: &[Waypoint]) -> Option<Position<Vec2>> {
        let origin = Vec2::new(
            self.flight_state.position.x().get(),
            self.flight_state.position.y().get(),
        );
        let dir = self.flight_state.heading.into_dir2();
        let track_dir = Vec2::new(dir.x, dir.y);

        branch.windows(2).find_map(|pair| {
            let [a, b] = pair else { return None };
            let a_vec = Vec2::new(a.position.x().get(), a.position.y().get());
            let b_vec = Vec2::new(b.position.x().get(), b.position.y().get());
            let (t1, t2) = crate::math::line_intersect(origin, track_dir, a_vec, b_vec - a_vec);
            if t1 > 0. && (0. ..=1.).contains(&t2) {
                Some(Position::new(origin + track_dir * t1))
            } else {
                None
            }
        })
    }

    /// Signed perpendicular distance from `self.flight_state.position` to the line through
    /// `anchor` along `heading`, positive to the right of that course.
    fn cross_track_distance(&self, anchor: Position<Vec2>, heading: Heading) -> Distance<f32> {
        let dir = heading.into_dir2();
        let rel = (self.flight_state.position - anchor).0;
        Distance(rel.x * dir.y - rel.y * dir.x)
    }

    /// Signed distance of `pos` along `heading` from `anchor`, decreasing towards the runway when
    /// `heading` is the inbound course (used to decide which leading waypoints are already behind
    /// the aircraft).
    fn along_track(pos: Position<Vec2>, anchor: Position<Vec2>, heading: Heading) -> f32 {
        let dir = heading.into_dir2();
        let rel = (pos - anchor).0;
        rel.x * dir.x + rel.y * dir.y
    }

    /// Once established within [`CENTERLINE_CAPTURE`] of the centerline: extract the approach's
    /// final segment from its published FAF onward, prune leading waypoints whose own track
    /// already aligns with the approach course and sit ahead of the aircraft, splice the
    /// remainder as the new route, drop any carried altitude restriction if cleared, and
    /// transition to [`InterceptState::OnApproachCourse`].
    fn join_final_approach(&mut self, approach: &Approach, course: Heading) {
        if let Some(branch) = approach.preferred_branch() {
            let start = approach.faf_index.unwrap_or(0).min(branch.len().saturating_sub(1));
            let mut segment = branch[start..].to_vec();

            let aircraft_along =
                Self::along_track(self.flight_state.position, approach.runway_threshold, course);
            while segment.len() > 1 {
                let wp = &segment[0];
                let track = wp.bearing_to(&segment[1]);
                let aligned =
                    track.closest_distance(course).into_degrees().abs() <= ALIGNED_TRACK_TOLERANCE_DEG;
                let wp_along = Self::along_track(wp.position, approach.runway_threshold, course);
                let ahead = wp_along <= aircraft_along;
                if aligned && ahead {
                    segment.remove(0);
                } else {
                    break;
                }
            }
            self.waypoints = segment;
        }

        if self.approach.cleared {
            self.altitude.restriction = None;
        }
        self.approach.intercept_state = InterceptState::OnApproachCourse;
    }

    /// C6 heading target: fly the intercept geometry towards the approach course, advancing
    /// [`InterceptState`] once established (invariant 6 governs the transition order below).
    pub(super) fn approach_heading_target(&mut self, weather: &Sample) -> HeadingTarget {
        let Some(approach) = self.approach.assigned.clone() else {
            self.approach.intercept_state = InterceptState::NotIntercepting;
            return self.target_heading(weather);
        };
        let course = Heading::from_radians(approach.extended_centerline).opposite();

        match self.approach.intercept_state {
            InterceptState::InitialHeading => {
                let flown = match &self.heading {
                    NavHeading::Assigned { heading, .. } => *heading,
                    _ => self.flight_state.heading,
                };
                if self.should_turn_to_intercept(
                    approach.runway_threshold,
                    course,
                    TurnMethod::Closest,
                    weather,
                ) {
                    self.approach.intercept_state = InterceptState::TurningToJoin;
                }
                HeadingTarget {
                    heading: self.wind_corrected(flown, weather),
                    turn: TurnMethod::Closest,
                    max_turn_rate: standard_rate(),
                }
            }
            InterceptState::TurningToJoin => {
                let established =
                    self.cross_track_distance(approach.runway_threshold, course).abs() < CENTERLINE_CAPTURE;
                if established {
                    self.join_final_approach(&approach, course);
                }
                HeadingTarget {
                    heading: self.wind_corrected(course, weather),
                    turn: TurnMethod::Closest,
                    max_turn_rate: standard_rate(),
                }
            }
            InterceptState::OnApproachCourse | InterceptState::NotIntercepting => HeadingTarget {
                heading: self.wind_corrected(course, weather),
                turn: TurnMethod::Closest,
                max_turn_rate: standard_rate(),
            },
        }
    }
}
