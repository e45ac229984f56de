//! C3: the vertical planner and altitude integration.
//!
//! Grounded on the teacher's `level::route::altitude.rs` (`SetAltitudeNode`'s backwards walk over
//! upcoming restrictions) and `level::nav.rs`'s vertical-rate integration, reworked from a route
//! node evaluated against a `Route` queue into a plain priority computation over
//! [`Nav::waypoints`] plus a per-second integrator.

use crate::units::{Position, Speed};
use crate::waypoint::AltitudeRestriction;
use crate::weather::Sample;

use super::heading::NavHeading;
use super::Nav;

/// Vertical autopilot state.
#[derive(Debug, Clone, Default)]
pub struct NavAltitude {
    /// A controller-assigned altitude, overriding everything else (including restrictions).
    pub assigned: Option<Position<f32>>,
    /// A block clearance (e.g. "descend and maintain"), capped by [`super::FinalAltitude`].
    pub cleared: Option<Position<f32>>,
    /// Staged via `AssignAltitude { after_speed: Some(..) }`: applied once [`Nav::speed`] crosses
    /// the threshold.
    pub pending_after_speed: Option<(Speed<f32>, Position<f32>)>,
    /// Fix-crossing restriction in effect for the current leg, cleared once passed.
    pub restriction: Option<AltitudeRestriction>,
    pub expedite: bool,
}

impl Nav {
    /// C3 priority list (first match wins): airwork band, racetrack-PT exit altitude, explicit
    /// assignment, carried fix-crossing restriction, upcoming waypoint restriction once its ETA
    /// enters the immediate window, block clearance, else maintain.
    #[must_use]
    pub fn target_altitude(&self) -> Position<f32> {
        if let Some(airwork) = &self.airwork {
            return self.flight_state.altitude.clamp(airwork.altitude_low, airwork.altitude_high);
        }

        if let NavHeading::RacetrackPt(pt) = &self.heading {
            if let Some(exit) = pt.exit_altitude {
                return exit.min(self.final_altitude.0);
            }
        }

        if let Some(assigned) = self.altitude.assigned {
            return assigned.min(self.perf.ceiling);
        }

        if let Some(restriction) = self.altitude.restriction {
            let (low, high) = restriction.bounds(self.final_altitude.0);
            return self.flight_state.altitude.clamp(low, high);
        }

        // Skipped while flying a procedure turn: the PT's own outbound/inbound legs, not the
        // charted route waypoints, are the binding vertical constraint (rule 2 above).
        let flying_pt = matches!(self.heading, NavHeading::RacetrackPt(_) | NavHeading::Standard45Pt(_));
        if !flying_pt {
            if let Some(restriction) = self.upcoming_altitude_restriction() {
                let (low, high) = restriction.bounds(self.final_altitude.0);
                return self.flight_state.altitude.clamp(low, high);
            }
        }

        if let Some(cleared) = self.altitude.cleared {
            return cleared.min(self.final_altitude.0);
        }

        self.flight_state.altitude
    }

    /// Forward walk to the first upcoming waypoint with an altitude restriction, returned once
    /// its ETA (at current ground speed) falls inside
    /// [`crate::config::NavConfig::immediate_restriction_eta`].
    fn upcoming_altitude_restriction(&self) -> Option<AltitudeRestriction> {
        let mut cumulative = crate::units::Distance::from_nm(0.);
        let mut from = self.flight_state.position;
        for wp in &self.waypoints {
            cumulative += from.distance_exact(wp.position);
            from = wp.position;
            if let Some(restriction) = wp.altitude {
                let gs = self.flight_state.ground_speed.into_knots().max(1.);
                let eta_secs = cumulative.into_nm() / gs * 3600.;
                if eta_secs <= self.config.immediate_restriction_eta.as_secs_f32() {
                    return Some(restriction);
                }
                return None;
            }
        }
        None
    }

    /// Integrates altitude towards [`Self::target_altitude`] for one simulated second, degrading
    /// the nominal climb/descent rate with temperature (density altitude) and fading it out near
    /// the target so the aircraft levels off smoothly instead of overshooting.
    ///
    /// Enforces the 10,000 ft descent boundary: reads the airspeed the speed integrator already
    /// wrote to `flight_state.ias` earlier this tick (see tick driver ordering) and holds the
    /// descent at 10,000 ft until it has bled to 250 kt, unless flying maximum forward speed.
    pub fn integrate_altitude(&mut self, weather: &Sample, dt_secs: f32) {
        let mut target = self.target_altitude();
        self.flight_state.previous_altitude = self.flight_state.altitude;

        if let Some((threshold, altitude)) = self.altitude.pending_after_speed {
            if self.flight_state.ias > threshold {
                self.altitude.assigned = Some(altitude);
                self.altitude.pending_after_speed = None;
            }
        }

        let speed_limit_altitude = crate::math::SPEED_LIMIT_ALTITUDE;
        let limit_ias = Speed::from_knots(crate::math::SPEED_LIMIT_BELOW_10000);
        let holding_for_speed = !self.speed.maximum_forward
            && target < speed_limit_altitude
            && self.flight_state.altitude > speed_limit_altitude
            && self.flight_state.ias > limit_ias;
        if holding_for_speed {
            target = speed_limit_altitude;
        }

        let climbing = target > self.flight_state.altitude;
        let profile = match (climbing, self.altitude.expedite) {
            (true, false) => &self.perf.standard_climb,
            (true, true) => &self.perf.expedite_climb,
            (false, false) => &self.perf.standard_descent,
            (false, true) => &self.perf.expedite_descent,
        };

        let mut rate = profile.rate_at(self.flight_state.altitude);
        rate *= density_derate(weather.temperature);
        if !climbing {
            rate = -rate;
        }

        let remaining = target - self.flight_state.altitude;
        let fade = crate::math::fade_near_target(remaining, self.config.altitude_fade_band);

        // Past the FAF, the vertical rate blends instantaneously rather than ramping in over
        // several seconds, matching a glidepath capture.
        let blend = if self.approach.passed_faf {
            1.
        } else {
            self.config.altitude_blend_per_sec
                * if self.altitude.expedite { self.config.expedite_blend_multiplier } else { 1. }
        };
        let desired_rate = rate * fade;
        let rate_delta = (desired_rate - self.flight_state.vertical_rate) * blend.clamp(0., 1.);
        self.flight_state.vertical_rate += rate_delta;

        let step = self.flight_state.vertical_rate * std::time::Duration::from_secs_f32(dt_secs);
        let new_altitude = self.flight_state.altitude + step;
        self.flight_state.altitude =
            if climbing { new_altitude.min(target) } else { new_altitude.max(target) };
    }
}

fn density_derate(temperature_kelvin: f32) -> f32 {
    (temperature_kelvin / 288.15).clamp(0.7, 1.1)
}
