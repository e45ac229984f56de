//! C4: the speed planner and airspeed integration.
//!
//! Grounded on the teacher's `level::route::speed.rs`/`store::ClimbProfile` rate-band lookups,
//! reworked from a route-node evaluation into a flat priority function over [`Nav`] state,
//! following the same "first match wins" shape the teacher uses for its own restriction chains.

use std::time::Duration;

use crate::units::Speed;
use crate::weather::Sample;

use super::Nav;

/// Horizontal speed autopilot state.
#[derive(Debug, Clone, Default)]
pub struct NavSpeed {
    pub assigned: Option<Speed<f32>>,
    pub slowest_practical: bool,
    pub maximum_forward: bool,
    /// Staged via `AssignSpeed { after_altitude: Some(..) }`.
    pub pending_after_altitude: Option<(crate::units::Position<f32>, Speed<f32>)>,
    /// Fix-crossing restriction in effect for the current leg.
    pub restriction: Option<Speed<f32>>,
}

impl Nav {
    /// C4 priority list (first match wins). Returns the target IAS for this tick.
    #[must_use]
    pub fn target_speed(&self, weather: &Sample) -> Speed<f32> {
        // 1. Airwork: no speed constraint beyond the performance envelope.
        if self.airwork.is_some() {
            return self.perf.cruise_ias.min(self.perf.max_ias_at(self.flight_state.altitude));
        }

        // 2. Inside 5NM of end of approach: constraints are cancelled by rule 9 below reading
        // `approach.cleared`, so this rule only affects whether `restriction` (rule 9) applies;
        // expressed here by skipping straight past it once within 5NM final.
        let near_final = self.approach.cleared && self.distance_to_runway_end().is_some_and(|d| d.into_nm() <= 5.);

        // 3. MaintainSlowestPractical.
        if self.speed.slowest_practical {
            return self.perf.landing_speed + Speed::from_knots(5.);
        }

        // 4. MaintainMaximumForward.
        if self.speed.maximum_forward {
            return if self.approach.cleared {
                self.perf.v2_or_default().lerp(self.perf.cruise_ias, 0.5).min(Speed::from_knots(250.))
            } else {
                self.perf.max_ias_at(self.flight_state.altitude)
            };
        }

        // 5. Explicit assignment.
        if let Some(assigned) = self.speed.assigned {
            return assigned;
        }

        // 6. Upcoming hold within 180s: fly the altitude-dependent hold speed.
        if self.hold_eta().is_some_and(|eta| eta <= Duration::from_secs(180)) {
            return self.hold_speed();
        }

        // 7. Initial departure climb profile.
        if self.flight_state.initial_departure_climb {
            if let Some(speed) = self.departure_climb_speed() {
                return speed;
            }
        }

        // 8. Upcoming waypoint speed restriction.
        if !near_final {
            if let Some(speed) = self.upcoming_speed_restriction() {
                return speed;
            }
        }

        // 9. Carried restriction, unless cleared for approach.
        if !near_final {
            if let Some(restriction) = self.speed.restriction {
                return restriction;
            }
        }

        let target_altitude_ias = self.target_altitude_ias();

        // 10. Descending through 10,000ft: above 250kt, clamp hard to 250; at or below, fall back
        // to the altitude-based limit but never accelerate back up.
        let altitude_limit = crate::math::SPEED_LIMIT_ALTITUDE;
        let limit_250 = Speed::from_knots(crate::math::SPEED_LIMIT_BELOW_10000);
        if self.flight_state.altitude < altitude_limit + crate::units::Distance::from_feet(1000.)
            && self.flight_state.vertical_rate.is_negative()
        {
            return if self.flight_state.ias > limit_250 {
                limit_250
            } else {
                self.flight_state.ias.min(target_altitude_ias)
            };
        }

        // 11. Final approach within 10NM: performance approach speed, wind-adjusted, never
        // accelerating; interpolate to landing speed inside 0.5NM.
        if let Some(remaining) = self.distance_to_runway_end() {
            if remaining.into_nm() <= 10. {
                let wind_component = weather.component(self.flight_state.heading.radians()).into_knots();
                let approach_speed = (self.perf.landing_speed.into_knots() * 1.3 - wind_component.max(0.) * 0.5)
                    .max(self.perf.landing_speed.into_knots());
                let target = if remaining.into_nm() <= 0.5 {
                    let ratio = (remaining.into_nm() / 0.5).clamp(0., 1.);
                    self.perf.landing_speed.into_knots() + (approach_speed - self.perf.landing_speed.into_knots()) * ratio
                } else {
                    approach_speed
                };
                return self.flight_state.ias.min(Speed::from_knots(target));
            }
        }

        // 12. Cleared but farther out: hold current IAS.
        if self.approach.cleared {
            return self.flight_state.ias;
        }

        // 13. Default altitude-based IAS.
        target_altitude_ias
    }

    fn target_altitude_ias(&self) -> Speed<f32> { self.perf.max_ias_at(self.flight_state.altitude) }

    fn distance_to_runway_end(&self) -> Option<crate::units::Distance<f32>> {
        self.waypoints.last().map(|wp| self.flight_state.position.distance_exact(wp.position))
    }

    fn hold_eta(&self) -> Option<Duration> {
        match &self.heading {
            super::heading::NavHeading::Hold(_) => Some(Duration::ZERO),
            _ => None,
        }
    }

    fn hold_speed(&self) -> Speed<f32> {
        if self.flight_state.altitude.amsl() > crate::units::Distance::from_feet(14000.) {
            Speed::from_knots(265.)
        } else if self.flight_state.altitude.amsl() > crate::units::Distance::from_feet(6000.) {
            Speed::from_knots(230.)
        } else {
            Speed::from_knots(200.)
        }
    }

    fn departure_climb_speed(&self) -> Option<Speed<f32>> {
        let agl = self.departure_agl()?;
        use crate::perf::EngineCategory;
        let v2 = self.perf.v2_or_default();
        let speed = match self.perf.engine_category {
            EngineCategory::Jet => {
                if agl.into_feet() >= 5000. {
                    return None;
                }
                if agl.into_feet() < 1500. { Speed::from_knots(180.) } else { Speed::from_knots(210.) }
            }
            EngineCategory::Turboprop | EngineCategory::Piston => {
                if agl.into_feet() >= 1500. {
                    return None;
                }
                let factor = if agl.into_feet() < 500. {
                    1.1
                } else if agl.into_feet() < 1000. {
                    1.2
                } else {
                    1.3
                };
                v2 * factor
            }
        };
        let speed = speed.min(self.perf.cruise_ias).max(v2);
        Some(speed)
    }

    fn departure_agl(&self) -> Option<crate::units::Distance<f32>> {
        let airport = self.departure_airport.as_ref()?;
        Some(self.flight_state.altitude - airport.elevation)
    }

    fn upcoming_speed_restriction(&self) -> Option<Speed<f32>> {
        let wp = self.waypoints.first()?;
        let speed = wp.speed?;
        let distance = self.flight_state.position.distance_exact(wp.position);
        let gs = self.flight_state.ground_speed.into_knots().max(1.);
        let eta_secs = distance.into_nm() / gs * 3600.;

        if eta_secs < self.config.immediate_restriction_eta.as_secs_f32()
            || self.flight_state.ias <= speed
        {
            return Some(speed);
        }
        if speed < self.flight_state.ias {
            // Deceleration window: start slowing down only once the deceleration needed to reach
            // `speed` by the fix can no longer be deferred.
            let decel_rate = self.perf.decel.into_knots_per_sec().max(0.01);
            let decel_time = (self.flight_state.ias.into_knots() - speed.into_knots()) / decel_rate;
            if eta_secs <= decel_time {
                return Some(speed);
            }
        }
        None
    }

    /// C4 integration: blends IAS towards [`Self::target_speed`] for one simulated second,
    /// scaling the nominal accel/decel rate for ground operations and simultaneous vertical
    /// movement.
    pub fn integrate_airspeed(&mut self, weather: &Sample, dt_secs: f32) {
        if self.altitude.expedite {
            return;
        }

        if let Some((threshold, speed)) = self.speed.pending_after_altitude {
            if self.flight_state.altitude <= threshold {
                self.speed.assigned = Some(speed);
                self.speed.pending_after_altitude = None;
            }
        }

        let target = self.target_speed(weather);
        let accelerating = target > self.flight_state.ias;
        let mut rate =
            (if accelerating { self.perf.accel } else { self.perf.decel }).into_knots_per_sec() * 0.5;

        if self.flight_state.ground_speed.is_zero() {
            // not airborne; handled by ground taxi logic outside this crate's scope.
        } else if self.flight_state.altitude.amsl().is_zero() {
            rate *= if self.flight_state.ias < Speed::from_knots(40.) { 3. } else { 2. };
        } else if !self.flight_state.vertical_rate.is_zero() {
            rate *= 0.7;
        }

        let max_step = Speed::from_knots(rate * dt_secs);
        let delta = target - self.flight_state.ias;
        self.flight_state.ias =
            if delta.abs() <= max_step { target } else { self.flight_state.ias + max_step * delta.signum() };
        self.flight_state.ground_speed =
            crate::math::solve_expected_ground_speed(
                self.flight_state.true_airspeed(),
                weather.wind,
                self.flight_state.heading.into_dir2(),
            );
    }
}
