//! C1: the tick driver — runs one simulated second of autopilot logic in a fixed order so that,
//! given identical inputs and RNG state, two runs produce identical results.
//!
//! Grounded on the teacher's per-system `App::Update` ordering in `level::nav.rs` (vertical before
//! lateral before position integration), collapsed from a sequence of Bevy systems each scheduled
//! over the whole `World` into a single method called once per aircraft per simulated second.

use std::time::Duration;

use crate::navdb::NavDb;
use crate::units::Distance;
use crate::waypoint::Waypoint;
use crate::weather::{Sample, Weather};

use super::Nav;

impl Nav {
    /// Advances this aircraft's autopilot by `dt` (normally exactly one simulated second),
    /// returning the waypoint just crossed, if any.
    ///
    /// Order: flush any due deferred reaction, sample the weather once, plan and integrate speed,
    /// plan and integrate altitude, plan and integrate heading/bank, integrate position, then
    /// advance past any waypoint just reached. Every sub-component reads the same [`Weather`]
    /// sample so they observe a consistent atmospheric snapshot for the tick.
    pub fn update(&mut self, weather: &Weather, navdb: &dyn NavDb, dt: Duration) -> Option<Waypoint> {
        self.flush_deferred(dt);

        let sample = weather.lookup(self.flight_state.position, self.flight_state.altitude);
        let dt_secs = dt.as_secs_f32();

        self.integrate_airspeed(&sample, dt_secs);
        self.integrate_altitude(&sample, dt_secs);

        let heading_target = self.target_heading(&sample);
        self.integrate_heading(heading_target, dt_secs);

        self.integrate_position(&sample, dt);

        let crossed = self.update_waypoints(navdb, &sample);

        #[cfg(debug_assertions)]
        self.debug_assert_invariants();

        crossed
    }

    /// Integrates horizontal position from true airspeed (along the current heading) plus wind
    /// drift, then records the resulting ground speed for display/reporting.
    fn integrate_position(&mut self, weather: &Sample, dt: Duration) {
        let tas_vector = self.flight_state.true_airspeed() * self.flight_state.heading.into_dir2();
        let ground_velocity = tas_vector + weather.wind;
        let step: Distance<bevy_math::Vec2> = ground_velocity * dt;
        self.flight_state.position += step;
        self.flight_state.ground_speed = ground_velocity.magnitude_exact();
    }
}
