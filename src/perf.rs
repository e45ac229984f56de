//! Per-aircraft performance envelope.
//!
//! Grounded on the teacher's `store::ClimbProfile`/`NavLimits` pair (`omniatc-store`) and the
//! `route::takeoff::TakeoffNode` destructuring of limits into climb/speed bands.

use crate::units::{Accel, AngularSpeed, Position, Speed};

/// Category of propulsion, used to select the initial-departure-climb speed schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, serde::Serialize, serde::Deserialize)]
pub enum EngineCategory {
    Jet,
    Turboprop,
    Piston,
}

/// A climb or descent rate together with the altitude band it applies above.
#[derive(Debug, Clone, Copy)]
pub struct ClimbBand {
    pub above: Position<f32>,
    pub rate: Speed<f32>,
}

/// A small table of vertical-rate bands, looked up by current altitude.
///
/// Bands are stored ascending by `above`; [`ClimbProfile::rate_at`] returns the rate of the
/// last band whose `above` threshold has been reached.
#[derive(Debug, Clone)]
pub struct ClimbProfile {
    pub bands: Vec<ClimbBand>,
}

impl ClimbProfile {
    #[must_use]
    pub fn uniform(rate: Speed<f32>) -> Self {
        Self { bands: vec![ClimbBand { above: crate::math::SEA_ALTITUDE, rate }] }
    }

    #[must_use]
    pub fn rate_at(&self, altitude: Position<f32>) -> Speed<f32> {
        self.bands
            .iter()
            .rev()
            .find(|band| altitude >= band.above)
            .map_or(Speed::ZERO, |band| band.rate)
    }
}

/// Performance envelope of a single aircraft type, held for the aircraft's lifetime.
#[derive(Debug, Clone)]
pub struct AircraftPerformance {
    pub ceiling: Position<f32>,
    pub standard_climb: ClimbProfile,
    pub standard_descent: ClimbProfile,
    pub expedite_climb: ClimbProfile,
    pub expedite_descent: ClimbProfile,
    pub accel: Accel<f32>,
    pub decel: Accel<f32>,
    pub min_speed: Speed<f32>,
    pub landing_speed: Speed<f32>,
    pub v2_speed: Speed<f32>,
    pub cruise_ias: Speed<f32>,
    pub max_bank_angle: crate::units::Angle<f32>,
    pub max_bank_rate: AngularSpeed<f32>,
    pub engine_category: EngineCategory,
}

impl AircraftPerformance {
    /// `V2` falls back to 95% of landing speed when not separately specified, matching the
    /// convention noted in the glossary.
    #[must_use]
    pub fn v2_or_default(&self) -> Speed<f32> {
        if self.v2_speed.is_zero() { self.landing_speed * 0.95 } else { self.v2_speed }
    }

    /// Maximum indicated airspeed permitted at `altitude`: 250kt below 10,000ft, otherwise
    /// interpolated up to `min(cruise_ias, 280kt)` and finally the cruise IAS at the ceiling.
    #[must_use]
    pub fn max_ias_at(&self, altitude: Position<f32>) -> Speed<f32> {
        use crate::math::SPEED_LIMIT_ALTITUDE;

        let limit_250 = Speed::from_knots(crate::math::SPEED_LIMIT_BELOW_10000);
        if altitude <= SPEED_LIMIT_ALTITUDE {
            limit_250
        } else {
            let cap_280 = Speed::from_knots(280.).min(self.cruise_ias);
            let upper_band_start = SPEED_LIMIT_ALTITUDE + crate::units::Distance::from_feet(4000.);
            if altitude <= upper_band_start {
                let ratio = altitude.ratio_between(SPEED_LIMIT_ALTITUDE, upper_band_start);
                limit_250.lerp(cap_280, ratio.clamp(0., 1.))
            } else {
                let ratio = altitude.ratio_between(upper_band_start, self.ceiling);
                cap_280.lerp(self.cruise_ias, ratio.clamp(0., 1.))
            }
        }
    }
}
