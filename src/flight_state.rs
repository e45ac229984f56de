//! The physical state integrated once per tick by [`crate::nav::tick`].
//!
//! Grounded on the teacher's `level::object::{Object, Airborne}` components, flattened into a
//! single struct since this crate has no ECS component storage to split fields across.

use bevy_math::Vec2;

use crate::units::{Angle, Heading, Position, Speed};

/// Physical state of the aircraft at the start (or end) of a tick.
#[derive(Debug, Clone)]
pub struct FlightState {
    pub position: Position<Vec2>,
    pub altitude: Position<f32>,
    pub previous_altitude: Position<f32>,
    /// True heading, always normalized to `[0, 360)` degrees (invariant 5).
    pub heading: Heading,
    pub ias: Speed<f32>,
    pub ground_speed: Speed<f32>,
    /// Signed bank angle; positive is a right (clockwise) bank.
    pub bank: Angle<f32>,
    /// Signed vertical rate; positive is climbing.
    pub vertical_rate: Speed<f32>,
    pub initial_departure_climb: bool,
    pub magnetic_variation: Angle<f32>,
    /// Nautical miles per degree of longitude at the aircraft's latitude, used to project
    /// geodetic route data into the local equirectangular plane.
    pub nm_per_lon_degree: f32,
}

impl FlightState {
    #[must_use]
    pub fn new(position: Position<Vec2>, altitude: Position<f32>, heading: Heading) -> Self {
        Self {
            position,
            altitude,
            previous_altitude: altitude,
            heading,
            ias: Speed::ZERO,
            ground_speed: Speed::ZERO,
            bank: Angle(0.),
            vertical_rate: Speed::ZERO,
            initial_departure_climb: false,
            magnetic_variation: Angle(0.),
            nm_per_lon_degree: 60.,
        }
    }

    /// True airspeed, corrected for altitude (2% per 1000ft above sea level).
    #[must_use]
    pub fn true_airspeed(&self) -> Speed<f32> {
        let factor = 1. + self.altitude.into_nm() * crate::math::TAS_DELTA_PER_NM;
        self.ias * factor
    }

    #[must_use]
    pub fn heading_magnetic(&self) -> Heading {
        self.heading + (-self.magnetic_variation)
    }
}
