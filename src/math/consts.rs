//! Universal constants related to physics and units.

#![allow(clippy::excessive_precision, clippy::unreadable_literal, reason = "physical constants")]

use crate::units::Position;

/// Converts nautical miles to feet.
pub const FEET_PER_NM: f32 = 6076.12;
/// Converts nautical miles to statute miles.
pub const MILES_PER_NM: f32 = 1.15078;
/// Converts nautical miles to meters.
pub const METERS_PER_NM: f32 = 1852.;
/// Converts Mach 1 to knots at ISA sea level.
pub const KT_PER_MACH: f32 = 666.739;

/// Altitude of mean sea level.
pub const SEA_ALTITUDE: Position<f32> = Position::new(0.);

/// Altitude of the tropopause.
pub const TROPOPAUSE_ALTITUDE: Position<f32> = Position::new(36089.24 / FEET_PER_NM);

/// Standard sea level temperature in K, used to calculate density altitude.
pub const STANDARD_SEA_LEVEL_TEMPERATURE: f32 = 288.15;
/// Standard lapse rate of temperature, in K/ft.
pub const STANDARD_LAPSE_RATE: f32 = 0.0019812 * FEET_PER_NM;
/// Proportional increase of true airspeed per nm above sea level.
/// Equivalent to 2% per 1000ft.
pub const TAS_DELTA_PER_NM: f32 = 0.02e-3 * FEET_PER_NM;
/// Exponent used in the ICAO density-altitude approximation.
/// See <http://www.edwilliams.org/avform147.htm>.
pub const PRESSURE_DENSITY_ALTITUDE_POW: f32 = 0.2349690;

/// Altitude below which speed is capped at 250kt in most airspace.
pub const SPEED_LIMIT_ALTITUDE: Position<f32> = Position::new(10000. / FEET_PER_NM);
/// The speed limit enforced below [`SPEED_LIMIT_ALTITUDE`].
pub const SPEED_LIMIT_BELOW_10000: f32 = 250.;
/// Standard-rate turn cap, 3 degrees per second.
pub const STANDARD_RATE_TURN_DEG_PER_SEC: f32 = 3.;
/// Acceleration due to gravity, in nm/s^2 (9.80665 m/s^2).
pub const GRAVITY: f32 = 9.80665 / METERS_PER_NM;
