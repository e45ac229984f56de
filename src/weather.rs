//! Read-only external weather model consulted once per tick.
//!
//! Grounded on the teacher's `level::wind::Vector`/`EffectRegion`/`Locator` and
//! `level::weather::Weather` components, reworked from Bevy `SystemParam`s/components into a
//! plain data model since this crate has no ECS world to query.

use bevy_math::{Vec2, Vec3A};

use crate::units::{Angle, Position, Speed};

/// A wind layer effective within an axis-aligned horizontal region between two altitudes.
#[derive(Debug, Clone, Copy)]
pub struct WindRegion {
    /// Wind vector at the bottom of the region.
    pub bottom: Speed<Vec2>,
    /// Wind vector at the top of the region.
    pub top: Speed<Vec2>,
    pub min: Position<Vec3A>,
    pub max: Position<Vec3A>,
}

impl WindRegion {
    fn contains(&self, point: Position<Vec3A>) -> bool {
        let p = point.get();
        let min = self.min.get();
        let max = self.max.get();
        p.cmpge(min).all() && p.cmple(max).all()
    }

    fn sample(&self, point: Position<Vec3A>) -> Speed<Vec2> {
        let min_z = self.min.get().z;
        let max_z = self.max.get().z;
        let level = if max_z > min_z { (point.get().z - min_z) / (max_z - min_z) } else { 0. };
        self.bottom.lerp(self.top, level.clamp(0., 1.))
    }
}

/// A point-in-time atmospheric sample at a given position.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    /// Horizontal wind vector (nm/s, local projection).
    pub wind: Speed<Vec2>,
    /// Static air temperature in kelvin.
    pub temperature: f32,
    /// Barometric pressure in hPa.
    pub pressure: f32,
    /// Relative humidity in `[0, 1]`.
    pub relative_humidity: f32,
}

impl Sample {
    /// Wind component along `course` in the direction of travel (positive = tailwind).
    #[must_use]
    pub fn component(&self, course: Angle<f32>) -> Speed<f32> {
        let dir = bevy_math::Vec2::new(course.sin(), course.cos());
        self.wind.x() * Speed(dir.x) + self.wind.y() * Speed(dir.y)
    }

    #[must_use]
    pub fn direction(&self) -> Angle<f32> {
        let v = self.wind.0;
        Angle(v.x.atan2(v.y))
    }

    #[must_use]
    pub fn speed(&self) -> Speed<f32> { self.wind.magnitude_exact() }
}

/// Read-only weather model: a set of layered wind regions plus a uniform atmosphere profile
/// used for density-altitude and climb-rate degradation calculations.
#[derive(Debug, Clone, Default)]
pub struct Weather {
    pub regions: Vec<WindRegion>,
    pub sea_level_temperature: f32,
    pub sea_level_pressure: f32,
    pub relative_humidity: f32,
}

impl Weather {
    /// Samples the weather at a given horizontal position and altitude.
    ///
    /// This is called at most once per tick per aircraft; the resulting [`Sample`] is then
    /// shared by every sub-component so they observe a consistent snapshot (see the
    /// concurrency model in the design notes).
    #[must_use]
    pub fn lookup(&self, position: Position<Vec2>, altitude: Position<f32>) -> Sample {
        let point = position.with_altitude(altitude);
        let point = Position::new(Vec3A::from(point.get()));

        let wind = self
            .regions
            .iter()
            .filter(|region| region.contains(point))
            .map(|region| region.sample(point))
            .sum();

        let feet = altitude.into_feet();
        let lapse = crate::math::STANDARD_LAPSE_RATE;
        let temperature =
            (self.sea_level_temperature - lapse * feet / crate::math::FEET_PER_NM).max(180.);

        Sample {
            wind,
            temperature,
            pressure: self.sea_level_pressure,
            relative_humidity: self.relative_humidity,
        }
    }
}
