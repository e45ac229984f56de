//! Tunable constants a scenario author would reasonably want to retune.
//!
//! The teacher registers per-subsystem `Conf` structs with `bevy_mod_config` so they can be
//! edited live from the in-app settings UI; this crate has no app to register configuration
//! into, so the equivalent surface here is a plain struct with a `Default` impl, following the
//! same "collect the magic numbers into one named place" discipline.

use std::time::Duration;

use crate::units::Distance;

/// Tunable constants for the navigation core, independent of any particular aircraft.
#[derive(Debug, Clone)]
pub struct NavConfig {
    /// Minimum pilot reaction delay before a deferred heading/LNAV switch takes effect.
    pub reaction_delay_min: Duration,
    /// Maximum pilot reaction delay before a deferred heading/LNAV switch takes effect.
    pub reaction_delay_max: Duration,
    /// Reaction delay is scaled by this factor when switching LNAV -> heading, which pilots
    /// execute faster than the reverse.
    pub lnav_to_heading_factor: f32,
    /// Altitude band over which the vertical-rate fade near a target altitude begins.
    pub altitude_fade_band: Distance<f32>,
    /// Fraction of the performance climb/descent rate the altitude integrator may blend towards
    /// per second.
    pub altitude_blend_per_sec: f32,
    /// Multiplier applied to [`Self::altitude_blend_per_sec`] while expediting.
    pub expedite_blend_multiplier: f32,
    /// Horizontal distance within which a fly-over waypoint is considered "reached".
    pub fly_over_tolerance: Distance<f32>,
    /// ETA threshold below which a waypoint restriction is obeyed immediately rather than
    /// planned ahead of time.
    pub immediate_restriction_eta: Duration,
    /// Default racetrack procedure-turn outbound leg duration for ILS/LOC/VOR approaches.
    pub pt_outbound_leg_time: Duration,
    /// Default racetrack procedure-turn outbound leg distance for RNAV approaches.
    pub pt_outbound_leg_distance: Distance<f32>,
    /// Duration of the outbound leg in the standard 45/180 procedure turn.
    pub pt45_outbound_leg_time: Duration,
    /// Default hold leg duration below 14,000ft.
    pub hold_leg_time_low: Duration,
    /// Default hold leg duration at or above 14,000ft.
    pub hold_leg_time_high: Duration,
    /// Altitude threshold distinguishing [`Self::hold_leg_time_low`] from
    /// [`Self::hold_leg_time_high`].
    pub hold_leg_altitude_threshold: crate::units::Position<f32>,
    /// Heading tolerance, beyond crab-angle compensation, used when deciding whether a ghost
    /// aircraft has established on the intercept course.
    pub intercept_heading_tolerance_deg: f32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            reaction_delay_min: Duration::from_secs(4),
            reaction_delay_max: Duration::from_secs(9),
            lnav_to_heading_factor: 0.6,
            altitude_fade_band: Distance::from_feet(500.),
            altitude_blend_per_sec: 0.075,
            expedite_blend_multiplier: 2.,
            fly_over_tolerance: Distance::from_nm(0.05),
            immediate_restriction_eta: Duration::from_secs(5),
            pt_outbound_leg_time: Duration::from_secs(60),
            pt_outbound_leg_distance: Distance::from_nm(2.),
            pt45_outbound_leg_time: Duration::from_secs(60),
            hold_leg_time_low: Duration::from_secs(60),
            hold_leg_time_high: Duration::from_secs(90),
            hold_leg_altitude_threshold: crate::units::Position::new(14000. / crate::math::FEET_PER_NM),
            intercept_heading_tolerance_deg: 10.,
        }
    }
}
