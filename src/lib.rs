//! Per-aircraft autopilot/navigation simulation core for the training simulator.
//!
//! A [`nav::Nav`] owns the full autopilot state of a single aircraft: assigned/cleared
//! altitude and speed, lateral mode (heading, LNAV, arc, procedure turn, hold, approach
//! intercept), and the physical [`flight_state::FlightState`] it integrates each tick. The
//! crate has no knowledge of other aircraft, rendering, or the scenario file format; it is
//! driven entirely through [`nav::Nav::update`] and the command methods in [`nav::command`].

#![allow(clippy::module_name_repetitions, reason = "domain types intentionally echo module names")]

pub mod config;
pub mod flight_state;
pub mod math;
pub mod navdb;
pub mod perf;
pub mod rand_jitter;
pub mod units;
pub mod waypoint;
pub mod weather;

pub mod nav;

pub use config::NavConfig;
pub use flight_state::FlightState;
pub use nav::Nav;
pub use perf::AircraftPerformance;
pub use waypoint::Waypoint;
