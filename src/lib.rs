//! # Trail Astro Core Library
//!
//! An astronomical event engine for a single observer: sunrise and sunset
//! under four twilight definitions, moonrise and moonset, solar and lunar
//! altitude/azimuth, moon phase and illumination, solar and lunar noon, the
//! next sunrise/sunset, and a moon-phase-based tide type.
//!
//! ## Design Philosophy
//!
//! ### Pure Computation
//! - **No I/O in the engine**: every query is a function of a location, a
//!   date or instant, and an injected [`clock::Clock`]
//! - **Value results**: every result is an immutable, serializable value;
//!   "no event" is `None`, never an error
//! - **Thread-safe by construction**: no component mutates after
//!   construction, so nothing needs a lock
//!
//! ### Temporal Resolution
//! The engine samples the sky on fixed grids rather than solving in closed
//! form:
//! - **Rise/set**: 10-minute samples, linear interpolation at the crossing
//! - **Noon**: 1-minute samples over ±1 h around the rise/set midpoint
//! - **Charts**: 145 samples, -12 h to +12 h around "now" in 10-minute
//!   increments
//!
//! ### Data Flow
//! 1. **Ephemeris** ([`ephemeris`]): altitude/azimuth and ecliptic longitude
//! 2. **Sampler** ([`altitude`]): time series of altitudes
//! 3. **Locators** ([`riseset`], [`noon`]) and **phase** ([`lunar`])
//! 4. **Facade** ([`AstronomyService`]): day-level and "now"-level queries
//!
//! ## Core Types
//! - [`AstroAltitude`]: one altitude observation
//! - [`RiseSetTimes`]: optional rise and set instants
//! - [`MoonPhase`]: phase bucket, illumination and angle
//! - [`Tide`]: spring, neap or normal

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// Module declarations
pub mod altitude;
pub mod astronomy;
pub mod clock;
pub mod config;
pub mod coordinate;
pub mod ephemeris;
pub mod error;
pub mod lunar;
pub mod noon;
pub mod riseset;
pub mod tides;

#[cfg(test)]
mod tests;

pub use astronomy::AstronomyService;
pub use coordinate::{Bearing, CompassDirection, Coordinate};
pub use ephemeris::{Body, Ephemeris, MeeusEphemeris};
pub use error::{AstroError, Result};
pub use lunar::{MoonPhase, MoonTruePhase};
pub use riseset::{MoonTimes, RiseSetTimes, SunTimes, SunTimesMode};
pub use tides::Tide;

/// Altitude of a body at one instant.
///
/// # Example
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use trail_astro::AstroAltitude;
///
/// let time = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 6, 21, 12, 0, 0).unwrap();
/// let noon = AstroAltitude { time, altitude_degrees: 62.0 };
/// assert!(noon.is_above(0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AstroAltitude {
    pub time: DateTime<FixedOffset>,
    /// Degrees above the horizon, negative below
    pub altitude_degrees: f64,
}

impl AstroAltitude {
    pub fn is_above(&self, threshold: f64) -> bool {
        self.altitude_degrees > threshold
    }
}
