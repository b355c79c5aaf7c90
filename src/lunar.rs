//! Moon phase & illumination from the Sun–Moon elongation in longitude.
//!
//! The phase angle is the Moon's ecliptic longitude minus the Sun's,
//! wrapped to [0°, 360°): 0° new, 90° first quarter, 180° full, 270° third
//! quarter. Phase is a geocentric relation, so no observer location is
//! needed.

use crate::ephemeris::{normalize_degrees, Body, Ephemeris};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// The eight named phases, each owning a 45° band of phase angle centered on
/// its nominal angle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonTruePhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    ThirdQuarter,
    WaningCrescent,
}

impl MoonTruePhase {
    const IN_ORDER: [MoonTruePhase; 8] = [
        MoonTruePhase::New,
        MoonTruePhase::WaxingCrescent,
        MoonTruePhase::FirstQuarter,
        MoonTruePhase::WaxingGibbous,
        MoonTruePhase::Full,
        MoonTruePhase::WaningGibbous,
        MoonTruePhase::ThirdQuarter,
        MoonTruePhase::WaningCrescent,
    ];

    /// Bucket a phase angle in degrees. Band edges sit at odd multiples of
    /// 22.5°; each band includes its lower edge.
    pub fn from_angle(angle: f64) -> Self {
        let index = ((normalize_degrees(angle) + 22.5) / 45.0).floor() as usize % 8;
        Self::IN_ORDER[index]
    }
}

/// Phase bucket plus illuminated fraction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoonPhase {
    pub phase: MoonTruePhase,
    /// Illuminated fraction of the disc (0–1)
    pub illumination: f64,
    /// Elongation in longitude, degrees in [0, 360)
    pub angle: f64,
}

impl MoonPhase {
    pub fn from_angle(angle: f64) -> Self {
        let angle = normalize_degrees(angle);
        MoonPhase {
            phase: MoonTruePhase::from_angle(angle),
            illumination: illumination(angle),
            angle,
        }
    }
}

/// Illuminated fraction for a phase angle: `(1 − cos θ) / 2`.
pub fn illumination(angle: f64) -> f64 {
    ((1.0 - angle.to_radians().cos()) / 2.0).clamp(0.0, 1.0)
}

/// Stateless phase calculator over an [`Ephemeris`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MoonPhaseCalculator<E> {
    ephemeris: E,
}

impl<E: Ephemeris> MoonPhaseCalculator<E> {
    pub fn new(ephemeris: E) -> Self {
        MoonPhaseCalculator { ephemeris }
    }

    /// Phase at `time`.
    pub fn phase(&self, time: &DateTime<FixedOffset>) -> MoonPhase {
        let moon = self.ephemeris.ecliptic_longitude_of(Body::Moon, time);
        let sun = self.ephemeris.ecliptic_longitude_of(Body::Sun, time);
        MoonPhase::from_angle(moon - sun)
    }
}
