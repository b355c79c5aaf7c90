//! Shared fixtures for the crate-level tests.

use crate::clock::FixedClock;
use crate::coordinate::Coordinate;
use crate::ephemeris::{Body, Ephemeris, HorizontalPosition};
use crate::AstronomyService;
use chrono::{DateTime, FixedOffset, TimeZone};
use std::f64::consts::TAU;

/// A sky where every body follows the same cosine altitude curve.
///
/// `altitude = mean + amplitude * cos(2π (t − peak) / period)`, which makes
/// crossings and maxima computable by hand.
#[derive(Clone, Copy, Debug)]
pub struct CosineSky {
    pub peak: DateTime<FixedOffset>,
    pub mean: f64,
    pub amplitude: f64,
    pub period_hours: f64,
    /// Moon-minus-Sun longitude reported for phase queries
    pub elongation: f64,
}

impl CosineSky {
    /// A 24 h day peaking at 12:00, ±40° around the horizon.
    pub fn daily(peak: DateTime<FixedOffset>) -> Self {
        CosineSky {
            peak,
            mean: 0.0,
            amplitude: 40.0,
            period_hours: 24.0,
            elongation: 0.0,
        }
    }

    pub fn altitude(&self, time: &DateTime<FixedOffset>) -> f64 {
        let hours = (*time - self.peak).num_milliseconds() as f64 / 3_600_000.0;
        self.mean + self.amplitude * (TAU * hours / self.period_hours).cos()
    }
}

impl Ephemeris for CosineSky {
    fn position_of(
        &self,
        _body: Body,
        _location: &Coordinate,
        time: &DateTime<FixedOffset>,
    ) -> HorizontalPosition {
        HorizontalPosition {
            altitude_degrees: self.altitude(time),
            azimuth_degrees: 180.0,
        }
    }

    fn ecliptic_longitude_of(&self, body: Body, _time: &DateTime<FixedOffset>) -> f64 {
        match body {
            Body::Sun => 100.0,
            Body::Moon => 100.0 + self.elongation,
        }
    }
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// Eastern standard time, used for the mid-latitude scenarios.
pub fn eastern() -> FixedOffset {
    FixedOffset::west_opt(5 * 3600).unwrap()
}

pub fn at(zone: FixedOffset, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
    zone.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// 42°N 72°W, southern New England.
pub fn new_england() -> Coordinate {
    Coordinate::new(42.0, -72.0).unwrap()
}

/// Longyearbyen, Svalbard.
pub fn svalbard() -> Coordinate {
    Coordinate::new(78.22, 15.63).unwrap()
}

pub fn service_at(now: DateTime<FixedOffset>) -> AstronomyService<FixedClock> {
    AstronomyService::with_clock(FixedClock::new(now))
}

pub fn synthetic_service_at(
    now: DateTime<FixedOffset>,
    sky: CosineSky,
) -> AstronomyService<FixedClock, CosineSky> {
    AstronomyService::with_clock_and_ephemeris(FixedClock::new(now), sky)
}

/// Absolute difference between two instants, in seconds.
pub fn seconds_apart(a: DateTime<FixedOffset>, b: DateTime<FixedOffset>) -> i64 {
    (a - b).num_seconds().abs()
}
