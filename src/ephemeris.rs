//! # Ephemeris Provider
//!
//! The event engine only ever asks two questions of the sky: where a body
//! sits relative to the observer's horizon, and what its ecliptic longitude
//! is. Both live behind the [`Ephemeris`] trait so a higher-precision model
//! can replace the bundled one without touching any search algorithm.
//!
//! ## Bundled Model
//!
//! [`MeeusEphemeris`] is a low-precision model after Jean Meeus,
//! *Astronomical Algorithms*:
//! - **Sun**: chapter 25 low-accuracy series (~0.01°)
//! - **Moon**: chapter 47 with the 20 leading periodic terms of tables
//!   47.A/47.B (~0.3° in longitude)
//! - **Horizon**: geocentric altitude/azimuth through Greenwich mean
//!   sidereal time; no refraction and no parallax, which the rise/set
//!   thresholds account for instead
//!
//! Every inverse-trig argument is clamped, so the model never emits NaN for
//! a validated [`Coordinate`].

use crate::coordinate::Coordinate;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;

/// Julian Date of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian Date of J2000.0.
const J2000_JD: f64 = 2_451_545.0;

/// A celestial body the engine can locate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
}

/// Position of a body in the observer's horizontal frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HorizontalPosition {
    /// Degrees above the horizon, negative below
    pub altitude_degrees: f64,
    /// Degrees clockwise from true north
    pub azimuth_degrees: f64,
}

/// Deterministic, time-continuous source of celestial positions.
///
/// Implementations must return identical output for identical input and
/// must be continuous in time; the crossing and extremum searches rely on
/// both properties.
pub trait Ephemeris {
    /// Altitude and azimuth of `body` seen from `location` at `time`.
    fn position_of(
        &self,
        body: Body,
        location: &Coordinate,
        time: &DateTime<FixedOffset>,
    ) -> HorizontalPosition;

    /// Geocentric ecliptic longitude of `body` at `time`, in degrees.
    fn ecliptic_longitude_of(&self, body: Body, time: &DateTime<FixedOffset>) -> f64;
}

impl<E: Ephemeris + ?Sized> Ephemeris for &E {
    fn position_of(
        &self,
        body: Body,
        location: &Coordinate,
        time: &DateTime<FixedOffset>,
    ) -> HorizontalPosition {
        (**self).position_of(body, location, time)
    }

    fn ecliptic_longitude_of(&self, body: Body, time: &DateTime<FixedOffset>) -> f64 {
        (**self).ecliptic_longitude_of(body, time)
    }
}

/// Low-precision analytic ephemeris (Meeus chapters 25 and 47).
#[derive(Clone, Copy, Debug, Default)]
pub struct MeeusEphemeris;

impl Ephemeris for MeeusEphemeris {
    fn position_of(
        &self,
        body: Body,
        location: &Coordinate,
        time: &DateTime<FixedOffset>,
    ) -> HorizontalPosition {
        let jd = julian_date(time);
        let t = julian_century(jd);
        let (ra, dec) = match body {
            Body::Sun => sun_equatorial(t),
            Body::Moon => {
                let (lon, lat) = moon_ecliptic(t);
                ecliptic_to_equatorial(lon, lat, obliquity_corrected(t))
            }
        };
        let lst = normalize_degrees(greenwich_sidereal_time(jd) + location.longitude());
        equatorial_to_horizontal(ra, dec, location.latitude(), lst)
    }

    fn ecliptic_longitude_of(&self, body: Body, time: &DateTime<FixedOffset>) -> f64 {
        let t = julian_century(julian_date(time));
        match body {
            Body::Sun => sun_apparent_longitude(t),
            Body::Moon => moon_ecliptic(t).0,
        }
    }
}

/// Julian Date of an instant (UT, millisecond resolution).
pub fn julian_date(time: &DateTime<FixedOffset>) -> f64 {
    time.timestamp_millis() as f64 / 86_400_000.0 + UNIX_EPOCH_JD
}

fn julian_century(jd: f64) -> f64 {
    (jd - J2000_JD) / 36_525.0
}

/// Wrap an angle into [0, 360).
pub(crate) fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

// ---------- Sun (Meeus ch. 25) ----------------------------------------------

fn sun_mean_longitude(t: f64) -> f64 {
    normalize_degrees(280.46646 + t * (36000.76983 + t * 0.0003032))
}

fn sun_mean_anomaly(t: f64) -> f64 {
    normalize_degrees(357.52911 + t * (35999.05029 - t * 0.0001537))
}

fn sun_equation_of_center(t: f64) -> f64 {
    let m = sun_mean_anomaly(t) * DEG;
    m.sin() * (1.914602 - t * (0.004817 + t * 0.000014))
        + (2.0 * m).sin() * (0.019993 - t * 0.000101)
        + (3.0 * m).sin() * 0.000289
}

fn sun_apparent_longitude(t: f64) -> f64 {
    let omega = 125.04 - 1934.136 * t;
    normalize_degrees(
        sun_mean_longitude(t) + sun_equation_of_center(t) - 0.00569 - 0.00478 * (omega * DEG).sin(),
    )
}

fn mean_obliquity(t: f64) -> f64 {
    23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0
}

fn obliquity_corrected(t: f64) -> f64 {
    let omega = 125.04 - 1934.136 * t;
    mean_obliquity(t) + 0.00256 * (omega * DEG).cos()
}

fn sun_equatorial(t: f64) -> (f64, f64) {
    ecliptic_to_equatorial(sun_apparent_longitude(t), 0.0, obliquity_corrected(t))
}

// ---------- Moon (Meeus ch. 47) ---------------------------------------------

// Table 47.A: (D, M, M', F, Σl coefficient in 1e-6 degrees)
const TERMS_L: [(f64, f64, f64, f64, f64); 20] = [
    (0.0, 0.0, 1.0, 0.0, 6_288_774.0),
    (2.0, 0.0, -1.0, 0.0, 1_274_027.0),
    (2.0, 0.0, 0.0, 0.0, 658_314.0),
    (0.0, 0.0, 2.0, 0.0, 213_618.0),
    (0.0, 1.0, 0.0, 0.0, -185_116.0),
    (0.0, 0.0, 0.0, 2.0, -114_332.0),
    (2.0, 0.0, -2.0, 0.0, 58_793.0),
    (2.0, -1.0, -1.0, 0.0, 57_066.0),
    (2.0, 0.0, 1.0, 0.0, 53_322.0),
    (2.0, -1.0, 0.0, 0.0, 45_758.0),
    (0.0, 1.0, -1.0, 0.0, -40_923.0),
    (1.0, 0.0, 0.0, 0.0, -34_720.0),
    (0.0, 1.0, 1.0, 0.0, -30_383.0),
    (2.0, 0.0, 0.0, -2.0, 15_327.0),
    (0.0, 0.0, 1.0, 2.0, -12_528.0),
    (0.0, 0.0, 1.0, -2.0, 10_980.0),
    (4.0, 0.0, -1.0, 0.0, 10_675.0),
    (0.0, 0.0, 3.0, 0.0, 10_034.0),
    (4.0, 0.0, -2.0, 0.0, 8_548.0),
    (2.0, 1.0, -1.0, 0.0, -7_888.0),
];

// Table 47.B: (D, M, M', F, Σb coefficient in 1e-6 degrees)
const TERMS_B: [(f64, f64, f64, f64, f64); 20] = [
    (0.0, 0.0, 0.0, 1.0, 5_128_122.0),
    (0.0, 0.0, 1.0, 1.0, 280_602.0),
    (0.0, 0.0, 1.0, -1.0, 277_693.0),
    (2.0, 0.0, 0.0, -1.0, 173_237.0),
    (2.0, 0.0, -1.0, 1.0, 55_413.0),
    (2.0, 0.0, -1.0, -1.0, 46_271.0),
    (2.0, 0.0, 0.0, 1.0, 32_573.0),
    (0.0, 0.0, 2.0, 1.0, 17_198.0),
    (2.0, 0.0, 1.0, -1.0, 9_266.0),
    (0.0, 0.0, 2.0, -1.0, 8_822.0),
    (2.0, -1.0, 0.0, -1.0, 8_216.0),
    (2.0, 0.0, -2.0, -1.0, 4_324.0),
    (2.0, 0.0, 1.0, 1.0, 4_200.0),
    (2.0, 1.0, 0.0, -1.0, -3_359.0),
    (2.0, -1.0, -1.0, 1.0, 2_463.0),
    (2.0, -1.0, 0.0, 1.0, 2_211.0),
    (2.0, -1.0, -1.0, -1.0, 2_065.0),
    (0.0, 1.0, -1.0, -1.0, -1_870.0),
    (4.0, 0.0, -1.0, -1.0, 1_828.0),
    (0.0, 1.0, 0.0, 1.0, -1_794.0),
];

/// Fundamental lunar arguments (L', D, M, M', F), degrees.
fn moon_arguments(t: f64) -> (f64, f64, f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let lp = 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t2 + t3 / 538_841.0
        - t4 / 65_194_000.0;
    let d = 297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t2 + t3 / 545_868.0
        - t4 / 113_065_000.0;
    let m = 357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t2 + t3 / 24_490_000.0;
    let mp = 134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t2 + t3 / 69_699.0
        - t4 / 14_712_000.0;
    let f = 93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t2 - t3 / 3_526_000.0
        + t4 / 863_310_000.0;
    (
        normalize_degrees(lp),
        normalize_degrees(d),
        normalize_degrees(m),
        normalize_degrees(mp),
        normalize_degrees(f),
    )
}

/// Geocentric ecliptic (longitude, latitude) of the Moon, degrees.
fn moon_ecliptic(t: f64) -> (f64, f64) {
    let (lp, d, m, mp, f) = moon_arguments(t);

    // Terms involving the Sun's anomaly shrink with Earth's eccentricity
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;
    let e_factor = |tm: f64| match tm.abs() as i32 {
        1 => e,
        2 => e * e,
        _ => 1.0,
    };

    let mut sum_l: f64 = TERMS_L
        .iter()
        .map(|&(td, tm, tmp, tf, coeff)| {
            coeff * e_factor(tm) * ((td * d + tm * m + tmp * mp + tf * f) * DEG).sin()
        })
        .sum();
    let mut sum_b: f64 = TERMS_B
        .iter()
        .map(|&(td, tm, tmp, tf, coeff)| {
            coeff * e_factor(tm) * ((td * d + tm * m + tmp * mp + tf * f) * DEG).sin()
        })
        .sum();

    // Venus, Jupiter and flattening corrections (A1, A2, A3)
    let a1 = normalize_degrees(119.75 + 131.849 * t);
    let a2 = normalize_degrees(53.09 + 479_264.290 * t);
    let a3 = normalize_degrees(313.45 + 481_266.484 * t);

    sum_l += 3958.0 * (a1 * DEG).sin() + 1962.0 * ((lp - f) * DEG).sin() + 318.0 * (a2 * DEG).sin();
    sum_b += -2235.0 * (lp * DEG).sin()
        + 382.0 * (a3 * DEG).sin()
        + 175.0 * ((a1 - f) * DEG).sin()
        + 175.0 * ((a1 + f) * DEG).sin()
        + 127.0 * ((lp - mp) * DEG).sin()
        - 115.0 * ((lp + mp) * DEG).sin();

    (normalize_degrees(lp + sum_l / 1_000_000.0), sum_b / 1_000_000.0)
}

// ---------- Frames ----------------------------------------------------------

fn greenwich_sidereal_time(jd: f64) -> f64 {
    let t = julian_century(jd);
    normalize_degrees(
        280.460_618_37 + 360.985_647_366_29 * (jd - J2000_JD) + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Ecliptic to equatorial; returns (right ascension, declination) in degrees.
fn ecliptic_to_equatorial(lon: f64, lat: f64, obliquity: f64) -> (f64, f64) {
    let (lon, lat, eps) = (lon * DEG, lat * DEG, obliquity * DEG);

    let ra = (lon.sin() * eps.cos() - lat.tan() * eps.sin()).atan2(lon.cos());
    let sin_dec = lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin();

    (normalize_degrees(ra / DEG), sin_dec.clamp(-1.0, 1.0).asin() / DEG)
}

fn equatorial_to_horizontal(ra: f64, dec: f64, lat: f64, lst: f64) -> HorizontalPosition {
    let ha = (lst - ra) * DEG;
    let (dec, lat) = (dec * DEG, lat * DEG);

    let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * ha.cos();
    let altitude = sin_alt.clamp(-1.0, 1.0).asin() / DEG;

    // Measured from north through east
    let y = -dec.cos() * ha.sin();
    let x = dec.sin() * lat.cos() - dec.cos() * ha.cos() * lat.sin();
    let azimuth = normalize_degrees(y.atan2(x) / DEG);

    HorizontalPosition {
        altitude_degrees: altitude,
        azimuth_degrees: azimuth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
            .unwrap()
            .fixed_offset()
    }

    #[test]
    fn test_julian_date_j2000() {
        let jd = julian_date(&utc(2000, 1, 1, 12, 0));
        assert!((jd - J2000_JD).abs() < 1e-9, "JD at J2000: {jd}");
    }

    #[test]
    fn test_moon_longitude_meeus_example() {
        // Meeus example 47.a: 1992 April 12, 0h TD, λ ≈ 133.17°
        let jd = julian_date(&utc(1992, 4, 12, 0, 0));
        let (lon, lat) = moon_ecliptic(julian_century(jd));
        assert!((lon - 133.17).abs() < 0.5, "Moon longitude: {lon:.2}");
        assert!((lat + 3.23).abs() < 0.5, "Moon latitude: {lat:.2}");
    }

    #[test]
    fn test_sun_longitude_near_equinox() {
        // March equinox 2024-03-20 03:06 UTC
        let lon = MeeusEphemeris.ecliptic_longitude_of(Body::Sun, &utc(2024, 3, 20, 3, 6));
        let off = (lon + 180.0).rem_euclid(360.0) - 180.0;
        assert!(off.abs() < 0.05, "Sun longitude at equinox: {lon}");
    }

    #[test]
    fn test_sun_due_south_at_local_noon() {
        // 2024-06-21 near solar noon at 0°E: the Sun transits at about 12:02 UTC
        let greenwich = Coordinate::new(51.48, 0.0).unwrap();
        let pos = MeeusEphemeris.position_of(Body::Sun, &greenwich, &utc(2024, 6, 21, 12, 2));
        assert!((pos.azimuth_degrees - 180.0).abs() < 2.0, "{pos:?}");
        // 90 - 51.48 + 23.44
        assert!((pos.altitude_degrees - 61.96).abs() < 0.3, "{pos:?}");
    }

    #[test]
    fn test_positions_are_finite_at_poles() {
        let pole = Coordinate::new(90.0, 0.0).unwrap();
        for body in [Body::Sun, Body::Moon] {
            let pos = MeeusEphemeris.position_of(body, &pole, &utc(2024, 1, 1, 0, 0));
            assert!(pos.altitude_degrees.is_finite());
            assert!(pos.azimuth_degrees.is_finite());
            assert!((0.0..360.0).contains(&pos.azimuth_degrees));
        }
    }

    #[test]
    fn test_positions_are_deterministic() {
        let loc = Coordinate::new(42.0, -72.0).unwrap();
        let t = utc(2024, 5, 5, 5, 5);
        let a = MeeusEphemeris.position_of(Body::Moon, &loc, &t);
        let b = MeeusEphemeris.position_of(Body::Moon, &loc, &t);
        assert_eq!(a, b);
    }
}
