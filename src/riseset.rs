//! # Rise/Set Locator
//!
//! One crossing search serves every rise/set query in the crate. The Sun's
//! four twilight definitions and the Moon differ only in the threshold
//! altitude, the body, and the search window.
//!
//! ## Algorithm
//! 1. Sample altitude every 10 minutes across the window, both ends included
//! 2. Walk the samples pairwise looking for the threshold:
//!    - **up** between `i` and `i+1` when `alt[i] < threshold <= alt[i+1]`
//!    - **down** between `i` and `i+1` when `alt[i] >= threshold > alt[i+1]`
//! 3. Linearly interpolate the crossing instant between the two samples:
//!    ```text
//!    t = t_i + (t_i+1 - t_i) * (threshold - alt[i]) / (alt[i+1] - alt[i])
//!    ```
//!
//! "Up" is the first upward crossing. "Down" is the first downward crossing
//! after "up"; without an "up" the down search runs from the window start,
//! which covers a body that is already up at the start and sets before
//! rising again. Ten minutes is the precision floor; there is no bisection.
//!
//! A window that never crosses (polar day or night, a circumpolar Moon)
//! yields absent fields, which is a valid outcome rather than an error.

use crate::altitude::{local_midnight, AltitudeSampler, DEFAULT_STEP_MINUTES};
use crate::coordinate::Coordinate;
use crate::ephemeris::{Body, Ephemeris};
use crate::AstroAltitude;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

/// Moonrise/moonset altitude for a geocentric ephemeris: mean horizontal
/// parallax (0.7275 × 0.9507°) less refraction (34′).
pub const MOON_THRESHOLD_DEGREES: f64 = 0.125;

/// Extra search time on each side of the calendar day for the Moon.
const MOON_WINDOW_PADDING_HOURS: i64 = 1;

/// Result of a single crossing search.
///
/// Either field may be absent. The locator guarantees `up < down` when both
/// come from one search, but callers combining results across days must
/// treat them as independent instants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiseSetTimes {
    /// Upward crossing of the threshold (rise)
    pub up: Option<DateTime<FixedOffset>>,
    /// Downward crossing of the threshold (set)
    pub down: Option<DateTime<FixedOffset>>,
}

pub type SunTimes = RiseSetTimes;
pub type MoonTimes = RiseSetTimes;

/// Twilight definitions, each carrying its threshold altitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SunTimesMode {
    /// Upper limb on the horizon, refraction included
    #[default]
    Actual,
    Civil,
    Nautical,
    Astronomical,
}

impl SunTimesMode {
    pub const ALL: [SunTimesMode; 4] = [
        SunTimesMode::Actual,
        SunTimesMode::Civil,
        SunTimesMode::Nautical,
        SunTimesMode::Astronomical,
    ];

    /// Altitude of the Sun's center defining this boundary, in degrees.
    pub fn threshold_degrees(self) -> f64 {
        match self {
            SunTimesMode::Actual => -0.833,
            SunTimesMode::Civil => -6.0,
            SunTimesMode::Nautical => -12.0,
            SunTimesMode::Astronomical => -18.0,
        }
    }
}

/// Threshold crossing search over a sampled window.
#[derive(Clone, Copy, Debug, Default)]
pub struct RiseSetLocator<E> {
    sampler: AltitudeSampler<E>,
}

impl<E: Ephemeris> RiseSetLocator<E> {
    pub fn new(ephemeris: E) -> Self {
        RiseSetLocator {
            sampler: AltitudeSampler::new(ephemeris),
        }
    }

    /// Find the first rise and the following set of `body` through
    /// `threshold` degrees within `[start, start + duration]`.
    pub fn locate(
        &self,
        body: Body,
        location: &Coordinate,
        start: DateTime<FixedOffset>,
        duration: Duration,
        threshold: f64,
    ) -> RiseSetTimes {
        let samples = self
            .sampler
            .sample(body, location, start, duration, DEFAULT_STEP_MINUTES);
        let times = find_crossings(&samples, threshold);

        if times.up.is_none() && times.down.is_none() {
            debug!("{body:?} never crosses {threshold}° at {location} in window starting {start}");
        }
        times
    }
}

/// Apply the crossing rules to an already-sampled series.
pub fn find_crossings(samples: &[AstroAltitude], threshold: f64) -> RiseSetTimes {
    let rising = samples.windows(2).position(|w| {
        w[0].altitude_degrees < threshold && threshold <= w[1].altitude_degrees
    });
    let up = rising.map(|i| interpolate(&samples[i], &samples[i + 1], threshold));

    let search_from = rising.map_or(0, |i| i + 1);
    let down = samples[search_from.min(samples.len())..]
        .windows(2)
        .filter(|w| w[0].altitude_degrees >= threshold && threshold > w[1].altitude_degrees)
        .map(|w| interpolate(&w[0], &w[1], threshold))
        // an up landing exactly on a sample can share its instant with a down
        .find(|down| up.map_or(true, |up| *down > up));

    RiseSetTimes { up, down }
}

fn interpolate(a: &AstroAltitude, b: &AstroAltitude, threshold: f64) -> DateTime<FixedOffset> {
    let fraction = (threshold - a.altitude_degrees) / (b.altitude_degrees - a.altitude_degrees);
    let span_ms = (b.time - a.time).num_milliseconds() as f64;
    a.time + Duration::milliseconds((span_ms * fraction).round() as i64)
}

/// Sunrise/sunset for a calendar day under a twilight definition.
#[derive(Clone, Copy, Debug, Default)]
pub struct SunTimesCalculator<E> {
    locator: RiseSetLocator<E>,
}

impl<E: Ephemeris> SunTimesCalculator<E> {
    pub fn new(ephemeris: E) -> Self {
        SunTimesCalculator {
            locator: RiseSetLocator::new(ephemeris),
        }
    }

    /// Search the 24 h from local midnight of `date` in `zone`.
    pub fn calculate(
        &self,
        location: &Coordinate,
        date: NaiveDate,
        zone: FixedOffset,
        mode: SunTimesMode,
    ) -> SunTimes {
        self.locator.locate(
            Body::Sun,
            location,
            local_midnight(date, zone),
            Duration::days(1),
            mode.threshold_degrees(),
        )
    }
}

/// Moonrise/moonset for a calendar day.
///
/// The lunar day is about 24 h 50 min and drifts against the calendar, so
/// the window is padded by an hour on each side to catch events straddling
/// midnight. At most one up and one down are still reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoonTimesCalculator<E> {
    locator: RiseSetLocator<E>,
}

impl<E: Ephemeris> MoonTimesCalculator<E> {
    pub fn new(ephemeris: E) -> Self {
        MoonTimesCalculator {
            locator: RiseSetLocator::new(ephemeris),
        }
    }

    pub fn calculate(&self, location: &Coordinate, date: NaiveDate, zone: FixedOffset) -> MoonTimes {
        let padding = Duration::hours(MOON_WINDOW_PADDING_HOURS);
        self.locator.locate(
            Body::Moon,
            location,
            local_midnight(date, zone) - padding,
            Duration::days(1) + padding * 2,
            MOON_THRESHOLD_DEGREES,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn series(start: DateTime<FixedOffset>, altitudes: &[f64]) -> Vec<AstroAltitude> {
        altitudes
            .iter()
            .enumerate()
            .map(|(i, &altitude_degrees)| AstroAltitude {
                time: start + Duration::minutes(10 * i as i64),
                altitude_degrees,
            })
            .collect()
    }

    fn start() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_interpolates_crossings() {
        let samples = series(start(), &[-10.0, 0.0, 10.0, 10.0, 0.0, -10.0]);
        let times = find_crossings(&samples, 5.0);

        // halfway between samples 1 and 2, and between 3 and 4
        assert_eq!(times.up, Some(start() + Duration::minutes(15)));
        assert_eq!(times.down, Some(start() + Duration::minutes(35)));
    }

    #[test]
    fn test_threshold_equality_counts_as_up() {
        let samples = series(start(), &[-1.0, 0.0, 1.0, -1.0]);
        let times = find_crossings(&samples, 0.0);
        assert_eq!(times.up, Some(start() + Duration::minutes(10)));
        assert_eq!(times.down, Some(start() + Duration::minutes(25)));
    }

    #[test]
    fn test_down_only_when_already_up() {
        let samples = series(start(), &[10.0, 5.0, -5.0, -10.0]);
        let times = find_crossings(&samples, 0.0);
        assert_eq!(times.up, None);
        assert_eq!(times.down, Some(start() + Duration::minutes(15)));
    }

    #[test]
    fn test_down_before_up_is_dropped() {
        // sets, then rises, and never sets again in the window
        let samples = series(start(), &[10.0, -10.0, -10.0, 10.0]);
        let times = find_crossings(&samples, 0.0);
        assert_eq!(times.up, Some(start() + Duration::minutes(25)));
        assert_eq!(times.down, None);
    }

    #[test]
    fn test_always_above_and_below() {
        let above = series(start(), &[5.0; 10]);
        assert_eq!(find_crossings(&above, 0.0), RiseSetTimes::default());

        let below = series(start(), &[-5.0; 10]);
        assert_eq!(find_crossings(&below, 0.0), RiseSetTimes::default());
    }

    #[test]
    fn test_degenerate_series() {
        assert_eq!(find_crossings(&[], 0.0), RiseSetTimes::default());
        let single = series(start(), &[1.0]);
        assert_eq!(find_crossings(&single, 0.0), RiseSetTimes::default());
    }

    #[test]
    fn test_nan_samples_never_cross() {
        let samples = series(start(), &[-1.0, f64::NAN, 1.0, f64::NAN, -1.0]);
        assert_eq!(find_crossings(&samples, 0.0), RiseSetTimes::default());
    }

    #[test]
    fn test_up_on_sample_never_shares_down_instant() {
        // rises exactly onto the threshold at sample 1 and leaves it downward there
        let samples = series(start(), &[-1.0, 0.0, -1.0, 1.0, -1.0]);
        let times = find_crossings(&samples, 0.0);
        let (up, down) = (times.up.unwrap(), times.down.unwrap());
        assert!(down > up, "down {down} should follow up {up}");
    }

    #[test]
    fn test_mode_thresholds() {
        assert_eq!(SunTimesMode::Actual.threshold_degrees(), -0.833);
        assert_eq!(SunTimesMode::Civil.threshold_degrees(), -6.0);
        assert_eq!(SunTimesMode::Nautical.threshold_degrees(), -12.0);
        assert_eq!(SunTimesMode::Astronomical.threshold_degrees(), -18.0);
    }
}
