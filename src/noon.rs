//! Solar/lunar noon: the instant of maximum altitude between a rise and the
//! following set.
//!
//! A linear scan at 1-minute resolution over two hours around the rise/set
//! midpoint. Near culmination the altitude curve is nearly flat, so minute
//! resolution is well inside what the consuming application displays.

use crate::altitude::AltitudeSampler;
use crate::coordinate::Coordinate;
use crate::ephemeris::{Body, Ephemeris};
use crate::riseset::RiseSetTimes;
use crate::AstroAltitude;
use chrono::{DateTime, Duration, FixedOffset};
use log::debug;

/// Half-width of the search window around the midpoint.
const HALF_WINDOW_MINUTES: i64 = 60;
const STEP_MINUTES: i64 = 1;

/// Extremum search over a rise/set pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoonLocator<E> {
    sampler: AltitudeSampler<E>,
}

impl<E: Ephemeris> NoonLocator<E> {
    pub fn new(ephemeris: E) -> Self {
        NoonLocator {
            sampler: AltitudeSampler::new(ephemeris),
        }
    }

    /// Time of maximum altitude of `body` between `times.up` and
    /// `times.down`.
    ///
    /// Absent when either bound is missing or `down` does not come after
    /// `up`. Otherwise the highest of the 121 minute samples in
    /// `[midpoint − 1 h, midpoint + 1 h]`; ties keep the earliest. Minutes
    /// the ephemeris cannot resolve are skipped by the sampler.
    pub fn locate(
        &self,
        body: Body,
        location: &Coordinate,
        times: &RiseSetTimes,
    ) -> Option<DateTime<FixedOffset>> {
        let (up, down) = match (times.up, times.down) {
            (Some(up), Some(down)) if up < down => (up, down),
            (Some(up), Some(down)) => {
                debug!("no {body:?} noon: set {down} does not follow rise {up}");
                return None;
            }
            _ => return None,
        };

        let midpoint = up + (down - up) / 2;
        let window = Duration::minutes(HALF_WINDOW_MINUTES);
        let samples = self
            .sampler
            .sample(body, location, midpoint - window, window * 2, STEP_MINUTES);

        samples
            .into_iter()
            .fold(None, |best: Option<AstroAltitude>, s| match best {
                Some(b) if b.altitude_degrees >= s.altitude_degrees => Some(b),
                _ => Some(s),
            })
            .map(|s| s.time)
    }
}
