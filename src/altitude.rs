//! # Altitude Sampler
//!
//! Turns the point-wise [`Ephemeris`] into time series. The rise/set locator
//! walks these series at 10-minute steps, the noon locator at 1-minute
//! steps, and the centered chart windows reuse the same 145-sample layout
//! the tide charts use (-12 h to +12 h at 10-minute increments).
//!
//! The sampler is also the provider boundary for numeric sanity: a
//! non-finite altitude from a third-party ephemeris is logged here and left
//! out of every series, so the rise/set and noon searches only ever compare
//! finite altitudes.

use crate::coordinate::{Bearing, Coordinate};
use crate::ephemeris::{Body, Ephemeris};
use crate::AstroAltitude;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike};
use log::{trace, warn};

/// Sampling step used for daily series and crossing searches.
pub const DEFAULT_STEP_MINUTES: i64 = 10;

/// Samples body altitudes through an [`Ephemeris`]. No caching: every sample
/// is an independent provider call.
#[derive(Clone, Copy, Debug, Default)]
pub struct AltitudeSampler<E> {
    ephemeris: E,
}

impl<E: Ephemeris> AltitudeSampler<E> {
    pub fn new(ephemeris: E) -> Self {
        AltitudeSampler { ephemeris }
    }

    /// Altitude of `body` at a single instant.
    pub fn altitude_at(
        &self,
        body: Body,
        location: &Coordinate,
        time: DateTime<FixedOffset>,
    ) -> AstroAltitude {
        let position = self.ephemeris.position_of(body, location, &time);
        if !position.altitude_degrees.is_finite() {
            warn!("ephemeris returned non-finite altitude for {body:?} at {time} ({location})");
        }
        AstroAltitude {
            time,
            altitude_degrees: position.altitude_degrees,
        }
    }

    /// Azimuth of `body` at a single instant.
    pub fn azimuth_at(
        &self,
        body: Body,
        location: &Coordinate,
        time: DateTime<FixedOffset>,
    ) -> Bearing {
        Bearing::new(self.ephemeris.position_of(body, location, &time).azimuth_degrees)
    }

    /// Sample `duration` from `start` every `step_minutes`, both ends included.
    ///
    /// Returns `duration / step + 1` samples in strictly increasing time
    /// order, e.g. 145 for one day at 10 minutes. A non-positive step or a
    /// negative duration yields an empty series.
    ///
    /// Non-finite altitudes from the ephemeris are dropped here, so the
    /// series never carries NaN into the locators.
    pub fn sample(
        &self,
        body: Body,
        location: &Coordinate,
        start: DateTime<FixedOffset>,
        duration: Duration,
        step_minutes: i64,
    ) -> Vec<AstroAltitude> {
        if step_minutes <= 0 || duration < Duration::zero() {
            return Vec::new();
        }

        let count = duration.num_minutes() / step_minutes + 1;
        trace!("sampling {count} {body:?} altitudes from {start} every {step_minutes} min");

        (0..count)
            .map(|i| self.altitude_at(body, location, start + Duration::minutes(i * step_minutes)))
            .filter(|sample| sample.altitude_degrees.is_finite())
            .collect()
    }

    /// The calendar day of `date` in `zone`, from local midnight, 24 h at
    /// `step_minutes`.
    pub fn sample_day(
        &self,
        body: Body,
        location: &Coordinate,
        date: NaiveDate,
        zone: FixedOffset,
        step_minutes: i64,
    ) -> Vec<AstroAltitude> {
        self.sample(
            body,
            location,
            local_midnight(date, zone),
            Duration::days(1),
            step_minutes,
        )
    }
}

/// Start of `date` in `zone`.
pub fn local_midnight(date: NaiveDate, zone: FixedOffset) -> DateTime<FixedOffset> {
    local_time(date, NaiveTime::MIN, zone)
}

/// Wall-clock `time` on `date` in `zone`.
pub fn local_time(date: NaiveDate, time: NaiveTime, zone: FixedOffset) -> DateTime<FixedOffset> {
    let utc = date.and_time(time) - Duration::seconds(zone.local_minus_utc() as i64);
    DateTime::from_naive_utc_and_offset(utc, zone)
}

/// Round to the nearest multiple of `minutes` on the local wall clock.
/// Exactly halfway rounds up.
pub fn round_to_nearest_minutes(time: DateTime<FixedOffset>, minutes: u32) -> DateTime<FixedOffset> {
    if minutes == 0 {
        return time;
    }

    let past = Duration::minutes((time.minute() % minutes) as i64)
        + Duration::seconds(time.second() as i64)
        + Duration::nanoseconds(time.nanosecond() as i64);
    let step = Duration::minutes(minutes as i64);

    if past * 2 < step {
        time - past
    } else {
        time - past + step
    }
}
