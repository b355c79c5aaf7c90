//! # Astronomy Service
//!
//! The public query surface. Composes the sampler, rise/set locator, moon
//! phase calculator and noon locator into day-level and "now"-level
//! questions.
//!
//! ## Time Handling
//! The service owns a [`Clock`]. Queries about "now" (is the Sun up, next
//! sunrise, today's times) read it exactly once per call. Calendar dates are
//! interpreted in the clock's UTC offset, so injecting a [`FixedClock`]
//! makes every query reproducible.
//!
//! Calculators borrow the service's ephemeris and are built fresh for each
//! call; nothing is cached and nothing mutates, so a service can be shared
//! across threads freely.
//!
//! [`FixedClock`]: crate::clock::FixedClock

use crate::altitude::{
    local_midnight, round_to_nearest_minutes, AltitudeSampler, DEFAULT_STEP_MINUTES,
};
use crate::clock::{Clock, SystemClock};
use crate::coordinate::{Bearing, Coordinate};
use crate::ephemeris::{Body, Ephemeris, MeeusEphemeris};
use crate::lunar::{MoonPhase, MoonPhaseCalculator};
use crate::noon::NoonLocator;
use crate::riseset::{MoonTimes, MoonTimesCalculator, SunTimes, SunTimesCalculator, SunTimesMode};
use crate::tides::Tide;
use crate::AstroAltitude;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

/// Facade over the astronomical event engine.
///
/// # Example
/// ```
/// use chrono::{FixedOffset, NaiveDate, TimeZone};
/// use trail_astro::clock::FixedClock;
/// use trail_astro::{AstronomyService, Coordinate, SunTimesMode, Tide};
///
/// let zone = FixedOffset::west_opt(5 * 3600).unwrap();
/// let clock = FixedClock::new(zone.with_ymd_and_hms(2024, 1, 11, 8, 0, 0).unwrap());
/// let astronomy = AstronomyService::with_clock(clock);
///
/// let here = Coordinate::new(42.0, -72.0).unwrap();
/// let times = astronomy.today_sun_times(&here, SunTimesMode::Actual);
/// assert!(times.up.is_some() && times.down.is_some());
///
/// let new_moon = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
/// assert_eq!(astronomy.tides(new_moon), Tide::Spring);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AstronomyService<C = SystemClock, E = MeeusEphemeris> {
    clock: C,
    ephemeris: E,
}

impl AstronomyService {
    /// System clock and the bundled ephemeris.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> AstronomyService<C> {
    pub fn with_clock(clock: C) -> Self {
        AstronomyService {
            clock,
            ephemeris: MeeusEphemeris,
        }
    }
}

impl<C: Clock, E: Ephemeris> AstronomyService<C, E> {
    pub fn with_clock_and_ephemeris(clock: C, ephemeris: E) -> Self {
        AstronomyService { clock, ephemeris }
    }

    fn sampler(&self) -> AltitudeSampler<&E> {
        AltitudeSampler::new(&self.ephemeris)
    }

    fn noon(&self, date: NaiveDate, zone: FixedOffset) -> DateTime<FixedOffset> {
        local_midnight(date, zone) + Duration::hours(12)
    }

    // ---------- Moon ----------------------------------------------------------

    pub fn current_moon_phase(&self) -> MoonPhase {
        MoonPhaseCalculator::new(&self.ephemeris).phase(&self.clock.now())
    }

    /// Phase at 12:00 local on `date`.
    pub fn moon_phase(&self, date: NaiveDate) -> MoonPhase {
        let noon = self.noon(date, self.clock.zone());
        MoonPhaseCalculator::new(&self.ephemeris).phase(&noon)
    }

    pub fn moon_times(&self, location: &Coordinate, date: NaiveDate) -> MoonTimes {
        MoonTimesCalculator::new(&self.ephemeris).calculate(location, date, self.clock.zone())
    }

    /// 24 h of moon altitudes centered on `time` rounded to 10 minutes.
    pub fn centered_moon_altitudes(
        &self,
        location: &Coordinate,
        time: DateTime<FixedOffset>,
    ) -> Vec<AstroAltitude> {
        self.centered_altitudes(Body::Moon, location, time)
    }

    /// Moon altitudes from local midnight of `date`, every 10 minutes.
    pub fn moon_altitudes(&self, location: &Coordinate, date: NaiveDate) -> Vec<AstroAltitude> {
        self.sampler()
            .sample_day(Body::Moon, location, date, self.clock.zone(), DEFAULT_STEP_MINUTES)
    }

    pub fn moon_altitude(&self, location: &Coordinate, time: DateTime<FixedOffset>) -> AstroAltitude {
        self.sampler().altitude_at(Body::Moon, location, time)
    }

    pub fn moon_azimuth(&self, location: &Coordinate) -> Bearing {
        self.sampler().azimuth_at(Body::Moon, location, self.clock.now())
    }

    pub fn is_moon_up(&self, location: &Coordinate) -> bool {
        self.moon_altitude(location, self.clock.now()).is_above(0.0)
    }

    /// Time of the Moon's highest altitude between that day's moonrise and
    /// the following moonset.
    pub fn lunar_noon(&self, location: &Coordinate, date: NaiveDate) -> Option<DateTime<FixedOffset>> {
        let times = self.moon_times(location, date);
        NoonLocator::new(&self.ephemeris).locate(Body::Moon, location, &times)
    }

    /// Spring/neap/normal from the moon phase at 12:00 local on `date`.
    pub fn tides(&self, date: NaiveDate) -> Tide {
        Tide::from_phase(self.moon_phase(date).phase)
    }

    // ---------- Sun -----------------------------------------------------------

    pub fn sun_times(&self, location: &Coordinate, mode: SunTimesMode, date: NaiveDate) -> SunTimes {
        SunTimesCalculator::new(&self.ephemeris).calculate(location, date, self.clock.zone(), mode)
    }

    pub fn today_sun_times(&self, location: &Coordinate, mode: SunTimesMode) -> SunTimes {
        let now = self.clock.now();
        SunTimesCalculator::new(&self.ephemeris).calculate(
            location,
            now.date_naive(),
            *now.offset(),
            mode,
        )
    }

    pub fn tomorrow_sun_times(&self, location: &Coordinate, mode: SunTimesMode) -> SunTimes {
        let now = self.clock.now();
        let tomorrow = now.date_naive() + Duration::days(1);
        SunTimesCalculator::new(&self.ephemeris).calculate(location, tomorrow, *now.offset(), mode)
    }

    pub fn sun_altitudes(&self, location: &Coordinate, date: NaiveDate) -> Vec<AstroAltitude> {
        self.sampler()
            .sample_day(Body::Sun, location, date, self.clock.zone(), DEFAULT_STEP_MINUTES)
    }

    /// 24 h of sun altitudes centered on `time` rounded to 10 minutes.
    pub fn centered_sun_altitudes(
        &self,
        location: &Coordinate,
        time: DateTime<FixedOffset>,
    ) -> Vec<AstroAltitude> {
        self.centered_altitudes(Body::Sun, location, time)
    }

    /// Earliest of today's and tomorrow's sunset strictly after now.
    pub fn next_sunset(&self, location: &Coordinate, mode: SunTimesMode) -> Option<DateTime<FixedOffset>> {
        let (now, today, tomorrow) = self.sun_times_around_now(location, mode);
        earliest_after(now, [today.down, tomorrow.down])
    }

    /// Earliest of today's and tomorrow's sunrise strictly after now.
    pub fn next_sunrise(&self, location: &Coordinate, mode: SunTimesMode) -> Option<DateTime<FixedOffset>> {
        let (now, today, tomorrow) = self.sun_times_around_now(location, mode);
        earliest_after(now, [today.up, tomorrow.up])
    }

    pub fn is_sun_up(&self, location: &Coordinate) -> bool {
        self.sun_altitude(location, self.clock.now()).is_above(0.0)
    }

    pub fn sun_azimuth(&self, location: &Coordinate) -> Bearing {
        self.sampler().azimuth_at(Body::Sun, location, self.clock.now())
    }

    /// Time of the Sun's highest altitude between sunrise and sunset
    /// (actual times) on `date`.
    pub fn solar_noon(&self, location: &Coordinate, date: NaiveDate) -> Option<DateTime<FixedOffset>> {
        let times = self.sun_times(location, SunTimesMode::Actual, date);
        NoonLocator::new(&self.ephemeris).locate(Body::Sun, location, &times)
    }

    pub fn sun_altitude(&self, location: &Coordinate, time: DateTime<FixedOffset>) -> AstroAltitude {
        self.sampler().altitude_at(Body::Sun, location, time)
    }

    // ---------- Shared --------------------------------------------------------

    fn centered_altitudes(
        &self,
        body: Body,
        location: &Coordinate,
        time: DateTime<FixedOffset>,
    ) -> Vec<AstroAltitude> {
        let start = round_to_nearest_minutes(time, DEFAULT_STEP_MINUTES as u32) - Duration::hours(12);
        self.sampler()
            .sample(body, location, start, Duration::days(1), DEFAULT_STEP_MINUTES)
    }

    /// One clock read shared by both days' calculations.
    fn sun_times_around_now(
        &self,
        location: &Coordinate,
        mode: SunTimesMode,
    ) -> (DateTime<FixedOffset>, SunTimes, SunTimes) {
        let now = self.clock.now();
        let zone = *now.offset();
        let today = now.date_naive();
        let calculator = SunTimesCalculator::new(&self.ephemeris);

        (
            now,
            calculator.calculate(location, today, zone, mode),
            calculator.calculate(location, today + Duration::days(1), zone, mode),
        )
    }
}

/// Earliest candidate strictly after `now`; absent candidates are skipped.
pub fn earliest_after<I>(now: DateTime<FixedOffset>, candidates: I) -> Option<DateTime<FixedOffset>>
where
    I: IntoIterator<Item = Option<DateTime<FixedOffset>>>,
{
    candidates.into_iter().flatten().filter(|t| *t > now).min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn zone() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    #[test]
    fn test_earliest_after_skips_past_and_absent() {
        let now = zone().with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let past = Some(now - Duration::hours(5));
        let soon = Some(now + Duration::hours(1));
        let later = Some(now + Duration::hours(20));

        assert_eq!(earliest_after(now, [past, later]), later);
        assert_eq!(earliest_after(now, [later, soon]), soon);
        assert_eq!(earliest_after(now, [None, soon]), soon);
        assert_eq!(earliest_after(now, [past, None]), None);
        assert_eq!(earliest_after(now, [Some(now), None]), None);
    }

    #[test]
    fn test_service_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AstronomyService>();
        assert_send_sync::<AstronomyService<crate::clock::FixedClock>>();
    }
}
