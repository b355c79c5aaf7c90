//! Reference clock used to resolve "now".
//!
//! The facade reads the clock once per call. The clock's UTC offset is also
//! the zone in which calendar dates are interpreted, so a `FixedClock` makes
//! every date-dependent query reproducible.

use chrono::{DateTime, FixedOffset, Local};

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Zone used to turn calendar dates into instants.
    fn zone(&self) -> FixedOffset {
        *self.now().offset()
    }
}

/// The host's local wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock frozen at one instant.
///
/// # Example
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use trail_astro::clock::{Clock, FixedClock};
///
/// let zone = FixedOffset::west_opt(5 * 3600).unwrap();
/// let now = zone.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap();
/// let clock = FixedClock::new(now);
///
/// assert_eq!(clock.now(), now);
/// assert_eq!(clock.zone(), zone);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    instant: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(instant: DateTime<FixedOffset>) -> Self {
        FixedClock { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.instant
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }

    fn zone(&self) -> FixedOffset {
        (**self).zone()
    }
}
