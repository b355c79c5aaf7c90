//! Observer location and compass bearing value types.

use crate::error::{AstroError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated geographic location in degrees.
///
/// Construction is the only place input validation happens; every
/// calculator downstream assumes a `Coordinate` is in range.
///
/// # Example
/// ```
/// use trail_astro::Coordinate;
///
/// let hartford = Coordinate::new(42.0, -72.0).unwrap();
/// assert_eq!(hartford.latitude(), 42.0);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = AstroError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(AstroError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }

        Ok(Coordinate {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees, north positive.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, east positive.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// The eight principal compass points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

/// An azimuth in degrees clockwise from true north, normalized to [0, 360).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bearing(f64);

impl Bearing {
    pub fn new(degrees: f64) -> Self {
        let normalized = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        Bearing(if normalized >= 360.0 { 0.0 } else { normalized })
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }

    /// Nearest of the eight compass points.
    pub fn direction(&self) -> CompassDirection {
        const POINTS: [CompassDirection; 8] = [
            CompassDirection::North,
            CompassDirection::NorthEast,
            CompassDirection::East,
            CompassDirection::SouthEast,
            CompassDirection::South,
            CompassDirection::SouthWest,
            CompassDirection::West,
            CompassDirection::NorthWest,
        ];
        let index = ((self.0 + 22.5) / 45.0).floor() as usize % 8;
        POINTS[index]
    }
}
