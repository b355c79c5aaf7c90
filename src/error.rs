//! # Error Types
//!
//! The engine reports "no event" outcomes (polar day, a moon that does not
//! set, an empty search window) as `None`, never as an error. The variants
//! here cover the only genuine failures: invalid input and configuration
//! file problems.

use std::io;
use thiserror::Error;

/// Errors surfaced by coordinate validation and configuration handling.
#[derive(Error, Debug)]
pub enum AstroError {
    /// Latitude/longitude outside the valid range, or not finite
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Configuration file could not be parsed
    #[error("config parse: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("config write: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Configuration file operations failed (missing file, permissions)
    #[error("config IO: {0}")]
    Io(#[from] io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AstroError>;
