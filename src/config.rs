//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! astro-config.toml file: the observer's location and the default twilight
//! definition the consuming application shows.

use crate::coordinate::Coordinate;
use crate::error::Result;
use crate::riseset::SunTimesMode;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name, relative to the working directory.
pub const CONFIG_FILE: &str = "astro-config.toml";

/// Application configuration loaded from astro-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Observer location
    pub observer: ObserverConfig,
    /// Engine preferences
    pub astronomy: AstronomyConfig,
}

/// Where the sky is observed from
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObserverConfig {
    /// Human-readable place name for reference
    pub name: String,
    /// Degrees, north positive
    pub latitude: f64,
    /// Degrees, east positive
    pub longitude: f64,
}

/// Engine preferences
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AstronomyConfig {
    /// Twilight definition used for "sunrise"/"sunset"
    #[serde(default)]
    pub sun_times_mode: SunTimesMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            observer: ObserverConfig {
                name: "Hartford, CT".to_string(),
                latitude: 42.0,
                longitude: -72.0,
            },
            astronomy: AstronomyConfig {
                sun_times_mode: SunTimesMode::Actual,
            },
        }
    }
}

impl ObserverConfig {
    /// Validated coordinate for the configured location
    pub fn coordinate(&self) -> Result<Coordinate> {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl Config {
    /// Load configuration from astro-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from_path(&path) {
            Ok(config) => {
                info!("Loaded configuration for observer: {}", config.observer.name);
                config
            }
            Err(e) => {
                warn!(
                    "Using default configuration ({}): {}",
                    Self::default().observer.name,
                    e
                );
                Self::default()
            }
        }
    }

    /// Load configuration, reporting why it could not be read.
    ///
    /// Out-of-range coordinates are rejected here rather than at query time.
    pub fn try_load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.observer.coordinate()?;
        Ok(config)
    }

    /// Save current configuration to astro-config.toml
    pub fn save(&self) -> Result<()> {
        self.save_to_path(CONFIG_FILE)
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AstroError;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.observer.name, "Hartford, CT");
        assert_eq!(config.observer.latitude, 42.0);
        assert_eq!(config.observer.longitude, -72.0);
        assert_eq!(config.astronomy.sun_times_mode, SunTimesMode::Actual);
        assert!(config.observer.coordinate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            r#"
[observer]
name = "Longyearbyen"
latitude = 78.22
longitude = 15.63

[astronomy]
sun_times_mode = "Civil"
"#,
        )
        .unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.observer.name, "Longyearbyen");
        assert_eq!(config.astronomy.sun_times_mode, SunTimesMode::Civil);
    }

    #[test]
    fn test_mode_defaults_when_omitted() {
        let config: Config = toml::from_str(
            "[observer]\nname = \"x\"\nlatitude = 1.0\nlongitude = 2.0\n[astronomy]\n",
        )
        .unwrap();
        assert_eq!(config.astronomy.sun_times_mode, SunTimesMode::Actual);
    }

    #[test]
    fn test_rejects_out_of_range_observer() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            "[observer]\nname = \"nowhere\"\nlatitude = 95.0\nlongitude = 0.0\n[astronomy]\n",
        )
        .unwrap();

        let err = Config::try_load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, AstroError::InvalidCoordinate { .. }));
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "not = [valid").unwrap();
        let err = Config::try_load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, AstroError::Config(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.astronomy.sun_times_mode = SunTimesMode::Nautical;

        config.save_to_path(file.path()).unwrap();
        assert_eq!(Config::try_load_from_path(file.path()).unwrap(), config);
    }
}
