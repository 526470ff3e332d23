//! TOML configuration for the coverage reporter.
//!
//! ```toml
//! [general]
//! center-point-lat = 35.6173
//! center-point-lon = 139.5646
//! radius-meters = 2000.0
//! buffer-meters = 80.0
//! cap-style = "square"
//! ```
//!
//! Every key is optional. Without a centre point only the footprint area
//! is reported.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use travel_coverage_models::{CapStyle, GeoPoint, PointParseError};

/// Reference disc radius used when none is configured.
pub const DEFAULT_RADIUS_METERS: f64 = 2_000.0;

/// Corridor half width used when none is configured.
pub const DEFAULT_BUFFER_METERS: f64 = 80.0;

/// Errors from loading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`CoverageConfig`].
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The centre point is out of range.
    #[error("Invalid centre point: {0}")]
    Center(#[from] PointParseError),

    /// Only one of latitude/longitude was given.
    #[error("center-point-lat and center-point-lon must be set together")]
    PartialCenter,
}

/// Top-level configuration file.
#[derive(Debug, Default, Deserialize)]
pub struct CoverageConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

/// The `[general]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GeneralConfig {
    pub center_point_lat: Option<f64>,
    pub center_point_lon: Option<f64>,
    pub radius_meters: f64,
    pub buffer_meters: f64,
    pub cap_style: CapStyle,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            center_point_lat: None,
            center_point_lon: None,
            radius_meters: DEFAULT_RADIUS_METERS,
            buffer_meters: DEFAULT_BUFFER_METERS,
            cap_style: CapStyle::default(),
        }
    }
}

impl GeneralConfig {
    /// The configured reference point, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if only one coordinate is set or the point is out
    /// of range.
    pub fn center(&self) -> Result<Option<GeoPoint>, ConfigError> {
        match (self.center_point_lat, self.center_point_lon) {
            (Some(lat), Some(lon)) => Ok(Some(GeoPoint::new(lat, lon)?)),
            (None, None) => Ok(None),
            _ => Err(ConfigError::PartialCenter),
        }
    }
}

/// Parses a configuration document.
///
/// # Errors
///
/// Returns an error if the document is not valid TOML for [`CoverageConfig`].
pub fn parse(toml_str: &str) -> Result<CoverageConfig, ConfigError> {
    Ok(toml::from_str(toml_str)?)
}

/// Reads and parses the configuration file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<CoverageConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&contents)?;
    log::debug!("Loaded config from {}: {:?}", path.display(), config.general);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.general, GeneralConfig::default());
        assert!(config.general.center().unwrap().is_none());
    }

    #[test]
    fn parses_full_general_table() {
        let config = parse(
            r#"
            [general]
            center-point-lat = 35.6173
            center-point-lon = 139.5646
            radius-meters = 1200.0
            buffer-meters = 40.0
            cap-style = "round"
            "#,
        )
        .unwrap();

        let general = config.general;
        assert_eq!(
            general.center().unwrap(),
            Some(GeoPoint::new(35.6173, 139.5646).unwrap())
        );
        assert!((general.radius_meters - 1_200.0).abs() < f64::EPSILON);
        assert!((general.buffer_meters - 40.0).abs() < f64::EPSILON);
        assert_eq!(general.cap_style, CapStyle::Round);
    }

    #[test]
    fn partial_center_is_rejected() {
        let config = parse("[general]\ncenter-point-lat = 35.0\n").unwrap();
        assert!(matches!(
            config.general.center(),
            Err(ConfigError::PartialCenter)
        ));
    }

    #[test]
    fn out_of_range_center_is_rejected() {
        let config =
            parse("[general]\ncenter-point-lat = 95.0\ncenter-point-lon = 0.0\n").unwrap();
        assert!(matches!(config.general.center(), Err(ConfigError::Center(_))));
    }

    #[test]
    fn unknown_cap_style_fails_to_parse() {
        assert!(parse("[general]\ncap-style = \"pointy\"\n").is_err());
    }
}
