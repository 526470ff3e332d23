#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Value types shared by the travel coverage engine and its callers.
//!
//! A [`GeoPoint`] is a WGS84 latitude/longitude pair in degrees and a
//! [`TravelPath`] is an ordered sequence of them. Consecutive points define
//! the segments that get buffered into travel corridors. [`CapStyle`]
//! selects how corridor ends are shaped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Prefix used by location-history exports for point strings
/// (e.g. `"geo:35.616800,139.564400"`).
pub const GEO_URI_PREFIX: &str = "geo:";

/// Errors from constructing or parsing a [`GeoPoint`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PointParseError {
    /// Latitude is NaN, infinite, or outside `[-90, 90]`.
    #[error("Latitude out of range: {0}")]
    InvalidLatitude(f64),

    /// Longitude is NaN, infinite, or outside `[-180, 180]`.
    #[error("Longitude out of range: {0}")]
    InvalidLongitude(f64),

    /// The text could not be split into a latitude/longitude pair.
    #[error("Malformed point '{input}': {message}")]
    Malformed {
        /// The offending input.
        input: String,
        /// What was wrong with it.
        message: String,
    },
}

/// A WGS84 position in degrees.
///
/// Serializes as a `[latitude, longitude]` array. Deserialization runs the
/// same range validation as [`GeoPoint::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a point after validating both components.
    ///
    /// # Errors
    ///
    /// Returns an error if either component is non-finite or out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, PointParseError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(PointParseError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(PointParseError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

impl TryFrom<(f64, f64)> for GeoPoint {
    type Error = PointParseError;

    fn try_from((latitude, longitude): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(latitude, longitude)
    }
}

impl From<GeoPoint> for (f64, f64) {
    fn from(point: GeoPoint) -> Self {
        (point.latitude, point.longitude)
    }
}

impl FromStr for GeoPoint {
    type Err = PointParseError;

    /// Parses `"lat,lon"` or the location-history form `"geo:lat,lon"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix(GEO_URI_PREFIX).unwrap_or(trimmed);

        let malformed = |message: &str| PointParseError::Malformed {
            input: s.to_string(),
            message: message.to_string(),
        };

        let (lat, lon) = body
            .split_once(',')
            .ok_or_else(|| malformed("expected 'lat,lon'"))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| malformed("latitude is not a number"))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| malformed("longitude is not a number"))?;

        Self::new(latitude, longitude)
    }
}

/// An ordered traversal of points.
///
/// Order matters: each consecutive pair is one travel segment. Repeated
/// points are allowed and produce zero-length segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TravelPath {
    points: Vec<GeoPoint>,
}

impl TravelPath {
    #[must_use]
    pub const fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of consecutive-point segments (zero for fewer than 2 points).
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Iterates consecutive `(from, to)` pairs in traversal order.
    pub fn segments(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// The same points traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    pub fn push(&mut self, point: GeoPoint) {
        self.points.push(point);
    }
}

impl From<Vec<GeoPoint>> for TravelPath {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<GeoPoint> for TravelPath {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// How a buffered corridor is closed off at the segment endpoints.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CapStyle {
    /// Corridor stops exactly at each endpoint.
    Flat,
    /// Corridor extends past each endpoint by the half width.
    #[default]
    Square,
    /// Semicircular ends centred on each endpoint.
    Round,
}
