#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Travel coverage estimation.
//!
//! Turns an ordered list of WGS84 points into a footprint polygon by
//! buffering every consecutive segment into a corridor and unioning the
//! corridors. The footprint's area is measured in an Albers equal-area
//! frame tuned to the polygon's own latitude span, and its overlap with a
//! geodesic disc around a reference point gives the coverage ratio.
//!
//! All operations are pure functions over their inputs. Nothing is cached
//! between calls: each area measurement derives a fresh projection.

pub mod aggregate;
pub mod area;
pub mod corridor;
pub mod disc;
pub mod projection;
pub mod region;

pub use aggregate::{
    CoverageResult, aggregate_coverage, aggregate_coverage_with, aggregate_region,
    aggregate_region_with,
};
pub use area::{RatioQuery, coverage_ratio, coverage_ratios, metric_area};
pub use corridor::{CorridorOptions, buffer_segment, buffer_segment_with, meters_to_degrees};
pub use disc::{build_disc, build_disc_with_segments};
pub use projection::{
    AlbersEqualArea, AzimuthalEquidistant, Projection, ProjectionKind, equal_area_transform,
    equal_area_transform_for, equidistant_transform, project_region, unproject_region,
};
pub use region::{Frame, Region};
pub use travel_coverage_models::{CapStyle, GeoPoint, TravelPath};

/// Errors from coverage computations.
///
/// Empty inputs (short paths, empty footprints, empty intersections) are
/// not errors; they produce zero areas and zero ratios.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoverageError {
    /// A scalar input is outside its domain (non-positive radius,
    /// negative buffer width, non-finite values).
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the rejected input.
        message: String,
    },

    /// A geometry cannot be assigned a projection or cannot be measured.
    #[error("Invalid geometry: {message}")]
    InvalidGeometry {
        /// Description of the geometric problem.
        message: String,
    },

    /// Two regions in different coordinate frames were combined, or a
    /// region was passed to an operation expecting another frame.
    #[error("Frame mismatch: expected {expected}, found {found}")]
    FrameMismatch {
        /// The frame the operation required.
        expected: Frame,
        /// The frame that was supplied.
        found: Frame,
    },
}

impl CoverageError {
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            message: message.into(),
        }
    }
}
