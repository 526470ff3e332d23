//! Frame-tagged polygon regions.
//!
//! Geometry in this crate lives either in lon/lat degrees or in the planar
//! meters of one specific projection. A [`Region`] carries its [`Frame`] so
//! that boolean operations and measurements refuse to mix frames instead of
//! silently producing garbage.

use std::fmt;

use geo::{Area, BooleanOps, BoundingRect, MultiPolygon, Polygon, Rect};

use crate::CoverageError;
use crate::projection::ProjectionKind;

/// The coordinate frame a [`Region`] is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    /// Longitude/latitude degrees on WGS84. Not metric.
    Geographic,
    /// Planar meters in the given projection.
    Projected(ProjectionKind),
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geographic => f.write_str("geographic"),
            Self::Projected(kind) => write!(f, "projected {kind}"),
        }
    }
}

/// A possibly multi-part, possibly holed planar region in a known frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    frame: Frame,
    shape: MultiPolygon<f64>,
}

impl Region {
    pub(crate) const fn new(frame: Frame, shape: MultiPolygon<f64>) -> Self {
        Self { frame, shape }
    }

    /// Wraps lon/lat geometry (`x` = longitude, `y` = latitude).
    #[must_use]
    pub fn geographic(shape: impl Into<MultiPolygon<f64>>) -> Self {
        Self::new(Frame::Geographic, shape.into())
    }

    /// The empty geographic region: zero coverage.
    #[must_use]
    pub const fn empty_geographic() -> Self {
        Self::new(Frame::Geographic, MultiPolygon(Vec::new()))
    }

    #[must_use]
    pub const fn frame(&self) -> Frame {
        self.frame
    }

    #[must_use]
    pub const fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    /// Whether the region has no polygons at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape.0.is_empty()
    }

    /// Number of disjoint polygons in the region.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.shape.0.len()
    }

    /// Axis-aligned bounds in the region's own frame, `None` when empty.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.shape.bounding_rect()
    }

    /// Planar area in square meters.
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError::InvalidGeometry`] for geographic regions,
    /// whose planar area would be in square degrees.
    pub fn projected_area(&self) -> Result<f64, CoverageError> {
        match self.frame {
            Frame::Projected(_) => Ok(self.shape.unsigned_area()),
            Frame::Geographic => Err(CoverageError::invalid_geometry(
                "planar area requested for a geographic region; project it first",
            )),
        }
    }

    /// Set union of two regions in the same frame.
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError::FrameMismatch`] if the frames differ.
    pub fn union(&self, other: &Self) -> Result<Self, CoverageError> {
        self.ensure_same_frame(other)?;
        if self.is_empty() {
            return Ok(other.clone());
        }
        if other.is_empty() {
            return Ok(self.clone());
        }
        Ok(Self::new(self.frame, self.shape.union(&other.shape)))
    }

    /// Set intersection of two regions in the same frame.
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError::FrameMismatch`] if the frames differ.
    pub fn intersection(&self, other: &Self) -> Result<Self, CoverageError> {
        self.ensure_same_frame(other)?;
        if self.is_empty() || other.is_empty() {
            return Ok(Self::new(self.frame, MultiPolygon(Vec::new())));
        }
        Ok(Self::new(self.frame, self.shape.intersection(&other.shape)))
    }

    /// Fails unless the region is in `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError::FrameMismatch`] on a different frame.
    pub fn require_frame(&self, expected: Frame) -> Result<(), CoverageError> {
        if self.frame == expected {
            Ok(())
        } else {
            Err(CoverageError::FrameMismatch {
                expected,
                found: self.frame,
            })
        }
    }

    fn ensure_same_frame(&self, other: &Self) -> Result<(), CoverageError> {
        other.require_frame(self.frame)
    }
}

impl From<Polygon<f64>> for Region {
    fn from(polygon: Polygon<f64>) -> Self {
        Self::geographic(polygon)
    }
}
