//! Metric area and coverage ratio.
//!
//! Areas are measured by projecting lon/lat geometry into an Albers
//! equal-area frame built from the geometry's own latitude span. The frame
//! is derived on every call; different polygons get different frames.

use travel_coverage_models::GeoPoint;

use crate::CoverageError;
use crate::disc::{build_disc, validate_radius};
use crate::projection::{equal_area_transform_for, project_region};
use crate::region::{Frame, Region};

/// One `(center, radius)` query for [`coverage_ratios`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioQuery {
    pub center: GeoPoint,
    pub radius_meters: f64,
}

/// Area of a geographic region in square meters.
///
/// An empty region has area `0.0`.
///
/// # Errors
///
/// * [`CoverageError::FrameMismatch`] if `region` is not geographic.
/// * [`CoverageError::InvalidGeometry`] if the region has zero height, so
///   no equal-area frame can be tuned to it.
pub fn metric_area(region: &Region) -> Result<f64, CoverageError> {
    region.require_frame(Frame::Geographic)?;

    let Some(bounds) = region.bounds() else {
        return Ok(0.0);
    };
    if bounds.height() <= 0.0 {
        return Err(CoverageError::invalid_geometry(format!(
            "region has zero height at latitude {}",
            bounds.min().y
        )));
    }

    let projection = equal_area_transform_for(&bounds)?;
    let area = project_region(region, &projection)?.projected_area()?;

    log::trace!(
        "Measured {area:.3} m² with parallels {} / {}",
        bounds.min().y,
        bounds.max().y
    );

    Ok(area)
}

/// Fraction of the disc of `radius_meters` around `center` that `coverage`
/// overlaps, in `[0.0, 1.0]`.
///
/// Empty coverage or an empty overlap gives `0.0`.
///
/// # Errors
///
/// * [`CoverageError::InvalidParameter`] for a non-positive or non-finite
///   radius, or if the disc's measured area is not positive.
/// * [`CoverageError::FrameMismatch`] if `coverage` is not geographic.
pub fn coverage_ratio(
    coverage: &Region,
    center: GeoPoint,
    radius_meters: f64,
) -> Result<f64, CoverageError> {
    validate_radius(radius_meters)?;
    coverage.require_frame(Frame::Geographic)?;

    let disc = build_disc(center, radius_meters)?;
    if coverage.is_empty() {
        log::debug!("Coverage is empty; ratio against disc at {center} is 0");
        return Ok(0.0);
    }

    let overlap = coverage.intersection(&disc)?;
    let Some(overlap_bounds) = overlap.bounds() else {
        log::debug!("Coverage does not reach disc at {center}");
        return Ok(0.0);
    };

    // Both areas are measured in the overlap's frame so the ratio is not
    // skewed by two different projections. A zero-height overlap falls back
    // to the disc's own frame.
    let frame_bounds = if overlap_bounds.height() > 0.0 {
        overlap_bounds
    } else {
        disc.bounds().ok_or_else(|| {
            CoverageError::invalid_parameter(format!(
                "disc of radius {radius_meters}m at {center} is empty"
            ))
        })?
    };
    let projection = equal_area_transform_for(&frame_bounds)?;

    let overlap_area = project_region(&overlap, &projection)?.projected_area()?;
    let disc_area = project_region(&disc, &projection)?.projected_area()?;

    if !disc_area.is_finite() || disc_area <= 0.0 {
        return Err(CoverageError::invalid_parameter(format!(
            "disc of radius {radius_meters}m at {center} has area {disc_area}"
        )));
    }

    let ratio = (overlap_area / disc_area).clamp(0.0, 1.0);
    log::debug!(
        "Coverage ratio at {center} r={radius_meters}m: {overlap_area:.1} / {disc_area:.1} = {ratio:.6}"
    );

    Ok(ratio)
}

/// Evaluates several independent ratio queries against one footprint.
///
/// # Errors
///
/// Returns the first error any query produces.
pub fn coverage_ratios(
    coverage: &Region,
    queries: &[RatioQuery],
) -> Result<Vec<f64>, CoverageError> {
    queries
        .iter()
        .map(|query| coverage_ratio(coverage, query.center, query.radius_meters))
        .collect()
}
