//! Folding a travel path into a single coverage footprint.

use travel_coverage_models::TravelPath;

use crate::CoverageError;
use crate::area::metric_area;
use crate::corridor::{CorridorOptions, buffer_segment_with};
use crate::region::Region;

/// The footprint of a path and its area.
///
/// The region is kept so callers can run several ratio queries against
/// it without recomputing the union.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageResult {
    /// Footprint area in square meters.
    pub area_sq_m: f64,
    /// Footprint in the geographic frame.
    pub region: Region,
}

/// Buffers every segment of `path` with square caps and returns the
/// footprint together with its area.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidParameter`] for a negative or
/// non-finite half width.
pub fn aggregate_coverage(
    path: &TravelPath,
    half_width_meters: f64,
) -> Result<CoverageResult, CoverageError> {
    aggregate_coverage_with(path, &CorridorOptions::new(half_width_meters))
}

/// Like [`aggregate_coverage`] with explicit corridor options.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidParameter`] if `options` is invalid.
pub fn aggregate_coverage_with(
    path: &TravelPath,
    options: &CorridorOptions,
) -> Result<CoverageResult, CoverageError> {
    let region = aggregate_region_with(path, options)?;
    let area_sq_m = metric_area(&region)?;

    log::debug!(
        "Coverage of {} points: {area_sq_m:.1} m² in {} part(s)",
        path.len(),
        region.part_count()
    );

    Ok(CoverageResult { area_sq_m, region })
}

/// Unions the square-capped corridors of all segments of `path`.
///
/// Paths with fewer than two points give an empty region.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidParameter`] for a negative or
/// non-finite half width.
pub fn aggregate_region(path: &TravelPath, half_width_meters: f64) -> Result<Region, CoverageError> {
    aggregate_region_with(path, &CorridorOptions::new(half_width_meters))
}

/// Like [`aggregate_region`] with explicit corridor options.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidParameter`] if `options` is invalid.
pub fn aggregate_region_with(
    path: &TravelPath,
    options: &CorridorOptions,
) -> Result<Region, CoverageError> {
    options.validate()?;

    if path.segment_count() == 0 {
        log::debug!("Path has {} point(s); coverage is empty", path.len());
        return Ok(Region::empty_geographic());
    }

    log::debug!(
        "Aggregating {} segments with half width {}m ({} caps)",
        path.segment_count(),
        options.half_width_meters,
        options.cap_style
    );

    path.segments()
        .try_fold(Region::empty_geographic(), |coverage, (from, to)| {
            let corridor = buffer_segment_with(from, to, options)?;
            coverage.union(&corridor)
        })
}

#[cfg(test)]
mod tests {
    use travel_coverage_models::{CapStyle, GeoPoint};

    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn tokyo_path() -> TravelPath {
        TravelPath::new(vec![
            point(35.6168, 139.5644),
            point(35.6078, 139.5576),
            point(35.6108, 139.5727),
            point(35.6203, 139.5696),
        ])
    }

    #[test]
    fn empty_path_has_zero_coverage() {
        let result = aggregate_coverage(&TravelPath::default(), 80.0).unwrap();
        assert!(result.region.is_empty());
        assert!(result.area_sq_m.abs() < f64::EPSILON);
    }

    #[test]
    fn single_point_has_zero_coverage() {
        let path = TravelPath::new(vec![point(35.6168, 139.5644)]);
        let result = aggregate_coverage(&path, 80.0).unwrap();
        assert!(result.region.is_empty());
        assert!(result.area_sq_m.abs() < f64::EPSILON);
    }

    #[test]
    fn repeated_point_has_zero_coverage() {
        let p = point(35.6168, 139.5644);
        let result = aggregate_coverage(&TravelPath::new(vec![p, p]), 80.0).unwrap();
        assert!(result.area_sq_m.abs() < f64::EPSILON);
    }

    #[test]
    fn negative_width_is_rejected_even_for_short_paths() {
        assert!(matches!(
            aggregate_coverage(&TravelPath::default(), -1.0),
            Err(CoverageError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn tokyo_walk_covers_a_plausible_area() {
        let result = aggregate_coverage(&tokyo_path(), 80.0).unwrap();
        // ~3.7 km of 160 m wide corridor, narrower east-west at 35.6°N.
        assert!(result.area_sq_m.is_finite());
        assert!(
            result.area_sq_m > 200_000.0 && result.area_sq_m < 1_000_000.0,
            "area {}",
            result.area_sq_m
        );
        assert_eq!(result.region.part_count(), 1);
    }

    #[test]
    fn wider_buffer_never_shrinks_coverage() {
        let path = tokyo_path();
        let areas: Vec<f64> = [0.0, 20.0, 80.0, 200.0]
            .into_iter()
            .map(|w| aggregate_coverage(&path, w).unwrap().area_sq_m)
            .collect();
        assert!(areas[0].abs() < f64::EPSILON);
        for pair in areas.windows(2) {
            assert!(pair[0] <= pair[1], "areas not monotone: {areas:?}");
        }
    }

    #[test]
    fn reversed_path_has_same_area() {
        let path = tokyo_path();
        let forward = aggregate_coverage(&path, 80.0).unwrap().area_sq_m;
        let backward = aggregate_coverage(&path.reversed(), 80.0).unwrap().area_sq_m;
        assert!(
            (forward - backward).abs() <= forward * 1e-6,
            "forward {forward} backward {backward}"
        );
    }

    #[test]
    fn overlapping_segments_are_not_double_counted() {
        let (a, b) = (point(35.61, 139.56), point(35.62, 139.56));
        let once = aggregate_coverage(&TravelPath::new(vec![a, b]), 80.0)
            .unwrap()
            .area_sq_m;
        let back_and_forth = aggregate_coverage(&TravelPath::new(vec![a, b, a, b]), 80.0)
            .unwrap()
            .area_sq_m;
        assert!((once - back_and_forth).abs() <= once * 1e-6);
    }

    #[test]
    fn disjoint_trips_produce_multiple_parts() {
        let near = TravelPath::new(vec![point(35.61, 139.56), point(35.62, 139.56)]);
        let far = TravelPath::new(vec![point(35.71, 139.76), point(35.72, 139.76)]);
        let combined = aggregate_region(&near, 80.0)
            .unwrap()
            .union(&aggregate_region(&far, 80.0).unwrap())
            .unwrap();
        assert_eq!(combined.part_count(), 2);
    }

    #[test]
    fn cap_style_changes_reported_area() {
        let path = tokyo_path();
        let flat = aggregate_coverage_with(
            &path,
            &CorridorOptions::new(80.0).with_cap_style(CapStyle::Flat),
        )
        .unwrap()
        .area_sq_m;
        let square = aggregate_coverage(&path, 80.0).unwrap().area_sq_m;
        assert!(flat < square);
    }
}
