//! Geodesic discs around a reference point.
//!
//! A circle of the requested radius is laid out around the origin of an
//! azimuthal equidistant frame centred on the point and then mapped back to
//! lon/lat. Every vertex is therefore at the true geodesic distance from the
//! centre; only the straight edges between vertices are approximate.

use std::f64::consts::TAU;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use travel_coverage_models::GeoPoint;

use crate::CoverageError;
use crate::projection::{Projection as _, equidistant_transform, unproject_region};
use crate::region::{Frame, Region};

/// Vertices used to approximate a disc (16 per quarter circle).
pub const DISC_SEGMENTS: usize = 64;

/// Fewest vertices accepted by [`build_disc_with_segments`].
pub const MIN_DISC_SEGMENTS: usize = 8;

/// Builds a disc of `radius_meters` around `center` in the geographic frame.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidParameter`] if the radius is not a
/// positive finite number.
pub fn build_disc(center: GeoPoint, radius_meters: f64) -> Result<Region, CoverageError> {
    build_disc_with_segments(center, radius_meters, DISC_SEGMENTS)
}

/// Like [`build_disc`], with an explicit vertex count.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidParameter`] if the radius is not a
/// positive finite number or `segments` is below [`MIN_DISC_SEGMENTS`].
pub fn build_disc_with_segments(
    center: GeoPoint,
    radius_meters: f64,
    segments: usize,
) -> Result<Region, CoverageError> {
    validate_radius(radius_meters)?;
    if segments < MIN_DISC_SEGMENTS {
        return Err(CoverageError::invalid_parameter(format!(
            "disc needs at least {MIN_DISC_SEGMENTS} segments, got {segments}"
        )));
    }

    let projection = equidistant_transform(center);

    #[allow(clippy::cast_precision_loss)]
    let step = TAU / segments as f64;
    let mut ring: Vec<Coord<f64>> = (0..segments)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let (sin, cos) = (step * i as f64).sin_cos();
            Coord {
                x: radius_meters * cos,
                y: radius_meters * sin,
            }
        })
        .collect();
    ring.push(ring[0]);

    let planar = Region::new(
        Frame::Projected(projection.kind()),
        MultiPolygon(vec![Polygon::new(LineString::new(ring), Vec::new())]),
    );

    log::debug!("Building disc at {center} radius={radius_meters}m segments={segments}");

    unproject_region(&planar, &projection)
}

/// Rejects radii that cannot describe a disc.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidParameter`] unless `radius_meters` is
/// finite and strictly positive.
pub fn validate_radius(radius_meters: f64) -> Result<(), CoverageError> {
    if radius_meters.is_finite() && radius_meters > 0.0 {
        Ok(())
    } else {
        Err(CoverageError::invalid_parameter(format!(
            "disc radius must be a positive number of meters, got {radius_meters}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use geo::{Distance, Geodesic, Point};

    use super::*;
    use crate::area::metric_area;

    fn center() -> GeoPoint {
        GeoPoint::new(35.6173, 139.5646).unwrap()
    }

    #[test]
    fn rejects_zero_radius() {
        assert!(matches!(
            build_disc(center(), 0.0),
            Err(CoverageError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn rejects_negative_radius() {
        assert!(matches!(
            build_disc(center(), -5.0),
            Err(CoverageError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_radius() {
        assert!(build_disc(center(), f64::NAN).is_err());
        assert!(build_disc(center(), f64::INFINITY).is_err());
    }

    #[test]
    fn rejects_too_few_segments() {
        assert!(matches!(
            build_disc_with_segments(center(), 100.0, 4),
            Err(CoverageError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn disc_is_geographic_and_closed() {
        let disc = build_disc(center(), 1_200.0).unwrap();
        assert_eq!(disc.frame(), Frame::Geographic);
        assert_eq!(disc.part_count(), 1);

        let ring = disc.shape().0[0].exterior();
        assert_eq!(ring.0.len(), DISC_SEGMENTS + 1);
        assert_eq!(ring.0.first(), ring.0.last());
    }

    #[test]
    fn vertices_lie_at_geodesic_radius() {
        let disc = build_disc(center(), 1_200.0).unwrap();
        let origin = Point::new(139.5646, 35.6173);
        for coord in &disc.shape().0[0].exterior().0 {
            let distance = Geodesic.distance(origin, Point::from(*coord));
            assert!(
                (distance - 1_200.0).abs() < 1e-6,
                "vertex at {distance}m from centre"
            );
        }
    }

    #[test]
    fn area_approaches_pi_r_squared() {
        let radius = 2_000.0;
        let area = metric_area(&build_disc(center(), radius).unwrap()).unwrap();
        let circle = PI * radius * radius;
        // A 64-gon covers ~99.84% of its circumscribed circle.
        assert!(area < circle);
        assert!(area > circle * 0.995, "disc area {area} vs circle {circle}");
    }
}
