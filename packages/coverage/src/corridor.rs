//! Buffering a travel segment into a constant-width corridor polygon.
//!
//! The segment is treated as a straight line in lon/lat space and widened
//! by a half width converted from meters to degrees with the small-angle
//! relation `deg = m / R * 180 / π`. The conversion does not shrink the
//! longitude component at higher latitudes, so corridors are narrower (in
//! meters) east-west than north-south away from the equator. Reported
//! areas depend on this approximation and it is kept as is.

use std::f64::consts::PI;

use geo::{Coord, LineString, Polygon};
use travel_coverage_models::{CapStyle, GeoPoint};

use crate::CoverageError;
use crate::region::Region;

/// Sphere radius used for the meters-to-degrees conversion (WGS84 `a`).
pub const EARTH_RADIUS_METERS: f64 = 6_378_137.0;

/// Default corridor half width in meters.
pub const DEFAULT_HALF_WIDTH_METERS: f64 = 80.0;

/// Default vertex count for each semicircular cap of [`CapStyle::Round`].
pub const DEFAULT_ARC_SEGMENTS: usize = 16;

/// Converts a distance in meters to degrees of arc.
#[must_use]
pub fn meters_to_degrees(meters: f64) -> f64 {
    meters / EARTH_RADIUS_METERS * (180.0 / PI)
}

/// How segments are widened into corridors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorridorOptions {
    /// Distance from the centre line to each corridor edge, in meters.
    pub half_width_meters: f64,
    /// End-cap shape at each segment endpoint.
    pub cap_style: CapStyle,
    /// Vertices per semicircle when `cap_style` is [`CapStyle::Round`].
    pub arc_segments: usize,
}

impl CorridorOptions {
    /// Square caps with the given half width.
    #[must_use]
    pub const fn new(half_width_meters: f64) -> Self {
        Self {
            half_width_meters,
            cap_style: CapStyle::Square,
            arc_segments: DEFAULT_ARC_SEGMENTS,
        }
    }

    #[must_use]
    pub const fn with_cap_style(mut self, cap_style: CapStyle) -> Self {
        self.cap_style = cap_style;
        self
    }

    #[must_use]
    pub const fn with_arc_segments(mut self, arc_segments: usize) -> Self {
        self.arc_segments = arc_segments;
        self
    }

    /// # Errors
    ///
    /// Returns [`CoverageError::InvalidParameter`] for a negative or
    /// non-finite half width, or a round cap with no arc segments.
    pub fn validate(&self) -> Result<(), CoverageError> {
        if !self.half_width_meters.is_finite() || self.half_width_meters < 0.0 {
            return Err(CoverageError::invalid_parameter(format!(
                "buffer half width must be a non-negative number of meters, got {}",
                self.half_width_meters
            )));
        }
        if self.cap_style == CapStyle::Round && self.arc_segments == 0 {
            return Err(CoverageError::invalid_parameter(
                "round caps need at least one arc segment",
            ));
        }
        Ok(())
    }
}

impl Default for CorridorOptions {
    fn default() -> Self {
        Self::new(DEFAULT_HALF_WIDTH_METERS)
    }
}

/// Buffers the segment `p1 -> p2` with square caps.
///
/// Returns an empty region for a zero-length segment or a zero width.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidParameter`] for a negative or
/// non-finite half width.
pub fn buffer_segment(
    p1: GeoPoint,
    p2: GeoPoint,
    half_width_meters: f64,
) -> Result<Region, CoverageError> {
    buffer_segment_with(p1, p2, &CorridorOptions::new(half_width_meters))
}

/// Buffers the segment `p1 -> p2` according to `options`.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidParameter`] if `options` is invalid.
pub fn buffer_segment_with(
    p1: GeoPoint,
    p2: GeoPoint,
    options: &CorridorOptions,
) -> Result<Region, CoverageError> {
    options.validate()?;

    let a = Coord {
        x: p1.longitude(),
        y: p1.latitude(),
    };
    let b = Coord {
        x: p2.longitude(),
        y: p2.latitude(),
    };
    let delta = b - a;
    let length = delta.x.hypot(delta.y);
    let width = meters_to_degrees(options.half_width_meters);

    if length == 0.0 || width == 0.0 {
        log::trace!("Skipping degenerate corridor {p1} -> {p2}");
        return Ok(Region::empty_geographic());
    }

    let along = delta / length;
    let across = Coord {
        x: -along.y,
        y: along.x,
    };

    let ring = match options.cap_style {
        CapStyle::Flat => rectangle(a, b, across * width),
        CapStyle::Square => {
            let extend = along * width;
            rectangle(a - extend, b + extend, across * width)
        }
        CapStyle::Round => stadium(a, b, across, width, options.arc_segments),
    };

    Ok(Region::from(Polygon::new(LineString::new(ring), Vec::new())))
}

fn rectangle(a: Coord<f64>, b: Coord<f64>, offset: Coord<f64>) -> Vec<Coord<f64>> {
    vec![
        a + offset,
        b + offset,
        b - offset,
        a - offset,
        a + offset,
    ]
}

/// Flat sides joined by a semicircle around each endpoint.
fn stadium(
    a: Coord<f64>,
    b: Coord<f64>,
    across: Coord<f64>,
    width: f64,
    arc_segments: usize,
) -> Vec<Coord<f64>> {
    let start_angle = across.y.atan2(across.x);
    #[allow(clippy::cast_precision_loss)]
    let step = PI / arc_segments as f64;

    let arc = |centre: Coord<f64>, from: f64| {
        (0..=arc_segments).map(move |i| {
            #[allow(clippy::cast_precision_loss)]
            let (sin, cos) = (from - step * i as f64).sin_cos();
            Coord {
                x: centre.x + width * cos,
                y: centre.y + width * sin,
            }
        })
    };

    let mut ring: Vec<Coord<f64>> = arc(b, start_angle)
        .chain(arc(a, start_angle + PI))
        .collect();
    ring.push(ring[0]);
    ring
}

#[cfg(test)]
mod tests {
    use geo::Area;

    use super::*;
    use crate::area::metric_area;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn degree_area(region: &Region) -> f64 {
        region.shape().unsigned_area()
    }

    #[test]
    fn converts_meters_to_degrees() {
        let one_degree = EARTH_RADIUS_METERS * PI / 180.0;
        assert!((meters_to_degrees(one_degree) - 1.0).abs() < 1e-12);
        assert!(meters_to_degrees(0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_negative_width() {
        assert!(matches!(
            buffer_segment(point(0.0, 0.0), point(0.0, 1.0), -1.0),
            Err(CoverageError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn rejects_nan_width() {
        assert!(buffer_segment(point(0.0, 0.0), point(0.0, 1.0), f64::NAN).is_err());
    }

    #[test]
    fn zero_length_segment_is_empty() {
        let p = point(35.6168, 139.5644);
        assert!(buffer_segment(p, p, 80.0).unwrap().is_empty());
    }

    #[test]
    fn zero_width_is_empty() {
        let corridor = buffer_segment(point(0.0, 0.0), point(0.0, 1.0), 0.0).unwrap();
        assert!(corridor.is_empty());
    }

    #[test]
    fn square_cap_extends_past_endpoints() {
        let width = meters_to_degrees(80.0);
        let corridor = buffer_segment(point(10.0, 20.0), point(10.0, 20.01), 80.0).unwrap();
        let bounds = corridor.bounds().unwrap();

        assert!((bounds.min().x - (20.0 - width)).abs() < 1e-12);
        assert!((bounds.max().x - (20.01 + width)).abs() < 1e-12);
        assert!((bounds.min().y - (10.0 - width)).abs() < 1e-12);
        assert!((bounds.max().y - (10.0 + width)).abs() < 1e-12);
    }

    #[test]
    fn flat_cap_stops_at_endpoints() {
        let options = CorridorOptions::new(80.0).with_cap_style(CapStyle::Flat);
        let corridor =
            buffer_segment_with(point(10.0, 20.0), point(10.0, 20.01), &options).unwrap();
        let bounds = corridor.bounds().unwrap();

        assert!((bounds.min().x - 20.0).abs() < 1e-12);
        assert!((bounds.max().x - 20.01).abs() < 1e-12);
    }

    #[test]
    fn cap_styles_order_by_area() {
        let (a, b) = (point(35.6078, 139.5576), point(35.6108, 139.5727));
        let area = |cap| {
            let options = CorridorOptions::new(80.0).with_cap_style(cap);
            degree_area(&buffer_segment_with(a, b, &options).unwrap())
        };

        let flat = area(CapStyle::Flat);
        let round = area(CapStyle::Round);
        let square = area(CapStyle::Square);
        assert!(flat < round, "flat {flat} round {round}");
        assert!(round < square, "round {round} square {square}");
    }

    #[test]
    fn round_cap_ring_is_closed() {
        let options = CorridorOptions::new(50.0)
            .with_cap_style(CapStyle::Round)
            .with_arc_segments(8);
        let corridor =
            buffer_segment_with(point(0.0, 0.0), point(0.001, 0.001), &options).unwrap();
        let ring = corridor.shape().0[0].exterior();
        assert_eq!(ring.0.len(), 2 * 9 + 1);
        assert_eq!(ring.0.first(), ring.0.last());
    }

    #[test]
    fn round_cap_requires_arc_segments() {
        let options = CorridorOptions::new(50.0)
            .with_cap_style(CapStyle::Round)
            .with_arc_segments(0);
        assert!(buffer_segment_with(point(0.0, 0.0), point(0.0, 0.01), &options).is_err());
    }

    #[test]
    fn equatorial_corridor_matches_ellipsoidal_area() {
        // Square caps: (0.01° + 2w) × 2w lon/lat box straddling the equator.
        let corridor = buffer_segment(point(0.0, 0.0), point(0.0, 0.01), 80.0).unwrap();
        let area = metric_area(&corridor).unwrap();
        assert!(
            (area - 202_342.0).abs() < 202_342.0 * 0.005,
            "corridor area {area}"
        );
    }

    #[test]
    fn corridor_is_symmetric_in_endpoints() {
        let (a, b) = (point(35.6168, 139.5644), point(35.6078, 139.5576));
        let forward = degree_area(&buffer_segment(a, b, 80.0).unwrap());
        let backward = degree_area(&buffer_segment(b, a, 80.0).unwrap());
        assert!((forward - backward).abs() < 1e-15);
    }
}
