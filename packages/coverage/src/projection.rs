//! Map projections between geographic coordinates and planar meters.
//!
//! Two projections are provided, both on the WGS84 ellipsoid:
//!
//! * [`AzimuthalEquidistant`] preserves distance and azimuth from a single
//!   origin. It is used to lay out discs of a known radius and never to
//!   measure the area of arbitrary polygons.
//! * [`AlbersEqualArea`] is a conic equal-area projection whose standard
//!   parallels are chosen per polygon from its latitude span.
//!
//! Coordinates follow the `geo` convention: `x` is longitude and `y` is
//! latitude in the geographic frame, easting and northing in meters in the
//! projected frame.

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use geo::{Bearing, Coord, Destination, Distance, Geodesic, MapCoords, Point, Rect};
use travel_coverage_models::GeoPoint;

use crate::CoverageError;
use crate::region::{Frame, Region};

/// WGS84 semi-major axis in meters.
pub const WGS84_SEMI_MAJOR_M: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Below this cone constant the Albers cone is numerically a cylinder and
/// the cylindrical equal-area limit is used instead.
const CONIC_EPSILON: f64 = 1e-6;

const INVERSE_TOLERANCE_RAD: f64 = 1e-12;
const INVERSE_MAX_ITERATIONS: usize = 25;

/// Identifies a projected frame by projection type and defining parameters.
///
/// Two regions are in the same frame only if their kinds compare equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionKind {
    /// Azimuthal equidistant centred on an origin (degrees).
    AzimuthalEquidistant {
        origin_lat: f64,
        origin_lon: f64,
    },
    /// Albers equal-area conic with two standard parallels and a central
    /// meridian (degrees).
    AlbersEqualArea { lat_1: f64, lat_2: f64, lon_0: f64 },
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AzimuthalEquidistant {
                origin_lat,
                origin_lon,
            } => write!(f, "aeqd(lat_0={origin_lat}, lon_0={origin_lon})"),
            Self::AlbersEqualArea {
                lat_1,
                lat_2,
                lon_0,
            } => write!(f, "aea(lat_1={lat_1}, lat_2={lat_2}, lon_0={lon_0})"),
        }
    }
}

/// A bijective mapping between lon/lat degrees and planar meters.
pub trait Projection {
    /// The frame produced by [`Projection::forward`].
    fn kind(&self) -> ProjectionKind;

    /// Maps a lon/lat coordinate (degrees) to planar meters.
    fn forward(&self, coord: Coord<f64>) -> Coord<f64>;

    /// Maps planar meters back to lon/lat degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinate lies outside the projection's
    /// valid domain.
    fn inverse(&self, coord: Coord<f64>) -> Result<Coord<f64>, CoverageError>;
}

/// Builds an azimuthal equidistant projection centred on `origin`.
#[must_use]
pub fn equidistant_transform(origin: GeoPoint) -> AzimuthalEquidistant {
    AzimuthalEquidistant::new(origin)
}

/// Builds an Albers equal-area projection with standard parallels at
/// `lat_min` and `lat_max` and the Greenwich central meridian.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidGeometry`] if the parallels coincide or
/// are not valid latitudes.
pub fn equal_area_transform(lat_min: f64, lat_max: f64) -> Result<AlbersEqualArea, CoverageError> {
    AlbersEqualArea::new(lat_min, lat_max, 0.0)
}

/// Builds an Albers equal-area projection tuned to a lon/lat bounding box:
/// standard parallels at its south and north edges, central meridian
/// through its middle.
///
/// # Errors
///
/// Returns [`CoverageError::InvalidGeometry`] if the box has zero height.
pub fn equal_area_transform_for(bounds: &Rect<f64>) -> Result<AlbersEqualArea, CoverageError> {
    AlbersEqualArea::new(bounds.min().y, bounds.max().y, bounds.center().x)
}

/// Projects a geographic region into `projection`'s planar frame.
///
/// # Errors
///
/// Returns [`CoverageError::FrameMismatch`] if `region` is not geographic.
pub fn project_region(
    region: &Region,
    projection: &impl Projection,
) -> Result<Region, CoverageError> {
    region.require_frame(Frame::Geographic)?;
    let shape = region.shape().map_coords(|c| projection.forward(c));
    Ok(Region::new(Frame::Projected(projection.kind()), shape))
}

/// Maps a region in `projection`'s planar frame back to lon/lat.
///
/// # Errors
///
/// Returns [`CoverageError::FrameMismatch`] if `region` is not in this
/// projection's frame, or the inverse error for out-of-domain vertices.
pub fn unproject_region(
    region: &Region,
    projection: &impl Projection,
) -> Result<Region, CoverageError> {
    region.require_frame(Frame::Projected(projection.kind()))?;
    let shape = region
        .shape()
        .try_map_coords(|c| projection.inverse(c))?;
    Ok(Region::new(Frame::Geographic, shape))
}

/// Azimuthal equidistant projection on the WGS84 ellipsoid.
///
/// Forward solves the geodesic inverse problem from the origin and places
/// the point at `(s sin α, s cos α)`; inverse solves the direct problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AzimuthalEquidistant {
    origin: Point<f64>,
}

impl AzimuthalEquidistant {
    #[must_use]
    pub fn new(origin: GeoPoint) -> Self {
        Self {
            origin: Point::new(origin.longitude(), origin.latitude()),
        }
    }
}

impl Projection for AzimuthalEquidistant {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::AzimuthalEquidistant {
            origin_lat: self.origin.y(),
            origin_lon: self.origin.x(),
        }
    }

    fn forward(&self, coord: Coord<f64>) -> Coord<f64> {
        let point = Point::from(coord);
        if point == self.origin {
            return Coord { x: 0.0, y: 0.0 };
        }
        let distance = Geodesic.distance(self.origin, point);
        let azimuth = Geodesic.bearing(self.origin, point).to_radians();
        Coord {
            x: distance * azimuth.sin(),
            y: distance * azimuth.cos(),
        }
    }

    fn inverse(&self, coord: Coord<f64>) -> Result<Coord<f64>, CoverageError> {
        let distance = coord.x.hypot(coord.y);
        if !distance.is_finite() {
            return Err(CoverageError::invalid_geometry(format!(
                "non-finite planar coordinate ({}, {})",
                coord.x, coord.y
            )));
        }
        if distance == 0.0 {
            return Ok(self.origin.into());
        }
        let azimuth = coord.x.atan2(coord.y).to_degrees();
        let point = Geodesic.destination(self.origin, azimuth, distance);
        Ok(point.into())
    }
}

/// Shape of the Albers surface for a given pair of standard parallels.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cone {
    Conic { n: f64, c: f64, rho_0: f64 },
    /// Limit of the cone as `n -> 0` (parallels symmetric about the
    /// equator): Lambert cylindrical equal-area with scale `k0` along the
    /// standard parallels.
    Cylindrical { k0: f64 },
}

/// Albers equal-area conic projection on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlbersEqualArea {
    lat_1: f64,
    lat_2: f64,
    lon_0: f64,
    cone: Cone,
}

impl AlbersEqualArea {
    /// # Errors
    ///
    /// Returns [`CoverageError::InvalidGeometry`] if the parallels are
    /// non-finite, out of range, or equal, or if `lon_0` is non-finite.
    pub fn new(lat_1: f64, lat_2: f64, lon_0: f64) -> Result<Self, CoverageError> {
        for lat in [lat_1, lat_2] {
            if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
                return Err(CoverageError::invalid_geometry(format!(
                    "standard parallel {lat} is not a valid latitude"
                )));
            }
        }
        if !lon_0.is_finite() {
            return Err(CoverageError::invalid_geometry(format!(
                "central meridian {lon_0} is not finite"
            )));
        }
        if (lat_1 - lat_2).abs() < f64::EPSILON {
            return Err(CoverageError::invalid_geometry(format!(
                "degenerate latitude span: both standard parallels are {lat_1}"
            )));
        }

        let (sin_1, cos_1) = lat_1.to_radians().sin_cos();
        let (sin_2, cos_2) = lat_2.to_radians().sin_cos();
        let m_1 = meridian_factor(sin_1, cos_1);
        let m_2 = meridian_factor(sin_2, cos_2);
        let q_1 = authalic_q(sin_1);
        let q_2 = authalic_q(sin_2);

        let n = (m_1 * m_1 - m_2 * m_2) / (q_2 - q_1);
        let cone = if n.abs() < CONIC_EPSILON {
            Cone::Cylindrical { k0: m_1 }
        } else {
            let c = m_1 * m_1 + n * q_1;
            Cone::Conic {
                n,
                c,
                rho_0: WGS84_SEMI_MAJOR_M * c.max(0.0).sqrt() / n,
            }
        };

        if matches!(cone, Cone::Cylindrical { k0 } if k0 <= 0.0) {
            return Err(CoverageError::invalid_geometry(format!(
                "standard parallels {lat_1} and {lat_2} cannot define a projection"
            )));
        }

        log::trace!("Albers equal-area lat_1={lat_1} lat_2={lat_2} lon_0={lon_0} cone={cone:?}");

        Ok(Self {
            lat_1,
            lat_2,
            lon_0,
            cone,
        })
    }

    /// Longitude difference from the central meridian in radians,
    /// wrapped into `[-π, π]`.
    fn delta_lambda(&self, lon: f64) -> f64 {
        let mut delta = lon - self.lon_0;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }
        delta.to_radians()
    }
}

impl Projection for AlbersEqualArea {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::AlbersEqualArea {
            lat_1: self.lat_1,
            lat_2: self.lat_2,
            lon_0: self.lon_0,
        }
    }

    fn forward(&self, coord: Coord<f64>) -> Coord<f64> {
        let lambda = self.delta_lambda(coord.x);
        let q = authalic_q(coord.y.to_radians().sin());
        let a = WGS84_SEMI_MAJOR_M;

        match self.cone {
            Cone::Conic { n, c, rho_0 } => {
                let rho = a * (c - n * q).max(0.0).sqrt() / n;
                let theta = n * lambda;
                Coord {
                    x: rho * theta.sin(),
                    y: rho_0 - rho * theta.cos(),
                }
            }
            Cone::Cylindrical { k0 } => Coord {
                x: a * k0 * lambda,
                y: a * q / (2.0 * k0),
            },
        }
    }

    fn inverse(&self, coord: Coord<f64>) -> Result<Coord<f64>, CoverageError> {
        if !coord.x.is_finite() || !coord.y.is_finite() {
            return Err(CoverageError::invalid_geometry(format!(
                "non-finite planar coordinate ({}, {})",
                coord.x, coord.y
            )));
        }
        let a = WGS84_SEMI_MAJOR_M;

        let (q, lambda) = match self.cone {
            Cone::Conic { n, c, rho_0 } => {
                let dy = rho_0 - coord.y;
                let rho = coord.x.hypot(dy).copysign(n);
                let theta = if n > 0.0 {
                    coord.x.atan2(dy)
                } else {
                    (-coord.x).atan2(-dy)
                };
                ((c - rho * rho * n * n / (a * a)) / n, theta / n)
            }
            Cone::Cylindrical { k0 } => (2.0 * coord.y * k0 / a, coord.x / (a * k0)),
        };

        let phi = latitude_from_q(q)?;
        Ok(Coord {
            x: self.lon_0 + lambda.to_degrees(),
            y: phi.to_degrees(),
        })
    }
}

fn eccentricity_squared() -> f64 {
    WGS84_FLATTENING * (2.0 - WGS84_FLATTENING)
}

/// `m(φ) = cos φ / sqrt(1 - e² sin² φ)`.
fn meridian_factor(sin_phi: f64, cos_phi: f64) -> f64 {
    cos_phi / eccentricity_squared().mul_add(-sin_phi * sin_phi, 1.0).sqrt()
}

/// Authalic `q(φ)` from Snyder's Albers formulas.
pub(crate) fn authalic_q(sin_phi: f64) -> f64 {
    let e2 = eccentricity_squared();
    let e = e2.sqrt();
    let e_sin = e * sin_phi;
    (1.0 - e2) * (sin_phi / (1.0 - e_sin * e_sin) - ((1.0 - e_sin) / (1.0 + e_sin)).ln() / (2.0 * e))
}

/// Inverts [`authalic_q`] by fixed-point iteration.
fn latitude_from_q(q: f64) -> Result<f64, CoverageError> {
    let q_pole = authalic_q(1.0);
    if q.abs() >= q_pole {
        return Ok(FRAC_PI_2.copysign(q));
    }

    let e2 = eccentricity_squared();
    let e = e2.sqrt();
    let mut phi = (q / 2.0).asin();

    for _ in 0..INVERSE_MAX_ITERATIONS {
        let (sin_phi, cos_phi) = phi.sin_cos();
        let e_sin = e * sin_phi;
        let one_minus = 1.0 - e_sin * e_sin;
        let delta = one_minus * one_minus / (2.0 * cos_phi)
            * (q / (1.0 - e2) - sin_phi / one_minus
                + ((1.0 - e_sin) / (1.0 + e_sin)).ln() / (2.0 * e));
        phi += delta;
        if delta.abs() < INVERSE_TOLERANCE_RAD {
            return Ok(phi);
        }
    }

    Err(CoverageError::invalid_geometry(format!(
        "latitude did not converge for authalic q={q}"
    )))
}
