//! Geometric value types for geofences and waypoints
//!
//! Geographic values (longitude/latitude in degrees) are what gets persisted.
//! Projected values only exist on the map surface and are recomputed from the
//! geographic data on every render.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

pub const MAX_LONGITUDE: f64 = 180.0;
pub const MAX_LATITUDE: f64 = 90.0;

/// Planar access shared by geographic and projected points
pub trait Coordinate: Copy + PartialEq {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

/// Longitude/latitude pair in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    longitude: f64,
    latitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = GeometryError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.longitude, raw.latitude)
    }
}

impl GeoPoint {
    /// Create a point, rejecting values outside the geographic range
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeometryError> {
        if !(-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            return Err(GeometryError::LongitudeOutOfRange(longitude));
        }
        if !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(GeometryError::LatitudeOutOfRange(latitude));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Build a point the caller has already range-checked
    pub(crate) fn new_unchecked(longitude: f64, latitude: f64) -> Self {
        debug_assert!(longitude.abs() <= MAX_LONGITUDE + 1e-9);
        debug_assert!(latitude.abs() <= MAX_LATITUDE + 1e-9);
        Self {
            longitude,
            latitude,
        }
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

impl Coordinate for GeoPoint {
    fn x(&self) -> f64 {
        self.longitude
    }

    fn y(&self) -> f64 {
        self.latitude
    }
}

/// Point in the map's projected plane (Web Mercator metres)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Coordinate for ProjectedPoint {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

/// Ordered boundary of at least three points
///
/// The ring is implicitly closed; it only repeats the first point when the
/// producer put it there.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ring<P> {
    points: Vec<P>,
}

impl<P: Coordinate> Ring<P> {
    pub const MIN_POINTS: usize = 3;

    pub fn new(points: Vec<P>) -> Result<Self, GeometryError> {
        if points.len() < Self::MIN_POINTS {
            return Err(GeometryError::TooFewVertices(points.len()));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[P] {
        &self.points
    }

    /// Number of pairwise distinct vertices
    pub fn distinct_vertices(&self) -> usize {
        distinct_count(&self.points)
    }

    /// Unsigned area, closing the ring implicitly
    pub fn area(&self) -> f64 {
        shoelace_area(&self.points)
    }

    pub fn extent(&self) -> Extent {
        let first = Extent::around(self.points[0]);
        self.points[1..].iter().fold(first, |extent, p| extent.include(*p))
    }

    /// Transform every vertex, keeping the vertex count
    pub fn map<Q, F: FnMut(P) -> Q>(&self, f: F) -> Ring<Q> {
        Ring {
            points: self.points.iter().copied().map(f).collect(),
        }
    }
}

/// Number of pairwise distinct points
pub fn distinct_count<P: Coordinate>(points: &[P]) -> usize {
    let mut seen: Vec<P> = Vec::with_capacity(points.len());
    for point in points {
        if !seen.contains(point) {
            seen.push(*point);
        }
    }
    seen.len()
}

/// Unsigned shoelace area of a closed-or-not point sequence
pub fn shoelace_area<P: Coordinate>(points: &[P]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x() * b.y() - b.x() * a.y()
        })
        .sum();
    (twice / 2.0).abs()
}

/// A persisted or drawn shape
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry<P = GeoPoint> {
    Point(P),
    /// Single outer ring; holes are not supported
    Polygon(Ring<P>),
}

/// Geometry expressed on the map surface
pub type ProjectedGeometry = Geometry<ProjectedPoint>;

impl<P: Coordinate> Geometry<P> {
    pub fn map<Q, F: FnMut(P) -> Q>(&self, mut f: F) -> Geometry<Q> {
        match self {
            Geometry::Point(p) => Geometry::Point(f(*p)),
            Geometry::Polygon(ring) => Geometry::Polygon(ring.map(f)),
        }
    }

    pub fn extent(&self) -> Extent {
        match self {
            Geometry::Point(p) => Extent::around(*p),
            Geometry::Polygon(ring) => ring.extent(),
        }
    }
}

/// Axis-aligned bounding box in whatever plane the points live in
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    /// Zero-size extent at a single point
    pub fn around<P: Coordinate>(point: P) -> Self {
        Self {
            min_x: point.x(),
            min_y: point.y(),
            max_x: point.x(),
            max_y: point.y(),
        }
    }

    pub fn include<P: Coordinate>(self, point: P) -> Self {
        Self {
            min_x: self.min_x.min(point.x()),
            min_y: self.min_y.min(point.y()),
            max_x: self.max_x.max(point.x()),
            max_y: self.max_y.max(point.y()),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> ProjectedPoint {
        ProjectedPoint::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// True when the box has no area (a point or a line)
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}
