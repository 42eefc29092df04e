//! Spherical Web Mercator (EPSG:3857) conversion
//!
//! `to_projected` and `to_geographic` are mutual inverses for every valid
//! geographic point. The `asinh`/`sinh` form keeps both poles finite, though
//! anything beyond [`MAX_MERCATOR_LATITUDE`] lies outside the tiled world and
//! must be clamped before it is drawn.

use std::f64::consts::PI;

use crate::domain::{GeoPoint, MAX_LATITUDE, MAX_LONGITUDE, ProjectedPoint};

/// WGS84 equatorial radius in metres
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude at which the Mercator world becomes square
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Half the side of the projected world square, in metres
pub const WORLD_HALF_EXTENT: f64 = PI * EARTH_RADIUS_M;

pub fn to_projected(point: GeoPoint) -> ProjectedPoint {
    let x = EARTH_RADIUS_M * point.longitude().to_radians();
    let y = EARTH_RADIUS_M * point.latitude().to_radians().tan().asinh();
    ProjectedPoint { x, y }
}

/// Inverse of [`to_projected`]; `point` must lie within the world square
pub fn to_geographic(point: ProjectedPoint) -> GeoPoint {
    let longitude = (point.x / EARTH_RADIUS_M).to_degrees();
    let latitude = (point.y / EARTH_RADIUS_M).sinh().atan().to_degrees();
    // Rounding at the edges can overshoot by an ulp
    GeoPoint::new_unchecked(
        longitude.clamp(-MAX_LONGITUDE, MAX_LONGITUDE),
        latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE),
    )
}

/// Clamp a map coordinate into the tiled world square
///
/// Pointer positions reported past the antimeridian or the Mercator cut-off
/// are pulled back onto the edge so the inverse stays in range.
pub fn clamp_to_world(point: ProjectedPoint) -> ProjectedPoint {
    ProjectedPoint {
        x: point.x.clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT),
        y: point.y.clamp(-WORLD_HALF_EXTENT, WORLD_HALF_EXTENT),
    }
}
