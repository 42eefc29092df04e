//! Error taxonomy for the geofence editor
//!
//! Decode failures are per-entry and never abort a batch. Degenerate gestures
//! are swallowed by the drawing session after logging. Search failures are
//! surfaced to the caller but leave the editor session untouched.

/// Why a WKT string could not be turned into a geometry
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedReason {
    /// Text is neither `POINT(...)` nor `POLYGON((...))`
    #[error("expected POINT(lon lat) or POLYGON((lon lat, ...))")]
    UnrecognizedShape,
    /// A coordinate pair did not contain exactly two numbers
    #[error("invalid coordinate pair `{0}`")]
    InvalidCoordinate(String),
    #[error("non-finite coordinate in `{0}`")]
    NonFiniteCoordinate(String),
    /// Longitude or latitude outside the geographic range
    #[error("coordinate ({longitude}, {latitude}) is out of range")]
    CoordinateOutOfRange { longitude: f64, latitude: f64 },
    #[error("polygon ring has {0} points, at least 3 are required")]
    TooFewVertices(usize),
}

/// A stored geometry string that could not be decoded
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("malformed geometry: {reason}")]
pub struct MalformedGeometryError {
    /// The offending text, kept for reporting
    pub input: String,
    pub reason: MalformedReason,
}

impl MalformedGeometryError {
    pub fn new(input: &str, reason: MalformedReason) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A finished gesture that does not describe a usable area
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("degenerate geometry: {distinct_vertices} distinct vertices, area {area}")]
pub struct DegenerateGeometryError {
    pub distinct_vertices: usize,
    pub area: f64,
}

/// Violations of the geometry value invariants
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("ring needs at least 3 points, got {0}")]
    TooFewVertices(usize),
}

/// Failures of the location search
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("no location found for `{query}`")]
    LocationNotFound { query: String },
    #[error("geocoding request failed: {0}")]
    Transport(String),
    #[error("geocoder returned an invalid coordinate ({longitude}, {latitude})")]
    InvalidCoordinate { longitude: f64, latitude: f64 },
}
