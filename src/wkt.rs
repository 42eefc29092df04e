//! Well-known text codec for `POINT` and `POLYGON` geometries
//!
//! Writing always produces the canonical form:
//!
//! ```text
//! POINT(76.9366000 8.5241000)
//! POLYGON((10.0000000 20.0000000,30.0000000 20.0000000,30.0000000 40.0000000))
//! ```
//!
//! Reading is deliberately loose. Records written by different screens use
//! `POLYGON((` and `POLYGON ((`, with or without a space after each comma, and
//! the tag in any case. All of those must keep decoding.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{is_not, tag_no_case},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map},
    number::complete::double,
    sequence::{delimited, preceded, separated_pair, tuple},
};

use crate::domain::{GeoPoint, Geometry, Ring};
use crate::error::{GeometryError, MalformedGeometryError, MalformedReason};

/// Fixed number of decimal digits written per coordinate (sub-metre accuracy)
pub const PRECISION: usize = 7;

/// Serialize a geographic geometry to canonical WKT
///
/// Rings are written exactly as given; closure is up to the producer.
pub fn encode(geometry: &Geometry) -> String {
    match geometry {
        Geometry::Point(p) => format!("POINT({})", format_pair(p)),
        Geometry::Polygon(ring) => {
            let pairs: Vec<String> = ring.points().iter().map(format_pair).collect();
            format!("POLYGON(({}))", pairs.join(","))
        }
    }
}

fn format_pair(point: &GeoPoint) -> String {
    format!(
        "{:.prec$} {:.prec$}",
        point.longitude(),
        point.latitude(),
        prec = PRECISION
    )
}

/// Round a coordinate the same way [`encode`] does
pub fn snap_to_precision(value: f64) -> f64 {
    format!("{value:.prec$}", prec = PRECISION)
        .parse()
        .unwrap_or(value)
}

/// Round every coordinate of a geometry to the written precision
///
/// `decode(&encode(g)) == snap(g)` for every geometry this crate produces.
pub fn snap(geometry: &Geometry) -> Geometry {
    geometry.map(|p| {
        GeoPoint::new_unchecked(
            snap_to_precision(p.longitude()),
            snap_to_precision(p.latitude()),
        )
    })
}

/// Parse WKT text into a geographic geometry
pub fn decode(text: &str) -> Result<Geometry, MalformedGeometryError> {
    let malformed = |reason| MalformedGeometryError::new(text, reason);

    let (_, parsed) = all_consuming(shape)(text.trim())
        .map_err(|_| malformed(MalformedReason::UnrecognizedShape))?;

    match parsed {
        Shape::Point(body) => {
            let point = parse_point(body).map_err(malformed)?;
            Ok(Geometry::Point(point))
        }
        Shape::Polygon(body) => {
            let points = body
                .split(',')
                .map(parse_point)
                .collect::<Result<Vec<_>, _>>()
                .map_err(malformed)?;
            let ring = Ring::new(points).map_err(|err| match err {
                GeometryError::TooFewVertices(n) => malformed(MalformedReason::TooFewVertices(n)),
                _ => malformed(MalformedReason::UnrecognizedShape),
            })?;
            Ok(Geometry::Polygon(ring))
        }
    }
}

/// Outer structure with the coordinate list still unparsed
enum Shape<'a> {
    Point(&'a str),
    Polygon(&'a str),
}

fn shape(input: &str) -> IResult<&str, Shape<'_>> {
    alt((point_shape, polygon_shape))(input)
}

/// `POINT` ws `(` body `)`
fn point_shape(input: &str) -> IResult<&str, Shape<'_>> {
    map(
        preceded(tuple((tag_no_case("POINT"), multispace0)), parenthesized),
        Shape::Point,
    )(input)
}

/// `POLYGON` ws `(` ws `(` body `)` ws `)`
fn polygon_shape(input: &str) -> IResult<&str, Shape<'_>> {
    map(
        preceded(
            tuple((tag_no_case("POLYGON"), multispace0)),
            delimited(
                tuple((char('('), multispace0)),
                parenthesized,
                tuple((multispace0, char(')'))),
            ),
        ),
        Shape::Polygon,
    )(input)
}

fn parenthesized(input: &str) -> IResult<&str, &str> {
    delimited(char('('), is_not("()"), char(')'))(input)
}

/// `lon lat`, surrounding whitespace tolerated
fn coordinate_pair(input: &str) -> IResult<&str, (f64, f64)> {
    delimited(
        multispace0,
        separated_pair(double, multispace1, double),
        multispace0,
    )(input)
}

fn parse_point(pair: &str) -> Result<GeoPoint, MalformedReason> {
    let (_, (longitude, latitude)) = all_consuming(coordinate_pair)(pair)
        .map_err(|_| MalformedReason::InvalidCoordinate(pair.trim().to_string()))?;
    if !longitude.is_finite() || !latitude.is_finite() {
        return Err(MalformedReason::NonFiniteCoordinate(pair.trim().to_string()));
    }
    GeoPoint::new(longitude, latitude).map_err(|_| MalformedReason::CoordinateOutOfRange {
        longitude,
        latitude,
    })
}
