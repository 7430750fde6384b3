//! Decoded geometry model.
//!
//! GeoJSON nests coordinates to a depth that depends on the geometry type.
//! Decoding flattens every supported type into the same shape: a list of
//! [`RingSet`]s, one per polygon or line, each holding its points in order.

mod decode;

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub use decode::{decode_geometry, encode_geometry};

/// The geometry types this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
    LineString,
    MultiLineString,
}

impl GeometryKind {
    /// The GeoJSON `type` string for this kind.
    pub fn type_name(self) -> &'static str {
        match self {
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
        }
    }

    /// Polygon kinds carry rings (outer + optional hole); line kinds carry bare point lists.
    #[inline(always)]
    pub fn is_polygon(self) -> bool {
        matches!(self, GeometryKind::Polygon | GeometryKind::MultiPolygon)
    }

    /// Multi kinds wrap their ring-groups in one extra array level.
    #[inline(always)]
    pub fn is_multi(self) -> bool {
        matches!(self, GeometryKind::MultiPolygon | GeometryKind::MultiLineString)
    }
}

impl FromStr for GeometryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Polygon" => Ok(GeometryKind::Polygon),
            "MultiPolygon" => Ok(GeometryKind::MultiPolygon),
            "LineString" => Ok(GeometryKind::LineString),
            "MultiLineString" => Ok(GeometryKind::MultiLineString),
            other => Err(Error::UnsupportedGeometryKind(other.to_string())),
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A geographic coordinate, longitude first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lon: f32,
    pub lat: f32,
}

impl Point {
    pub fn new(lon: f32, lat: f32) -> Self {
        Self { lon, lat }
    }
}

/// One outer ring (or line) with an optional hole ring.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RingSet {
    main_points: Vec<Point>,
    hole_points: Option<Vec<Point>>,
}

impl RingSet {
    pub(crate) fn line(points: Vec<Point>) -> Self {
        Self {
            main_points: points,
            hole_points: None,
        }
    }

    pub(crate) fn polygon(outer: Vec<Point>, hole: Option<Vec<Point>>) -> Self {
        Self {
            main_points: outer,
            hole_points: hole,
        }
    }

    /// Outer ring for polygons, the whole line for line kinds. May be empty.
    pub fn main_points(&self) -> &[Point] {
        &self.main_points
    }

    /// First hole ring; only ever set on polygon kinds.
    pub fn hole_points(&self) -> Option<&[Point]> {
        self.hole_points.as_deref()
    }
}

/// A decoded geometry. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    kind: GeometryKind,
    objects: Vec<RingSet>,
}

impl Geometry {
    pub(crate) fn new(kind: GeometryKind, objects: Vec<RingSet>) -> Self {
        Self { kind, objects }
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    /// Ring sets in source order.
    pub fn objects(&self) -> &[RingSet] {
        &self.objects
    }

    /// Total number of points across all rings, holes included.
    pub fn point_count(&self) -> usize {
        self.objects
            .iter()
            .map(|o| o.main_points.len() + o.hole_points.as_ref().map_or(0, Vec::len))
            .sum()
    }
}
