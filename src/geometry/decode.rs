use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::Value;

use super::{Geometry, GeometryKind, Point, RingSet};
use crate::error::{Error, Result};

/// Decode a GeoJSON geometry object into a [`Geometry`].
///
/// Accepted nesting per kind:
/// ```text
/// LineString       [[lon,lat], ...]
/// MultiLineString  [[[lon,lat], ...], ...]
/// Polygon          [outer, hole?, ...]            (rings are [[lon,lat], ...])
/// MultiPolygon     [[outer, hole?, ...], ...]
/// ```
/// Singular kinds are treated as a multi kind with one ring-group. For polygon
/// kinds only the first two rings are kept; further rings are still validated.
pub fn decode_geometry(value: &Value) -> Result<Geometry> {
    let type_value = value.get("type").ok_or(Error::MissingField("type"))?;
    let coordinates = value
        .get("coordinates")
        .ok_or(Error::MissingField("coordinates"))?;

    let kind: GeometryKind = match type_value.as_str() {
        Some(name) => name.parse()?,
        None => return Err(Error::UnsupportedGeometryKind(type_value.to_string())),
    };

    let groups: Vec<&Value> = if kind.is_multi() {
        expect_array(coordinates, "coordinates")?.iter().collect()
    } else {
        vec![coordinates]
    };

    let objects = groups
        .into_iter()
        .map(|group| {
            if kind.is_polygon() {
                decode_rings(group)
            } else {
                decode_points(group).map(RingSet::line)
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Geometry::new(kind, objects))
}

/// Re-encoding a geometry as GeoJSON is not supported.
pub fn encode_geometry(_geometry: &Geometry) -> Result<Value> {
    Err(Error::NotImplemented("geometry encoding"))
}

impl Serialize for Geometry {
    fn serialize<S: Serializer>(&self, _serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Err(S::Error::custom(Error::NotImplemented("geometry encoding")))
    }
}

impl TryFrom<&geojson::Geometry> for Geometry {
    type Error = Error;

    /// Apply the same rules as [`decode_geometry`] to a geometry that the
    /// `geojson` crate has already parsed.
    fn try_from(geometry: &geojson::Geometry) -> Result<Self> {
        use geojson::Value as G;

        let (kind, objects) = match &geometry.value {
            G::LineString(line) => (
                GeometryKind::LineString,
                vec![RingSet::line(positions(line.as_slice())?)],
            ),
            G::MultiLineString(lines) => (
                GeometryKind::MultiLineString,
                lines
                    .iter()
                    .map(|line| positions(line.as_slice()).map(RingSet::line))
                    .collect::<Result<Vec<_>>>()?,
            ),
            G::Polygon(rings) => (GeometryKind::Polygon, vec![ring_set(rings.as_slice())?]),
            G::MultiPolygon(polygons) => (
                GeometryKind::MultiPolygon,
                polygons.iter().map(|rings| ring_set(rings.as_slice())).collect::<Result<Vec<_>>>()?,
            ),
            G::Point(_) => return Err(Error::UnsupportedGeometryKind("Point".into())),
            G::MultiPoint(_) => return Err(Error::UnsupportedGeometryKind("MultiPoint".into())),
            _ => return Err(Error::UnsupportedGeometryKind("GeometryCollection".into())),
        };

        Ok(Geometry::new(kind, objects))
    }
}

/// Decode one polygon ring-group: ring 0 is the outline, ring 1 the hole.
fn decode_rings(group: &Value) -> Result<RingSet> {
    let mut rings = expect_array(group, "polygon")?
        .iter()
        .map(decode_points)
        .collect::<Result<Vec<_>>>()?;
    rings.truncate(2);

    let hole = if rings.len() == 2 { rings.pop() } else { None };
    let outer = rings.pop().unwrap_or_default();
    Ok(RingSet::polygon(outer, hole))
}

fn decode_points(ring: &Value) -> Result<Vec<Point>> {
    expect_array(ring, "ring")?.iter().map(decode_position).collect()
}

fn decode_position(position: &Value) -> Result<Point> {
    let pair = expect_array(position, "position")?;
    match pair.as_slice() {
        [lon, lat] => match (lon.as_f64(), lat.as_f64()) {
            (Some(lon), Some(lat)) => Ok(Point::new(lon as f32, lat as f32)),
            _ => Err(Error::MalformedCoordinate(format!(
                "position {position} is not numeric"
            ))),
        },
        _ => Err(Error::MalformedCoordinate(format!(
            "position {position} has {} values, expected 2",
            pair.len()
        ))),
    }
}

fn expect_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::MalformedCoordinate(format!("expected {what} array, found {value}")))
}

fn positions<P: AsRef<[f64]>>(line: &[P]) -> Result<Vec<Point>> {
    line.iter()
        .map(|position| match position.as_ref() {
            &[lon, lat] => Ok(Point::new(lon as f32, lat as f32)),
            other => Err(Error::MalformedCoordinate(format!(
                "position {other:?} has {} values, expected 2",
                other.len()
            ))),
        })
        .collect()
}

fn ring_set<P: AsRef<[f64]>>(rings: &[Vec<P>]) -> Result<RingSet> {
    let mut decoded = rings
        .iter()
        .map(|ring| positions(ring.as_slice()))
        .collect::<Result<Vec<_>>>()?;
    decoded.truncate(2);

    let hole = if decoded.len() == 2 { decoded.pop() } else { None };
    Ok(RingSet::polygon(decoded.pop().unwrap_or_default(), hole))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<Geometry> {
        let value: Value = json.parse().unwrap();
        decode_geometry(&value)
    }

    #[test]
    fn test_line_string() {
        let g = decode(r#"{"type":"LineString","coordinates":[[139.0,35.0],[139.5,35.5]]}"#).unwrap();
        assert_eq!(g.kind(), GeometryKind::LineString);
        assert_eq!(g.objects().len(), 1);
        assert_eq!(
            g.objects()[0].main_points(),
            &[Point::new(139.0, 35.0), Point::new(139.5, 35.5)]
        );
        assert!(g.objects()[0].hole_points().is_none());
    }

    #[test]
    fn test_empty_line_string() {
        let g = decode(r#"{"type":"LineString","coordinates":[]}"#).unwrap();
        assert_eq!(g.objects().len(), 1);
        assert!(g.objects()[0].main_points().is_empty());
        assert!(g.objects()[0].hole_points().is_none());
    }

    #[test]
    fn test_polygon_with_hole() {
        let g = decode(
            r#"{"type":"Polygon","coordinates":[
                [[0,0],[0,10],[10,10],[10,0],[0,0]],
                [[2,2],[2,8],[8,8],[8,2],[2,2]]]}"#,
        )
        .unwrap();
        assert_eq!(g.kind(), GeometryKind::Polygon);
        let ring_set = &g.objects()[0];
        assert_eq!(ring_set.main_points().len(), 5);
        assert_eq!(ring_set.main_points()[1], Point::new(0.0, 10.0));
        let hole = ring_set.hole_points().unwrap();
        assert_eq!(hole.len(), 5);
        assert_eq!(hole[0], Point::new(2.0, 2.0));
    }

    #[test]
    fn test_polygon_without_hole() {
        let g = decode(r#"{"type":"Polygon","coordinates":[[[0,0],[0,1],[1,1],[0,0]]]}"#).unwrap();
        assert_eq!(g.objects().len(), 1);
        assert!(g.objects()[0].hole_points().is_none());
    }

    #[test]
    fn test_polygon_extra_rings_dropped() {
        let g = decode(
            r#"{"type":"Polygon","coordinates":[
                [[0,0],[0,9],[9,9],[0,0]],
                [[1,1],[1,2],[2,2],[1,1]],
                [[5,5],[5,6],[6,6],[5,5]]]}"#,
        )
        .unwrap();
        let ring_set = &g.objects()[0];
        assert_eq!(ring_set.main_points()[1], Point::new(0.0, 9.0));
        assert_eq!(ring_set.hole_points().unwrap()[1], Point::new(1.0, 2.0));
    }

    #[test]
    fn test_polygon_extra_rings_still_validated() {
        let err = decode(
            r#"{"type":"Polygon","coordinates":[
                [[0,0],[0,9],[9,9],[0,0]],
                [[1,1],[1,2],[2,2],[1,1]],
                [[5,5,5]]]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedCoordinate(_)));
    }

    #[test]
    fn test_empty_polygon_group_has_empty_main_points() {
        let g = decode(r#"{"type":"Polygon","coordinates":[]}"#).unwrap();
        assert_eq!(g.objects().len(), 1);
        assert!(g.objects()[0].main_points().is_empty());
        assert!(g.objects()[0].hole_points().is_none());
    }

    #[test]
    fn test_multi_polygon_keeps_closing_point() {
        let g = decode(
            r#"{"type":"MultiPolygon","coordinates":[
                [[[0,0],[0,1],[1,1],[1,0],[0,0]]],
                [[[2,2],[2,3],[3,3],[3,2],[2,2]]]]}"#,
        )
        .unwrap();
        assert_eq!(g.kind(), GeometryKind::MultiPolygon);
        assert_eq!(g.objects().len(), 2);
        for ring_set in g.objects() {
            assert_eq!(ring_set.main_points().len(), 5);
            assert_eq!(ring_set.main_points().first(), ring_set.main_points().last());
            assert!(ring_set.hole_points().is_none());
        }
        assert_eq!(g.objects()[1].main_points()[0], Point::new(2.0, 2.0));
    }

    #[test]
    fn test_multi_line_string_preserves_order() {
        let g = decode(
            r#"{"type":"MultiLineString","coordinates":[
                [[0,0],[1,1]],
                [[2,2],[3,3],[4,4]],
                []]}"#,
        )
        .unwrap();
        let lens: Vec<usize> = g.objects().iter().map(|o| o.main_points().len()).collect();
        assert_eq!(lens, vec![2, 3, 0]);
        assert!(g.objects().iter().all(|o| o.hole_points().is_none()));
        assert_eq!(g.objects()[1].main_points()[0], Point::new(2.0, 2.0));
    }

    #[test]
    fn test_missing_fields() {
        let err = decode(r#"{"coordinates":[]}"#).unwrap_err();
        assert!(matches!(err, Error::MissingField("type")));

        let err = decode(r#"{"type":"Polygon"}"#).unwrap_err();
        assert!(matches!(err, Error::MissingField("coordinates")));
    }

    #[test]
    fn test_point_unsupported() {
        let err = decode(r#"{"type":"Point","coordinates":[139.0,35.0]}"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedGeometryKind(ref t) if t == "Point"));
    }

    #[test]
    fn test_position_arity() {
        let err = decode(r#"{"type":"LineString","coordinates":[[139.0]]}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedCoordinate(_)));

        let err = decode(r#"{"type":"LineString","coordinates":[[139.0,35.0,10.0]]}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedCoordinate(_)));
    }

    #[test]
    fn test_non_numeric_position() {
        let err = decode(r#"{"type":"LineString","coordinates":[["139",35.0]]}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedCoordinate(_)));
    }

    #[test]
    fn test_wrong_nesting() {
        // Polygon coordinates one level too shallow
        let err = decode(r#"{"type":"Polygon","coordinates":[[0,0],[0,1],[1,1]]}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedCoordinate(_)));

        let err = decode(r#"{"type":"MultiPolygon","coordinates":{"a":1}}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedCoordinate(_)));

        let err = decode(r#"{"type":"MultiLineString","coordinates":[[[0,0]], 5]}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedCoordinate(_)));
    }

    #[test]
    fn test_encode_not_implemented() {
        let g = decode(r#"{"type":"LineString","coordinates":[[0,0],[1,1]]}"#).unwrap();
        assert!(matches!(encode_geometry(&g), Err(Error::NotImplemented(_))));
        assert!(serde_json::to_string(&g).is_err());
    }

    fn parse_geojson(json: &str) -> geojson::Geometry {
        match json.parse::<geojson::GeoJson>().unwrap() {
            geojson::GeoJson::Geometry(g) => g,
            _ => panic!("not a bare geometry"),
        }
    }

    #[test]
    fn test_from_geojson_geometry() {
        let parsed = parse_geojson(r#"{"type":"Polygon","coordinates":[
            [[0,0],[0,10],[10,10],[10,0],[0,0]],
            [[2,2],[2,8],[8,8],[8,2],[2,2]]]}"#);
        let from_crate = Geometry::try_from(&parsed).unwrap();
        let direct = decode(
            r#"{"type":"Polygon","coordinates":[
            [[0,0],[0,10],[10,10],[10,0],[0,0]],
            [[2,2],[2,8],[8,8],[8,2],[2,2]]]}"#,
        )
        .unwrap();
        assert_eq!(from_crate, direct);
    }

    #[test]
    fn test_from_geojson_rejects_point_and_altitude() {
        let point = parse_geojson(r#"{"type":"Point","coordinates":[1.0,2.0]}"#);
        assert!(matches!(
            Geometry::try_from(&point),
            Err(Error::UnsupportedGeometryKind(_))
        ));

        let line = parse_geojson(r#"{"type":"LineString","coordinates":[[1.0,2.0,3.0],[4.0,5.0,6.0]]}"#);
        assert!(matches!(
            Geometry::try_from(&line),
            Err(Error::MalformedCoordinate(_))
        ));
    }
}
