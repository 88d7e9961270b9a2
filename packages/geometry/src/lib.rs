#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! `GeoJSON`-shaped geometry model for incident boundaries.
//!
//! Defines the closed [`Geometry`] type the rest of the system renders and
//! morphs, along with coordinate digests for change detection, bounding
//! boxes, and the haversine extent metric that drives marker visibility.

pub mod interpolate;

use geo::{BoundingRect, Distance, Haversine, Rect};
use geojson::GeoJson;
use serde::{Deserialize, Serialize};

/// A single `[longitude, latitude]` coordinate pair.
pub type Position = [f64; 2];

/// A linear ring of coordinates. Feeds usually close the ring by repeating
/// the first position at the end, but nothing here requires it.
pub type Ring = Vec<Position>;

/// Incident boundary geometry, mirroring the `GeoJSON` wire shape.
///
/// The enum is deliberately closed: rendering, morphing, and extent math
/// all match on it exhaustively, so a new geometry kind refuses to compile
/// until every consumer handles it. Serialization keeps the `GeoJSON`
/// `type`/`coordinates` layout so values pass straight through to map
/// frontends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// A bare location with no boundary to draw.
    Point(Position),
    /// One outer ring followed by any number of holes.
    Polygon(Vec<Ring>),
    /// Disjoint polygons, each with its own ring set.
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// Parses a raw attribute value into a supported geometry.
    ///
    /// Accepts bare `GeoJSON` geometry objects of kind `Point`, `Polygon`,
    /// or `MultiPolygon`. Features, collections, and other geometry kinds
    /// are rejected, as are positions with fewer than two elements. A
    /// third (altitude) element is dropped.
    #[must_use]
    pub fn from_geojson_value(value: &serde_json::Value) -> Option<Self> {
        let Ok(GeoJson::Geometry(geometry)) = GeoJson::from_json_value(value.clone()) else {
            return None;
        };

        match geometry.value {
            geojson::Value::Point(position) => parse_position(&position).map(Self::Point),
            geojson::Value::Polygon(rings) => parse_rings(&rings).map(Self::Polygon),
            geojson::Value::MultiPolygon(polygons) => polygons
                .iter()
                .map(|rings| parse_rings(rings))
                .collect::<Option<Vec<_>>>()
                .map(Self::MultiPolygon),
            _ => None,
        }
    }

    /// The `GeoJSON` type tag for this geometry.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Whether this geometry is a bare point.
    #[must_use]
    pub const fn is_point(&self) -> bool {
        matches!(self, Self::Point(_))
    }

    /// Digest of the coordinates for change detection.
    ///
    /// Only coordinates contribute, so two geometries with the same vertex
    /// data hash equal regardless of how the values were produced.
    #[must_use]
    pub fn coordinate_hash(&self) -> md5::Digest {
        let bytes = match self {
            Self::Point(position) => serde_json::to_vec(position),
            Self::Polygon(rings) => serde_json::to_vec(rings),
            Self::MultiPolygon(polygons) => serde_json::to_vec(polygons),
        }
        .unwrap_or_default();
        md5::compute(bytes)
    }

    /// Bounding rectangle in degrees, `None` when there is nothing to
    /// bound (empty ring sets).
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rect<f64>> {
        match self {
            Self::Point(position) => {
                Some(geo::Point::new(position[0], position[1]).bounding_rect())
            }
            Self::Polygon(rings) => polygon_from_rings(rings).bounding_rect(),
            Self::MultiPolygon(polygons) => geo::MultiPolygon::new(
                polygons.iter().map(|rings| polygon_from_rings(rings)).collect(),
            )
            .bounding_rect(),
        }
    }

    /// Largest bounding-box side in meters.
    ///
    /// Width is measured along the northern edge, height along a meridian.
    /// Points and degenerate geometry read as zero.
    #[must_use]
    pub fn extent_meters(&self) -> f64 {
        self.bounding_box().map_or(0.0, |rect| {
            let sw = rect.min();
            let ne = rect.max();
            let width =
                Haversine.distance(geo::Point::new(sw.x, ne.y), geo::Point::new(ne.x, ne.y));
            let height =
                Haversine.distance(geo::Point::new(sw.x, sw.y), geo::Point::new(sw.x, ne.y));
            width.max(height)
        })
    }
}

/// Smallest rectangle covering both inputs.
#[must_use]
pub fn union_rect(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        geo::Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        geo::Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}

fn parse_position(raw: &[f64]) -> Option<Position> {
    (raw.len() >= 2).then(|| [raw[0], raw[1]])
}

fn parse_rings(raw: &[Vec<Vec<f64>>]) -> Option<Vec<Ring>> {
    raw.iter()
        .map(|ring| ring.iter().map(|p| parse_position(p)).collect::<Option<Ring>>())
        .collect()
}

fn polygon_from_rings(rings: &[Ring]) -> geo::Polygon<f64> {
    let mut line_strings = rings.iter().map(ring_line_string);
    let exterior = line_strings
        .next()
        .unwrap_or_else(|| geo::LineString::new(Vec::new()));
    geo::Polygon::new(exterior, line_strings.collect())
}

fn ring_line_string(ring: &Ring) -> geo::LineString<f64> {
    geo::LineString::new(ring.iter().map(|p| geo::Coord { x: p[0], y: p[1] }).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square(size: f64) -> Geometry {
        Geometry::Polygon(vec![vec![
            [0.0, 0.0],
            [size, 0.0],
            [size, size],
            [0.0, size],
            [0.0, 0.0],
        ]])
    }

    #[test]
    fn serializes_to_geojson_shape() {
        let geometry = Geometry::Point([151.2, -33.8]);
        let value = serde_json::to_value(&geometry).unwrap();
        assert_eq!(value, json!({"type": "Point", "coordinates": [151.2, -33.8]}));
    }

    #[test]
    fn parses_polygon_attribute_value() {
        let value = json!({
            "type": "Polygon",
            "coordinates": [[[150.5, -34.0], [151.5, -34.0], [151.5, -33.0], [150.5, -34.0]]],
        });
        let geometry = Geometry::from_geojson_value(&value).unwrap();
        assert_eq!(geometry.type_name(), "Polygon");
        assert!(!geometry.is_point());
    }

    #[test]
    fn parse_round_trips_through_serde() {
        let value = json!({
            "type": "MultiPolygon",
            "coordinates": [[[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]],
        });
        let geometry = Geometry::from_geojson_value(&value).unwrap();
        assert_eq!(serde_json::to_value(&geometry).unwrap(), value);
    }

    #[test]
    fn rejects_features_and_unsupported_kinds() {
        let feature = json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
            "properties": {},
        });
        assert!(Geometry::from_geojson_value(&feature).is_none());

        let line = json!({"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]});
        assert!(Geometry::from_geojson_value(&line).is_none());

        assert!(Geometry::from_geojson_value(&json!({"type": "Polygon"})).is_none());
        assert!(Geometry::from_geojson_value(&json!(42)).is_none());
    }

    #[test]
    fn rejects_short_positions() {
        let value = json!({"type": "Polygon", "coordinates": [[[150.5], [151.5, -33.0]]]});
        assert!(Geometry::from_geojson_value(&value).is_none());
    }

    #[test]
    fn drops_altitude_from_positions() {
        let value = json!({"type": "Point", "coordinates": [151.2, -33.8, 12.0]});
        assert_eq!(
            Geometry::from_geojson_value(&value),
            Some(Geometry::Point([151.2, -33.8]))
        );
    }

    #[test]
    fn coordinate_hash_tracks_coordinates() {
        assert_eq!(square(1.0).coordinate_hash(), square(1.0).coordinate_hash());
        assert_ne!(square(1.0).coordinate_hash(), square(2.0).coordinate_hash());
    }

    #[test]
    fn bounding_box_covers_all_parts() {
        let geometry = Geometry::MultiPolygon(vec![
            vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            vec![vec![[5.0, 5.0], [6.0, 5.0], [6.0, 7.0], [5.0, 5.0]]],
        ]);
        let rect = geometry.bounding_box().unwrap();
        assert!((rect.min().x - 0.0).abs() < f64::EPSILON);
        assert!((rect.min().y - 0.0).abs() < f64::EPSILON);
        assert!((rect.max().x - 6.0).abs() < f64::EPSILON);
        assert!((rect.max().y - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn extent_of_one_degree_square() {
        // One degree of latitude is roughly 111.2 km on the mean sphere.
        let extent = square(1.0).extent_meters();
        assert!((extent - 111_195.0).abs() < 100.0, "extent {extent}");
    }

    #[test]
    fn extent_degenerate_is_zero() {
        assert!(Geometry::Point([151.2, -33.8]).extent_meters().abs() < f64::EPSILON);
        assert!(Geometry::Polygon(Vec::new()).extent_meters().abs() < f64::EPSILON);
        assert!(Geometry::MultiPolygon(Vec::new()).extent_meters().abs() < f64::EPSILON);
    }

    #[test]
    fn union_rect_covers_both() {
        let a = square(1.0).bounding_box().unwrap();
        let b = Geometry::Polygon(vec![vec![
            [4.0, -2.0],
            [5.0, -2.0],
            [5.0, -1.0],
            [4.0, -2.0],
        ]])
        .bounding_box()
        .unwrap();
        let union = union_rect(a, b);
        assert!((union.min().x - 0.0).abs() < f64::EPSILON);
        assert!((union.min().y - -2.0).abs() < f64::EPSILON);
        assert!((union.max().x - 5.0).abs() < f64::EPSILON);
        assert!((union.max().y - 1.0).abs() < f64::EPSILON);
    }
}
