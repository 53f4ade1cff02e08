//! Shared fixtures and helpers for the end-to-end scenarios

#![allow(dead_code)]


use geo::{Coord, Geometry, LineString, MultiLineString, MultiPolygon};
use pptl_lib::{AttributeValue, LineFeature, PolygonFeature};

/// Coordinates must agree to this tolerance
pub const TOLERANCE: f64 = 1e-7;

pub struct LineFixture {
    pub multi: bool,
    pub paths: &'static [&'static [(f64, f64)]],
}

pub struct PolygonFixture {
    pub multi: bool,
    /// Parts, each a list of rings, each ring closed
    pub parts: &'static [&'static [&'static [(f64, f64)]]],
}

pub struct Scenario {
    pub name: &'static str,
    pub distance: f64,
    pub angle: f64,
    pub by_longest: bool,
    pub skip_multipart: bool,
    pub rotated: &'static [i64],
    pub expected: &'static [PolygonFixture],
}

fn ring(coords: &[(f64, f64)]) -> LineString<f64> {
    LineString::new(coords.iter().map(|&(x, y)| Coord { x, y }).collect())
}

impl LineFixture {
    pub fn geometry(&self) -> Geometry<f64> {
        if self.multi {
            MultiLineString::new(self.paths.iter().map(|p| ring(p)).collect()).into()
        } else {
            ring(self.paths[0]).into()
        }
    }
}

impl PolygonFixture {
    pub fn geometry(&self) -> Geometry<f64> {
        let mut polygons: Vec<geo::Polygon<f64>> = self
            .parts
            .iter()
            .map(|rings| {
                geo::Polygon::new(
                    ring(rings[0]),
                    rings[1..].iter().map(|r| ring(r)).collect(),
                )
            })
            .collect();
        if self.multi {
            MultiPolygon::new(polygons).into()
        } else {
            polygons.remove(0).into()
        }
    }
}

/// Reference lines with ids from 1, in fixture order
pub fn line_features() -> Vec<LineFeature> {
    fixtures::LINES
        .iter()
        .zip(1..)
        .map(|(line, id)| LineFeature::new(id, line.geometry()))
        .collect()
}

/// Polygon features with ids from 1, each carrying a couple of attributes
pub fn polygon_features() -> Vec<PolygonFeature> {
    fixtures::POLYGONS
        .iter()
        .zip(1..)
        .map(|(polygon, id)| {
            PolygonFeature::new(id, polygon.geometry())
                .with_attribute("fid", AttributeValue::Int(id as i64))
                .with_attribute("label", AttributeValue::Text(format!("building {id}")))
        })
        .collect()
}

/// Polygon rings of either geometry type as plain coordinate lists
fn rings_of(geometry: &Geometry<f64>) -> Vec<Vec<Coord<f64>>> {
    let parts: Vec<&geo::Polygon<f64>> = match geometry {
        Geometry::Polygon(p) => vec![p],
        Geometry::MultiPolygon(mp) => mp.0.iter().collect(),
        other => panic!("not a polygon geometry: {other:?}"),
    };
    parts
        .into_iter()
        .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
        .map(|r| r.0.clone())
        .collect()
}

/// Same geometry type, same ring layout, every coordinate within [`TOLERANCE`]
pub fn assert_geometry_close(actual: &Geometry<f64>, expected: &Geometry<f64>, context: &str) {
    assert_eq!(
        matches!(actual, Geometry::MultiPolygon(_)),
        matches!(expected, Geometry::MultiPolygon(_)),
        "{context}: geometry type differs"
    );

    let actual = rings_of(actual);
    let expected = rings_of(expected);
    assert_eq!(actual.len(), expected.len(), "{context}: ring count differs");

    for (a_ring, e_ring) in actual.iter().zip(&expected) {
        assert_eq!(a_ring.len(), e_ring.len(), "{context}: vertex count differs");
        for (a, e) in a_ring.iter().zip(e_ring) {
            assert!(
                (a.x - e.x).abs() <= TOLERANCE && (a.y - e.y).abs() <= TOLERANCE,
                "{context}: got {a:?}, expected {e:?}"
            );
        }
    }
}
