//! Reference line accessor
//!
//! A line is always held as a collection of paths; a single-path feature is the
//! one-element case, so no code below needs to branch on single vs multi.

use crate::{FeatureId, LineFeature, PptlError, Result, Segment};
use geo::line_intersection::{LineIntersection, line_intersection};
use geo::{Closest, ClosestPoint, Coord, Distance, Euclidean, Geometry, Intersects, Length};
use geo::{MultiLineString, MultiPolygon, Point};
use std::cell::OnceCell;

/// One reference line feature wrapped for segment queries
#[derive(Clone, Debug)]
pub struct Line {
    id: FeatureId,
    paths: MultiLineString<f64>,
    is_multi: bool,
    cached_length: OnceCell<f64>,
}

impl Line {
    /// Wrap a line geometry
    ///
    /// Accepts `LineString` and `MultiLineString`; anything else, or a geometry
    /// without a single segment, is rejected.
    pub fn new(id: FeatureId, geometry: &Geometry<f64>) -> Result<Self> {
        let (paths, is_multi) = match geometry {
            Geometry::LineString(ls) => (MultiLineString::new(vec![ls.clone()]), false),
            Geometry::MultiLineString(mls) => (mls.clone(), true),
            other => {
                return Err(PptlError::InvalidGeometry {
                    feature_id: id,
                    reason: format!("expected a line geometry, got {}", geometry_kind(other)),
                });
            }
        };

        if paths.0.iter().all(|path| path.lines().next().is_none()) {
            return Err(PptlError::InvalidGeometry {
                feature_id: id,
                reason: "line has no segments".to_string(),
            });
        }

        Ok(Self {
            id,
            paths,
            is_multi,
            cached_length: OnceCell::new(),
        })
    }

    /// Wrap a source feature
    pub fn from_feature(feature: &LineFeature) -> Result<Self> {
        Self::new(feature.id, &feature.geometry)
    }

    #[inline]
    pub fn id(&self) -> FeatureId {
        self.id
    }

    #[inline]
    pub fn is_multi(&self) -> bool {
        self.is_multi
    }

    #[inline]
    pub fn paths(&self) -> &MultiLineString<f64> {
        &self.paths
    }

    /// Total number of vertices over all paths
    pub fn vertex_count(&self) -> usize {
        self.paths.0.iter().map(|path| path.0.len()).sum()
    }

    /// Total length over all paths
    pub fn length(&self) -> f64 {
        *self
            .cached_length
            .get_or_init(|| Euclidean.length(&self.paths))
    }

    /// Segment nearest to `point`, searched across every path
    ///
    /// Paths are scanned in order and only a strictly smaller distance replaces the
    /// current best, so ties resolve to the first path (and the first segment in it).
    pub fn closest_segment(&self, point: Coord<f64>) -> Option<Segment> {
        let query = Point::from(point);
        let mut best: Option<(f64, geo::Line<f64>)> = None;

        for seg in self.segments() {
            let dist = Euclidean.distance(&query, &seg);
            if best.is_none_or(|(best_dist, _)| dist < best_dist) {
                best = Some((dist, seg));
            }
        }

        best.map(|(_, seg)| Segment::from(seg))
    }

    /// Azimuth of the segment nearest to `point`
    pub fn closest_segment_azimuth(&self, point: Coord<f64>) -> Option<f64> {
        self.closest_segment(point).map(|seg| seg.azimuth())
    }

    /// Bearing of a lone two-point line
    pub fn line_azimuth(&self) -> Result<f64> {
        match self.paths.0.as_slice() {
            [path] if path.0.len() == 2 => Ok(Segment::new(path.0[0], path.0[1]).azimuth()),
            _ => Err(PptlError::InvalidGeometry {
                feature_id: self.id,
                reason: format!("line must have 2 vertices but has {}", self.vertex_count()),
            }),
        }
    }

    /// Planar distance to a polygonal geometry (0 when they touch or overlap)
    pub fn distance_to(&self, polygons: &MultiPolygon<f64>) -> f64 {
        Euclidean.distance(&self.paths, polygons)
    }

    /// Distance from a single point to the nearest segment
    pub fn distance_to_point(&self, point: Coord<f64>) -> f64 {
        Euclidean.distance(&Point::from(point), &self.paths)
    }

    /// Point of this line nearest to a polygonal geometry
    ///
    /// Returns `None` only when the polygon has no edges.
    pub fn closest_point_to(&self, polygons: &MultiPolygon<f64>) -> Option<Coord<f64>> {
        if let Some(inside) = self.coords().find(|c| polygons.intersects(c)) {
            return Some(inside);
        }

        let mut best: Option<(f64, Coord<f64>)> = None;
        let mut consider = |dist: f64, coord: Coord<f64>| {
            if best.is_none_or(|(best_dist, _)| dist < best_dist) {
                best = Some((dist, coord));
            }
        };

        for seg in self.segments() {
            for edge in polygon_edges(polygons) {
                if let Some(hit) = line_intersection(seg, edge) {
                    let coord = match hit {
                        LineIntersection::SinglePoint { intersection, .. } => intersection,
                        LineIntersection::Collinear { intersection } => intersection.start,
                    };
                    consider(0.0, coord);
                    continue;
                }

                // Line endpoints against the polygon edge
                for end in [seg.start, seg.end] {
                    consider(Euclidean.distance(&Point::from(end), &edge), end);
                }

                // Polygon vertices projected onto the line segment
                for vertex in [edge.start, edge.end] {
                    let vertex = Point::from(vertex);
                    match seg.closest_point(&vertex) {
                        Closest::Intersection(p) | Closest::SinglePoint(p) => {
                            consider(Euclidean.distance(p, vertex), p.0);
                        }
                        Closest::Indeterminate => {}
                    }
                }
            }
        }

        best.map(|(_, coord)| coord)
    }

    fn segments(&self) -> impl Iterator<Item = geo::Line<f64>> + '_ {
        self.paths.0.iter().flat_map(|path| path.lines())
    }

    fn coords(&self) -> impl Iterator<Item = Coord<f64>> + '_ {
        self.paths.0.iter().flat_map(|path| path.0.iter().copied())
    }
}

/// Every ring edge (exterior and interior) of every part
fn polygon_edges(polygons: &MultiPolygon<f64>) -> impl Iterator<Item = geo::Line<f64>> + '_ {
    polygons.0.iter().flat_map(|polygon| {
        std::iter::once(polygon.exterior())
            .chain(polygon.interiors())
            .flat_map(|ring| ring.lines())
    })
}

pub(crate) fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
