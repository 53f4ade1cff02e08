//! Polygon accessor and in-place rotation

use crate::line::geometry_kind;
use crate::{
    Attributes, FeatureId, Line, PolygonFeature, PptlError, Result, Segment, VertexSearch,
};
use geo::{
    Centroid, Coord, CoordsIter, Geometry, LineString, MultiPolygon, Point, RemoveRepeatedPoints,
    Rotate,
};

/// Rotations smaller than this (in degrees) are treated as no rotation at all
pub(crate) const ZERO_ANGLE_TOLERANCE: f64 = 1e-8;

/// Result of asking a polygon to rotate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationResult {
    /// Geometry was rotated and the polygon is now marked as rotated
    Applied,
    /// The angle was numerically zero; geometry untouched
    Negligible,
    /// The geometry could not be rotated (no centroid, non-finite result); geometry untouched
    Rejected,
}

/// One polygon feature being processed
///
/// The centroid is computed once at construction and stays the rotation pivot even
/// after the geometry changes.
#[derive(Clone, Debug)]
pub struct Polygon {
    id: FeatureId,
    parts: MultiPolygon<f64>,
    is_multi: bool,
    centroid: Option<Point<f64>>,
    attributes: Attributes,
    is_rotated: bool,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Polygon {
    /// Wrap a polygon feature, taking ownership of its geometry and attributes
    pub fn from_feature(feature: PolygonFeature) -> Result<Self> {
        let PolygonFeature {
            id,
            geometry,
            attributes,
        } = feature;

        let (parts, is_multi) = match geometry {
            Geometry::Polygon(polygon) => (MultiPolygon::new(vec![polygon]), false),
            Geometry::MultiPolygon(multi) => (multi, true),
            other => {
                return Err(PptlError::InvalidGeometry {
                    feature_id: id,
                    reason: format!("expected a polygon geometry, got {}", geometry_kind(&other)),
                });
            }
        };

        if parts.0.iter().all(|part| ring_vertices(part.exterior()).is_empty()) {
            return Err(PptlError::InvalidGeometry {
                feature_id: id,
                reason: "polygon has no vertices".to_string(),
            });
        }

        let centroid = parts.centroid();

        Ok(Self {
            id,
            parts,
            is_multi,
            centroid,
            attributes,
            is_rotated: false,
        })
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
    pub fn is_rotated(&self) -> bool {
        self.is_rotated
    }

    /// Fixed rotation pivot, `None` for degenerate geometry
    #[inline]
    pub fn centroid(&self) -> Option<Point<f64>> {
        self.centroid
    }

    #[inline]
    pub fn parts(&self) -> &MultiPolygon<f64> {
        &self.parts
    }

    /// Exterior ring of every part, repeated and closing vertices removed
    pub fn rings(&self) -> impl Iterator<Item = Vec<Coord<f64>>> + '_ {
        self.parts.0.iter().map(|part| ring_vertices(part.exterior()))
    }

    /// Polygon vertex nearest to `line`, searched across all rings
    ///
    /// Rings and vertices are scanned in order; ties keep the first vertex found.
    pub fn closest_vertex(&self, line: &Line, search: VertexSearch) -> Option<Coord<f64>> {
        match search {
            VertexSearch::Direct => {
                self.nearest_vertex_by(|vertex| line.distance_to_point(vertex))
            }
            VertexSearch::Projected => {
                let target = line.closest_point_to(&self.parts)?;
                self.nearest_vertex_by(|vertex| (vertex.x - target.x).hypot(vertex.y - target.y))
            }
        }
    }

    /// The two edges meeting at `vertex`, both starting at it
    ///
    /// Returns `(to_previous, to_next)` from the first ring containing the exact
    /// coordinate; rings are circular so the neighbours wrap around.
    pub fn adjacent_segments(&self, vertex: Coord<f64>) -> Result<(Segment, Segment)> {
        for ring in self.rings() {
            if let Some(index) = ring.iter().position(|v| *v == vertex) {
                let count = ring.len();
                let prev = ring[(index + count - 1) % count];
                let next = ring[(index + 1) % count];
                return Ok((Segment::new(vertex, prev), Segment::new(vertex, next)));
            }
        }

        Err(PptlError::VertexNotFound {
            feature_id: self.id,
            x: vertex.x,
            y: vertex.y,
        })
    }

    /// Rotate the whole geometry about the fixed centroid
    ///
    /// Positive angles rotate clockwise, negative counter-clockwise.
    pub fn rotate(&mut self, angle: f64) -> RotationResult {
        if angle.abs() < ZERO_ANGLE_TOLERANCE {
            return RotationResult::Negligible;
        }

        let Some(center) = self.centroid.filter(|c| c.x().is_finite() && c.y().is_finite())
        else {
            tracing::warn!(feature_id = %self.id, "Polygon has no usable centroid, rotation skipped");
            return RotationResult::Rejected;
        };
        if !angle.is_finite() {
            tracing::warn!(feature_id = %self.id, angle, "Non-finite rotation angle, rotation skipped");
            return RotationResult::Rejected;
        }

        // geo rotates counter-clockwise for positive angles
        let rotated = self.parts.rotate_around_point(-angle, center);
        if !rotated.coords_iter().all(|c| c.x.is_finite() && c.y.is_finite()) {
            tracing::warn!(feature_id = %self.id, angle, "Rotation produced invalid coordinates, skipped");
            return RotationResult::Rejected;
        }

        self.parts = rotated;
        self.is_rotated = true;
        RotationResult::Applied
    }

    /// Convert back into an output feature carrying the `_rotated` marker
    ///
    /// Single-part input is emitted as a `Polygon` again.
    pub fn into_feature(self) -> PolygonFeature {
        let mut parts = self.parts.0;
        let geometry = if !self.is_multi && parts.len() == 1 {
            Geometry::Polygon(parts.remove(0))
        } else {
            Geometry::MultiPolygon(MultiPolygon::new(parts))
        };
        PolygonFeature::into_output(self.id, geometry, self.attributes, self.is_rotated)
    }

    fn nearest_vertex_by(&self, distance: impl Fn(Coord<f64>) -> f64) -> Option<Coord<f64>> {
        let mut best: Option<(f64, Coord<f64>)> = None;
        for vertex in self.rings().flatten() {
            let dist = distance(vertex);
            if best.is_none_or(|(best_dist, _)| dist < best_dist) {
                best = Some((dist, vertex));
            }
        }
        best.map(|(_, vertex)| vertex)
    }
}

/// Distinct consecutive ring vertices, without the closing duplicate
///
/// A repeated vertex would otherwise produce a zero-length edge with no bearing.
fn ring_vertices(ring: &LineString<f64>) -> Vec<Coord<f64>> {
    let mut coords = ring.remove_repeated_points().0;
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    coords
}
