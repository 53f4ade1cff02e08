//! Reference line layer with a nearest-neighbour spatial index
//!
//! Built once per run and read-only afterwards, so one layer can be shared by every
//! polygon of a batch (including across rayon workers).

use crate::{FeatureId, Line, LineFeature, PptlError, Result};
use geo::{BoundingRect, Coord, Distance, Euclidean, MultiLineString, Point};
use rstar::{AABB, PointDistance, RTree, RTreeObject};
use std::collections::HashMap;

/// A line geometry stored in the R-tree
#[derive(Clone, Debug)]
struct IndexedLine {
    id: FeatureId,
    paths: MultiLineString<f64>,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedLine {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for IndexedLine {
    /// Exact squared distance to the nearest segment, not to the envelope
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dist = Euclidean.distance(&Point::new(point[0], point[1]), &self.paths);
        dist * dist
    }
}

/// All reference lines of a run
#[derive(Clone)]
pub struct LineLayer {
    /// Source features by id
    features: HashMap<FeatureId, LineFeature>,
    /// Spatial index over the feature geometries
    tree: RTree<IndexedLine>,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl LineLayer {
    /// Index every line feature
    ///
    /// Fails on the first feature whose geometry is not a usable (multi)linestring,
    /// or on a repeated feature id.
    pub fn new(features: &[LineFeature]) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("line_layer::new");

        let mut by_id = HashMap::with_capacity(features.len());
        let mut indexed = Vec::with_capacity(features.len());

        for feature in features {
            let line = Line::from_feature(feature)?;
            let rect = line
                .paths()
                .bounding_rect()
                .ok_or_else(|| PptlError::InvalidGeometry {
                    feature_id: feature.id,
                    reason: "line has no extent".to_string(),
                })?;

            if by_id.insert(feature.id, feature.clone()).is_some() {
                return Err(PptlError::InvalidConfig(format!(
                    "duplicate line feature id {}",
                    feature.id
                )));
            }

            indexed.push(IndexedLine {
                id: feature.id,
                paths: line.paths().clone(),
                envelope: AABB::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                ),
            });
        }

        tracing::debug!(lines = indexed.len(), "Built line layer index");

        Ok(Self {
            features: by_id,
            tree: RTree::bulk_load(indexed),
        })
    }

    /// Number of indexed lines
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Id of the line nearest to `point`
    ///
    /// Lines at exactly the same distance resolve to the lowest feature id.
    pub fn closest_line_id(&self, point: Coord<f64>) -> Result<FeatureId> {
        let query = [point.x, point.y];
        let mut candidates = self.tree.nearest_neighbor_iter_with_distance_2(&query);
        let (nearest, best_dist_2) = candidates.next().ok_or(PptlError::NoLinesFound)?;

        Ok(candidates
            .take_while(|(_, dist_2)| *dist_2 == best_dist_2)
            .map(|(line, _)| line.id)
            .fold(nearest.id, Ord::min))
    }

    /// The line nearest to `point`, wrapped for segment queries
    pub fn get_closest_line(&self, point: Coord<f64>) -> Result<Line> {
        let id = self.closest_line_id(point)?;
        let feature = self.features.get(&id).ok_or(PptlError::NoLinesFound)?;
        Line::from_feature(feature)
    }
}

impl std::fmt::Debug for LineLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineLayer")
            .field("size", &self.tree.size())
            .finish()
    }
}
