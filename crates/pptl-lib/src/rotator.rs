//! Per-polygon rotation decision engine
//!
//! Each polygon goes through gate check, anchor search, delta computation and the
//! tie-break decision before it is rotated or left alone. Everything the decision needs
//! is gathered once into a [`DecisionContext`]; the decision itself is a pure function
//! of that context and the [`Config`].

use crate::azimuth::delta_azimuth;
use crate::{Config, Line, LineLayer, Polygon, PptlError, Result, RotationResult, Segment};
use geo::Coord;

/// Why a polygon was emitted without rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Farther from its nearest line than the distance threshold
    TooFar,
    /// Multipart polygon while multipart polygons are excluded
    Multipart,
    /// Neither adjacent edge is within the angle threshold
    AngleExceeded,
    /// The chosen correction was numerically zero
    NegligibleAngle,
    /// The geometry refused the rotation
    RotationRejected,
}

/// Result of the tie-break policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Rotate clockwise by this many degrees (negative = counter-clockwise)
    Rotate(f64),
    Skip(SkipReason),
}

/// What happened to one polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Rotated { angle: f64 },
    Skipped(SkipReason),
}

impl Outcome {
    #[inline]
    pub fn is_rotated(&self) -> bool {
        matches!(self, Outcome::Rotated { .. })
    }
}

/// Everything the tie-break needs, computed once per polygon
#[derive(Debug, Clone)]
pub struct DecisionContext {
    /// Anchor vertex of the polygon
    pub vertex: Coord<f64>,
    /// Edge from the anchor to its previous ring neighbour
    pub prev_edge: Segment,
    /// Edge from the anchor to its next ring neighbour
    pub next_edge: Segment,
    /// Azimuth of the line segment nearest to the anchor
    pub segment_azimuth: f64,
    /// Correction aligning the previous edge, in [-90, 90]
    pub delta_prev: f64,
    /// Correction aligning the next edge, in [-90, 90]
    pub delta_next: f64,
}

impl DecisionContext {
    pub fn new(
        vertex: Coord<f64>,
        prev_edge: Segment,
        next_edge: Segment,
        segment_azimuth: f64,
    ) -> Self {
        let delta_prev = delta_azimuth(segment_azimuth, prev_edge.azimuth());
        let delta_next = delta_azimuth(segment_azimuth, next_edge.azimuth());
        Self {
            vertex,
            prev_edge,
            next_edge,
            segment_azimuth,
            delta_prev,
            delta_next,
        }
    }

    /// Pick the rotation to apply
    ///
    /// Both edges within the threshold: the strictly longer edge wins in `by_longest`
    /// mode, otherwise (or on equal lengths) the smaller correction wins, the previous
    /// edge on equal corrections. One edge within the threshold: that edge. Neither: skip.
    pub fn decide(&self, config: &Config) -> Decision {
        let prev_ok = self.delta_prev.abs() <= config.angle;
        let next_ok = self.delta_next.abs() <= config.angle;

        match (prev_ok, next_ok) {
            (true, true) => {
                if config.by_longest {
                    let prev_len = self.prev_edge.length();
                    let next_len = self.next_edge.length();
                    if prev_len > next_len {
                        return Decision::Rotate(self.delta_prev);
                    }
                    if next_len > prev_len {
                        return Decision::Rotate(self.delta_next);
                    }
                }
                if self.delta_next.abs() < self.delta_prev.abs() {
                    Decision::Rotate(self.delta_next)
                } else {
                    Decision::Rotate(self.delta_prev)
                }
            }
            (true, false) => Decision::Rotate(self.delta_prev),
            (false, true) => Decision::Rotate(self.delta_next),
            (false, false) => Decision::Skip(SkipReason::AngleExceeded),
        }
    }
}

/// Aligns polygons against a shared, read-only line layer
#[derive(Debug, Clone, Copy)]
pub struct Rotator<'a> {
    lines: &'a LineLayer,
    config: &'a Config,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<'a> Rotator<'a> {
    pub fn new(lines: &'a LineLayer, config: &'a Config) -> Self {
        Self { lines, config }
    }

    /// Run one polygon through the engine, rotating it in place when a candidate qualifies
    ///
    /// Only a missing nearest line or a broken anchor invariant is an error; every other
    /// no-rotation path is reported as [`Outcome::Skipped`].
    pub fn align(&self, polygon: &mut Polygon) -> Result<Outcome> {
        let line = self.lines.get_closest_line(query_point(polygon)?)?;

        if let Some(reason) = self.gate_check(polygon, &line) {
            tracing::debug!(feature_id = %polygon.id(), line_id = %line.id(), ?reason, "Polygon gated out");
            return Ok(Outcome::Skipped(reason));
        }

        let context = self.context(polygon, &line)?;
        let decision = context.decide(self.config);
        tracing::debug!(
            feature_id = %polygon.id(),
            line_id = %line.id(),
            delta_prev = context.delta_prev,
            delta_next = context.delta_next,
            ?decision,
            "Rotation decided"
        );

        let Decision::Rotate(angle) = decision else {
            return Ok(Outcome::Skipped(SkipReason::AngleExceeded));
        };

        Ok(match polygon.rotate(angle) {
            RotationResult::Applied => Outcome::Rotated { angle },
            RotationResult::Negligible => Outcome::Skipped(SkipReason::NegligibleAngle),
            RotationResult::Rejected => Outcome::Skipped(SkipReason::RotationRejected),
        })
    }

    /// Distance and multipart filters, `None` when the polygon passes
    pub fn gate_check(&self, polygon: &Polygon, line: &Line) -> Option<SkipReason> {
        if self.config.has_distance_gate() {
            let distance = line.distance_to(polygon.parts());
            if distance > self.config.distance {
                tracing::trace!(feature_id = %polygon.id(), distance, "Beyond distance threshold");
                return Some(SkipReason::TooFar);
            }
        }
        if self.config.skip_multipart && polygon.is_multi() {
            return Some(SkipReason::Multipart);
        }
        None
    }

    /// Find the anchor vertex and its edges, and measure both corrections
    pub fn context(&self, polygon: &Polygon, line: &Line) -> Result<DecisionContext> {
        let vertex = polygon
            .closest_vertex(line, self.config.vertex_search)
            .ok_or_else(|| PptlError::InvalidGeometry {
                feature_id: polygon.id(),
                reason: "no anchor vertex found".to_string(),
            })?;
        let (prev_edge, next_edge) = polygon.adjacent_segments(vertex)?;
        let segment_azimuth =
            line.closest_segment_azimuth(vertex)
                .ok_or_else(|| PptlError::InvalidGeometry {
                    feature_id: line.id(),
                    reason: "line has no segments".to_string(),
                })?;

        Ok(DecisionContext::new(
            vertex,
            prev_edge,
            next_edge,
            segment_azimuth,
        ))
    }
}

/// Where to look for the nearest line: the centroid, or the first vertex of a
/// degenerate polygon without one
fn query_point(polygon: &Polygon) -> Result<Coord<f64>> {
    polygon
        .centroid()
        .map(|c| c.0)
        .or_else(|| polygon.rings().flatten().next())
        .ok_or_else(|| PptlError::InvalidGeometry {
            feature_id: polygon.id(),
            reason: "polygon has no vertices".to_string(),
        })
}
