//! Run configuration for the alignment engine

use crate::{PptlError, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest accepted angle threshold in degrees
pub(crate) const MAX_ANGLE: f64 = 89.9;

/// How the anchor vertex of a polygon is chosen relative to its nearest line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VertexSearch {
    /// The vertex with the smallest planar distance to the line geometry
    #[default]
    Direct,
    /// Take the point of the line nearest to the polygon, then the polygon vertex
    /// nearest to that point
    Projected,
}

/// Configuration for a rotation run
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Maximum distance between a polygon and its nearest line.
    /// Polygons farther away are emitted untouched. 0 disables the gate.
    pub distance: f64,
    /// Maximum absolute rotation in degrees, inclusive, within [0, 89.9]
    pub angle: f64,
    /// When both adjacent edges qualify, align the longer one instead of the one
    /// needing the smaller rotation
    pub by_longest: bool,
    /// Emit multipart polygons untouched
    pub skip_multipart: bool,
    /// Anchor vertex formulation
    pub vertex_search: VertexSearch,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            distance: 0.0,
            angle: MAX_ANGLE,
            by_longest: false,
            skip_multipart: false,
            vertex_search: VertexSearch::Direct,
        }
    }
}

impl Config {
    /// Check value ranges before a run
    pub fn validate(&self) -> Result<()> {
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(PptlError::InvalidConfig(format!(
                "distance must be a finite value >= 0, got {}",
                self.distance
            )));
        }
        if !(0.0..=MAX_ANGLE).contains(&self.angle) {
            return Err(PptlError::InvalidConfig(format!(
                "angle must be within [0, {MAX_ANGLE}], got {}",
                self.angle
            )));
        }
        Ok(())
    }

    /// Whether the distance gate is active
    #[inline]
    pub fn has_distance_gate(&self) -> bool {
        self.distance > 0.0
    }
}
