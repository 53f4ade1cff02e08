//! Polygons Parallel To Line - Core Alignment Engine
//!
//! This library rotates polygon features (building footprints, parcels) so that one of their
//! edges becomes parallel to the nearest segment of a reference line feature (roads, rivers),
//! within configurable distance and angle tolerances.
//!
//! # Architecture
//!
//! - **[`azimuth`]**: Pure bearing normalization and signed delta arithmetic
//! - **[`Segment`]**: Directed two-point segment with cached length and azimuth
//! - **[`Line`]** / **[`Polygon`]**: Per-feature geometry accessors (single and multi part)
//! - **[`LineLayer`]**: R-tree nearest-neighbour index over all reference lines
//! - **[`Rotator`]**: Per-polygon decision engine (gate, anchor, deltas, tie-break, rotate)
//! - **[`BatchDriver`]**: Sequential (or parallel) driver writing tagged features to a sink
//!
//! # Conventions
//!
//! Azimuths are in degrees, 0 = north, 90 = east, clockwise positive, range (-180, 180].
//! Rotation angles follow the same convention: positive rotates clockwise.

pub mod azimuth;
mod batch;
mod config;
mod feature;
mod line;
mod line_layer;
mod polygon;
mod rotator;
mod segment;

// Public API exports
pub use batch::{BatchDriver, BatchSummary, CallbackFeedback, FeatureSink, Feedback, NoFeedback};
pub use config::{Config, VertexSearch};
pub use feature::{
    AttributeValue, Attributes, FeatureId, LineFeature, PolygonFeature, ROTATED_FIELD,
};
pub use line::Line;
pub use line_layer::LineLayer;
pub use polygon::{Polygon, RotationResult};
pub use rotator::{Decision, DecisionContext, Outcome, Rotator, SkipReason};
pub use segment::Segment;

/// Error types for the alignment engine
#[derive(Debug, thiserror::Error)]
pub enum PptlError {
    #[error("Layer does not have any polygons")]
    EmptyPolygonLayer,

    #[error("No lines found in the line layer")]
    NoLinesFound,

    #[error("Vertex ({x}, {y}) not found in polygon {feature_id}")]
    VertexNotFound {
        feature_id: FeatureId,
        x: f64,
        y: f64,
    },

    #[error("Invalid geometry in feature {feature_id}: {reason}")]
    InvalidGeometry {
        feature_id: FeatureId,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Sink error: {0}")]
    Sink(String),
}

pub type Result<T> = std::result::Result<T, PptlError>;
