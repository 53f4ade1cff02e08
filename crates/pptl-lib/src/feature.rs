//! Feature records exchanged with the host

use geo::Geometry;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the attribute appended to every emitted polygon
pub const ROTATED_FIELD: &str = "_rotated";

/// Stable identifier of a source feature
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single attribute value
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Ordered attribute set, preserved as delivered by the source
pub type Attributes = Vec<(String, AttributeValue)>;

/// A reference line feature
#[derive(Clone, Debug)]
pub struct LineFeature {
    pub id: FeatureId,
    /// `LineString` or `MultiLineString`
    pub geometry: Geometry<f64>,
}

impl LineFeature {
    pub fn new(id: u64, geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            id: FeatureId(id),
            geometry: geometry.into(),
        }
    }
}

/// A polygon feature, both as read from the source and as emitted to the sink
#[derive(Clone, Debug)]
pub struct PolygonFeature {
    pub id: FeatureId,
    /// `Polygon` or `MultiPolygon`
    pub geometry: Geometry<f64>,
    pub attributes: Attributes,
}

impl PolygonFeature {
    pub fn new(id: u64, geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            id: FeatureId(id),
            geometry: geometry.into(),
            attributes: Vec::new(),
        }
    }

    /// Builder-style attribute append
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.push((name.into(), value));
        self
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Whether the `_rotated` marker is set
    pub fn is_rotated(&self) -> bool {
        matches!(self.attribute(ROTATED_FIELD), Some(AttributeValue::Int(1)))
    }

    /// Build the output feature: original attributes minus any stale marker, plus `_rotated`
    pub(crate) fn into_output(
        id: FeatureId,
        geometry: Geometry<f64>,
        mut attributes: Attributes,
        rotated: bool,
    ) -> Self {
        attributes.retain(|(name, _)| name != ROTATED_FIELD);
        attributes.push((
            ROTATED_FIELD.to_string(),
            AttributeValue::Int(i64::from(rotated)),
        ));
        Self {
            id,
            geometry,
            attributes,
        }
    }
}
