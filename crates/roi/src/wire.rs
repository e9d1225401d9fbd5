//! The remote store's shape records: flat, per-plane, boundary-agnostic.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{affine::WireAffine, types::PlaneCoord};

/// Identity assigned to a shape by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ShapeId(pub i64);

/// Identity assigned to a whole collection by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RoiId(pub i64);

#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, IntoStaticStr,
    PartialEq, Eq, Hash,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShapeKind {
    Point,
    Line,
    Rectangle,
    Ellipse,
    Polygon,
    Polyline,
    RasterMask,
    Text,
}

/// Named tag linked to a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TagAnnotation {
    pub name: String,
    pub value: String,
}

/// Kind-specific fields, laid out as the remote store lays them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireGeometry {
    Point { x: f64, y: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    Ellipse { x: f64, y: f64, radius_x: f64, radius_y: f64 },
    Polygon { points: Vec<[f64; 2]> },
    Polyline { points: Vec<[f64; 2]> },
    Mask {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(with = "base64_bytes")]
        #[schemars(with = "String")]
        bytes: Vec<u8>,
    },
    Text { x: f64, y: f64 },
}

impl WireGeometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Point { .. } => ShapeKind::Point,
            Self::Line { .. } => ShapeKind::Line,
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Ellipse { .. } => ShapeKind::Ellipse,
            Self::Polygon { .. } => ShapeKind::Polygon,
            Self::Polyline { .. } => ShapeKind::Polyline,
            Self::Mask { .. } => ShapeKind::RasterMask,
            Self::Text { .. } => ShapeKind::Text,
        }
    }
}

/// One shape record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WireShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ShapeId>,
    pub geometry: WireGeometry,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<TagAnnotation>,
    #[serde(default)]
    pub plane: PlaneCoord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<WireAffine>,
}

impl WireShape {
    /// A record not yet known to the remote store, on every plane.
    pub fn new(geometry: WireGeometry) -> Self {
        Self {
            id: None,
            geometry,
            text: String::new(),
            annotations: Vec::new(),
            plane: PlaneCoord::ALL,
            transform: None,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn annotation(&self, name: &str) -> Option<&TagAnnotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    /// Exact geometric equality: kind, plane, transform and every geometric
    /// parameter. Identity, text and annotations are ignored.
    pub fn geometry_eq(&self, other: &WireShape) -> bool {
        self.plane == other.plane
            && self.transform == other.transform
            && self.geometry == other.geometry
    }
}

/// An annotation made of several shapes, as stored remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegionCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RoiId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub shapes: Vec<WireShape>,
}

impl RegionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, shape: WireShape) {
        self.shapes.push(shape);
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WireShape> {
        self.shapes.iter()
    }
}

mod base64_bytes {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_eq_ignores_identity_and_text() {
        let mut a = WireShape::new(WireGeometry::Point { x: 1.0, y: 2.0 });
        let mut b = a.clone();
        a.id = Some(ShapeId(4));
        b.text = "label".to_string();
        assert!(a.geometry_eq(&b));

        b.plane = PlaneCoord::ALL.with(crate::types::Axis::Z, 0);
        assert!(!a.geometry_eq(&b));
    }

    #[test]
    fn test_mask_bytes_serialize_as_base64() {
        let shape = WireShape::new(WireGeometry::Mask {
            x: 0.0,
            y: 0.0,
            width: 4.0,
            height: 2.0,
            bytes: vec![0b1010_0101],
        });
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["geometry"]["bytes"], "pQ==");
        let back: WireShape = serde_json::from_value(json).unwrap();
        assert_eq!(back, shape);
    }
}
