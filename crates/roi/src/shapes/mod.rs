//! Value-typed primitive shapes and their wire-backed adapters.

pub mod adapter;
pub mod ellipse;
pub mod line;
pub mod mask;
pub mod point;
pub mod polygon;
pub mod rectangle;

use serde::{Deserialize, Serialize};

pub use adapter::ShapeAdapter;
pub use ellipse::Ellipse;
pub use line::Line;
pub use mask::RasterMask;
pub use point::Point;
pub use polygon::{Polygon, Polyline};
pub use rectangle::Rectangle;

use crate::{
    affine::Affine2,
    traits::{Primitive, RealMask},
    types::{BoundaryType, Interval},
    wire::ShapeKind,
};

/// Kind-specific parameters of a primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Point(Point),
    Line(Line),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Polygon(Polygon),
    Polyline(Polyline),
    Mask(RasterMask),
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Point(_) => ShapeKind::Point,
            Self::Line(_) => ShapeKind::Line,
            Self::Rectangle(_) => ShapeKind::Rectangle,
            Self::Ellipse(_) => ShapeKind::Ellipse,
            Self::Polygon(_) => ShapeKind::Polygon,
            Self::Polyline(_) => ShapeKind::Polyline,
            Self::Mask(_) => ShapeKind::RasterMask,
        }
    }

    fn as_primitive(&self) -> &dyn Primitive {
        match self {
            Self::Point(g) => g,
            Self::Line(g) => g,
            Self::Rectangle(g) => g,
            Self::Ellipse(g) => g,
            Self::Polygon(g) => g,
            Self::Polyline(g) => g,
            Self::Mask(g) => g,
        }
    }

    fn as_primitive_mut(&mut self) -> &mut dyn Primitive {
        match self {
            Self::Point(g) => g,
            Self::Line(g) => g,
            Self::Rectangle(g) => g,
            Self::Ellipse(g) => g,
            Self::Polygon(g) => g,
            Self::Polyline(g) => g,
            Self::Mask(g) => g,
        }
    }
}

impl Primitive for Geometry {
    fn contains(&self, point: [f64; 2], boundary: BoundaryType) -> bool {
        self.as_primitive().contains(point, boundary)
    }

    fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        self.as_primitive().bounding_box()
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.as_primitive_mut().translate(dx, dy)
    }
}

/// A 2-D primitive with its boundary behavior and optional placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometricShape {
    pub geometry: Geometry,
    pub boundary: BoundaryType,
    /// Maps query points into the geometry's own frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Affine2>,
    /// Free text, without any boundary token.
    #[serde(default)]
    pub text: String,
}

impl GeometricShape {
    pub fn new(geometry: Geometry, boundary: BoundaryType) -> Self {
        Self { geometry, boundary, transform: None, text: String::new() }
    }

    pub fn closed(geometry: Geometry) -> Self {
        Self::new(geometry, BoundaryType::Closed)
    }

    pub fn with_transform(mut self, to_source: Affine2) -> Self {
        self.transform = Some(to_source);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn bounds_min(&self, d: usize) -> f64 {
        self.bounds().map_or(f64::NEG_INFINITY, |b| b.min[d])
    }

    pub fn bounds_max(&self, d: usize) -> f64 {
        self.bounds().map_or(f64::INFINITY, |b| b.max[d])
    }
}

impl RealMask for GeometricShape {
    fn boundary_type(&self) -> BoundaryType {
        self.boundary
    }

    fn test(&self, point: &[f64]) -> bool {
        let [x, y] = match point {
            [x, y, ..] => [*x, *y],
            _ => return false,
        };
        let local = self.transform.map_or([x, y], |t| t.apply([x, y]));
        self.geometry.contains(local, self.boundary)
    }

    fn bounds(&self) -> Option<Interval> {
        let (min, max) = self.geometry.bounding_box();
        match self.transform {
            None => Some(Interval::planar(min, max)),
            // A singular map has an unbounded preimage.
            Some(t) => t.inverse().ok().map(|from_source| {
                let (min, max) = from_source.map_bounds(min, max);
                Interval::planar(min, max)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_is_to_source() {
        let rect = GeometricShape::closed(Geometry::Rectangle(Rectangle::new([0.0, 0.0], [2.0, 2.0])))
            .with_transform(Affine2::translation(-10.0, 0.0));
        assert!(rect.test(&[11.0, 1.0]));
        assert!(!rect.test(&[1.0, 1.0]));
        assert_eq!(rect.bounds(), Some(Interval::planar([10.0, 0.0], [12.0, 2.0])));
        assert_eq!(rect.bounds_min(0), 10.0);
        assert_eq!(rect.bounds_max(1), 2.0);
    }

    #[test]
    fn test_extra_coordinates_ignored() {
        let point = GeometricShape::closed(Geometry::Point(Point::new(1.0, 1.0)));
        assert!(point.test(&[1.0, 1.0, 5.0]));
        assert!(!point.test(&[1.0]));
    }

    #[test]
    fn test_translate_dispatches() {
        let mut g = Geometry::Ellipse(Ellipse::new([0.0, 0.0], [1.0, 1.0]));
        g.translate(3.0, 4.0);
        assert_eq!(g.bounding_box(), ([2.0, 3.0], [4.0, 5.0]));
        assert_eq!(g.kind(), ShapeKind::Ellipse);
    }
}
