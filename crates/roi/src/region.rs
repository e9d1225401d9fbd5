//! Boolean composition of regions.

use crate::{
    affine::Affine2,
    project::ProjectedRegion,
    shapes::{GeometricShape, ShapeAdapter},
    traits::RealMask,
    types::{BoundaryType, Interval},
};

/// A region expression. Leaves are primitives; inner nodes combine them.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// A locally authored primitive.
    Shape(GeometricShape),
    /// A primitive decoded from, and still backed by, a wire record.
    Backed(ShapeAdapter),
    Or(Vec<Region>),
    And(Box<Region>, Box<Region>),
    Xor(Box<Region>, Box<Region>),
    Minus(Box<Region>, Box<Region>),
    Negate(Box<Region>),
    /// `inner` seen through `to_source`: contains `p` iff `inner` contains
    /// `to_source(p)`.
    Transform { inner: Box<Region>, to_source: Affine2 },
    Projected(ProjectedRegion),
}

impl From<GeometricShape> for Region {
    fn from(shape: GeometricShape) -> Self {
        Region::Shape(shape)
    }
}

impl From<ShapeAdapter> for Region {
    fn from(adapter: ShapeAdapter) -> Self {
        Region::Backed(adapter)
    }
}

impl From<ProjectedRegion> for Region {
    fn from(projected: ProjectedRegion) -> Self {
        Region::Projected(projected)
    }
}

impl Region {
    /// Union of `self` and `other`, flattening nested unions.
    pub fn or(self, other: Region) -> Region {
        match (self, other) {
            (Region::Or(mut a), Region::Or(b)) => {
                a.extend(b);
                Region::Or(a)
            }
            (Region::Or(mut a), b) => {
                a.push(b);
                Region::Or(a)
            }
            (a, b) => Region::Or(vec![a, b]),
        }
    }

    pub fn and(self, other: Region) -> Region {
        Region::And(Box::new(self), Box::new(other))
    }

    pub fn xor(self, other: Region) -> Region {
        Region::Xor(Box::new(self), Box::new(other))
    }

    pub fn minus(self, other: Region) -> Region {
        Region::Minus(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Region {
        Region::Negate(Box::new(self))
    }

    pub fn transform(self, to_source: Affine2) -> Region {
        Region::Transform { inner: Box::new(self), to_source }
    }

    /// Short operator or leaf name, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Region::Shape(_) => "shape",
            Region::Backed(_) => "backed_shape",
            Region::Or(_) => "or",
            Region::And(..) => "and",
            Region::Xor(..) => "xor",
            Region::Minus(..) => "minus",
            Region::Negate(_) => "negate",
            Region::Transform { .. } => "transform",
            Region::Projected(_) => "projected",
        }
    }

    /// Whether the region is a single primitive.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Region::Shape(_) | Region::Backed(_))
    }
}

impl RealMask for Region {
    fn boundary_type(&self) -> BoundaryType {
        match self {
            Region::Shape(s) => s.boundary_type(),
            Region::Backed(s) => s.boundary_type(),
            Region::Or(operands) => operands
                .iter()
                .map(|r| r.boundary_type())
                .reduce(BoundaryType::or)
                .unwrap_or(BoundaryType::Unspecified),
            Region::And(a, b) => a.boundary_type().and(b.boundary_type()),
            Region::Xor(..) => BoundaryType::Unspecified,
            Region::Minus(a, b) => a.boundary_type().and(b.boundary_type().negate()),
            Region::Negate(inner) => inner.boundary_type().negate(),
            Region::Transform { inner, .. } => inner.boundary_type(),
            Region::Projected(p) => p.boundary_type(),
        }
    }

    fn test(&self, point: &[f64]) -> bool {
        match self {
            Region::Shape(s) => s.test(point),
            Region::Backed(s) => s.test(point),
            Region::Or(operands) => operands.iter().any(|r| r.test(point)),
            Region::And(a, b) => a.test(point) && b.test(point),
            Region::Xor(a, b) => a.test(point) != b.test(point),
            Region::Minus(a, b) => a.test(point) && !b.test(point),
            Region::Negate(inner) => !inner.test(point),
            Region::Transform { inner, to_source } => {
                if point.len() < 2 {
                    return false;
                }
                let mut local = point.to_vec();
                let [x, y] = to_source.apply([point[0], point[1]]);
                local[0] = x;
                local[1] = y;
                inner.test(&local)
            }
            Region::Projected(p) => p.test(point),
        }
    }

    fn dims(&self) -> usize {
        match self {
            Region::Shape(_) | Region::Backed(_) => 2,
            Region::Or(operands) => operands.iter().map(|r| r.dims()).max().unwrap_or(2),
            Region::And(a, b) | Region::Xor(a, b) | Region::Minus(a, b) => a.dims().max(b.dims()),
            Region::Negate(inner) | Region::Transform { inner, .. } => inner.dims(),
            Region::Projected(p) => p.dims(),
        }
    }

    fn bounds(&self) -> Option<Interval> {
        match self {
            Region::Shape(s) => s.bounds(),
            Region::Backed(s) => s.bounds(),
            Region::Or(operands) => {
                let mut iter = operands.iter();
                let first = iter.next()?.bounds()?;
                iter.try_fold(first, |acc, r| Some(acc.union(&r.bounds()?)))
            }
            Region::And(a, b) => match (a.bounds(), b.bounds()) {
                (Some(x), Some(y)) => Some(x.intersection(&y)),
                (Some(x), None) | (None, Some(x)) => Some(x),
                (None, None) => None,
            },
            Region::Xor(a, b) => Some(a.bounds()?.union(&b.bounds()?)),
            Region::Minus(a, _) => a.bounds(),
            Region::Negate(_) => None,
            Region::Transform { inner, to_source } => {
                let inner = inner.bounds()?;
                let from_source = to_source.inverse().ok()?;
                let (min, max) = from_source.map_bounds([inner.min[0], inner.min[1]], [inner.max[0], inner.max[1]]);
                let mut mapped = inner;
                mapped.min[..2].copy_from_slice(&min);
                mapped.max[..2].copy_from_slice(&max);
                Some(mapped)
            }
            Region::Projected(p) => p.bounds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Ellipse, Geometry, Rectangle};

    fn rect(x: f64, y: f64, w: f64, h: f64, boundary: BoundaryType) -> Region {
        Region::from(GeometricShape::new(Geometry::Rectangle(Rectangle::from_corner(x, y, w, h)), boundary))
    }

    #[test]
    fn test_operators() {
        let a = rect(0.0, 0.0, 10.0, 10.0, BoundaryType::Closed);
        let b = rect(5.0, 5.0, 10.0, 10.0, BoundaryType::Closed);

        let union = a.clone().or(b.clone());
        assert!(union.test(&[1.0, 1.0]) && union.test(&[14.0, 14.0]));
        let both = a.clone().and(b.clone());
        assert!(both.test(&[7.0, 7.0]) && !both.test(&[1.0, 1.0]));
        let either = a.clone().xor(b.clone());
        assert!(!either.test(&[7.0, 7.0]) && either.test(&[1.0, 1.0]));
        let diff = a.clone().minus(b.clone());
        assert!(diff.test(&[1.0, 1.0]) && !diff.test(&[7.0, 7.0]));
        assert!(a.negate().test(&[-1.0, 0.0]));
    }

    #[test]
    fn test_boundary_algebra() {
        let closed = rect(0.0, 0.0, 1.0, 1.0, BoundaryType::Closed);
        let open = rect(0.0, 0.0, 1.0, 1.0, BoundaryType::Open);
        assert_eq!(closed.clone().or(closed.clone()).boundary_type(), BoundaryType::Closed);
        assert_eq!(closed.clone().and(open.clone()).boundary_type(), BoundaryType::Unspecified);
        assert_eq!(closed.clone().minus(open.clone()).boundary_type(), BoundaryType::Closed);
        assert_eq!(closed.clone().xor(closed.clone()).boundary_type(), BoundaryType::Unspecified);
        assert_eq!(open.negate().boundary_type(), BoundaryType::Closed);
    }

    #[test]
    fn test_bounds() {
        let a = rect(0.0, 0.0, 10.0, 10.0, BoundaryType::Closed);
        let b = rect(5.0, 5.0, 10.0, 10.0, BoundaryType::Closed);
        assert_eq!(a.clone().and(b.clone()).bounds(), Some(Interval::planar([5.0, 5.0], [10.0, 10.0])));
        assert_eq!(a.clone().or(b.clone()).bounds(), Some(Interval::planar([0.0, 0.0], [15.0, 15.0])));
        assert_eq!(a.clone().minus(b.clone()).bounds(), a.bounds());
        assert_eq!(b.clone().negate().bounds(), None);
        assert_eq!(a.clone().and(b.clone().negate()).bounds(), a.bounds());
    }

    #[test]
    fn test_transform_moves_region() {
        let circle = Region::from(GeometricShape::closed(Geometry::Ellipse(Ellipse::new([0.0, 0.0], [1.0, 1.0]))));
        let moved = circle.transform(Affine2::translation(-5.0, 0.0));
        assert!(moved.test(&[5.0, 0.0]));
        assert!(!moved.test(&[0.0, 0.0]));
        assert_eq!(moved.bounds(), Some(Interval::planar([4.0, -1.0], [6.0, 1.0])));
    }

    #[test]
    fn test_or_flattens() {
        let a = rect(0.0, 0.0, 1.0, 1.0, BoundaryType::Closed);
        let union = a.clone().or(a.clone()).or(a.clone());
        assert!(matches!(&union, Region::Or(v) if v.len() == 3));
        assert_eq!(union.dims(), 2);
    }
}
