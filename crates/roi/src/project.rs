//! Lifting 2-D regions into N-D by fixing positions along non-planar axes.

use crate::{
    error::{Result, RoiError},
    region::Region,
    traits::RealMask,
    types::{Axis, BoundaryType, Interval, PlaneCoord, WILDCARD},
};

/// A 2-D region placed on fixed (or wildcard) positions of extra axes.
///
/// Coordinate `2 + i` of a query point is the position along `axes[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRegion {
    source: Box<Region>,
    axes: Vec<(Axis, i32)>,
}

/// Projects `region` onto `axes`, one position per axis. A position of
/// [`WILDCARD`] matches every index.
pub fn project(region: Region, axes: &[Axis], positions: &[i32]) -> Result<ProjectedRegion> {
    if region.dims() != 2 {
        return Err(RoiError::InvalidDimension { expected: 2, found: region.dims() });
    }
    if axes.len() != positions.len() {
        return Err(RoiError::InvalidDimension { expected: axes.len(), found: positions.len() });
    }
    for (i, axis) in axes.iter().enumerate() {
        if axes[..i].contains(axis) {
            return Err(RoiError::UnsupportedOperator(format!("axis {axis} projected twice")));
        }
    }
    let mut plane = PlaneCoord::ALL;
    for (&axis, &position) in axes.iter().zip(positions) {
        plane = plane.with(axis, position);
    }
    plane.validate()?;

    Ok(ProjectedRegion {
        source: Box::new(region),
        axes: axes.iter().copied().zip(positions.iter().copied()).collect(),
    })
}

impl ProjectedRegion {
    pub fn source(&self) -> &Region {
        &self.source
    }

    pub fn axes(&self) -> &[(Axis, i32)] {
        &self.axes
    }

    /// The 2-D source and the plane it was projected onto. Axes not listed
    /// are wildcards.
    pub fn unproject(&self) -> (&Region, PlaneCoord) {
        (&self.source, self.plane())
    }

    pub fn into_parts(self) -> (Region, PlaneCoord) {
        let plane = self.plane();
        (*self.source, plane)
    }

    fn plane(&self) -> PlaneCoord {
        self.axes.iter().fold(PlaneCoord::ALL, |plane, &(axis, position)| plane.with(axis, position))
    }
}

impl RealMask for ProjectedRegion {
    fn boundary_type(&self) -> BoundaryType {
        self.source.boundary_type()
    }

    fn test(&self, point: &[f64]) -> bool {
        if point.len() < self.dims() {
            return false;
        }
        let on_plane = self
            .axes
            .iter()
            .zip(&point[2..])
            .all(|(&(_, position), &value)| position == WILDCARD || value == f64::from(position));
        on_plane && self.source.test(&point[..2])
    }

    fn dims(&self) -> usize {
        2 + self.axes.len()
    }

    fn bounds(&self) -> Option<Interval> {
        let planar = self.source.bounds()?;
        let mut min = planar.min[..2].to_vec();
        let mut max = planar.max[..2].to_vec();
        for &(_, position) in &self.axes {
            if position == WILDCARD {
                min.push(f64::NEG_INFINITY);
                max.push(f64::INFINITY);
            } else {
                min.push(f64::from(position));
                max.push(f64::from(position));
            }
        }
        Some(Interval::new(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{GeometricShape, Geometry, Rectangle};

    fn square() -> Region {
        Region::from(GeometricShape::closed(Geometry::Rectangle(Rectangle::from_corner(0.0, 0.0, 4.0, 4.0))))
    }

    #[test]
    fn test_projected_containment() {
        let p = project(square(), &[Axis::Z, Axis::T], &[3, WILDCARD]).unwrap();
        assert_eq!(p.dims(), 4);
        assert!(p.test(&[1.0, 1.0, 3.0, 100.0]));
        assert!(!p.test(&[1.0, 1.0, 2.0, 0.0]));
        assert!(!p.test(&[5.0, 1.0, 3.0, 0.0]));
        assert!(!p.test(&[1.0, 1.0, 3.0]));
    }

    #[test]
    fn test_projected_bounds() {
        let p = project(square(), &[Axis::C, Axis::Z], &[1, WILDCARD]).unwrap();
        let bounds = p.bounds().unwrap();
        assert_eq!(bounds.min, vec![0.0, 0.0, 1.0, f64::NEG_INFINITY]);
        assert_eq!(bounds.max, vec![4.0, 4.0, 1.0, f64::INFINITY]);
    }

    #[test]
    fn test_unproject_is_inverse() {
        let p = project(square(), &[Axis::T], &[5]).unwrap();
        let (source, plane) = p.unproject();
        assert_eq!(source, &square());
        assert_eq!(plane, PlaneCoord { z: WILDCARD, t: 5, c: WILDCARD });
        let (region, _) = p.into_parts();
        assert_eq!(region, square());
    }

    #[test]
    fn test_invalid_projections() {
        assert!(matches!(
            project(square(), &[Axis::Z], &[1, 2]),
            Err(RoiError::InvalidDimension { expected: 1, found: 2 })
        ));
        assert!(project(square(), &[Axis::Z], &[-2]).is_err());
        assert!(project(square(), &[Axis::Z, Axis::Z], &[0, 1]).is_err());

        let nested = Region::from(project(square(), &[Axis::Z], &[0]).unwrap());
        assert!(matches!(
            project(nested, &[Axis::T], &[0]),
            Err(RoiError::InvalidDimension { expected: 2, found: 3 })
        ));
    }
}
