use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{Result, RoiError};

/// Whether a region's containment test includes its topological boundary.
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, IntoStaticStr,
    PartialEq, Eq, Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BoundaryType {
    Closed,
    Open,
    Unspecified,
}

impl BoundaryType {
    /// Boundary of the intersection of two regions.
    pub fn and(self, other: Self) -> Self {
        if self == other { self } else { Self::Unspecified }
    }

    /// Boundary of the union of two regions.
    pub fn or(self, other: Self) -> Self {
        self.and(other)
    }

    /// Boundary of the complement: open and closed swap.
    pub fn negate(self) -> Self {
        match self {
            Self::Closed => Self::Open,
            Self::Open => Self::Closed,
            Self::Unspecified => Self::Unspecified,
        }
    }
}

/// Non-planar image axis.
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, IntoStaticStr,
    PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Axis {
    Z,
    T,
    C,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Z, Axis::T, Axis::C];
}

/// Plane index meaning "every index along this axis".
pub const WILDCARD: i32 = -1;

/// Location of a 2-D shape within a (z, t, c) stack. Each component is a
/// plane index or [`WILDCARD`].
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct PlaneCoord {
    pub z: i32,
    pub t: i32,
    pub c: i32,
}

impl PlaneCoord {
    /// Every plane on every axis.
    pub const ALL: PlaneCoord = PlaneCoord { z: WILDCARD, t: WILDCARD, c: WILDCARD };

    pub fn new(z: i32, t: i32, c: i32) -> Result<Self> {
        let plane = Self { z, t, c };
        plane.validate()?;
        Ok(plane)
    }

    pub fn validate(&self) -> Result<()> {
        if self.z < WILDCARD || self.t < WILDCARD || self.c < WILDCARD {
            return Err(RoiError::InvalidPlaneCoordinate { z: self.z, t: self.t, c: self.c });
        }
        Ok(())
    }

    pub fn get(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Z => self.z,
            Axis::T => self.t,
            Axis::C => self.c,
        }
    }

    pub fn with(mut self, axis: Axis, index: i32) -> Self {
        match axis {
            Axis::Z => self.z = index,
            Axis::T => self.t = index,
            Axis::C => self.c = index,
        }
        self
    }

    pub fn is_wildcard(&self, axis: Axis) -> bool {
        self.get(axis) == WILDCARD
    }

    /// Overlays the non-wildcard components of `other` onto `self`.
    pub fn overlay(self, other: PlaneCoord) -> Self {
        Axis::ALL.iter().fold(self, |plane, &axis| {
            if other.is_wildcard(axis) { plane } else { plane.with(axis, other.get(axis)) }
        })
    }
}

impl Default for PlaneCoord {
    fn default() -> Self {
        Self::ALL
    }
}

/// Axis-aligned real interval in N dimensions. The first two dimensions are
/// always X and Y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl Interval {
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Self {
        debug_assert_eq!(min.len(), max.len());
        Self { min, max }
    }

    pub fn planar(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min: min.to_vec(), max: max.to_vec() }
    }

    /// An interval containing nothing, for accumulating bounds.
    pub fn empty(dims: usize) -> Self {
        Self { min: vec![f64::INFINITY; dims], max: vec![f64::NEG_INFINITY; dims] }
    }

    pub fn dims(&self) -> usize {
        self.min.len()
    }

    pub fn is_empty(&self) -> bool {
        self.min.iter().zip(&self.max).any(|(lo, hi)| lo > hi)
    }

    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(&self.max).all(|v| v.is_finite())
    }

    pub fn union(&self, other: &Interval) -> Interval {
        let dims = self.dims().max(other.dims());
        let pick = |v: &[f64], d: usize, fallback: f64| v.get(d).copied().unwrap_or(fallback);
        Interval {
            min: (0..dims)
                .map(|d| pick(&self.min, d, f64::INFINITY).min(pick(&other.min, d, f64::INFINITY)))
                .collect(),
            max: (0..dims)
                .map(|d| pick(&self.max, d, f64::NEG_INFINITY).max(pick(&other.max, d, f64::NEG_INFINITY)))
                .collect(),
        }
    }

    pub fn intersection(&self, other: &Interval) -> Interval {
        let dims = self.dims().min(other.dims());
        Interval {
            min: (0..dims).map(|d| self.min[d].max(other.min[d])).collect(),
            max: (0..dims).map(|d| self.max[d].min(other.max[d])).collect(),
        }
    }

    /// Restricts to the X/Y part.
    pub fn planar_part(&self) -> ([f64; 2], [f64; 2]) {
        ([self.min[0], self.min[1]], [self.max[0], self.max[1]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_boundary_parses_case_insensitively() {
        assert_eq!(BoundaryType::from_str("OPEN").unwrap(), BoundaryType::Open);
        assert_eq!(BoundaryType::from_str("Unspecified").unwrap(), BoundaryType::Unspecified);
        assert_eq!(BoundaryType::Closed.to_string(), "closed");
    }

    #[test]
    fn test_boundary_algebra() {
        assert_eq!(BoundaryType::Closed.and(BoundaryType::Closed), BoundaryType::Closed);
        assert_eq!(BoundaryType::Closed.or(BoundaryType::Open), BoundaryType::Unspecified);
        assert_eq!(BoundaryType::Open.negate(), BoundaryType::Closed);
    }

    #[test]
    fn test_plane_rejects_below_wildcard() {
        assert!(PlaneCoord::new(-2, 0, 0).is_err());
        assert!(PlaneCoord::new(-1, -1, -1).is_ok());
        assert_ne!(PlaneCoord::new(0, 0, 0).unwrap(), PlaneCoord::ALL);
    }

    #[test]
    fn test_plane_overlay_keeps_wildcards_of_other() {
        let base = PlaneCoord::new(1, 2, 3).unwrap();
        let over = PlaneCoord::ALL.with(Axis::T, 7);
        assert_eq!(base.overlay(over), PlaneCoord { z: 1, t: 7, c: 3 });
    }

    #[test]
    fn test_interval_union_and_intersection() {
        let a = Interval::planar([0.0, 0.0], [10.0, 10.0]);
        let b = Interval::planar([5.0, -5.0], [15.0, 5.0]);
        assert_eq!(a.union(&b), Interval::planar([0.0, -5.0], [15.0, 10.0]));
        assert_eq!(a.intersection(&b), Interval::planar([5.0, 0.0], [10.0, 5.0]));
        assert!(Interval::empty(2).is_empty());
    }
}
