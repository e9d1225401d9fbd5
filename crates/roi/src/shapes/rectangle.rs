use serde::{Deserialize, Serialize};

use crate::{traits::Primitive, types::BoundaryType};

/// Axis-aligned rectangle spanning `min..max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Rectangle {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    pub fn from_corner(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { min: [x, y], max: [x + width, y + height] }
    }

    pub fn center(&self) -> [f64; 2] {
        [(self.min[0] + self.max[0]) / 2.0, (self.min[1] + self.max[1]) / 2.0]
    }

    pub fn side_length(&self, d: usize) -> f64 {
        self.max[d] - self.min[d]
    }

    /// Moves the rectangle so its center lands on `center`.
    pub fn set_center(&mut self, center: [f64; 2]) {
        let old = self.center();
        self.translate(center[0] - old[0], center[1] - old[1]);
    }

    /// Resizes along dimension `d` keeping the center fixed.
    pub fn set_side_length(&mut self, d: usize, length: f64) {
        let mid = (self.min[d] + self.max[d]) / 2.0;
        self.min[d] = mid - length / 2.0;
        self.max[d] = mid + length / 2.0;
    }
}

impl Primitive for Rectangle {
    fn contains(&self, [x, y]: [f64; 2], boundary: BoundaryType) -> bool {
        match boundary {
            BoundaryType::Open => {
                x > self.min[0] && x < self.max[0] && y > self.min[1] && y < self.max[1]
            }
            BoundaryType::Closed | BoundaryType::Unspecified => {
                x >= self.min[0] && x <= self.max[0] && y >= self.min[1] && y <= self.max[1]
            }
        }
    }

    fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        (self.min, self.max)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.min[0] += dx;
        self.max[0] += dx;
        self.min[1] += dy;
        self.max[1] += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_depend_on_boundary() {
        let rect = Rectangle::new([0.0, 0.0], [10.0, 10.0]);
        assert!(rect.contains([0.0, 5.0], BoundaryType::Closed));
        assert!(rect.contains([10.0, 10.0], BoundaryType::Closed));
        assert!(!rect.contains([0.0, 5.0], BoundaryType::Open));
        assert!(rect.contains([5.0, 5.0], BoundaryType::Open));
        assert!(rect.contains([10.0, 0.0], BoundaryType::Unspecified));
        assert!(!rect.contains([10.5, 5.0], BoundaryType::Closed));
    }

    #[test]
    fn test_side_length_keeps_center() {
        let mut rect = Rectangle::from_corner(0.0, 0.0, 4.0, 2.0);
        rect.set_side_length(0, 8.0);
        assert_eq!(rect.min, [-2.0, 0.0]);
        assert_eq!(rect.max, [6.0, 2.0]);
        assert_eq!(rect.center(), [2.0, 1.0]);
    }

    #[test]
    fn test_set_center() {
        let mut rect = Rectangle::from_corner(0.0, 0.0, 4.0, 2.0);
        rect.set_center([0.0, 0.0]);
        assert_eq!(rect.bounding_box(), ([-2.0, -1.0], [2.0, 1.0]));
    }
}
