use serde::{Deserialize, Serialize};

use crate::{traits::Primitive, types::BoundaryType};

/// A single location. Contains only itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: [f64; 2],
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { position: [x, y] }
    }

    pub fn set_position(&mut self, position: [f64; 2]) {
        self.position = position;
    }
}

impl Primitive for Point {
    fn contains(&self, point: [f64; 2], _boundary: BoundaryType) -> bool {
        point == self.position
    }

    fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        (self.position, self.position)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.position[0] += dx;
        self.position[1] += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_equality() {
        let p = Point::new(1.5, -2.0);
        assert!(p.contains([1.5, -2.0], BoundaryType::Open));
        assert!(!p.contains([1.5, -2.0 + 1e-12], BoundaryType::Closed));
    }
}
