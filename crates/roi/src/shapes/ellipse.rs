use serde::{Deserialize, Serialize};

use crate::{traits::Primitive, types::BoundaryType};

/// Axis-aligned ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: [f64; 2],
    pub radii: [f64; 2],
}

impl Ellipse {
    pub fn new(center: [f64; 2], radii: [f64; 2]) -> Self {
        Self { center, radii }
    }

    pub fn set_center(&mut self, center: [f64; 2]) {
        self.center = center;
    }

    pub fn set_radius(&mut self, d: usize, radius: f64) {
        self.radii[d] = radius;
    }

    /// `((x - cx) / rx)² + ((y - cy) / ry)²`
    fn normalized(&self, [x, y]: [f64; 2]) -> f64 {
        let nx = (x - self.center[0]) / self.radii[0];
        let ny = (y - self.center[1]) / self.radii[1];
        nx * nx + ny * ny
    }

    /// Vertices approximating the outline, counter-clockwise from +X.
    pub fn outline(&self, segments: usize) -> Vec<[f64; 2]> {
        let n = segments.max(3);
        (0..n)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / n as f64;
                let (sin, cos) = angle.sin_cos();
                [self.center[0] + self.radii[0] * cos, self.center[1] + self.radii[1] * sin]
            })
            .collect()
    }
}

impl Primitive for Ellipse {
    fn contains(&self, point: [f64; 2], boundary: BoundaryType) -> bool {
        let q = self.normalized(point);
        match boundary {
            BoundaryType::Open => q < 1.0,
            BoundaryType::Closed | BoundaryType::Unspecified => q <= 1.0,
        }
    }

    fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        (
            [self.center[0] - self.radii[0], self.center[1] - self.radii[1]],
            [self.center[0] + self.radii[0], self.center[1] + self.radii[1]],
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.center[0] += dx;
        self.center[1] += dy;
    }
}
