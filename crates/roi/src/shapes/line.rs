use serde::{Deserialize, Serialize};

use crate::{traits::Primitive, types::BoundaryType};

/// Largest distance from a segment still counted as lying on it.
const ON_SEGMENT_TOLERANCE: f64 = 1e-10;

/// Whether `p` lies on the closed segment `a`-`b`.
pub(crate) fn segment_contains(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> bool {
    let (lo_x, hi_x) = (a[0].min(b[0]), a[0].max(b[0]));
    let (lo_y, hi_y) = (a[1].min(b[1]), a[1].max(b[1]));
    let slack = ON_SEGMENT_TOLERANCE;
    if p[0] < lo_x - slack || p[0] > hi_x + slack || p[1] < lo_y - slack || p[1] > hi_y + slack {
        return false;
    }

    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len = dx.hypot(dy);
    if len == 0.0 {
        return p == a;
    }
    let cross = dx * (p[1] - a[1]) - dy * (p[0] - a[0]);
    cross.abs() <= ON_SEGMENT_TOLERANCE * len
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: [f64; 2],
    pub end: [f64; 2],
}

impl Line {
    pub fn new(start: [f64; 2], end: [f64; 2]) -> Self {
        Self { start, end }
    }

    /// Endpoint 0 is `start`, anything else is `end`.
    pub fn endpoint(&self, index: usize) -> [f64; 2] {
        if index == 0 { self.start } else { self.end }
    }

    pub fn set_endpoint(&mut self, index: usize, position: [f64; 2]) {
        if index == 0 {
            self.start = position;
        } else {
            self.end = position;
        }
    }

    pub fn length(&self) -> f64 {
        (self.end[0] - self.start[0]).hypot(self.end[1] - self.start[1])
    }
}

impl Primitive for Line {
    fn contains(&self, point: [f64; 2], _boundary: BoundaryType) -> bool {
        segment_contains(self.start, self.end, point)
    }

    fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        (
            [self.start[0].min(self.end[0]), self.start[1].min(self.end[1])],
            [self.start[0].max(self.end[0]), self.start[1].max(self.end[1])],
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for p in [&mut self.start, &mut self.end] {
            p[0] += dx;
            p[1] += dy;
        }
    }
}
