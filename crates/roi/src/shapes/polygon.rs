use geo::Area;
use geo_types::{Coord, LineString};
use serde::{Deserialize, Serialize};

use super::line::segment_contains;
use crate::{traits::Primitive, types::BoundaryType};

fn vertex_bounds(vertices: &[[f64; 2]]) -> ([f64; 2], [f64; 2]) {
    vertices.iter().fold(
        ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]),
        |(lo, hi), v| ([lo[0].min(v[0]), lo[1].min(v[1])], [hi[0].max(v[0]), hi[1].max(v[1])]),
    )
}

fn to_line_string(vertices: &[[f64; 2]]) -> LineString<f64> {
    LineString::new(vertices.iter().map(|&[x, y]| Coord { x, y }).collect())
}

/// Even-odd crossing test. Edge behavior is unspecified.
pub(crate) fn pnpoly(vertices: &[[f64; 2]], [x, y]: [f64; 2]) -> bool {
    let mut inside = false;
    let mut j = vertices.len().wrapping_sub(1);
    for (i, vi) in vertices.iter().enumerate() {
        let vj = vertices[j];
        if (vi[1] > y) != (vj[1] > y) && x < (vj[0] - vi[0]) * (y - vi[1]) / (vj[1] - vi[1]) + vi[0] {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Closed simple polygon. The last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<[f64; 2]>,
}

impl Polygon {
    pub fn new(vertices: Vec<[f64; 2]>) -> Self {
        Self { vertices }
    }

    pub fn vertex(&self, index: usize) -> Option<[f64; 2]> {
        self.vertices.get(index).copied()
    }

    /// Panics if `index > len`.
    pub fn add_vertex(&mut self, index: usize, vertex: [f64; 2]) {
        self.vertices.insert(index, vertex);
    }

    /// Panics if `index` is out of range.
    pub fn remove_vertex(&mut self, index: usize) -> [f64; 2] {
        self.vertices.remove(index)
    }

    /// Panics if `index` is out of range.
    pub fn set_vertex(&mut self, index: usize, vertex: [f64; 2]) {
        self.vertices[index] = vertex;
    }

    pub fn edges(&self) -> impl Iterator<Item = ([f64; 2], [f64; 2])> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn area(&self) -> f64 {
        geo_types::Polygon::new(to_line_string(&self.vertices), vec![]).unsigned_area()
    }
}

impl Primitive for Polygon {
    fn contains(&self, point: [f64; 2], boundary: BoundaryType) -> bool {
        let on_edge = |p| self.edges().any(|(a, b)| segment_contains(a, b, p));
        match boundary {
            BoundaryType::Closed if on_edge(point) => true,
            BoundaryType::Open if on_edge(point) => false,
            _ => pnpoly(&self.vertices, point),
        }
    }

    fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        vertex_bounds(&self.vertices)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for v in &mut self.vertices {
            v[0] += dx;
            v[1] += dy;
        }
    }
}

/// Open chain of segments between consecutive vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub vertices: Vec<[f64; 2]>,
}

impl Polyline {
    pub fn new(vertices: Vec<[f64; 2]>) -> Self {
        Self { vertices }
    }

    pub fn vertex(&self, index: usize) -> Option<[f64; 2]> {
        self.vertices.get(index).copied()
    }

    /// Panics if `index > len`.
    pub fn add_vertex(&mut self, index: usize, vertex: [f64; 2]) {
        self.vertices.insert(index, vertex);
    }

    /// Panics if `index` is out of range.
    pub fn remove_vertex(&mut self, index: usize) -> [f64; 2] {
        self.vertices.remove(index)
    }

    /// Panics if `index` is out of range.
    pub fn set_vertex(&mut self, index: usize, vertex: [f64; 2]) {
        self.vertices[index] = vertex;
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        to_line_string(&self.vertices)
    }
}

impl Primitive for Polyline {
    fn contains(&self, point: [f64; 2], _boundary: BoundaryType) -> bool {
        self.vertices.windows(2).any(|w| segment_contains(w[0], w[1], point))
    }

    fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        vertex_bounds(&self.vertices)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for v in &mut self.vertices {
            v[0] += dx;
            v[1] += dy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]])
    }

    #[test]
    fn test_polygon_interior_in_all_variants() {
        for boundary in [BoundaryType::Closed, BoundaryType::Open, BoundaryType::Unspecified] {
            assert!(square().contains([2.0, 2.0], boundary));
            assert!(!square().contains([5.0, 2.0], boundary));
        }
    }

    #[test]
    fn test_polygon_edges_follow_boundary() {
        let edge = [4.0, 2.0];
        assert!(square().contains(edge, BoundaryType::Closed));
        assert!(!square().contains(edge, BoundaryType::Open));
        assert!(square().contains([0.0, 0.0], BoundaryType::Closed));
    }

    #[test]
    fn test_concave_polygon() {
        // U shape: the notch is outside.
        let u = Polygon::new(vec![
            [0.0, 0.0], [6.0, 0.0], [6.0, 6.0], [4.0, 6.0], [4.0, 2.0], [2.0, 2.0], [2.0, 6.0], [0.0, 6.0],
        ]);
        assert!(!u.contains([3.0, 4.0], BoundaryType::Unspecified));
        assert!(u.contains([1.0, 4.0], BoundaryType::Unspecified));
        assert_eq!(u.area(), 28.0);
    }

    #[test]
    fn test_vertex_edits() {
        let mut p = square();
        p.add_vertex(1, [2.0, -2.0]);
        assert_eq!(p.vertices.len(), 5);
        assert!(p.contains([2.0, -1.0], BoundaryType::Unspecified));
        assert_eq!(p.remove_vertex(1), [2.0, -2.0]);
        p.set_vertex(2, [8.0, 8.0]);
        assert_eq!(p.bounding_box(), ([0.0, 0.0], [8.0, 8.0]));
    }

    #[test]
    fn test_polyline_segments_only() {
        let line = Polyline::new(vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0]]);
        assert!(line.contains([1.0, 0.0], BoundaryType::Closed));
        assert!(line.contains([2.0, 1.0], BoundaryType::Closed));
        // Not closed back to the start.
        assert!(!line.contains([1.0, 1.0], BoundaryType::Closed));
    }
}
