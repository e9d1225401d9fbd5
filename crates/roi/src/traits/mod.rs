use crate::types::{BoundaryType, Interval};

/// A region that can answer containment queries over real coordinates.
///
/// Points are slices whose first two entries are X and Y; any further
/// entries follow the region's non-planar axes.
pub trait RealMask {
    /// Whether the topological boundary belongs to the region.
    fn boundary_type(&self) -> BoundaryType;

    /// Containment test.
    fn test(&self, point: &[f64]) -> bool;

    /// Number of coordinates the region expects.
    fn dims(&self) -> usize {
        2
    }

    /// Smallest enclosing interval, or `None` if the region is unbounded.
    fn bounds(&self) -> Option<Interval>;
}

/// Planar part shared by every primitive kind.
pub trait Primitive {
    /// Containment of `[x, y]` given the shape's boundary behavior.
    fn contains(&self, point: [f64; 2], boundary: BoundaryType) -> bool;

    /// `(min, max)` corners of the bounding box.
    fn bounding_box(&self) -> ([f64; 2], [f64; 2]);

    /// Moves the shape by `(dx, dy)`.
    fn translate(&mut self, dx: f64, dy: f64);
}
