//! Decoding a wire collection back into an N-D region, grouped by plane.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    config::RasterOptions,
    error::Result,
    project::project,
    region::Region,
    shapes::ShapeAdapter,
    traits::RealMask,
    types::{Axis, BoundaryType, Interval, PlaneCoord, WILDCARD},
    wire::{RegionCollection, RoiId, WireShape},
};

/// A decoded collection. Shapes are owned here; planes refer to them by
/// index.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRegion {
    pub id: Option<RoiId>,
    pub name: Option<String>,
    pub description: Option<String>,
    shapes: Vec<ShapeAdapter>,
    planes: BTreeMap<PlaneCoord, Vec<usize>>,
    axes: Vec<Axis>,
    bounds: Option<Interval>,
    skipped: Vec<SkippedShape>,
}

/// A record that could not be decoded. It takes no part in containment and
/// is written back unchanged by [`DecodedRegion::commit`].
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedShape {
    /// Position in the source collection.
    pub index: usize,
    pub record: WireShape,
    pub reason: String,
}

/// Decodes every record of `collection`. A record that fails to decode is
/// set aside in [`DecodedRegion::skipped`] and the rest are kept.
pub fn regroup(collection: &RegionCollection, options: &RasterOptions) -> DecodedRegion {
    let mut shapes = Vec::with_capacity(collection.len());
    let mut planes: BTreeMap<PlaneCoord, Vec<usize>> = BTreeMap::new();
    let mut skipped = Vec::new();
    for (index, record) in collection.iter().enumerate() {
        match ShapeAdapter::from_record(record.clone(), options) {
            Ok(adapter) => {
                planes.entry(adapter.plane()).or_default().push(shapes.len());
                shapes.push(adapter);
            }
            Err(err) => {
                debug!(index, kind = %record.kind(), error = %err, "skipped undecodable record");
                skipped.push(SkippedShape { index, record: record.clone(), reason: err.to_string() });
            }
        }
    }

    let axes: Vec<Axis> = Axis::ALL
        .into_iter()
        .filter(|&axis| shapes.iter().any(|s| !s.plane().is_wildcard(axis)))
        .collect();
    let bounds = aggregate_bounds(&shapes, &axes);

    debug!(
        shapes = shapes.len(),
        skipped = skipped.len(),
        planes = planes.len(),
        dims = 2 + axes.len(),
        "regrouped collection"
    );
    DecodedRegion {
        id: collection.id,
        name: collection.name.clone(),
        description: collection.description.clone(),
        shapes,
        planes,
        axes,
        bounds,
        skipped,
    }
}

/// Componentwise min/max; wildcard plane components are skipped.
fn aggregate_bounds(shapes: &[ShapeAdapter], axes: &[Axis]) -> Option<Interval> {
    if shapes.is_empty() {
        return None;
    }
    let dims = 2 + axes.len();
    let mut total = Interval::empty(dims);
    for shape in shapes {
        let planar = shape.bounds()?;
        for d in 0..2 {
            total.min[d] = total.min[d].min(planar.min[d]);
            total.max[d] = total.max[d].max(planar.max[d]);
        }
        for (i, &axis) in axes.iter().enumerate() {
            let position = shape.plane().get(axis);
            if position != WILDCARD {
                total.min[2 + i] = total.min[2 + i].min(f64::from(position));
                total.max[2 + i] = total.max[2 + i].max(f64::from(position));
            }
        }
    }
    Some(total)
}

impl DecodedRegion {
    /// Non-planar axes present in the output, in z, t, c order.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn shapes(&self) -> &[ShapeAdapter] {
        &self.shapes
    }

    /// Records that failed to decode, in collection order.
    pub fn skipped(&self) -> &[SkippedShape] {
        &self.skipped
    }

    pub fn shape_mut(&mut self, index: usize) -> Option<&mut ShapeAdapter> {
        self.shapes.get_mut(index)
    }

    pub fn planes(&self) -> impl Iterator<Item = (&PlaneCoord, &[usize])> {
        self.planes.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Union of the shapes on exactly `plane`.
    pub fn plane_region(&self, plane: &PlaneCoord) -> Option<Region> {
        let members = self.planes.get(plane)?;
        Some(union(members.iter().map(|&i| Region::Backed(self.shapes[i].clone())).collect()))
    }

    /// The whole collection as one region of dimension `2 + axes().len()`.
    pub fn to_region(&self) -> Result<Region> {
        let mut parts = Vec::with_capacity(self.planes.len());
        for plane in self.planes.keys() {
            let Some(members) = self.plane_region(plane) else { continue };
            if self.axes.is_empty() {
                parts.push(members);
            } else {
                let positions: Vec<i32> = self.axes.iter().map(|&axis| plane.get(axis)).collect();
                parts.push(Region::Projected(project(members, &self.axes, &positions)?));
            }
        }
        Ok(union(parts))
    }

    /// Writes pending shape edits back to their records and returns the
    /// resulting collection. Skipped records keep their original position.
    pub fn commit(&mut self, options: &RasterOptions) -> Result<RegionCollection> {
        let total = self.shapes.len() + self.skipped.len();
        let mut collection = RegionCollection {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            shapes: Vec::with_capacity(total),
        };
        let mut skipped = self.skipped.iter().peekable();
        let mut shapes = self.shapes.iter_mut();
        for index in 0..total {
            match skipped.next_if(|s| s.index == index) {
                Some(s) => collection.push(s.record.clone()),
                None => {
                    if let Some(shape) = shapes.next() {
                        collection.push(shape.commit(options)?.clone());
                    }
                }
            }
        }
        // Planes may have moved.
        self.planes.clear();
        for (i, shape) in self.shapes.iter().enumerate() {
            self.planes.entry(shape.plane()).or_default().push(i);
        }
        Ok(collection)
    }

    /// Exact per-axis equality, or a wildcard on the plane.
    fn plane_matches(&self, plane: &PlaneCoord, position: &[f64]) -> bool {
        self.axes
            .iter()
            .zip(position)
            .all(|(&axis, &p)| plane.is_wildcard(axis) || f64::from(plane.get(axis)) == p)
    }
}

fn union(mut parts: Vec<Region>) -> Region {
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        Region::Or(parts)
    }
}

impl RealMask for DecodedRegion {
    fn boundary_type(&self) -> BoundaryType {
        self.shapes
            .iter()
            .map(|s| s.boundary_type())
            .reduce(BoundaryType::or)
            .unwrap_or(BoundaryType::Unspecified)
    }

    /// Plane coordinates compare exactly, as in [`DecodedRegion::to_region`].
    fn test(&self, point: &[f64]) -> bool {
        if point.len() < self.dims() {
            return false;
        }
        let position = &point[2..self.dims()];
        self.planes.iter().any(|(plane, members)| {
            self.plane_matches(plane, position) && members.iter().any(|&i| self.shapes[i].test(&point[..2]))
        })
    }

    fn dims(&self) -> usize {
        2 + self.axes.len()
    }

    fn bounds(&self) -> Option<Interval> {
        self.bounds.clone()
    }
}
