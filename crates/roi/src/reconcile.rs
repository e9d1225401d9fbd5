//! Carrying remote identity across a re-upload.
//!
//! Authored shapes assemble into records without identity. When the region came
//! from an existing collection, the ids of that collection are re-attached
//! here so the remote store updates shapes instead of duplicating them.
//!
//! Pairing is best-effort: exact geometric matches first, then the remaining
//! shapes in list order. The second pass only pairs shapes of the same kind,
//! which is narrower than plain list order: a record never changes kind
//! under an existing id. Shapes left over stay new.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    assemble::assemble,
    config::RasterOptions,
    error::Result,
    region::Region,
    wire::RegionCollection,
};

/// How each assembled shape obtained its identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub exact: usize,
    pub by_order: usize,
    pub new: usize,
}

/// Re-attaches identities from `previous` onto `assembled`.
pub fn reconcile(assembled: &mut RegionCollection, previous: &RegionCollection) -> Reconciliation {
    assembled.id = previous.id;
    if assembled.name.is_none() {
        assembled.name = previous.name.clone();
    }
    if assembled.description.is_none() {
        assembled.description = previous.description.clone();
    }
    for shape in &mut assembled.shapes {
        shape.id = None;
    }

    let mut taken = vec![false; previous.len()];
    let mut report = Reconciliation::default();

    for shape in &mut assembled.shapes {
        let found = previous
            .iter()
            .enumerate()
            .find(|(j, old)| !taken[*j] && old.id.is_some() && old.geometry_eq(shape));
        if let Some((j, old)) = found {
            taken[j] = true;
            shape.id = old.id;
            report.exact += 1;
        }
    }

    for shape in assembled.shapes.iter_mut().filter(|s| s.id.is_none()) {
        let found = previous
            .iter()
            .enumerate()
            .find(|(j, old)| !taken[*j] && old.id.is_some() && old.kind() == shape.kind());
        match found {
            Some((j, old)) => {
                taken[j] = true;
                shape.id = old.id;
                report.by_order += 1;
            }
            None => report.new += 1,
        }
    }

    debug!(exact = report.exact, by_order = report.by_order, new = report.new, "reconciled identities");
    report
}

/// Assembles `region` and, when it replaces `previous`, reconciles
/// identities against it. Without `previous` every shape is new.
pub fn upload(
    region: &Region,
    previous: Option<&RegionCollection>,
    options: &RasterOptions,
) -> Result<(RegionCollection, Reconciliation)> {
    let mut collection = assemble(region, options)?;
    let report = match previous {
        Some(previous) => reconcile(&mut collection, previous),
        None => {
            // A fresh collection; nothing on the remote side to update.
            for shape in &mut collection.shapes {
                shape.id = None;
            }
            Reconciliation { new: collection.len(), ..Reconciliation::default() }
        }
    };
    Ok((collection, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        regroup::regroup,
        types::{Axis, PlaneCoord},
        wire::{RoiId, ShapeId, WireGeometry, WireShape},
    };

    fn stored() -> RegionCollection {
        let mut a = WireShape::new(WireGeometry::Rectangle { x: 0.0, y: 0.0, width: 4.0, height: 4.0 });
        a.id = Some(ShapeId(100));
        let mut b = WireShape::new(WireGeometry::Ellipse { x: 10.0, y: 10.0, radius_x: 2.0, radius_y: 2.0 });
        b.id = Some(ShapeId(101));
        RegionCollection {
            id: Some(RoiId(7)),
            name: Some("cells".to_string()),
            description: None,
            shapes: vec![a, b],
        }
    }

    #[test]
    fn test_unmodified_round_trip_keeps_ids() {
        let options = RasterOptions::default();
        let previous = stored();
        let region = regroup(&previous, &options).to_region().unwrap();

        let (collection, report) = upload(&region, Some(&previous), &options).unwrap();
        assert_eq!(collection.id, Some(RoiId(7)));
        assert_eq!(collection.name.as_deref(), Some("cells"));
        let ids: Vec<_> = collection.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![Some(ShapeId(100)), Some(ShapeId(101))]);
        assert_eq!(report, Reconciliation { exact: 2, by_order: 0, new: 0 });
    }

    #[test]
    fn test_moved_shape_pairs_by_order() {
        let options = RasterOptions::default();
        let previous = stored();
        let mut decoded = regroup(&previous, &options);
        decoded.shape_mut(1).unwrap().translate(5.0, 0.0);
        let region = decoded.to_region().unwrap();

        let (collection, report) = upload(&region, Some(&previous), &options).unwrap();
        assert_eq!(collection.shapes[1].id, Some(ShapeId(101)));
        assert!(matches!(collection.shapes[1].geometry, WireGeometry::Ellipse { x, .. } if x == 15.0));
        assert_eq!(report, Reconciliation { exact: 1, by_order: 1, new: 0 });
    }

    #[test]
    fn test_extra_shapes_stay_new() {
        let previous = stored();
        let mut assembled = previous.clone();
        assembled.id = None;
        let mut extra = WireShape::new(WireGeometry::Point { x: 1.0, y: 1.0 });
        extra.plane = PlaneCoord::ALL.with(Axis::Z, 2);
        assembled.push(extra);

        let report = reconcile(&mut assembled, &previous);
        assert_eq!(report, Reconciliation { exact: 2, by_order: 0, new: 1 });
        assert_eq!(assembled.shapes[2].id, None);
    }

    #[test]
    fn test_leftovers_pair_only_within_kind() {
        let previous = stored();
        let assembled_shapes = vec![
            WireShape::new(WireGeometry::Point { x: 10.0, y: 10.0 }),
            WireShape::new(WireGeometry::Rectangle { x: 1.0, y: 0.0, width: 4.0, height: 4.0 }),
        ];
        let mut assembled = RegionCollection { shapes: assembled_shapes, ..RegionCollection::new() };

        let report = reconcile(&mut assembled, &previous);
        // The point sits first in list order but never takes the ellipse's id.
        assert_eq!(assembled.shapes[0].id, None);
        assert_eq!(assembled.shapes[1].id, Some(ShapeId(100)));
        assert_eq!(report, Reconciliation { exact: 0, by_order: 1, new: 1 });
    }

    #[test]
    fn test_fresh_upload_has_no_identity() {
        let options = RasterOptions::default();
        let region = regroup(&stored(), &options).to_region().unwrap();
        let (collection, report) = upload(&region, None, &options).unwrap();
        assert_eq!(collection.id, None);
        assert!(collection.iter().all(|s| s.id.is_none()));
        assert_eq!(report.new, 2);
    }
}
