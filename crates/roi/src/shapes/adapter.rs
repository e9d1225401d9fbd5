use crate::{
    affine::Affine2,
    boundary,
    config::RasterOptions,
    convert,
    error::Result,
    traits::{Primitive, RealMask},
    types::{BoundaryType, Interval, PlaneCoord},
    wire::{ShapeId, ShapeKind, WireShape},
};

use super::{GeometricShape, Geometry};

/// A shape decoded from a wire record, editable locally.
///
/// Edits change only the local value. [`ShapeAdapter::commit`] writes them
/// back to the record; until then [`ShapeAdapter::record`] still shows what
/// was decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeAdapter {
    shape: GeometricShape,
    plane: PlaneCoord,
    record: WireShape,
    dirty: bool,
}

impl ShapeAdapter {
    pub fn from_record(record: WireShape, options: &RasterOptions) -> Result<Self> {
        let shape = convert::shape_from_wire(&record, options)?;
        Ok(Self { shape, plane: record.plane, record, dirty: false })
    }

    pub fn id(&self) -> Option<ShapeId> {
        self.record.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn shape(&self) -> &GeometricShape {
        &self.shape
    }

    /// The backing record as of the last commit.
    pub fn record(&self) -> &WireShape {
        &self.record
    }

    pub fn plane(&self) -> PlaneCoord {
        self.plane
    }

    pub fn set_plane(&mut self, plane: PlaneCoord) -> Result<()> {
        plane.validate()?;
        self.plane = plane;
        self.dirty = true;
        Ok(())
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        self.dirty = true;
        &mut self.shape.geometry
    }

    pub fn set_boundary_type(&mut self, boundary: BoundaryType) {
        self.shape.boundary = boundary;
        self.dirty = true;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.shape.text = text.into();
        self.dirty = true;
    }

    pub fn set_transform(&mut self, to_source: Option<Affine2>) {
        self.shape.transform = to_source;
        self.dirty = true;
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.geometry_mut().translate(dx, dy);
    }

    pub fn bounds_min(&self, d: usize) -> f64 {
        self.shape.bounds_min(d)
    }

    pub fn bounds_max(&self, d: usize) -> f64 {
        self.shape.bounds_max(d)
    }

    /// Whether local edits have not been committed yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The record as it would look after a commit. Identity and any foreign
    /// annotations are kept.
    pub fn to_record(&self, options: &RasterOptions) -> Result<WireShape> {
        let mut record = self.record.clone();
        record.geometry = convert::geometry_to_wire(&self.shape.geometry, options)?;
        record.transform = convert::transform_to_wire(self.shape.transform.as_ref())?;
        record.plane = self.plane;
        boundary::encode(&mut record, self.shape.boundary, &self.shape.text);
        Ok(record)
    }

    /// Writes local edits to the backing record. On error the record is left
    /// untouched and the edits stay pending.
    pub fn commit(&mut self, options: &RasterOptions) -> Result<&WireShape> {
        self.record = self.to_record(options)?;
        self.dirty = false;
        Ok(&self.record)
    }

    pub fn into_record(self, options: &RasterOptions) -> Result<WireShape> {
        self.to_record(options)
    }
}

impl RealMask for ShapeAdapter {
    fn boundary_type(&self) -> BoundaryType {
        self.shape.boundary
    }

    fn test(&self, point: &[f64]) -> bool {
        self.shape.test(point)
    }

    fn bounds(&self) -> Option<Interval> {
        self.shape.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        shapes::Rectangle,
        wire::{TagAnnotation, WireGeometry},
    };

    fn backed_rectangle() -> ShapeAdapter {
        let mut record = WireShape::new(WireGeometry::Rectangle { x: 0.0, y: 0.0, width: 10.0, height: 5.0 });
        record.id = Some(ShapeId(17));
        record.text = "cell ij-bt:[O]".to_string();
        record.annotations.push(TagAnnotation { name: "owner".into(), value: "lab".into() });
        ShapeAdapter::from_record(record, &RasterOptions::default()).unwrap()
    }

    #[test]
    fn test_decodes_boundary_and_text() {
        let adapter = backed_rectangle();
        assert_eq!(adapter.boundary_type(), BoundaryType::Open);
        assert_eq!(adapter.shape().text, "cell");
        assert_eq!(adapter.id(), Some(ShapeId(17)));
        assert!(!adapter.is_dirty());
    }

    #[test]
    fn test_edits_apply_on_commit() {
        let options = RasterOptions::default();
        let mut adapter = backed_rectangle();
        adapter.translate(5.0, 0.0);
        assert!(adapter.is_dirty());
        assert!(matches!(adapter.record().geometry, WireGeometry::Rectangle { x, .. } if x == 0.0));

        let record = adapter.commit(&options).unwrap();
        assert!(matches!(record.geometry, WireGeometry::Rectangle { x, .. } if x == 5.0));
        assert_eq!(record.id, Some(ShapeId(17)));
        assert_eq!(record.text, "cell ij-bt:[O]");
        assert!(record.annotation("owner").is_some());
        assert!(!adapter.is_dirty());
    }

    #[test]
    fn test_sub_pixel_mask_move_survives_commit() {
        let options = RasterOptions::default();
        let record = WireShape::new(WireGeometry::Mask { x: 3.0, y: 1.0, width: 1.0, height: 1.0, bytes: vec![0x80] });
        let mut adapter = ShapeAdapter::from_record(record, &options).unwrap();
        adapter.translate(0.4, 0.0);

        let record = adapter.commit(&options).unwrap();
        assert!(matches!(record.geometry, WireGeometry::Mask { x, y, .. } if (x - 3.4).abs() < 1e-12 && y == 1.0));
        // Still snaps to pixel 3.
        assert!(adapter.test(&[3.0, 1.0]));
    }

    #[test]
    fn test_failed_commit_leaves_record() {
        let options = RasterOptions::default();
        let mut adapter = backed_rectangle();
        *adapter.geometry_mut() = Geometry::Rectangle(Rectangle::new([0.0, 0.0], [f64::NAN, 1.0]));
        assert!(adapter.commit(&options).is_err());
        assert!(adapter.is_dirty());
        assert!(matches!(adapter.record().geometry, WireGeometry::Rectangle { width, .. } if width == 10.0));
    }

    #[test]
    fn test_set_plane_validates() {
        let mut adapter = backed_rectangle();
        assert!(adapter.set_plane(PlaneCoord { z: -3, t: 0, c: 0 }).is_err());
        adapter.set_plane(PlaneCoord { z: 2, t: -1, c: -1 }).unwrap();
        let record = adapter.into_record(&RasterOptions::default()).unwrap();
        assert_eq!(record.plane.z, 2);
    }
}
