//! # Region-of-Interest Interchange
//!
//! Converts between a local, boundary-aware region algebra and the flat,
//! per-plane shape records of a remote image store.
//!
//! ## Core Features
//!
//! - **Region algebra**: primitives combined with union, intersection,
//!   difference, xor, complement, affine transforms and projection to N-D
//! - **Assembly**: flattens a region into wire records, rasterizing operators
//!   the store cannot express
//! - **Regrouping**: decodes a collection back into an N-D region, one entry
//!   per plane
//! - **Reconciliation**: keeps remote identities stable across re-uploads
//! - **GeoJSON Support**: exports collections in image coordinates
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roi::{GeometricShape, Geometry, Rectangle, Region, assemble, regroup, RasterOptions};
//!
//! let options = RasterOptions::default();
//! let a = Region::from(GeometricShape::closed(Geometry::Rectangle(Rectangle::from_corner(0.0, 0.0, 10.0, 10.0))));
//! let b = Region::from(GeometricShape::closed(Geometry::Rectangle(Rectangle::from_corner(5.0, 5.0, 10.0, 10.0))));
//!
//! // Two rectangle records
//! let union = assemble(&a.clone().or(b.clone()), &options)?;
//! // One raster mask record
//! let intersection = assemble(&a.and(b), &options)?;
//!
//! let decoded = regroup(&union, &options);
//! union.save_json("cells.json")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod affine;
pub mod assemble;
pub mod boundary;
pub mod config;
pub mod convert;
pub mod error;
pub mod io;
pub mod params;
pub mod project;
pub mod raster;
pub mod reconcile;
pub mod region;
pub mod regroup;
pub mod shapes;
pub mod traits;
pub mod types;
pub mod wire;

pub use affine::{Affine2, WireAffine};
pub use assemble::assemble;
pub use config::{ConversionConfig, ExportOptions, RasterOptions};
pub use error::{Result, RoiError};
pub use project::{ProjectedRegion, project};
pub use raster::BitGrid;
pub use reconcile::{Reconciliation, reconcile, upload};
pub use region::Region;
pub use regroup::{DecodedRegion, SkippedShape, regroup};
pub use shapes::{
    Ellipse, GeometricShape, Geometry, Line, Point, Polygon, Polyline, RasterMask, Rectangle, ShapeAdapter,
};
pub use traits::*;
pub use types::{Axis, BoundaryType, Interval, PlaneCoord, WILDCARD};
pub use wire::{RegionCollection, RoiId, ShapeId, ShapeKind, TagAnnotation, WireGeometry, WireShape};

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Region {
        Region::from(GeometricShape::closed(Geometry::Rectangle(Rectangle::from_corner(x, y, w, h))))
    }

    #[test]
    fn test_encode_decode_preserves_containment() {
        let options = RasterOptions::default();
        let region = rect(0.0, 0.0, 10.0, 10.0)
            .or(rect(20.0, 0.0, 4.0, 4.0).transform(Affine2::translation(-3.0, -3.0)));
        let decoded = regroup(&assemble(&region, &options).unwrap(), &options);
        for p in [[1.0, 1.0], [10.0, 10.0], [24.0, 4.0], [22.0, 2.0], [15.0, 5.0]] {
            assert_eq!(decoded.test(&p), region.test(&p), "{p:?}");
        }
    }

    #[test]
    fn test_projected_union_round_trip() {
        let options = RasterOptions::default();
        let z0 = project(rect(0.0, 0.0, 2.0, 2.0), &[Axis::Z], &[0]).unwrap();
        let z1 = project(rect(5.0, 5.0, 2.0, 2.0), &[Axis::Z], &[1]).unwrap();
        let region = Region::from(z0).or(Region::from(z1));

        let collection = assemble(&region, &options).unwrap();
        let planes: Vec<_> = collection.iter().map(|s| s.plane.z).collect();
        assert_eq!(planes, vec![0, 1]);

        let decoded = regroup(&collection, &options);
        assert_eq!(decoded.dims(), 3);
        assert!(decoded.test(&[1.0, 1.0, 0.0]));
        assert!(!decoded.test(&[1.0, 1.0, 1.0]));
        assert!(decoded.test(&[6.0, 6.0, 1.0]));
    }
}
