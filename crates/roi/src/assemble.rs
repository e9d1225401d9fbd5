//! Flattening a region expression into a wire collection.
//!
//! Unions and transforms unwrap into separate records; projections set the
//! plane of their members. Any other operator has no wire form and is
//! rasterized into a single mask record.

use tracing::debug;

use crate::{
    affine::Affine2,
    boundary,
    config::RasterOptions,
    convert,
    error::{Result, RoiError},
    raster,
    region::Region,
    traits::RealMask,
    types::{BoundaryType, PlaneCoord},
    wire::{RegionCollection, WireGeometry, WireShape},
};

/// Encodes `region` as a collection of records without collection identity.
pub fn assemble(region: &Region, options: &RasterOptions) -> Result<RegionCollection> {
    let mut collection = RegionCollection::new();
    visit(region, Affine2::IDENTITY, PlaneCoord::ALL, options, &mut collection.shapes)?;
    debug!(shapes = collection.len(), "assembled region");
    Ok(collection)
}

/// `acc` is the "to source" transform accumulated from enclosing transforms,
/// outermost first.
fn visit(
    region: &Region,
    acc: Affine2,
    plane: PlaneCoord,
    options: &RasterOptions,
    out: &mut Vec<WireShape>,
) -> Result<()> {
    match region {
        Region::Or(operands) => {
            for operand in operands {
                visit(operand, acc, plane, options, out)?;
            }
            Ok(())
        }
        Region::Transform { inner, to_source } => {
            if inner.dims() != 2 {
                return Err(RoiError::InvalidDimension { expected: 2, found: inner.dims() });
            }
            visit(inner, acc.then(to_source), plane, options, out)
        }
        Region::Projected(projected) => {
            if !acc.is_identity() {
                return Err(RoiError::InvalidDimension { expected: 2, found: projected.dims() });
            }
            let (source, projected_plane) = projected.unproject();
            visit(source, acc, plane.overlay(projected_plane), options, out)
        }
        Region::Shape(shape) => {
            let mut shape = shape.clone();
            shape.transform = compose(acc, shape.transform);
            let mut record = convert::shape_to_wire(&shape, options)?;
            record.plane = plane;
            out.push(record);
            Ok(())
        }
        Region::Backed(adapter) => {
            let mut record = adapter.to_record(options)?;
            if !acc.is_identity() {
                let to_source = compose(acc, adapter.shape().transform);
                record.transform = convert::transform_to_wire(to_source.as_ref())?;
            }
            record.plane = record.plane.overlay(plane);
            out.push(record);
            Ok(())
        }
        Region::And(..) | Region::Xor(..) | Region::Minus(..) | Region::Negate(_) => {
            out.push(rasterize_subtree(region, acc, plane, options)?);
            Ok(())
        }
    }
}

fn compose(acc: Affine2, own: Option<Affine2>) -> Option<Affine2> {
    match own {
        Some(own) => Some(acc.then(&own)),
        None if acc.is_identity() => None,
        None => Some(acc),
    }
}

fn rasterize_subtree(
    region: &Region,
    acc: Affine2,
    plane: PlaneCoord,
    options: &RasterOptions,
) -> Result<WireShape> {
    if region.dims() != 2 {
        return Err(RoiError::InvalidDimension { expected: 2, found: region.dims() });
    }
    let bounds = region.bounds().ok_or_else(|| {
        RoiError::UnsupportedOperator(format!("{} of an unbounded region", region.type_name()))
    })?;
    let (origin, grid) = raster::rasterize(region, &bounds, options)?;
    debug!(
        operator = region.type_name(),
        width = grid.width(),
        height = grid.height(),
        "rasterized operator without a wire form"
    );

    let mut record = WireShape::new(WireGeometry::Mask {
        x: origin[0],
        y: origin[1],
        width: f64::from(grid.width()),
        height: f64::from(grid.height()),
        bytes: raster::encode(&grid, options)?,
    });
    record.transform = convert::transform_to_wire(Some(&acc))?;
    record.plane = plane;
    boundary::encode(&mut record, BoundaryType::Unspecified, "");
    Ok(record)
}
