//! Converters between local primitives and wire records.
//!
//! The registry is the match over [`Geometry`] and [`WireGeometry`]: every
//! local kind has exactly one wire kind and back. Text records have no local
//! counterpart.

use crate::{
    affine::{Affine2, WireAffine},
    boundary,
    config::RasterOptions,
    error::{Result, RoiError},
    raster::{self, BitGrid},
    region::Region,
    shapes::{Ellipse, GeometricShape, Geometry, Line, Point, Polygon, Polyline, RasterMask, Rectangle},
    traits::RealMask,
    wire::{ShapeKind, WireGeometry, WireShape},
};

const LOCAL_SHAPE: &str = "GeometricShape";
const WIRE_SHAPE: &str = "WireShape";

fn malformed(kind: ShapeKind, reason: impl std::fmt::Display) -> RoiError {
    RoiError::MalformedWireShape(format!("{kind}: {reason}"))
}

fn check_finite(kind: ShapeKind, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(malformed(kind, "non-finite coordinate"))
    }
}

fn check_extent(kind: ShapeKind, values: &[f64]) -> Result<()> {
    if values.iter().any(|v| *v < 0.0) {
        return Err(malformed(kind, "negative extent"));
    }
    Ok(())
}

fn flat(points: &[[f64; 2]]) -> Vec<f64> {
    points.iter().flatten().copied().collect()
}

/// Validates the kind-specific fields of a record.
pub fn validate_wire(geometry: &WireGeometry) -> Result<()> {
    let kind = geometry.kind();
    match geometry {
        WireGeometry::Point { x, y } | WireGeometry::Text { x, y } => check_finite(kind, &[*x, *y]),
        WireGeometry::Line { x1, y1, x2, y2 } => check_finite(kind, &[*x1, *y1, *x2, *y2]),
        WireGeometry::Rectangle { x, y, width, height } => {
            check_finite(kind, &[*x, *y, *width, *height])?;
            check_extent(kind, &[*width, *height])
        }
        WireGeometry::Ellipse { x, y, radius_x, radius_y } => {
            check_finite(kind, &[*x, *y, *radius_x, *radius_y])?;
            check_extent(kind, &[*radius_x, *radius_y])
        }
        WireGeometry::Polygon { points } => {
            if points.len() < 3 {
                return Err(malformed(kind, format!("needs 3 vertices, has {}", points.len())));
            }
            check_finite(kind, &flat(points))
        }
        WireGeometry::Polyline { points } => {
            if points.len() < 2 {
                return Err(malformed(kind, format!("needs 2 vertices, has {}", points.len())));
            }
            check_finite(kind, &flat(points))
        }
        WireGeometry::Mask { x, y, width, height, .. } => {
            // Placement may be fractional; containment rounds it.
            check_finite(kind, &[*x, *y, *width, *height])?;
            if width.fract() != 0.0 || height.fract() != 0.0 {
                return Err(malformed(kind, "raster extent must be integral"));
            }
            if *width < 1.0 || *height < 1.0 {
                return Err(malformed(kind, format!("raster must be at least 1x1, got {width}x{height}")));
            }
            Ok(())
        }
    }
}

pub fn geometry_to_wire(geometry: &Geometry, options: &RasterOptions) -> Result<WireGeometry> {
    let wire = match geometry {
        Geometry::Point(p) => WireGeometry::Point { x: p.position[0], y: p.position[1] },
        Geometry::Line(l) => WireGeometry::Line { x1: l.start[0], y1: l.start[1], x2: l.end[0], y2: l.end[1] },
        Geometry::Rectangle(r) => WireGeometry::Rectangle {
            x: r.min[0],
            y: r.min[1],
            width: r.side_length(0),
            height: r.side_length(1),
        },
        Geometry::Ellipse(e) => WireGeometry::Ellipse {
            x: e.center[0],
            y: e.center[1],
            radius_x: e.radii[0],
            radius_y: e.radii[1],
        },
        Geometry::Polygon(p) => WireGeometry::Polygon { points: p.vertices.clone() },
        Geometry::Polyline(p) => WireGeometry::Polyline { points: p.vertices.clone() },
        Geometry::Mask(m) => WireGeometry::Mask {
            x: m.origin[0],
            y: m.origin[1],
            width: f64::from(m.grid.width()),
            height: f64::from(m.grid.height()),
            bytes: raster::encode(&m.grid, options)?,
        },
    };
    validate_wire(&wire)?;
    Ok(wire)
}

pub fn geometry_from_wire(wire: &WireGeometry, options: &RasterOptions) -> Result<Geometry> {
    validate_wire(wire)?;
    let geometry = match wire {
        WireGeometry::Point { x, y } => Geometry::Point(Point::new(*x, *y)),
        WireGeometry::Line { x1, y1, x2, y2 } => Geometry::Line(Line::new([*x1, *y1], [*x2, *y2])),
        WireGeometry::Rectangle { x, y, width, height } => {
            Geometry::Rectangle(Rectangle::from_corner(*x, *y, *width, *height))
        }
        WireGeometry::Ellipse { x, y, radius_x, radius_y } => {
            Geometry::Ellipse(Ellipse::new([*x, *y], [*radius_x, *radius_y]))
        }
        WireGeometry::Polygon { points } => Geometry::Polygon(Polygon::new(points.clone())),
        WireGeometry::Polyline { points } => Geometry::Polyline(Polyline::new(points.clone())),
        WireGeometry::Mask { x, y, width, height, bytes } => {
            let too_big = || RoiError::SizeOverflow { width: *width as u64, height: *height as u64 };
            let w = u32::try_from(*width as u64).map_err(|_| too_big())?;
            let h = u32::try_from(*height as u64).map_err(|_| too_big())?;
            let grid: BitGrid = raster::decode(bytes, w, h, options)?;
            Geometry::Mask(RasterMask::new([*x, *y], grid))
        }
        WireGeometry::Text { .. } => {
            return Err(RoiError::ConversionNotFound { from: ShapeKind::Text.into(), to: LOCAL_SHAPE });
        }
    };
    Ok(geometry)
}

/// Converts a local "to source" transform into its wire form. Identity is
/// written as no transform.
pub fn transform_to_wire(to_source: Option<&Affine2>) -> Result<Option<WireAffine>> {
    match to_source {
        Some(t) if !t.is_identity() => Ok(Some(WireAffine::from_local(t)?)),
        _ => Ok(None),
    }
}

pub fn transform_from_wire(wire: Option<&WireAffine>) -> Result<Option<Affine2>> {
    match wire {
        None => Ok(None),
        Some(w) if !w.is_finite() => Err(RoiError::MalformedWireShape("non-finite transform".to_string())),
        Some(w) => Ok(Some(w.to_local()?)),
    }
}

/// A newly authored shape as a record without identity, on every plane.
pub fn shape_to_wire(shape: &GeometricShape, options: &RasterOptions) -> Result<WireShape> {
    let mut record = WireShape::new(geometry_to_wire(&shape.geometry, options)?);
    record.transform = transform_to_wire(shape.transform.as_ref())?;
    boundary::encode(&mut record, shape.boundary, &shape.text);
    Ok(record)
}

pub fn shape_from_wire(record: &WireShape, options: &RasterOptions) -> Result<GeometricShape> {
    if record.plane.validate().is_err() {
        return Err(malformed(record.kind(), format!("plane {:?} below wildcard", record.plane)));
    }
    Ok(GeometricShape {
        geometry: geometry_from_wire(&record.geometry, options)?,
        boundary: boundary::decode(record),
        transform: transform_from_wire(record.transform.as_ref())?,
        text: boundary::free_text(&record.text).to_string(),
    })
}

/// Converts a single 2-D primitive region. Composites and projections have
/// no single-record form.
pub fn region_to_wire(region: &Region, options: &RasterOptions) -> Result<WireShape> {
    match region {
        Region::Shape(shape) => shape_to_wire(shape, options),
        Region::Backed(adapter) => adapter.to_record(options),
        Region::Projected(projected) => Err(RoiError::InvalidDimension { expected: 2, found: projected.dims() }),
        other => Err(RoiError::ConversionNotFound { from: other.type_name(), to: WIRE_SHAPE }),
    }
}
