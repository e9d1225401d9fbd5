use geo::{AffineOps, Area};
use geo_types::{Coord, LineString, MultiPolygon};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use imageproc::contours::{BorderType, find_contours};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    boundary,
    config::ConversionConfig,
    error::{Result, RoiError},
    raster,
    shapes::Ellipse,
    types::BoundaryType,
    wire::{RegionCollection, ShapeKind, WireGeometry, WireShape},
};

/// Properties attached to each exported feature
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[schemars(description = "Properties of an exported region shape")]
pub struct ShapeFeatureProperties {
    #[schemars(description = "Position of the shape within its collection")]
    pub index: usize,
    #[schemars(description = "Remote shape id, if persisted")]
    pub shape_id: Option<i64>,
    pub kind: ShapeKind,
    pub boundary: BoundaryType,
    #[schemars(description = "Free text without the boundary token")]
    pub text: String,
    #[schemars(description = "Plane indices, -1 for every plane")]
    pub z: i32,
    pub t: i32,
    pub c: i32,
    #[schemars(description = "Area in square pixels after placement")]
    pub area: f64,
}

fn ring(points: &[[f64; 2]]) -> LineString<f64> {
    LineString::new(points.iter().map(|&[x, y]| Coord { x, y }).collect())
}

fn polygon(points: &[[f64; 2]]) -> geo_types::Geometry<f64> {
    geo_types::Polygon::new(ring(points), vec![]).into()
}

/// Outlines of the set pixels of a mask, holes attached to their parents.
fn mask_outline(x: f64, y: f64, grid: &raster::BitGrid) -> MultiPolygon<f64> {
    let contours = find_contours::<i32>(&grid.to_gray_image());
    let to_ring = |points: &[imageproc::point::Point<i32>]| {
        LineString::new(points.iter().map(|p| Coord { x: x + f64::from(p.x), y: y + f64::from(p.y) }).collect())
    };

    let mut polygons = Vec::new();
    let mut slot = vec![None; contours.len()];
    for (i, contour) in contours.iter().enumerate() {
        if contour.border_type == BorderType::Outer {
            slot[i] = Some(polygons.len());
            polygons.push((to_ring(&contour.points), Vec::new()));
        }
    }
    for contour in contours.iter().filter(|c| c.border_type == BorderType::Hole) {
        if let Some(owner) = contour.parent.and_then(|p| slot[p]) {
            polygons[owner].1.push(to_ring(&contour.points));
        }
    }
    MultiPolygon::new(polygons.into_iter().map(|(outer, holes)| geo_types::Polygon::new(outer, holes)).collect())
}

fn shape_geometry(shape: &WireShape, config: &ConversionConfig) -> Result<geo_types::Geometry<f64>> {
    let geometry = match &shape.geometry {
        WireGeometry::Point { x, y } | WireGeometry::Text { x, y } => geo_types::Point::new(*x, *y).into(),
        WireGeometry::Line { x1, y1, x2, y2 } => ring(&[[*x1, *y1], [*x2, *y2]]).into(),
        WireGeometry::Rectangle { x, y, width, height } => {
            polygon(&[[*x, *y], [x + width, *y], [x + width, y + height], [*x, y + height]])
        }
        WireGeometry::Ellipse { x, y, radius_x, radius_y } => {
            polygon(&Ellipse::new([*x, *y], [*radius_x, *radius_y]).outline(config.export.ellipse_segments))
        }
        WireGeometry::Polygon { points } => polygon(points),
        WireGeometry::Polyline { points } => ring(points).into(),
        WireGeometry::Mask { x, y, width, height, bytes } => {
            let grid = raster::decode(bytes, *width as u32, *height as u32, &config.raster)?;
            mask_outline(*x, *y, &grid).into()
        }
    };
    // Wire transforms already map shape coordinates into the image.
    Ok(match &shape.transform {
        Some(t) => geometry.affine_transform(&t.as_matrix().to_geo()),
        None => geometry,
    })
}

impl RegionCollection {
    /// Export every shape as one GeoJSON feature, in image coordinates
    pub fn to_geojson(&self, config: &ConversionConfig) -> Result<FeatureCollection> {
        let mut features = Vec::with_capacity(self.len());
        for (index, shape) in self.iter().enumerate() {
            crate::convert::validate_wire(&shape.geometry)?;
            let geometry = shape_geometry(shape, config)?;
            let properties = ShapeFeatureProperties {
                index,
                shape_id: shape.id.map(|id| id.0),
                kind: shape.kind(),
                boundary: boundary::decode(shape),
                text: boundary::free_text(&shape.text).to_string(),
                z: shape.plane.z,
                t: shape.plane.t,
                c: shape.plane.c,
                area: geometry.unsigned_area(),
            };
            let properties = match serde_json::to_value(properties)? {
                serde_json::Value::Object(map) => map,
                other => {
                    return Err(RoiError::MalformedWireShape(format!("feature properties serialized as {other}")));
                }
            };
            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::from(&geometry))),
                id: shape.id.map(|id| geojson::feature::Id::Number(id.0.into())),
                properties: Some(properties),
                foreign_members: None,
            });
        }

        let mut foreign_members = serde_json::Map::new();
        if let Some(id) = self.id {
            foreign_members.insert("roi_id".to_string(), id.0.into());
        }
        if let Some(name) = &self.name {
            foreign_members.insert("name".to_string(), name.clone().into());
        }
        foreign_members.insert("shape_count".to_string(), self.len().into());

        Ok(FeatureCollection { bbox: None, features, foreign_members: Some(foreign_members) })
    }

    pub fn to_geojson_string(&self, config: &ConversionConfig) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson(config)?)?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson(&self, path: impl AsRef<std::path::Path>, config: &ConversionConfig) -> Result<()> {
        std::fs::write(path, self.to_geojson_string(config)?)?;
        Ok(())
    }
}
