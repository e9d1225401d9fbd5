pub mod geojson;
pub mod json;

pub use self::geojson::ShapeFeatureProperties;
