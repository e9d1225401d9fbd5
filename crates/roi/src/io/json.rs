use std::path::Path;

use crate::{error::Result, wire::RegionCollection};

impl RegionCollection {
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the collection as JSON
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Load a collection from a JSON file
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::RoiError,
        types::PlaneCoord,
        wire::{RegionCollection, RoiId, ShapeId, WireGeometry, WireShape},
    };

    #[test]
    fn test_json_file_round_trip() {
        let mut shape = WireShape::new(WireGeometry::Polyline { points: vec![[0.0, 0.0], [1.5, 2.5]] });
        shape.id = Some(ShapeId(5));
        shape.plane = PlaneCoord { z: 0, t: 3, c: -1 };
        let collection = RegionCollection {
            id: Some(RoiId(1)),
            name: Some("track".into()),
            description: None,
            shapes: vec![shape],
        };

        let path = std::env::temp_dir().join(format!("roi-json-{}.json", std::process::id()));
        collection.save_json(&path).unwrap();
        let loaded = RegionCollection::load_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, collection);
    }

    #[test]
    fn test_missing_fields_default() {
        let json = r#"{ "shapes": [ { "geometry": { "type": "point", "x": 1.0, "y": 2.0 } } ] }"#;
        let collection = RegionCollection::from_json_str(json).unwrap();
        assert_eq!(collection.id, None);
        assert_eq!(collection.shapes[0].plane, PlaneCoord::ALL);
        assert!(collection.shapes[0].text.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(RegionCollection::from_json_str("{"), Err(RoiError::Serialization(_))));
    }
}
