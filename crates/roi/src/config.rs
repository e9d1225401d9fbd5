use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings shared by every conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConversionConfig {
    pub raster: RasterOptions,
    pub export: ExportOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RasterOptions {
    /// Largest packed mask buffer accepted or produced, in bytes.
    #[schemars(range(min = 1))]
    pub max_packed_bytes: u64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { max_packed_bytes: i32::MAX as u64 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ExportOptions {
    /// Vertices used to approximate an ellipse outline.
    #[schemars(range(min = 8, max = 4096))]
    pub ellipse_segments: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { ellipse_segments: 64 }
    }
}
