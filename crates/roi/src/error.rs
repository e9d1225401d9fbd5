use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoiError {
    #[error("Invalid dimensionality: expected {expected}, found {found}")]
    InvalidDimension { expected: usize, found: usize },

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("No converter registered from {from} to {to}")]
    ConversionNotFound { from: &'static str, to: &'static str },

    #[error("Malformed wire shape: {0}")]
    MalformedWireShape(String),

    #[error("Raster of {width}x{height} exceeds the addressable packed size")]
    SizeOverflow { width: u64, height: u64 },

    #[error("Affine transform is not invertible")]
    SingularTransform,

    #[error("Invalid plane coordinate (z, t, c): ({z}, {t}, {c})")]
    InvalidPlaneCoordinate { z: i32, t: i32, c: i32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RoiError>;
