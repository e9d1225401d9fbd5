//! 2-D affine transforms and the single point where the local and wire sign
//! conventions meet.
//!
//! Locally a transform is stored "to source": it maps a query point in the
//! target frame back into the shape's own frame, so a transformed region
//! contains `p` iff its inner region contains `to_source(p)`.
//!
//! On the wire a transform is stored "from source": it maps the shape's own
//! coordinates into image coordinates. [`WireAffine::from_local`] and
//! [`WireAffine::to_local`] are the only places that invert between the two.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoiError};

/// Row-major 2×3 affine matrix `[[a00, a01, a02], [a10, a11, a12]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Affine2 {
    pub a00: f64,
    pub a01: f64,
    pub a02: f64,
    pub a10: f64,
    pub a11: f64,
    pub a12: f64,
}

impl Affine2 {
    pub const IDENTITY: Affine2 = Affine2::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0);

    pub const fn new(a00: f64, a01: f64, a02: f64, a10: f64, a11: f64, a12: f64) -> Self {
        Self { a00, a01, a02, a10, a11, a12 }
    }

    pub const fn translation(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, dx, 0.0, 1.0, dy)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, -sin, 0.0, sin, cos, 0.0)
    }

    pub fn apply(&self, [x, y]: [f64; 2]) -> [f64; 2] {
        [
            self.a00 * x + self.a01 * y + self.a02,
            self.a10 * x + self.a11 * y + self.a12,
        ]
    }

    /// The transform that applies `self` first and then `next`.
    pub fn then(&self, next: &Affine2) -> Affine2 {
        let (s, n) = (self, next);
        Affine2 {
            a00: n.a00 * s.a00 + n.a01 * s.a10,
            a01: n.a00 * s.a01 + n.a01 * s.a11,
            a02: n.a00 * s.a02 + n.a01 * s.a12 + n.a02,
            a10: n.a10 * s.a00 + n.a11 * s.a10,
            a11: n.a10 * s.a01 + n.a11 * s.a11,
            a12: n.a10 * s.a02 + n.a11 * s.a12 + n.a12,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.a00 * self.a11 - self.a01 * self.a10
    }

    pub fn inverse(&self) -> Result<Affine2> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(RoiError::SingularTransform);
        }
        let i00 = self.a11 / det;
        let i01 = -self.a01 / det;
        let i10 = -self.a10 / det;
        let i11 = self.a00 / det;
        Ok(Affine2 {
            a00: i00,
            a01: i01,
            a02: -(i00 * self.a02 + i01 * self.a12),
            a10: i10,
            a11: i11,
            a12: -(i10 * self.a02 + i11 * self.a12),
        })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Bounding box of the image of the box `[min, max]`.
    pub fn map_bounds(&self, min: [f64; 2], max: [f64; 2]) -> ([f64; 2], [f64; 2]) {
        let corners = [
            self.apply([min[0], min[1]]),
            self.apply([max[0], min[1]]),
            self.apply([min[0], max[1]]),
            self.apply([max[0], max[1]]),
        ];
        corners.iter().fold(
            ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]),
            |(lo, hi), c| ([lo[0].min(c[0]), lo[1].min(c[1])], [hi[0].max(c[0]), hi[1].max(c[1])]),
        )
    }

    pub fn to_geo(&self) -> geo::AffineTransform<f64> {
        geo::AffineTransform::new(self.a00, self.a01, self.a02, self.a10, self.a11, self.a12)
    }
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Affine transform as the remote store records it ("from source").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WireAffine {
    pub a00: f64,
    pub a01: f64,
    pub a02: f64,
    pub a10: f64,
    pub a11: f64,
    pub a12: f64,
}

impl WireAffine {
    /// Converts a local "to source" transform into the wire convention.
    pub fn from_local(to_source: &Affine2) -> Result<Self> {
        let from_source = to_source.inverse()?;
        Ok(Self::from_matrix(&from_source))
    }

    /// Converts back into the local "to source" convention.
    pub fn to_local(&self) -> Result<Affine2> {
        self.as_matrix().inverse()
    }

    /// The raw matrix, still in the wire ("from source") direction.
    pub fn as_matrix(&self) -> Affine2 {
        Affine2::new(self.a00, self.a01, self.a02, self.a10, self.a11, self.a12)
    }

    fn from_matrix(m: &Affine2) -> Self {
        Self { a00: m.a00, a01: m.a01, a02: m.a02, a10: m.a10, a11: m.a11, a12: m.a12 }
    }

    pub fn is_finite(&self) -> bool {
        [self.a00, self.a01, self.a02, self.a10, self.a11, self.a12]
            .iter()
            .all(|v| v.is_finite())
    }
}
