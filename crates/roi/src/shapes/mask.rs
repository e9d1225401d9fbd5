use serde::{Deserialize, Serialize};

use crate::{raster::BitGrid, traits::Primitive, types::BoundaryType};

/// Pixel mask placed at `origin`. The origin is kept as given and only
/// snapped to the pixel lattice when testing containment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterMask {
    pub origin: [f64; 2],
    pub grid: BitGrid,
}

impl RasterMask {
    pub fn new(origin: [f64; 2], grid: BitGrid) -> Self {
        Self { origin, grid }
    }

    pub fn set_origin(&mut self, origin: [f64; 2]) {
        self.origin = origin;
    }

    pub fn grid_mut(&mut self) -> &mut BitGrid {
        &mut self.grid
    }
}

impl Primitive for RasterMask {
    /// Query and origin are both rounded to the nearest integer.
    fn contains(&self, [x, y]: [f64; 2], _boundary: BoundaryType) -> bool {
        let dx = x.round() - self.origin[0].round();
        let dy = y.round() - self.origin[1].round();
        // NaN fails both comparisons.
        let inside = |d: f64, extent: u32| d >= 0.0 && d < f64::from(extent);
        if !inside(dx, self.grid.width()) || !inside(dy, self.grid.height()) {
            return false;
        }
        self.grid.get(dx as u32, dy as u32)
    }

    fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        let [x, y] = self.origin;
        (
            [x, y],
            [x + f64::from(self.grid.width()) - 1.0, y + f64::from(self.grid.height()) - 1.0],
        )
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.origin[0] += dx;
        self.origin[1] += dy;
    }
}
