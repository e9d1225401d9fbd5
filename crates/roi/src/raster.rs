//! Boolean grids in their bit-packed wire form.
//!
//! Bits are packed MSB-first, eight per byte, row-major (all columns of row 0,
//! then row 1, ...). A trailing partial byte is zero-padded in its low bits.

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::{
    config::RasterOptions,
    error::{Result, RoiError},
    traits::RealMask,
    types::Interval,
};

/// Rectangular grid of booleans, `width` × `height`, both at least 1.
///
/// Cells are held in the packed wire layout, so a grid occupies exactly the
/// bytes [`packed_len`] reports for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitGrid {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

fn check_extent(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RoiError::MalformedWireShape(format!(
            "raster grid must be at least 1x1, got {width}x{height}"
        )));
    }
    Ok(())
}

impl BitGrid {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_options(width, height, &RasterOptions::default())
    }

    /// A cleared grid, refused with SizeOverflow when its packed size exceeds
    /// `options`.
    pub fn with_options(width: u32, height: u32, options: &RasterOptions) -> Result<Self> {
        check_extent(width, height)?;
        let len = packed_len(width.into(), height.into(), options)?;
        Ok(Self { width, height, bits: vec![0; len] })
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Result<Self> {
        let mut grid = Self::new(width, height)?;
        grid.fill_with(&mut f);
        Ok(grid)
    }

    fn fill_with(&mut self, f: &mut impl FnMut(u32, u32) -> bool) {
        for y in 0..self.height {
            for x in 0..self.width {
                let value = f(x, y);
                self.set(x, y, value);
            }
        }
    }

    /// Nonzero pixels are set.
    pub fn from_gray_image(image: &GrayImage) -> Result<Self> {
        Self::from_fn(image.width(), image.height(), |x, y| image.get_pixel(x, y)[0] > 0)
    }

    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.get(x, y) { 255u8 } else { 0u8 }])
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed MSB-first bytes, padding bits clear.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Panics if `(x, y)` is outside the grid.
    pub fn get(&self, x: u32, y: u32) -> bool {
        let i = self.index(x, y);
        self.bits[i / 8] & (0x80 >> (i % 8)) != 0
    }

    /// Panics if `(x, y)` is outside the grid.
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        let i = self.index(x, y);
        let mask = 0x80 >> (i % 8);
        if value {
            self.bits[i / 8] |= mask;
        } else {
            self.bits[i / 8] &= !mask;
        }
    }

    pub fn count_set(&self) -> usize {
        self.bits.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height, "({x}, {y}) outside {}x{} grid", self.width, self.height);
        y as usize * self.width as usize + x as usize
    }
}

/// Number of bytes needed to pack a `width` × `height` grid.
pub fn packed_len(width: u64, height: u64, options: &RasterOptions) -> Result<usize> {
    let overflow = || RoiError::SizeOverflow { width, height };
    let bits = width.checked_mul(height).ok_or_else(overflow)?;
    let bytes = bits.div_ceil(8);
    if bytes > options.max_packed_bytes {
        return Err(overflow());
    }
    usize::try_from(bytes).map_err(|_| overflow())
}

pub fn encode(grid: &BitGrid, options: &RasterOptions) -> Result<Vec<u8>> {
    packed_len(grid.width.into(), grid.height.into(), options)?;
    Ok(grid.bits.clone())
}

pub fn decode(bytes: &[u8], width: u32, height: u32, options: &RasterOptions) -> Result<BitGrid> {
    check_extent(width, height)?;
    let needed = packed_len(width.into(), height.into(), options)?;
    if bytes.len() < needed {
        return Err(RoiError::MalformedWireShape(format!(
            "{width}x{height} raster needs {needed} bytes, buffer has {}",
            bytes.len()
        )));
    }
    let mut bits = bytes[..needed].to_vec();
    let used = (width as usize * height as usize) % 8;
    if used != 0 {
        if let Some(last) = bits.last_mut() {
            *last &= 0xff << (8 - used);
        }
    }
    Ok(BitGrid { width, height, bits })
}

/// Reads the bit for `(x, y)` directly from a packed buffer. Out-of-range
/// indices read as unset.
pub fn bit(bytes: &[u8], x: u32, y: u32, width: u32) -> bool {
    let i = y as usize * width as usize + x as usize;
    bytes.get(i / 8).is_some_and(|byte| (byte >> (7 - i % 8)) & 1 == 1)
}

/// Samples `region` on the integer lattice covering `bounds`.
///
/// Each axis gets `ceil(max) - floor(min)` samples (at least one), starting at
/// `floor(min)`. For a closed `[0, 10]` interval that is the ten samples
/// `0..=9`: the far edge is not sampled. Returns the grid origin and grid.
pub fn rasterize(
    region: &(impl RealMask + ?Sized),
    bounds: &Interval,
    options: &RasterOptions,
) -> Result<([f64; 2], BitGrid)> {
    if bounds.dims() < 2 || !bounds.is_finite() {
        return Err(RoiError::UnsupportedOperator(
            "cannot rasterize a region without finite bounds".to_string(),
        ));
    }
    let (min, max) = bounds.planar_part();
    let x0 = min[0].floor();
    let y0 = min[1].floor();
    let extent = |lo: f64, hi: f64| ((hi.ceil() - lo).max(1.0)) as u64;
    let (width, height) = (extent(x0, max[0]), extent(y0, max[1]));

    // Checked before the grid is allocated or sampled.
    packed_len(width, height, options)?;
    let too_big = || RoiError::SizeOverflow { width, height };
    let width = u32::try_from(width).map_err(|_| too_big())?;
    let height = u32::try_from(height).map_err(|_| too_big())?;

    let mut grid = BitGrid::with_options(width, height, options)?;
    let mut point = vec![0.0; region.dims().max(2)];
    grid.fill_with(&mut |x, y| {
        point[0] = x0 + f64::from(x);
        point[1] = y0 + f64::from(y);
        region.test(&point)
    });
    Ok(([x0, y0], grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Small deterministic generator so grids vary between runs of the loop.
    fn lcg(state: &mut u64) -> u64 {
        *state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        *state >> 33
    }

    #[test]
    fn test_packs_msb_first_row_major() {
        let grid = BitGrid::from_fn(3, 3, |x, y| x == y).unwrap();
        let bytes = encode(&grid, &RasterOptions::default()).unwrap();
        // 100 010 001 -> 1000 1000 | 1(000 0000)
        assert_eq!(bytes, vec![0b1000_1000, 0b1000_0000]);
        assert!(bit(&bytes, 2, 2, 3));
        assert!(!bit(&bytes, 1, 0, 3));
        assert!(!bit(&bytes, 0, 9, 3));
    }

    #[test]
    fn test_round_trip_random_grids() {
        let options = RasterOptions::default();
        let mut state = 42;
        for width in 1..=13 {
            for height in 1..=7 {
                let grid = BitGrid::from_fn(width, height, |_, _| lcg(&mut state) % 2 == 0).unwrap();
                let bytes = encode(&grid, &options).unwrap();
                assert_eq!(bytes.len(), (width as usize * height as usize).div_ceil(8));
                assert_eq!(decode(&bytes, width, height, &options).unwrap(), grid);
            }
        }
    }

    #[test]
    fn test_padding_bits_are_zero() {
        let grid = BitGrid::from_fn(5, 1, |_, _| true).unwrap();
        let bytes = encode(&grid, &RasterOptions::default()).unwrap();
        assert_eq!(bytes, vec![0b1111_1000]);
    }

    #[test]
    fn test_decode_clears_padding_bits() {
        let options = RasterOptions::default();
        let grid = decode(&[0xff, 0xff], 5, 1, &options).unwrap();
        assert_eq!(grid, BitGrid::from_fn(5, 1, |_, _| true).unwrap());
        assert_eq!(grid.as_bytes(), &[0b1111_1000]);
        assert_eq!(grid.count_set(), 5);
    }

    #[test]
    fn test_grid_allocation_respects_limit() {
        let options = RasterOptions { max_packed_bytes: 2 };
        assert!(BitGrid::with_options(4, 4, &options).is_ok());
        assert!(matches!(
            BitGrid::with_options(4, 5, &options),
            Err(RoiError::SizeOverflow { width: 4, height: 5 })
        ));
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert!(BitGrid::new(0, 4).is_err());
    }

    #[test]
    fn test_short_buffer_rejected() {
        let result = decode(&[0xff], 4, 4, &RasterOptions::default());
        assert!(matches!(result, Err(RoiError::MalformedWireShape(_))));
    }

    #[test]
    fn test_size_overflow_before_allocation() {
        let options = RasterOptions { max_packed_bytes: 16 };
        assert!(packed_len(16, 8, &options).is_ok());
        assert!(matches!(
            packed_len(16, 9, &options),
            Err(RoiError::SizeOverflow { width: 16, height: 9 })
        ));
        assert!(matches!(
            packed_len(u64::MAX, 2, &RasterOptions::default()),
            Err(RoiError::SizeOverflow { .. })
        ));
    }

    #[test]
    fn test_gray_image_round_trip() {
        let grid = BitGrid::from_fn(4, 2, |x, _| x % 2 == 1).unwrap();
        assert_eq!(BitGrid::from_gray_image(&grid.to_gray_image()).unwrap(), grid);
    }
}
