//! LSB sampling of pixel luminance.
//!
//! Converts a decoded pixel grid into a bitstream: one bit per pixel,
//! the parity of the pixel's averaged grayscale value.

mod bitstream;

pub use bitstream::{Bitstream, BitstreamError};

use crate::source::PixelGrid;

/// Samples the luminance parity of every pixel.
///
/// Grayscale is the floored mean `(R + G + B) / 3`; the emitted bit is
/// that value mod 2. Traversal is row-major, top row first, so the same
/// grid always yields the same bitstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct LsbSampler;

impl LsbSampler {
    /// Creates a sampler.
    pub fn new() -> Self {
        Self
    }

    /// Samples one bit per pixel.
    ///
    /// A zero-area grid yields an empty bitstream; deciding that this is
    /// fatal is left to the caller.
    pub fn sample(&self, grid: &PixelGrid) -> Bitstream {
        let mut bits = Bitstream::with_capacity(grid.pixel_count());
        for px in grid.pixels() {
            bits.push(grayscale(px) % 2);
        }

        tracing::trace!(
            width = grid.width(),
            height = grid.height(),
            bits = bits.len(),
            "Sampled luminance parity"
        );

        bits
    }
}

/// Floored mean of the three channels.
#[inline]
fn grayscale([r, g, b]: [u8; 3]) -> u8 {
    // max sum is 765, so the quotient always fits in a byte
    ((u16::from(r) + u16::from(g) + u16::from(b)) / 3) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_floors() {
        assert_eq!(grayscale([0, 0, 0]), 0);
        assert_eq!(grayscale([1, 1, 2]), 1); // 4/3 = 1.33
        assert_eq!(grayscale([2, 2, 1]), 1); // 5/3 = 1.67, not rounded up
        assert_eq!(grayscale([255, 255, 255]), 255);
    }

    #[test]
    fn test_sample_parity_row_major() {
        // gray values: 1, 2 / 3, 4
        let pixels = [[1, 1, 1], [2, 2, 2], [3, 3, 3], [4, 4, 4]];
        let grid = PixelGrid::from_pixels(&pixels, 2, 2).unwrap();

        let bits = LsbSampler::new().sample(&grid);
        assert_eq!(bits.to_string(), "1010");
    }

    #[test]
    fn test_sample_length_matches_area() {
        let grid = PixelGrid::new(vec![7u8; 5 * 3 * 3], 5, 3).unwrap();
        let bits = LsbSampler::new().sample(&grid);

        assert_eq!(bits.len(), 15);
        // gray 7 is odd everywhere
        assert_eq!(bits.ones(), 15);
    }

    #[test]
    fn test_sample_uses_mean_not_single_channel() {
        // (10 + 20 + 31) / 3 = 20 -> even, although blue is odd
        let grid = PixelGrid::from_pixels(&[[10, 20, 31]], 1, 1).unwrap();
        assert_eq!(LsbSampler::new().sample(&grid).to_string(), "0");
    }

    #[test]
    fn test_empty_grid_yields_empty_bitstream() {
        let bits = LsbSampler::new().sample(&PixelGrid::empty());
        assert!(bits.is_empty());
    }
}
