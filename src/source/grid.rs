//! Decoded pixel grid handed to the sampler.

use thiserror::Error;

/// Errors raised when building a [`PixelGrid`] from a raw buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Buffer length is not `width * height * 3`.
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGB")]
    LengthMismatch {
        /// Grid width in pixels.
        width: u32,
        /// Grid height in pixels.
        height: u32,
        /// Bytes required by the dimensions.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
}

/// A width × height grid of RGB byte triples.
///
/// Pixels are stored interleaved (`R G B R G B ...`) in row-major order,
/// top row first. The grid is read-only once built.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelGrid {
    /// Interleaved RGB8 data.
    rgb: Vec<u8>,
    /// Grid width in pixels.
    width: u32,
    /// Grid height in pixels.
    height: u32,
}

impl PixelGrid {
    /// Builds a grid from an interleaved RGB8 buffer.
    pub fn new(rgb: Vec<u8>, width: u32, height: u32) -> Result<Self, GridError> {
        let expected = (width as usize) * (height as usize) * 3;
        if rgb.len() != expected {
            return Err(GridError::LengthMismatch {
                width,
                height,
                expected,
                actual: rgb.len(),
            });
        }
        Ok(Self { rgb, width, height })
    }

    /// Builds a grid from a list of pixels in row-major order.
    pub fn from_pixels(pixels: &[[u8; 3]], width: u32, height: u32) -> Result<Self, GridError> {
        let rgb = pixels.iter().flatten().copied().collect();
        Self::new(rgb, width, height)
    }

    /// Returns the zero-area grid.
    pub fn empty() -> Self {
        Self {
            rgb: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    /// Returns the raw interleaved RGB data.
    #[inline]
    pub fn as_rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// Returns the grid width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the grid height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns true for a zero-area grid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Returns the pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 3;
        Some([self.rgb[idx], self.rgb[idx + 1], self.rgb[idx + 2]])
    }

    /// Iterates pixels row by row, left to right.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.rgb.chunks_exact(3).map(|px| [px[0], px[1], px[2]])
    }
}

impl std::fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelGrid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rgb_bytes", &self.rgb.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = PixelGrid::new(vec![0u8; 4 * 3 * 3], 4, 3).unwrap();

        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.pixel_count(), 12);
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_grid_invalid_size() {
        let err = PixelGrid::new(vec![0u8; 100], 640, 480).unwrap_err();

        assert!(matches!(
            err,
            GridError::LengthMismatch {
                expected: 921_600,
                actual: 100,
                ..
            }
        ));
    }

    #[test]
    fn test_pixel_lookup_row_major() {
        let pixels = [[1, 2, 3], [4, 5, 6], [7, 8, 9], [10, 11, 12]];
        let grid = PixelGrid::from_pixels(&pixels, 2, 2).unwrap();

        assert_eq!(grid.pixel(1, 0), Some([4, 5, 6]));
        assert_eq!(grid.pixel(0, 1), Some([7, 8, 9]));
        assert_eq!(grid.pixel(2, 0), None);
        assert_eq!(grid.pixels().collect::<Vec<_>>(), pixels.to_vec());
    }

    #[test]
    fn test_empty_grid() {
        let grid = PixelGrid::empty();
        assert!(grid.is_empty());
        assert_eq!(grid.pixels().count(), 0);
    }
}
