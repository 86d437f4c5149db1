//! Pixel sources: decoded image files and a synthetic test pattern.
//!
//! Decoding is delegated to the `image` crate. Whatever the container
//! (JPEG, PNG, GIF), the result is flattened to RGB8 and any alpha
//! channel is dropped.

use super::PixelGrid;
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while producing a pixel grid.
#[derive(Debug, Error)]
pub enum SourceError {
    /// No file at the given path.
    #[error("image '{0}' not found")]
    NotFound(PathBuf),
    /// The file exists but could not be read.
    #[error("failed to read image '{path}': {source}")]
    Read {
        /// Image path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The bytes are not a decodable image.
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
    /// Decodable, but not JPEG, PNG or GIF.
    #[error("image format not supported: {0}")]
    UnsupportedFormat(String),
    /// Decoded buffer does not match its dimensions.
    #[error("invalid pixel grid: {0}")]
    Grid(#[from] super::GridError),
}

/// Anything that can hand the pipeline a decoded pixel grid.
///
/// This is the boundary between the I/O collaborator and the core:
/// the pipeline only ever sees the resulting [`PixelGrid`].
pub trait PixelSource {
    /// Short human-readable name used in logs and reports.
    fn name(&self) -> String;

    /// Loads and decodes the pixel grid.
    fn load(&self) -> Result<PixelGrid, SourceError>;
}

/// Container formats accepted for upload.
const SUPPORTED_FORMATS: [image::ImageFormat; 3] = [
    image::ImageFormat::Jpeg,
    image::ImageFormat::Png,
    image::ImageFormat::Gif,
];

/// Decodes an in-memory JPEG, PNG or GIF into an RGB grid.
pub fn decode_image(bytes: &[u8]) -> Result<PixelGrid, SourceError> {
    let format = image::guess_format(bytes)?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(SourceError::UnsupportedFormat(format!("{:?}", format)));
    }

    let rgb = image::load_from_memory_with_format(bytes, format)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    tracing::debug!(?format, width, height, "Decoded image");

    Ok(PixelGrid::new(rgb.into_raw(), width, height)?)
}

/// An image file on disk.
#[derive(Debug, Clone)]
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    /// Creates a source for the image at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PixelSource for ImageFile {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn load(&self) -> Result<PixelGrid, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::NotFound(self.path.clone()));
        }
        let bytes = std::fs::read(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;
        decode_image(&bytes)
    }
}

/// Synthetic source producing a deterministic pattern.
///
/// NOT an entropy source. Pixels come from ChaCha8 keyed by the seed, so
/// the same seed always yields the same grid. Only for exercising the
/// pipeline end to end without an image on disk.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    width: u32,
    height: u32,
    seed: u64,
}

impl SyntheticSource {
    /// Creates a `width` × `height` source with seed 0.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            seed: 0,
        }
    }

    /// Varies the generated pattern.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl PixelSource for SyntheticSource {
    fn name(&self) -> String {
        format!("synthetic-{}x{}", self.width, self.height)
    }

    fn load(&self) -> Result<PixelGrid, SourceError> {
        let mut rgb = vec![0u8; self.width as usize * self.height as usize * 3];
        ChaCha8Rng::seed_from_u64(self.seed).fill_bytes(&mut rgb);

        Ok(PixelGrid::new(rgb, self.width, self.height)?)
    }
}
