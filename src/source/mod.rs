//! Image input and pixel grids.
//!
//! This module sits outside the entropy core. It decodes uploaded
//! images into a [`PixelGrid`]; the pipeline never decodes anything
//! itself.

mod grid;
mod image_file;

pub use grid::{GridError, PixelGrid};
pub use image_file::{decode_image, ImageFile, PixelSource, SourceError, SyntheticSource};
