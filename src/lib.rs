//! RNGne: Random Number Generator from Natural Entropy
//!
//! Extracts a bitstream from the luminance parity of an image's pixels,
//! characterizes it with Shannon, min- and collision-entropy estimators,
//! and derives a 256-bit master seed from it with a cryptographic hash.
//!
//! # Architecture
//!
//! The system follows an explicit one-way data flow:
//!
//! ```text
//! image bytes → source → extraction → analysis ──┐
//!                            │                    ├→ pipeline (EntropyReport)
//!                            └──→ conditioning ───┘
//! ```
//!
//! `source` (image decoding) and `persist` (bitstream files) are I/O
//! collaborators around the core; the pipeline itself never touches
//! the file system.
//!
//! # Design Principles
//!
//! - **Fatal vs soft errors**: an image yielding zero bits aborts the run;
//!   estimator edge cases come back as 0.0, never as NaN
//! - **Min-entropy first**: the seed is only as strong as the input's
//!   min-entropy, whatever the Shannon figure says
//! - **Uses standard primitives**: SHA-256 (or BLAKE3) as the extractor,
//!   ChaCha20 for CSPRNG output
//! - **No certification claims**: estimates are not an SP 800-90B assessment
//!
//! # Example
//!
//! ```no_run
//! use rngne::{
//!     source::{ImageFile, PixelSource},
//!     pipeline::Pipeline,
//!     config::PipelineConfig,
//! };
//!
//! let grid = ImageFile::new("sky.jpg").load().unwrap();
//! let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//!
//! let output = pipeline.run(&grid).unwrap();
//! println!("{}", output.report);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod conditioning;
pub mod config;
pub mod extraction;
pub mod metrics;
pub mod persist;
pub mod pipeline;
pub mod seeding;
pub mod source;

// Re-export commonly used types at crate root
pub use analysis::{EntropyEstimates, QualityThresholds};
pub use conditioning::{HashAlgorithm, MasterSeed, SeedExtractor};
pub use config::{FileConfig, PipelineConfig};
pub use extraction::{Bitstream, LsbSampler};
pub use pipeline::{EntropyReport, Pipeline, PipelineError, PipelineOutput};
pub use seeding::SeededRng;
pub use source::{PixelGrid, PixelSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
