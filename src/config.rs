//! Pipeline and output configuration.
//!
//! Settings that were process-wide constants (block size, bits output
//! directory) are explicit values handed to the pipeline and the
//! persistence collaborator.

use crate::analysis::{QualityThresholds, DEFAULT_BLOCK_SIZE};
use crate::conditioning::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bits per block for the Rényi estimators.
    pub block_size: usize,
    /// Hash used as the seed extractor.
    pub hash: HashAlgorithm,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            hash: HashAlgorithm::Sha256,
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with the specified block size.
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size,
            ..Default::default()
        }
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::InvalidBlockSize(self.block_size));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Block size of zero.
    #[error("invalid block size {0} (must be at least 1 bit)")]
    InvalidBlockSize(usize),
    /// A quality threshold outside [0, 1].
    #[error("quality thresholds must lie between 0.0 and 1.0")]
    InvalidThresholds,
    /// Prefix would escape the output directory.
    #[error("bits file prefix must not contain path separators")]
    InvalidPrefix,
    /// Config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// Config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[pipeline]` table.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// `[output]` table.
    #[serde(default)]
    pub output: OutputConfig,
    /// `[quality]` table.
    #[serde(default)]
    pub quality: QualityThresholds,
}

/// Where and whether the raw bitstream is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the bitstream text files.
    pub bits_dir: PathBuf,
    /// Write the bitstream for each processed image.
    pub write_bits: bool,
    /// File name prefix for bitstream files.
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bits_dir: PathBuf::from("uploads/"),
            write_bits: true,
            file_prefix: "RNGne_".to_string(),
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.validate()?;
        if !self.quality.is_valid() {
            return Err(ConfigError::InvalidThresholds);
        }
        if self.output.file_prefix.contains(['/', '\\']) {
            return Err(ConfigError::InvalidPrefix);
        }
        Ok(())
    }
}
