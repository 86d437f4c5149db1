//! Advisory quality thresholds.
//!
//! A result below these thresholds is labelled "low entropy" for the
//! user. It is never a failure: a 0.0 entropy value is a valid answer.

use super::estimates::EntropyEstimates;
use serde::{Deserialize, Serialize};

/// Minimum acceptable entropy figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Minimum bit-level Shannon entropy (0.0 to 1.0).
    pub min_shannon: f64,
    /// Minimum min-entropy as a fraction of the block size.
    pub min_entropy_ratio: f64,
    /// Minimum collision entropy as a fraction of the block size.
    pub min_collision_ratio: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_shannon: 0.99,
            min_entropy_ratio: 0.75, // 6 of 8 bits per byte block
            min_collision_ratio: 0.85,
        }
    }
}

impl QualityThresholds {
    /// Creates more conservative thresholds.
    pub fn conservative() -> Self {
        Self {
            min_shannon: 0.999,
            min_entropy_ratio: 0.9,
            min_collision_ratio: 0.95,
        }
    }

    /// Creates more permissive thresholds (for testing).
    pub fn permissive() -> Self {
        Self {
            min_shannon: 0.9,
            min_entropy_ratio: 0.5,
            min_collision_ratio: 0.6,
        }
    }

    /// Validates that every threshold lies in [0, 1].
    pub fn is_valid(&self) -> bool {
        [self.min_shannon, self.min_entropy_ratio, self.min_collision_ratio]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }

    /// Checks estimates against thresholds, reporting the first miss.
    pub fn check(&self, est: &EntropyEstimates) -> Result<(), ThresholdViolation> {
        if est.shannon < self.min_shannon {
            return Err(ThresholdViolation::LowShannon {
                observed: est.shannon,
                threshold: self.min_shannon,
            });
        }

        if est.min_entropy_ratio() < self.min_entropy_ratio {
            return Err(ThresholdViolation::LowMinEntropy {
                observed: est.min_entropy,
                threshold: self.min_entropy_ratio * est.block_size as f64,
            });
        }

        if est.collision_ratio() < self.min_collision_ratio {
            return Err(ThresholdViolation::LowCollisionEntropy {
                observed: est.collision_entropy,
                threshold: self.min_collision_ratio * est.block_size as f64,
            });
        }

        Ok(())
    }
}

/// Threshold violation types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdViolation {
    /// Bit-level Shannon entropy too low.
    #[error("Shannon entropy {observed:.4} below threshold {threshold:.4} bits/symbol")]
    LowShannon {
        /// Measured value.
        observed: f64,
        /// Required value.
        threshold: f64,
    },

    /// Min-entropy too low for the block size.
    #[error("min-entropy {observed:.4} below threshold {threshold:.4} bits/block")]
    LowMinEntropy {
        /// Measured bits per block.
        observed: f64,
        /// Required bits per block.
        threshold: f64,
    },

    /// Collision entropy too low for the block size.
    #[error("collision entropy {observed:.4} below threshold {threshold:.4} bits/block")]
    LowCollisionEntropy {
        /// Measured bits per block.
        observed: f64,
        /// Required bits per block.
        threshold: f64,
    },
}
