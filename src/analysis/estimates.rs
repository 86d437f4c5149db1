//! Combined entropy estimates for one bitstream.
//!
//! These are statistical characterizations, not proofs of entropy.
//! In particular the seed's strength is bounded by min-entropy, not by
//! the Shannon figure.

use super::{collision_entropy, min_entropy, shannon_entropy};
use crate::extraction::Bitstream;
use serde::{Deserialize, Serialize};

/// Entropy estimator results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropyEstimates {
    /// Bit-level Shannon entropy, bits per symbol.
    pub shannon: f64,
    /// Min-entropy, bits per block.
    pub min_entropy: f64,
    /// Collision entropy, bits per block.
    pub collision_entropy: f64,
    /// Block size used for the Rényi estimators.
    pub block_size: usize,
}

impl EntropyEstimates {
    /// Runs all estimators on the bitstream.
    ///
    /// The estimators are independent of each other; none of them can
    /// fail the whole analysis.
    pub fn analyze(bits: &Bitstream, block_size: usize) -> Self {
        Self {
            shannon: shannon_entropy(bits),
            min_entropy: min_entropy(bits, block_size),
            collision_entropy: collision_entropy(bits, block_size),
            block_size,
        }
    }

    /// Min-entropy as a fraction of the ideal (the block size).
    pub fn min_entropy_ratio(&self) -> f64 {
        ratio(self.min_entropy, self.block_size)
    }

    /// Collision entropy as a fraction of the ideal (the block size).
    pub fn collision_ratio(&self) -> f64 {
        ratio(self.collision_entropy, self.block_size)
    }
}

fn ratio(value: f64, block_size: usize) -> f64 {
    if block_size == 0 {
        return 0.0;
    }
    value / block_size as f64
}
