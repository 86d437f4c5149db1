//! Rényi-family estimators over block distributions.
//!
//! Min-entropy (order ∞) is the conservative figure: it is set by the
//! single most frequent block and bounds what an extractor can get out
//! of the input. Collision entropy (order 2) tracks how far the whole
//! distribution is from uniform. For any distribution H∞ ≤ H2.
//!
//! The `try_*` variants report why an estimate could not be made; the
//! plain variants absorb that and return 0.0.

use super::blocks::{BlockDistribution, EstimateError};
use super::shannon::positive_zero;
use crate::extraction::Bitstream;

/// Default block size: one byte.
pub const DEFAULT_BLOCK_SIZE: usize = 8;

/// Min-entropy H∞ = -log2(max p), in bits per block.
pub fn try_min_entropy(bits: &Bitstream, block_size: usize) -> Result<f64, EstimateError> {
    let dist = BlockDistribution::from_bits(bits, block_size)?;
    neg_log2(dist.max_probability())
}

/// Collision entropy H2 = -log2(Σ p²), in bits per block.
pub fn try_collision_entropy(bits: &Bitstream, block_size: usize) -> Result<f64, EstimateError> {
    let dist = BlockDistribution::from_bits(bits, block_size)?;
    neg_log2(dist.collision_probability())
}

/// Min-entropy, or 0.0 when it cannot be estimated.
pub fn min_entropy(bits: &Bitstream, block_size: usize) -> f64 {
    absorb("min-entropy", try_min_entropy(bits, block_size))
}

/// Collision entropy, or 0.0 when it cannot be estimated.
pub fn collision_entropy(bits: &Bitstream, block_size: usize) -> f64 {
    absorb("collision entropy", try_collision_entropy(bits, block_size))
}

fn neg_log2(p: f64) -> Result<f64, EstimateError> {
    // p > 0 must hold before taking the log
    if p.is_nan() || p <= 0.0 {
        return Err(EstimateError::DegenerateDistribution);
    }
    Ok(positive_zero(-p.log2()))
}

fn absorb(estimator: &'static str, result: Result<f64, EstimateError>) -> f64 {
    result.unwrap_or_else(|e| {
        tracing::debug!(estimator, error = %e, "Estimate unavailable, reporting 0.0");
        0.0
    })
}
