//! Entropy estimation.
//!
//! Pure, deterministic estimators over a sampled bitstream: bit-level
//! Shannon entropy, plus min-entropy and collision entropy over
//! fixed-size blocks. Numeric edge cases never escape as NaN or errors;
//! they come back as 0.0. These are estimates, not an SP 800-90B
//! assessment.

mod blocks;
mod estimates;
mod renyi;
mod shannon;
mod threshold;

pub use blocks::{BlockDistribution, EstimateError};
pub use estimates::EntropyEstimates;
pub use renyi::{
    collision_entropy, min_entropy, try_collision_entropy, try_min_entropy, DEFAULT_BLOCK_SIZE,
};
pub use shannon::shannon_entropy;
pub use threshold::{QualityThresholds, ThresholdViolation};
