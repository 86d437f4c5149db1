//! Block partitioning and empirical block distributions.
//!
//! Rényi-family estimators treat each fixed-size run of bits as one
//! symbol. The bitstream is cut into non-overlapping blocks in order,
//! and the frequency of each distinct block value is counted.

use crate::extraction::Bitstream;
use std::collections::HashMap;
use thiserror::Error;

/// Soft estimator failures.
///
/// None of these abort a run: the public estimators turn them into a
/// 0.0 result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    /// Fewer bits than one block.
    #[error("{bits} bits is shorter than one {block_size}-bit block")]
    InsufficientData {
        /// Bits available.
        bits: usize,
        /// Requested block size.
        block_size: usize,
    },

    /// No block probability is positive.
    #[error("block distribution is degenerate")]
    DegenerateDistribution,

    /// Block size of zero.
    #[error("block size must be at least 1, got {0}")]
    InvalidBlockSize(usize),
}

/// Empirical distribution of block values over a bitstream.
///
/// Blocks are keyed by the bit slice itself, so any block size works.
#[derive(Debug, Clone)]
pub struct BlockDistribution<'a> {
    /// Bits per block.
    block_size: usize,
    /// Occurrences of each distinct block.
    counts: HashMap<&'a [u8], u64>,
    /// Number of blocks counted.
    total_blocks: u64,
    /// Trailing bits that did not fill a whole block.
    discarded_bits: usize,
}

impl<'a> BlockDistribution<'a> {
    /// Partitions `bits` into `block_size`-bit blocks and counts them.
    ///
    /// Trailing bits beyond the last whole block are dropped rather than
    /// padded. At block size 8 that loses at most 7 bits, which is
    /// negligible next to an image's worth of samples.
    pub fn from_bits(bits: &'a Bitstream, block_size: usize) -> Result<Self, EstimateError> {
        if block_size == 0 {
            return Err(EstimateError::InvalidBlockSize(block_size));
        }
        if bits.len() < block_size {
            return Err(EstimateError::InsufficientData {
                bits: bits.len(),
                block_size,
            });
        }

        let mut counts = HashMap::new();
        let chunks = bits.as_slice().chunks_exact(block_size);
        let discarded_bits = chunks.remainder().len();
        let mut total_blocks = 0u64;

        for block in chunks {
            *counts.entry(block).or_insert(0u64) += 1;
            total_blocks += 1;
        }

        Ok(Self {
            block_size,
            counts,
            total_blocks,
            discarded_bits,
        })
    }

    /// Returns the block size in bits.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns the number of blocks counted.
    #[inline]
    pub fn total_blocks(&self) -> u64 {
        self.total_blocks
    }

    /// Returns the number of distinct block values seen.
    #[inline]
    pub fn distinct_blocks(&self) -> usize {
        self.counts.len()
    }

    /// Returns the number of trailing bits dropped by truncation.
    #[inline]
    pub fn discarded_bits(&self) -> usize {
        self.discarded_bits
    }

    /// Returns the occurrence count of a block, given as 0/1 values.
    pub fn count(&self, block: &[u8]) -> u64 {
        self.counts.get(block).copied().unwrap_or(0)
    }

    /// Iterates the probability of each distinct block value.
    pub fn probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        let total = self.total_blocks as f64;
        self.counts.values().map(move |&c| c as f64 / total)
    }

    /// Probability of the most frequent block.
    pub fn max_probability(&self) -> f64 {
        if self.total_blocks == 0 {
            return 0.0;
        }
        let max = self.counts.values().copied().max().unwrap_or(0);
        max as f64 / self.total_blocks as f64
    }

    /// Probability that two independent draws yield the same block, Σ p².
    ///
    /// Computed from integer counts so that a uniform distribution gives
    /// exactly the same value as [`max_probability`](Self::max_probability).
    pub fn collision_probability(&self) -> f64 {
        if self.total_blocks == 0 {
            return 0.0;
        }
        let squares: u128 = self.counts.values().map(|&c| u128::from(c).pow(2)).sum();
        let total = u128::from(self.total_blocks);
        squares as f64 / (total * total) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Bitstream {
        s.parse().unwrap()
    }

    #[test]
    fn test_shorter_than_block_is_insufficient() {
        let err = BlockDistribution::from_bits(&bits("1010101"), 8).unwrap_err();
        assert_eq!(
            err,
            EstimateError::InsufficientData {
                bits: 7,
                block_size: 8
            }
        );
    }

    #[test]
    fn test_invalid_block_sizes() {
        let b = bits("1010");
        assert_eq!(
            BlockDistribution::from_bits(&b, 0).unwrap_err(),
            EstimateError::InvalidBlockSize(0)
        );
    }

    #[test]
    fn test_blocks_wider_than_a_word() {
        // four distinct 40-bit blocks
        let s: String = ["0", "1", "01", "10"]
            .iter()
            .map(|unit| unit.repeat(40 / unit.len()))
            .collect();
        let b = bits(&s);
        let dist = BlockDistribution::from_bits(&b, 40).unwrap();

        assert_eq!(dist.total_blocks(), 4);
        assert_eq!(dist.distinct_blocks(), 4);
        assert_eq!(dist.max_probability(), 0.25);
        assert_eq!(dist.collision_probability(), 0.25);
    }

    #[test]
    fn test_truncates_trailing_bits() {
        // two full 4-bit blocks plus 3 leftover bits
        let b = bits("10100101111");
        let dist = BlockDistribution::from_bits(&b, 4).unwrap();

        assert_eq!(dist.total_blocks(), 2);
        assert_eq!(dist.discarded_bits(), 3);
        assert_eq!(dist.count(&[1, 0, 1, 0]), 1);
        assert_eq!(dist.count(&[0, 1, 0, 1]), 1);
        assert_eq!(dist.count(&[1, 1, 1, 1]), 0);
    }

    #[test]
    fn test_blocks_keep_bit_order() {
        let b = bits("0000000100000010");
        let dist = BlockDistribution::from_bits(&b, 8).unwrap();
        assert_eq!(dist.count(&[0, 0, 0, 0, 0, 0, 0, 1]), 1);
        assert_eq!(dist.count(&[1, 0, 0, 0, 0, 0, 0, 0]), 0);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let b = bits("110100111010001101");
        let dist = BlockDistribution::from_bits(&b, 3).unwrap();
        let sum: f64 = dist.probabilities().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_collision_matches_max() {
        let b = bits("00011011");
        let dist = BlockDistribution::from_bits(&b, 2).unwrap();

        assert_eq!(dist.distinct_blocks(), 4);
        assert_eq!(dist.max_probability(), 0.25);
        assert_eq!(dist.collision_probability(), 0.25);
    }

    #[test]
    fn test_single_block_value() {
        let b = bits(&"1100".repeat(10));
        let dist = BlockDistribution::from_bits(&b, 4).unwrap();

        assert_eq!(dist.distinct_blocks(), 1);
        assert_eq!(dist.max_probability(), 1.0);
        assert_eq!(dist.collision_probability(), 1.0);
    }
}
