//! Raw bitstream type for extracted entropy.

use std::str::FromStr;
use thiserror::Error;

/// Error parsing a textual bitstream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitstreamError {
    /// A character other than `'0'` or `'1'`.
    #[error("invalid bit {found:?} at position {position} (expected '0' or '1')")]
    InvalidBit {
        /// Character offset.
        position: usize,
        /// Offending character.
        found: char,
    },
}

/// Bits sampled from a pixel grid, one per pixel.
///
/// This is the output of the sampler and the input to both the
/// estimators and the seed extractor. Each element holds 0 or 1;
/// order matches the row-major pixel traversal.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitstream {
    /// One bit per byte, always 0 or 1.
    bits: Vec<u8>,
}

impl Bitstream {
    /// Creates an empty bitstream with room for `capacity` bits.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    /// Builds a bitstream from booleans.
    pub fn from_bools(bits: impl IntoIterator<Item = bool>) -> Self {
        Self {
            bits: bits.into_iter().map(u8::from).collect(),
        }
    }

    /// Appends a bit. Only the lowest bit of `bit` is kept.
    #[inline]
    pub fn push(&mut self, bit: u8) {
        self.bits.push(bit & 1);
    }

    /// Returns the bits, one per byte.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Returns the number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Counts the set bits.
    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Calculates bit bias as deviation from 0.5.
    ///
    /// Returns a value in [-0.5, 0.5] where 0.0 is unbiased.
    pub fn bit_bias(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        (self.ones() as f64 / self.len() as f64) - 0.5
    }

    /// Textual form: one ASCII `'0'`/`'1'` per bit, no delimiters.
    ///
    /// This is both the persisted artifact and the extractor input.
    pub fn to_ascii(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| b'0' + b).collect()
    }
}

impl FromStr for Bitstream {
    type Err = BitstreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(0),
                '1' => Ok(1),
                found => Err(BitstreamError::InvalidBit { position, found }),
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(|bits| Self { bits })
    }
}

impl std::fmt::Display for Bitstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // to_ascii only ever yields '0'/'1'
        f.write_str(&String::from_utf8_lossy(&self.to_ascii()))
    }
}

impl std::fmt::Debug for Bitstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitstream")
            .field("bits", &self.bits.len())
            .field("bit_bias", &format!("{:.4}", self.bit_bias()))
            .finish()
    }
}
