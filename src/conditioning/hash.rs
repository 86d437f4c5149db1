//! Hash-based seed extraction.
//!
//! A single cryptographic hash over the raw bitstream acts as the
//! entropy extractor. It does not add entropy; it spreads whatever
//! min-entropy the input holds over a uniform, non-reversible 256-bit
//! output.

use crate::extraction::Bitstream;
use blake3::Hasher as Blake3Hasher;
use serde::{Deserialize, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::str::FromStr;
use thiserror::Error;

/// Length of a master seed in bytes.
pub const SEED_LEN: usize = 32;

/// Supported hash algorithms for extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256 - the reference extractor, matches `sha256(bit_string)`.
    #[default]
    Sha256,
    /// BLAKE3 - faster alternative with the same output size.
    Blake3,
}

impl HashAlgorithm {
    /// Lowercase name as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

/// Unknown hash algorithm name.
#[derive(Debug, Clone, Error)]
#[error("unknown hash algorithm '{0}' (expected sha256 or blake3)")]
pub struct UnknownAlgorithm(String);

impl FromStr for HashAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "blake3" => Ok(HashAlgorithm::Blake3),
            _ => Err(UnknownAlgorithm(s.to_string())),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 256-bit seed derived from a bitstream.
///
/// Displays as 64 lowercase hex characters.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterSeed {
    /// The digest bytes.
    data: [u8; SEED_LEN],
    /// Algorithm that produced the digest.
    algorithm: HashAlgorithm,
}

impl MasterSeed {
    /// Returns the seed bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.data
    }

    /// Returns the hash algorithm used.
    #[inline]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Lowercase hexadecimal rendering.
    pub fn to_hex(&self) -> String {
        self.data.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for MasterSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for MasterSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterSeed")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl Serialize for MasterSeed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Entropy extractor using a cryptographic hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedExtractor {
    algorithm: HashAlgorithm,
}

impl SeedExtractor {
    /// Creates a new extractor with the specified algorithm.
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Returns the configured algorithm.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Hashes the textual form of the bitstream into a master seed.
    ///
    /// The hash input is one ASCII `'0'`/`'1'` per bit, the same bytes
    /// that get persisted. Returns `None` for an empty bitstream.
    pub fn extract(&self, bits: &Bitstream) -> Option<MasterSeed> {
        if bits.is_empty() {
            return None;
        }

        let text = bits.to_ascii();
        let data = match self.algorithm {
            HashAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(&text);
                let result = hasher.finalize();
                let mut data = [0u8; SEED_LEN];
                data.copy_from_slice(&result);
                data
            }
            HashAlgorithm::Blake3 => {
                let mut hasher = Blake3Hasher::new();
                hasher.update(&text);
                *hasher.finalize().as_bytes()
            }
        };

        tracing::trace!(
            algorithm = %self.algorithm,
            input_bits = bits.len(),
            "Extracted master seed"
        );

        Some(MasterSeed {
            data,
            algorithm: self.algorithm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Bitstream {
        s.parse().unwrap()
    }

    #[test]
    fn test_sha256_matches_known_digest() {
        // sha256("1010101010101010")
        let seed = SeedExtractor::default()
            .extract(&bits("1010101010101010"))
            .unwrap();

        let mut hasher = Sha256::new();
        hasher.update(b"1010101010101010");
        let expected: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();

        assert_eq!(seed.to_hex(), expected);
        assert_eq!(seed.algorithm(), HashAlgorithm::Sha256);
    }

    #[test]
    fn test_sha256_of_single_zero_bit() {
        let seed = SeedExtractor::default().extract(&bits("0")).unwrap();
        assert_eq!(
            seed.to_hex(),
            "5feceb66ffc86f38d952786c6d696c79c2dbc239dd4e91b46729d73a27fb57e9"
        );
    }

    #[test]
    fn test_hex_is_64_lowercase_chars() {
        let seed = SeedExtractor::new(HashAlgorithm::Blake3)
            .extract(&bits("110"))
            .unwrap();
        let hex = seed.to_string();

        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_deterministic() {
        let extractor = SeedExtractor::default();
        let input = bits(&"1101001".repeat(50));

        assert_eq!(extractor.extract(&input), extractor.extract(&input));
    }

    #[test]
    fn test_different_input_different_output() {
        let extractor = SeedExtractor::default();

        let seed1 = extractor.extract(&bits("0000")).unwrap();
        let seed2 = extractor.extract(&bits("0001")).unwrap();

        assert_ne!(seed1.as_bytes(), seed2.as_bytes());
    }

    #[test]
    fn test_algorithms_differ() {
        let input = bits("101");
        let sha = SeedExtractor::new(HashAlgorithm::Sha256).extract(&input).unwrap();
        let b3 = SeedExtractor::new(HashAlgorithm::Blake3).extract(&input).unwrap();

        assert_ne!(sha.as_bytes(), b3.as_bytes());
    }

    #[test]
    fn test_empty_input_yields_none() {
        assert!(SeedExtractor::default().extract(&Bitstream::default()).is_none());
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("SHA256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("blake3".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Blake3);
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn test_debug_hides_seed_bytes() {
        let seed = SeedExtractor::default().extract(&bits("1")).unwrap();
        assert!(!format!("{:?}", seed).contains(&seed.to_hex()));
    }
}
