//! Immutable result bundle of a pipeline run.

use crate::analysis::EntropyEstimates;
use crate::conditioning::{MasterSeed, SEED_LEN};
use serde::Serialize;

/// Entropy metrics and master seed for one image.
///
/// Built once at the end of a successful run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntropyReport {
    /// Raw bits sampled (one per pixel).
    bit_count: usize,
    #[serde(flatten)]
    estimates: EntropyEstimates,
    /// 64 lowercase hex characters.
    master_seed: MasterSeed,
}

impl EntropyReport {
    pub(crate) fn new(bit_count: usize, estimates: EntropyEstimates, master_seed: MasterSeed) -> Self {
        Self {
            bit_count,
            estimates,
            master_seed,
        }
    }

    /// Number of bits sampled.
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Bit-level Shannon entropy.
    #[inline]
    pub fn shannon(&self) -> f64 {
        self.estimates.shannon
    }

    /// Min-entropy in bits per block.
    #[inline]
    pub fn min_entropy(&self) -> f64 {
        self.estimates.min_entropy
    }

    /// Collision entropy in bits per block.
    #[inline]
    pub fn collision_entropy(&self) -> f64 {
        self.estimates.collision_entropy
    }

    /// Block size used by the block estimators.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.estimates.block_size
    }

    /// All entropy figures.
    #[inline]
    pub fn estimates(&self) -> &EntropyEstimates {
        &self.estimates
    }

    /// The extracted master seed.
    #[inline]
    pub fn master_seed(&self) -> &MasterSeed {
        &self.master_seed
    }

    /// Upper bound on the seed's entropy in bits.
    ///
    /// Min-entropy per block times the number of whole blocks, capped at
    /// the seed size. The hash cannot create entropy the input lacks.
    pub fn seed_entropy_bound(&self) -> f64 {
        let block_size = self.block_size();
        if block_size == 0 {
            return 0.0;
        }
        let blocks = (self.bit_count / block_size) as f64;
        (self.min_entropy() * blocks).min((SEED_LEN * 8) as f64)
    }
}

impl std::fmt::Display for EntropyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Raw bits extracted:  {} bits", group_thousands(self.bit_count))?;
        writeln!(f, "Shannon entropy (H): {:.4} bits/symbol", self.shannon())?;
        writeln!(
            f,
            "Min-entropy (H∞):    {:.4} bits/block ({}-bit blocks)",
            self.min_entropy(),
            self.block_size()
        )?;
        writeln!(f, "Collision entropy:   {:.4} bits/block", self.collision_entropy())?;
        write!(f, "Master seed ({}): {}", self.master_seed.algorithm(), self.master_seed)
    }
}

/// Formats an integer with comma thousands separators.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditioning::SeedExtractor;
    use crate::extraction::Bitstream;

    fn report(bits: &str, block_size: usize) -> EntropyReport {
        let bits: Bitstream = bits.parse().unwrap();
        let seed = SeedExtractor::default().extract(&bits).unwrap();
        EntropyReport::new(bits.len(), EntropyEstimates::analyze(&bits, block_size), seed)
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(307_200), "307,200");
        assert_eq!(group_thousands(12_345_678), "12,345,678");
    }

    #[test]
    fn test_display_uses_four_decimals() {
        let text = report("1010101010101010", 8).to_string();

        assert!(text.contains("16 bits"));
        assert!(text.contains("1.0000 bits/symbol"));
        assert!(text.contains("0.0000 bits/block (8-bit blocks)"));
        assert!(text.contains("Master seed (sha256): "));
    }

    #[test]
    fn test_json_shape() {
        let r = report("0110", 2);
        let json = serde_json::to_value(&r).unwrap();

        assert_eq!(json["bit_count"], 4);
        assert_eq!(json["block_size"], 2);
        assert_eq!(json["master_seed"], r.master_seed().to_hex());
        assert!(json["shannon"].is_f64());
    }

    #[test]
    fn test_seed_entropy_bound() {
        // 4 blocks, 2 bits of min-entropy each
        let r = report("00011011", 2);
        assert_eq!(r.min_entropy(), 2.0);
        assert_eq!(r.seed_entropy_bound(), 8.0);

        let zero = report("1111111111111111", 8);
        assert_eq!(zero.seed_entropy_bound(), 0.0);
    }
}
