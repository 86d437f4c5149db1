//! Bit-level Shannon entropy.

use crate::extraction::Bitstream;

/// Shannon entropy (H1) of the bitstream, in bits per symbol.
///
/// Only observed symbols contribute: a stream of a single repeated bit
/// scores 0.0, a perfectly balanced one 1.0. Empty input returns 0.0.
pub fn shannon_entropy(bits: &Bitstream) -> f64 {
    let len = bits.len();
    if len == 0 {
        return 0.0;
    }

    let ones = bits.ones();
    let entropy: f64 = [len - ones, ones]
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len as f64;
            -p * p.log2()
        })
        .sum();

    positive_zero(entropy)
}

/// Turns a -0.0 produced by `-1.0 * log2(1.0)` into 0.0.
#[inline]
pub(crate) fn positive_zero(value: f64) -> f64 {
    value + 0.0
}
