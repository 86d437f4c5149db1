//! Seed extraction via cryptographic hashing.
//!
//! This module turns the raw bitstream into a fixed-size master seed
//! using a single well-established hash function. No further
//! conditioning is applied.

mod hash;

pub use hash::{HashAlgorithm, MasterSeed, SeedExtractor, UnknownAlgorithm, SEED_LEN};
