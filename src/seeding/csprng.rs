//! ChaCha20 CSPRNG keyed by a master seed.
//!
//! The 32 master-seed bytes are the ChaCha20 key as-is. The stream is
//! therefore fully determined by the source image: the same image
//! yields the same output, and the output is only as unpredictable as
//! the image's min-entropy allows.

use crate::conditioning::MasterSeed;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// A CSPRNG initialised from a [`MasterSeed`].
pub struct SeededRng {
    /// The underlying ChaCha20 CSPRNG.
    inner: ChaCha20Rng,
    /// Bytes generated so far.
    bytes_generated: u64,
}

impl SeededRng {
    /// Creates a CSPRNG keyed with the master seed.
    pub fn from_master_seed(seed: &MasterSeed) -> Self {
        tracing::debug!(algorithm = %seed.algorithm(), "Seeding ChaCha20 from master seed");
        Self {
            inner: ChaCha20Rng::from_seed(*seed.as_bytes()),
            bytes_generated: 0,
        }
    }

    /// Returns bytes generated since construction.
    pub fn bytes_generated(&self) -> u64 {
        self.bytes_generated
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.bytes_generated += 4;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.bytes_generated += 8;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.bytes_generated += dest.len() as u64;
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.bytes_generated += dest.len() as u64;
        self.inner.try_fill_bytes(dest)
    }
}

impl std::fmt::Debug for SeededRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeededRng")
            .field("bytes_generated", &self.bytes_generated)
            .finish_non_exhaustive()
    }
}
