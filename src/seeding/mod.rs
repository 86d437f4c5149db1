//! CSPRNG initialisation from a master seed.

mod csprng;

pub use csprng::SeededRng;
