//! Module to generate arbitrary values for testing.

use arbitrary::{Arbitrary, Unstructured};
use rand_core::{OsRng, TryCryptoRng};

/// The default buffer size for the `ArbitraryGenerator`.
const ARB_GEN_LEN: usize = 1024;

/// A generator for producing arbitrary data based on a persistent buffer.
#[derive(Debug)]
pub struct ArbitraryGenerator {
    /// Persistent buffer
    buf: Vec<u8>,
}

impl Default for ArbitraryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ArbitraryGenerator {
    /// Creates a new `ArbitraryGenerator` with a default buffer size.
    pub fn new() -> Self {
        Self::new_with_size(ARB_GEN_LEN)
    }

    /// Creates a new `ArbitraryGenerator` with a buffer of `s` bytes.
    pub fn new_with_size(s: usize) -> Self {
        Self { buf: vec![0u8; s] }
    }

    /// Generates an arbitrary instance of type `T` using the default RNG, [`OsRng`].
    pub fn generate<'a, T>(&'a mut self) -> T
    where
        T: Arbitrary<'a> + Clone,
    {
        self.generate_with_rng::<T, OsRng>(&mut OsRng)
    }

    /// Generates an arbitrary instance of type `T` from bytes drawn from `rng`.
    pub fn generate_with_rng<'a, T, R>(&'a mut self, rng: &mut R) -> T
    where
        T: Arbitrary<'a> + Clone,
        R: TryCryptoRng,
    {
        rng.try_fill_bytes(&mut self.buf)
            .expect("must be able to generate random bytes");
        let mut u = Unstructured::new(&self.buf);
        T::arbitrary(&mut u).expect("Failed to generate arbitrary instance")
    }
}
