//! Random number sources used by the generators.

use std::fmt;

use rand::rngs::{adapter::ReseedingRng, OsRng};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha12Core;

/// A trait that defines the minimum random number generator interface for the generators of this
/// crate.
pub trait RandSource {
    /// Returns the next random `u32`.
    fn next_u32(&mut self) -> u32;

    /// Returns the next random `u64`.
    fn next_u64(&mut self) -> u64;

    /// Fills `dest` with random data.
    fn fill_bytes(&mut self, dest: &mut [u8]);
}

/// An adapter that implements [`RandSource`] for [`RngCore`] types of `rand` (v0.8) crate.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> RandSource for Adapter<T> {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }
}

/// The random number generator of the process-wide generators.
///
/// Employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to emulate the strategy used by
/// [`rand::rngs::ThreadRng`]: seeded from and periodically reseeded by the operating system.
pub struct GlobalRng(ReseedingRng<ChaCha12Core, OsRng>);

impl GlobalRng {
    /// Bytes generated before reseeding.
    const RESEED_THRESHOLD: u64 = 1024 * 64;

    /// Creates a generator seeded from the operating system.
    ///
    /// # Panics
    ///
    /// Panics if the operating system random source is unavailable.
    pub fn new() -> Self {
        Self(ReseedingRng::new(
            ChaCha12Core::from_entropy(),
            Self::RESEED_THRESHOLD,
            OsRng,
        ))
    }
}

impl Default for GlobalRng {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GlobalRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalRng").finish_non_exhaustive()
    }
}

impl RandSource for GlobalRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }
}
