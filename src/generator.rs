//! UUIDv7 generator and related types.

use std::{thread, time::Duration};

use crate::{clock, rng::RandSource, Uuid};

/// Represents a UUIDv7 generator that encapsulates a 12-bit counter.
///
/// The counter is incremented for every UUID, regardless of the timestamp, and fills the
/// `rand_a` field. When it wraps around to zero the generator sleeps for about a millisecond so
/// that the timestamp advances before the counter values repeat. As long as the system clock
/// does not move backwards, UUIDs from one generator are therefore unique and increasing. The
/// remaining 62 bits are filled with fresh random bits.
///
/// This type does not synchronize itself. The following example guarantees the process-wide
/// (cross-thread) order using Rust's standard synchronization mechanism, which is what
/// [`uuid7()`](crate::uuid7) does internally.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use uniqid::{rng, V7Generator};
///
/// let g = sync::Arc::new(sync::Mutex::new(V7Generator::new(rng::Adapter(OsRng))));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct V7Generator<R> {
    counter: u16,

    /// The random number generator used by the generator.
    rng: R,
}

impl<R: RandSource> V7Generator<R> {
    const MAX_COUNTER: u16 = (1 << 12) - 1;

    /// Creates a generator instance.
    pub const fn new(rng: R) -> Self {
        Self { counter: 0, rng }
    }

    /// Generates a new UUIDv7 object from the current timestamp.
    ///
    /// Blocks for about a millisecond once every 4096 calls, when the counter wraps around.
    pub fn generate(&mut self) -> Uuid {
        let counter = self.next_counter();
        if counter == 0 {
            tracing::trace!("UUIDv7 counter wrapped; waiting for the next millisecond");
            thread::sleep(Duration::from_millis(1));
        }
        self.pack(clock::unix_ts_ms(), counter)
    }

    /// Generates a new UUIDv7 object from the `unix_ts_ms` passed, without ever blocking.
    ///
    /// Only the lower 48 bits of `unix_ts_ms` are used. The caller is responsible for advancing
    /// the timestamp when the counter wraps around to zero.
    pub fn generate_core(&mut self, unix_ts_ms: u64) -> Uuid {
        let counter = self.next_counter();
        self.pack(unix_ts_ms, counter)
    }

    fn next_counter(&mut self) -> u16 {
        self.counter = (self.counter + 1) & Self::MAX_COUNTER;
        self.counter
    }

    fn pack(&mut self, unix_ts_ms: u64, counter: u16) -> Uuid {
        let rand_hi = self.rng.next_u32() as u64 & 0x3fff_ffff;
        let rand_lo = self.rng.next_u32() as u64;
        Uuid::from_fields_v7(
            unix_ts_ms & ((1 << 48) - 1),
            counter,
            (rand_hi << 32) | rand_lo,
        )
    }

    /// Generates a new UUIDv4 object utilizing the random number generator inside.
    pub fn generate_v4(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        bytes[6] = 0x40 | (bytes[6] >> 4);
        bytes[8] = 0x80 | (bytes[8] >> 2);
        Uuid::from(bytes)
    }
}

/// Supports operations as an infinite iterator that produces a new UUIDv7 object for each call of
/// `next()`.
///
/// # Examples
///
/// ```rust
/// use uniqid::{rng, V7Generator};
///
/// V7Generator::new(rng::Adapter(rand::thread_rng()))
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e));
/// ```
impl<R: RandSource> Iterator for V7Generator<R> {
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource> std::iter::FusedIterator for V7Generator<R> {}

#[cfg(test)]
mod tests {
    use super::V7Generator;
    use crate::rng::Adapter;

    type ThreadGen = V7Generator<Adapter<rand::rngs::ThreadRng>>;

    fn counter_of(e: &crate::Uuid) -> u16 {
        u16::from_be_bytes([e.as_bytes()[6] & 0x0f, e.as_bytes()[7]])
    }

    /// Generates increasing UUIDs with constant timestamp until counter wraps
    #[test]
    fn generates_increasing_uuids_with_constant_timestamp_until_counter_wraps() {
        let ts = 0x0123_4567_89abu64;
        let mut g: ThreadGen = Default::default();
        let mut prev = g.generate_core(ts);
        assert_eq!(prev.as_bytes()[..6], ts.to_be_bytes()[2..]);
        assert_eq!(counter_of(&prev), 1);
        for i in 2..4096u16 {
            let curr = g.generate_core(ts);
            assert!(prev < curr);
            assert_eq!(counter_of(&curr), i);
            prev = curr;
        }

        let wrapped = g.generate_core(ts + 1);
        assert_eq!(counter_of(&wrapped), 0);
        assert!(prev < wrapped);
    }

    /// Sleeps past the millisecond when counter wraps
    #[test]
    fn sleeps_past_the_millisecond_when_counter_wraps() {
        let mut g: ThreadGen = Default::default();
        let mut prev = g.generate();
        for _ in 0..3 * 4096 {
            let curr = g.generate();
            assert!(prev < curr);
            prev = curr;
        }
    }

    /// Sets version and variant bits of UUIDv4
    #[test]
    fn sets_version_and_variant_bits_of_uuidv4() {
        let mut g: ThreadGen = Default::default();
        for _ in 0..1_000 {
            let e = g.generate_v4();
            assert_eq!(e.version(), Some(4));
            assert_eq!(e.variant(), crate::Variant::Var10);
        }
    }
}
