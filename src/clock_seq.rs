//! Clock sequence guard of time-based identifiers.

use std::sync::{Mutex, PoisonError};

/// A lock-guarded clock sequence that disambiguates time-based identifiers whose timestamps do
/// not strictly advance.
///
/// The sequence is seeded with a random value on first use and incremented whenever the
/// requested timestamp is not greater than that of the immediately preceding request. It is never
/// reset, and wraps around silently within its 14 bits.
///
/// # Examples
///
/// ```rust
/// use uniqid::ClockSequence;
///
/// let seq = ClockSequence::new();
/// let a = seq.next(1_000);
/// let b = seq.next(1_000); // clock did not advance
/// assert_eq!(b, (a + 1) & ClockSequence::MAX);
/// assert_eq!(seq.next(2_000), b);
/// ```
#[derive(Debug, Default)]
pub struct ClockSequence {
    state: Mutex<Option<State>>,
}

#[derive(Debug)]
struct State {
    sequence: u64,
    last_ticks: u64,
}

impl ClockSequence {
    /// The largest clock sequence value (14 bits).
    pub const MAX: u16 = (1 << 14) - 1;

    /// Creates an unseeded clock sequence.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    /// Returns the 14-bit clock sequence for a request at `ticks`, incrementing it first if
    /// `ticks` does not exceed the previous request's.
    pub fn next(&self, ticks: u64) -> u16 {
        self.next_with_seed(ticks, || rand::random::<u64>() >> 1)
    }

    fn next_with_seed(&self, ticks: u64, seed: impl FnOnce() -> u64) -> u16 {
        // every update below completes before the guard drops, so a poisoned lock still holds a
        // consistent state
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let state = guard.get_or_insert_with(|| State {
            sequence: seed(),
            last_ticks: 0,
        });

        if ticks <= state.last_ticks {
            state.sequence = state.sequence.wrapping_add(1);
            tracing::trace!(
                ticks,
                last_ticks = state.last_ticks,
                "clock did not advance; bumped clock sequence"
            );
        }
        state.last_ticks = ticks;
        (state.sequence & Self::MAX as u64) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::ClockSequence;

    /// Keeps the seed while the clock advances
    #[test]
    fn keeps_the_seed_while_the_clock_advances() {
        let g = ClockSequence::new();
        let first = g.next_with_seed(100, || 0x1234);
        assert_eq!(first, 0x1234);
        for ticks in 101..1_000 {
            assert_eq!(g.next_with_seed(ticks, || unreachable!()), first);
        }
    }

    /// Increments sequence when the clock stalls or goes backwards
    #[test]
    fn increments_sequence_when_the_clock_stalls_or_goes_backwards() {
        let g = ClockSequence::new();
        let mut prev = g.next_with_seed(1_000, || 7);
        for ticks in [1_000, 999, 500, 500, 1] {
            let curr = g.next(ticks);
            assert_eq!(curr, (prev + 1) & ClockSequence::MAX);
            prev = curr;
        }

        // the regressed time becomes the new reference point
        assert_eq!(g.next(2), prev);
    }

    /// Wraps around silently within 14 bits
    #[test]
    fn wraps_around_silently_within_14_bits() {
        let g = ClockSequence::new();
        assert_eq!(g.next_with_seed(10, || u64::MAX >> 1), ClockSequence::MAX);
        assert_eq!(g.next(10), 0);
        assert_eq!(g.next(10), 1);
    }

    /// Distinguishes concurrent requests at the same timestamp
    #[test]
    fn distinguishes_concurrent_requests_at_the_same_timestamp() {
        use std::collections::HashSet;

        let g = &ClockSequence::new();
        let seqs: Vec<u16> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(move || (0..1_000).map(|_| g.next(42)).collect::<Vec<_>>()))
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        // 4000 consecutive values cannot wrap onto each other within 14 bits
        let unique: HashSet<u16> = seqs.iter().copied().collect();
        assert_eq!(unique.len(), seqs.len());
    }
}
