//! Compact 64-bit time-ordered identifiers.
//!
//! # Field and bit layout
//!
//! ```text
//! |  42 bits: timestamp_ms  | 12 bits: counter | 10 bits: node |
//! ```
//!
//! - `timestamp_ms` counts milliseconds since [`EPOCH_MS`] (2020-01-01T00:00:00Z).
//! - `counter` restarts from zero every millisecond, allowing [`MAX_IDS_PER_MS`] identifiers per
//!   millisecond. The generator spins until the next millisecond once the counter is exhausted.
//! - `node` is a caller-chosen id in `[0, 1024)` that keeps generators on different hosts apart.
//!
//! The text form is `X` followed by the value in 13 Crockford Base32 digits, which sorts in the
//! same order as the numbers.
//!
//! ```rust
//! let id = uniqid::compact_id(7)?;
//! assert_eq!(id.node(), 7);
//! let text = id.to_string(); // e.g., "X0EP4N1FQ10007"
//! assert_eq!(text.parse::<uniqid::CompactId>()?, id);
//! # Ok::<(), uniqid::Error>(())
//! ```

use std::{
    fmt,
    hint::spin_loop,
    str,
    sync::{Mutex, PoisonError},
};

use fstr::FStr;

use crate::{clock, Error};

/// Unix timestamp of 2020-01-01T00:00:00Z in milliseconds; the zero point of `timestamp_ms`.
pub const EPOCH_MS: u64 = 1_577_836_800_000;

/// The largest accepted node id.
pub const MAX_NODE_ID: u64 = (1 << NODE_BITS) - 1;

/// The number of identifiers one generator can issue within a millisecond.
pub const MAX_IDS_PER_MS: u64 = 1 << COUNTER_BITS;

const NODE_BITS: u32 = 10;
const COUNTER_BITS: u32 = 12;
const COUNTER_SHIFT: u32 = NODE_BITS;
const TIMESTAMP_SHIFT: u32 = NODE_BITS + COUNTER_BITS;
const MAX_COUNTER: u64 = MAX_IDS_PER_MS - 1;
const MAX_TIMESTAMP: u64 = (1 << (64 - TIMESTAMP_SHIFT)) - 1;

/// Crockford Base32 digits.
const DIGITS: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Represents a compact time-ordered identifier.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct CompactId(u64);

impl CompactId {
    /// Creates an identifier from field values.
    ///
    /// # Panics
    ///
    /// Panics if a field value exceeds its bit width.
    pub const fn from_fields(timestamp_ms: u64, counter: u64, node: u64) -> Self {
        if timestamp_ms > MAX_TIMESTAMP || counter > MAX_COUNTER || node > MAX_NODE_ID {
            panic!("invalid field value");
        }
        Self((timestamp_ms << TIMESTAMP_SHIFT) | (counter << COUNTER_SHIFT) | node)
    }

    /// Returns the identifier as an integer.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the milliseconds elapsed since [`EPOCH_MS`].
    pub const fn timestamp_ms(&self) -> u64 {
        self.0 >> TIMESTAMP_SHIFT
    }

    /// Returns the Unix timestamp in milliseconds.
    pub const fn unix_ts_ms(&self) -> u64 {
        self.timestamp_ms() + EPOCH_MS
    }

    /// Returns the per-millisecond counter.
    pub const fn counter(&self) -> u64 {
        (self.0 >> COUNTER_SHIFT) & MAX_COUNTER
    }

    /// Returns the node id.
    pub const fn node(&self) -> u64 {
        self.0 & MAX_NODE_ID
    }

    /// Returns the 14-character text representation stored in a stack-allocated string type.
    pub fn encode(&self) -> FStr<14> {
        let mut buffer = [b'X'; 14];
        let mut rest = self.0;
        for e in buffer[1..].iter_mut().rev() {
            *e = DIGITS[(rest & 31) as usize];
            rest >>= 5;
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: the buffer is filled with ASCII letters and digits
        unsafe { FStr::from_inner_unchecked(buffer) }
    }
}

/// Returns the value of a Crockford Base32 digit, accepting lower case and the aliases `I`, `L`,
/// and `O`.
const fn decode_digit(c: u8) -> Option<u64> {
    let value = match c.to_ascii_uppercase() {
        c @ b'0'..=b'9' => c - b'0',
        b'O' => 0,
        b'I' | b'L' => 1,
        c @ b'A'..=b'H' => c - b'A' + 10,
        c @ b'J'..=b'K' => c - b'J' + 18,
        c @ b'M'..=b'N' => c - b'M' + 20,
        c @ b'P'..=b'T' => c - b'P' + 22,
        c @ b'V'..=b'Z' => c - b'V' + 27,
        _ => return None,
    };
    Some(value as u64)
}

impl fmt::Display for CompactId {
    /// Returns the `X`-prefixed Crockford Base32 representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for CompactId {
    type Err = Error;

    /// Creates an object from the `X`-prefixed Crockford Base32 representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: Error = Error::invalid("compact identifier");
        let [b'X', digits @ ..] = src.as_bytes() else {
            return Err(ERR);
        };
        if digits.len() != 13 {
            return Err(ERR);
        }

        // 13 digits carry 65 bits; the leading one may use only four
        let mut value = 0u64;
        for (i, &c) in digits.iter().enumerate() {
            let digit = decode_digit(c).ok_or(ERR)?;
            if i == 0 && digit > 15 {
                return Err(ERR);
            }
            value = (value << 5) | digit;
        }
        Ok(Self(value))
    }
}

impl From<CompactId> for u64 {
    fn from(src: CompactId) -> Self {
        src.0
    }
}

impl From<u64> for CompactId {
    fn from(src: u64) -> Self {
        Self(src)
    }
}

/// Represents a compact identifier generator.
///
/// The generator serializes callers through a lock. Within that lock it reads the clock, and if
/// the counter is exhausted for the current millisecond it spins until the clock moves on. When
/// the clock goes backwards, or reads before [`EPOCH_MS`], the generator keeps using the last
/// timestamp, borrowing the next millisecond if the counter runs out, so the identifiers it issues
/// never decrease.
///
/// # Examples
///
/// ```rust
/// use uniqid::CompactGenerator;
///
/// let g = CompactGenerator::new();
/// let a = g.generate(3)?;
/// let b = g.generate(3)?;
/// assert!(a < b);
/// assert!(g.generate(1024).is_err());
/// # Ok::<(), uniqid::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct CompactGenerator {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    timestamp_ms: u64,
    counter: u64,
}

impl State {
    /// Advances the state to `now_ms`, returning the new timestamp and counter, or `None` if the
    /// counter is exhausted for `now_ms`.
    ///
    /// A zero `now_ms` stands for a clock reading at or before [`EPOCH_MS`], which may stay there
    /// for good, so it is never waited on.
    fn advance(&mut self, now_ms: u64) -> Option<(u64, u64)> {
        if now_ms > self.timestamp_ms {
            self.timestamp_ms = now_ms;
            self.counter = 0;
        } else if self.counter < MAX_COUNTER {
            self.counter += 1;
        } else if now_ms == self.timestamp_ms && now_ms > 0 {
            return None;
        } else {
            // clock is behind; move on with a logical millisecond
            self.timestamp_ms += 1;
            self.counter = 0;
        }
        Some((self.timestamp_ms, self.counter))
    }
}

impl CompactGenerator {
    /// Creates a generator instance.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(State {
                timestamp_ms: 0,
                counter: 0,
            }),
        }
    }

    /// Generates a new identifier for `node`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeIdOutOfRange`] if `node` is not in `[0, 1024)`.
    pub fn generate(&self, node: u64) -> Result<CompactId, Error> {
        if node > MAX_NODE_ID {
            return Err(Error::NodeIdOutOfRange(node));
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut waited = false;
        loop {
            if let Some((timestamp_ms, counter)) = state.advance(now_ms()) {
                return Ok(CompactId::from_fields(timestamp_ms, counter, node));
            }
            if !waited {
                tracing::trace!("compact id counter exhausted; waiting for the next millisecond");
                waited = true;
            }
            spin_loop();
        }
    }
}

/// Returns the milliseconds since [`EPOCH_MS`], or zero if the clock reads earlier.
fn now_ms() -> u64 {
    clock::unix_ts_ms().saturating_sub(EPOCH_MS) & MAX_TIMESTAMP
}

/// Generates a compact identifier for `node` from the process-wide generator.
///
/// # Errors
///
/// Returns [`Error::NodeIdOutOfRange`] if `node` is not in `[0, 1024)`.
pub fn compact_id(node: u64) -> Result<CompactId, Error> {
    static GENERATOR: CompactGenerator = CompactGenerator::new();
    GENERATOR.generate(node)
}

/// Integer- and string-based entry points kept for existing callers.
pub mod legacy {
    use super::{compact_id, CompactId};
    use crate::Error;

    /// Generates a compact identifier as a plain integer.
    #[deprecated(since = "0.1.0", note = "use `compact_id()`")]
    pub fn next_compact_id(node: u64) -> Result<u64, Error> {
        compact_id(node).map(u64::from)
    }

    /// Returns the text representation of a compact identifier given as a plain integer.
    #[deprecated(since = "0.1.0", note = "use `CompactId::to_string()`")]
    pub fn encode_compact_id(id: u64) -> String {
        CompactId::from(id).to_string()
    }

    /// Parses the text representation of a compact identifier into a plain integer.
    #[deprecated(since = "0.1.0", note = "use `str::parse::<CompactId>()`")]
    pub fn decode_compact_id(src: &str) -> Result<u64, Error> {
        src.parse::<CompactId>().map(u64::from)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::CompactId;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for CompactId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_u64(self.0)
            }
        }
    }

    impl<'de> Deserialize<'de> for CompactId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                String::deserialize(deserializer)?
                    .parse()
                    .map_err(de::Error::custom)
            } else {
                u64::deserialize(deserializer).map(Self)
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::CompactId;
        use serde_test::{assert_tokens, Configure, Token};

        /// Serializes and deserializes prepared cases correctly
        #[test]
        fn serializes_and_deserializes_prepared_cases_correctly() {
            let e = CompactId::from(0x0123_4567_89ab_cdef);
            assert_tokens(&e.readable(), &[Token::String("X028T5CY4TQKFF")]);
            assert_tokens(&e.compact(), &[Token::U64(0x0123_4567_89ab_cdef)]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        compact_id, CompactGenerator, CompactId, State, MAX_COUNTER, MAX_IDS_PER_MS, MAX_NODE_ID,
    };
    use crate::Error;

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        let cases = [
            (0, "X0000000000000"),
            (1, "X0000000000001"),
            (u64::MAX, "XFZZZZZZZZZZZZ"),
            (0x0123_4567_89ab_cdef, "X028T5CY4TQKFF"),
            (CompactId::from_fields(5, 3, 7).as_u64(), "X00000000M0307"),
        ];

        for (value, text) in cases {
            let e = CompactId::from(value);
            assert_eq!(e.encode().as_str(), text);
            assert_eq!(&e.to_string(), text);
            assert_eq!(text.parse(), Ok(e));
            assert_eq!(text.to_lowercase().parse(), Ok(e));
        }

        assert_eq!("XO0000000000IL".parse(), Ok(CompactId::from(0b100001)));
    }

    /// Returns error to invalid string representation
    #[test]
    fn returns_error_to_invalid_string_representation() {
        let cases = [
            "",
            "X",
            "X000000000000",
            "X00000000000000",
            "Y0000000000000",
            "00000000000000",
            "0000000000000",
            " X000000000000",
            "XG000000000000",
            "XZZZZZZZZZZZZZ",
            "X000000000000U",
            "X00000000000-1",
        ];

        for e in cases {
            assert!(e.parse::<CompactId>().is_err(), "{e}");
        }
    }

    /// Splits fields of packed value
    #[test]
    fn splits_fields_of_packed_value() {
        let e = CompactId::from_fields(0x2_0000_0001, MAX_COUNTER, MAX_NODE_ID);
        assert_eq!(e.timestamp_ms(), 0x2_0000_0001);
        assert_eq!(e.counter(), MAX_COUNTER);
        assert_eq!(e.node(), MAX_NODE_ID);
        assert_eq!(e.as_u64(), (0x2_0000_0001 << 22) | (MAX_COUNTER << 10) | MAX_NODE_ID);
    }

    /// Increments counter within a millisecond and resets it at the boundary
    #[test]
    fn increments_counter_within_a_millisecond_and_resets_it_at_the_boundary() {
        let mut state = State::default();
        assert_eq!(state.advance(100), Some((100, 0)));
        for i in 1..=MAX_COUNTER {
            assert_eq!(state.advance(100), Some((100, i)));
        }
        assert_eq!(state.advance(100), None);
        assert_eq!(state.advance(100), None);
        assert_eq!(state.advance(101), Some((101, 0)));
        assert_eq!(state.advance(101), Some((101, 1)));
    }

    /// Keeps increasing when the clock goes backwards
    #[test]
    fn keeps_increasing_when_the_clock_goes_backwards() {
        let mut state = State::default();
        let mut prev = state.advance(1_000).unwrap();
        for _ in 0..3 * MAX_COUNTER {
            let curr = state.advance(900).unwrap();
            assert!(prev < curr);
            prev = curr;
        }
        assert!(prev.0 > 1_000);
    }

    /// Never waits on a clock reading before the epoch
    #[test]
    fn never_waits_on_a_clock_reading_before_the_epoch() {
        let mut state = State::default();
        let mut prev = state.advance(0).unwrap();
        assert_eq!(prev, (0, 1));
        for _ in 0..3 * MAX_IDS_PER_MS {
            let curr = state.advance(0).unwrap();
            assert!(prev < curr);
            prev = curr;
        }
        assert_eq!(prev, (3, 1));

        // a real reading later than the logical timestamp takes over again
        assert_eq!(state.advance(100), Some((100, 0)));
    }

    /// Rejects node ids out of range
    #[test]
    fn rejects_node_ids_out_of_range() {
        assert!(compact_id(0).is_ok());
        assert!(compact_id(MAX_NODE_ID).is_ok());
        assert_eq!(compact_id(1024), Err(Error::NodeIdOutOfRange(1024)));
        assert_eq!(compact_id(u64::MAX), Err(Error::NodeIdOutOfRange(u64::MAX)));
    }

    /// Generates increasing identifiers with up-to-date timestamps
    #[test]
    fn generates_increasing_identifiers_with_up_to_date_timestamps() {
        let g = CompactGenerator::new();
        let mut prev = g.generate(5).unwrap();
        for _ in 0..100_000 {
            let curr = g.generate(5).unwrap();
            assert!(prev < curr);
            assert_eq!(curr.node(), 5);
            if curr.timestamp_ms() == prev.timestamp_ms() {
                assert_eq!(curr.counter(), prev.counter() + 1);
            } else {
                assert_eq!(curr.counter(), 0);
            }
            prev = curr;
        }

        let now = crate::clock::unix_ts_ms() as i64;
        assert!((now - prev.unix_ts_ms() as i64).abs() < 16);
    }

    /// Generates no duplicates under multithreading
    #[test]
    fn generates_no_duplicates_under_multithreading() {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for node in 0..4 {
            let tx = tx.clone();
            thread::spawn(move || {
                for _ in 0..10_000 {
                    tx.send(compact_id(node % 2).unwrap()).unwrap();
                }
            });
        }
        drop(tx);

        let s: HashSet<CompactId> = rx.iter().collect();
        assert_eq!(s.len(), 4 * 10_000);
    }

    /// Keeps legacy entry points in step with typed ones
    #[test]
    #[allow(deprecated)]
    fn keeps_legacy_entry_points_in_step_with_typed_ones() {
        use super::legacy::{decode_compact_id, encode_compact_id, next_compact_id};

        let id = next_compact_id(9).unwrap();
        assert_eq!(CompactId::from(id).node(), 9);
        assert_eq!(encode_compact_id(id), CompactId::from(id).to_string());
        assert_eq!(decode_compact_id(&encode_compact_id(id)), Ok(id));
        assert!(decode_compact_id("X000000000000").is_err());
        assert_eq!(next_compact_id(1024), Err(Error::NodeIdOutOfRange(1024)));
    }
}
