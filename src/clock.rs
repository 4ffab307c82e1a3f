//! Wall-clock readings in the units and epochs used by the identifier layouts.
//!
//! A system clock set before the Unix epoch reads as the epoch itself rather than failing.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Number of 100-nanosecond intervals between 1582-10-15 (the Gregorian reform, the epoch of
/// UUIDv1 timestamps) and 1970-01-01.
pub const GREGORIAN_TO_UNIX_TICKS: u64 = 0x01b2_1dd2_1381_4000;

/// Number of nanoseconds between 1582-10-15 and 1970-01-01.
pub const GREGORIAN_TO_UNIX_NANOS: u128 = GREGORIAN_TO_UNIX_TICKS as u128 * 100;

fn since_unix_epoch() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

/// Returns the current Unix timestamp in milliseconds.
pub fn unix_ts_ms() -> u64 {
    since_unix_epoch().as_millis() as u64
}

/// Returns the current time in nanoseconds since 1582-10-15.
///
/// The actual resolution depends on the platform clock.
pub fn gregorian_nanos() -> u128 {
    GREGORIAN_TO_UNIX_NANOS + since_unix_epoch().as_nanos()
}

/// Returns the current time in 100-nanosecond ticks since 1582-10-15, the timestamp unit of
/// UUIDv1.
pub fn gregorian_ticks() -> u64 {
    (gregorian_nanos() / 100) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Anchors Gregorian ticks to the Unix epoch
    #[test]
    fn anchors_gregorian_ticks_to_the_unix_epoch() {
        // 141427 days between 1582-10-15 and 1970-01-01
        assert_eq!(GREGORIAN_TO_UNIX_TICKS, 141_427 * 86_400 * 10_000_000);

        let before = unix_ts_ms();
        let ticks = gregorian_ticks();
        let after = unix_ts_ms();
        let ms = (ticks - GREGORIAN_TO_UNIX_TICKS) / 10_000;
        assert!(before <= ms && ms <= after);
    }
}
