//! Millisecond timestamps for protocol timeouts.
//!
//! Wall-clock milliseconds since the Unix epoch. A clock set before 1970
//! reads as 0.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub fn millis_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

/// Milliseconds elapsed since `last`, a value from [`millis_now`].
///
/// Negative if the wall clock stepped backwards.
pub fn millis_since(last: i64) -> i64 {
    millis_now().saturating_sub(last)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn now_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(millis_now() > 1_577_836_800_000);
    }

    #[test]
    fn since_measures_elapsed_time() {
        let start = millis_now();
        std::thread::sleep(Duration::from_millis(20));
        let elapsed = millis_since(start);
        assert!(elapsed >= 20, "{elapsed}");
        assert!(elapsed < 10_000, "{elapsed}");
    }

    #[test]
    fn since_far_past_does_not_overflow() {
        assert!(millis_since(i64::MIN) > 0);
        assert!(millis_since(millis_now() + 60_000) < 0);
    }
}
