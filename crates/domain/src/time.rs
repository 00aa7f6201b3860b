//! Time and timestamp helpers.

use chrono::{DateTime, TimeDelta, Utc};

/// UTC timestamp used for pass times, cooldown stamps, event times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Milliseconds elapsed from `earlier` to `later` (negative if reversed).
#[must_use]
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> i64 {
    (later - earlier).num_milliseconds()
}

/// `ts` shifted forward by `ms` milliseconds.
#[must_use]
pub fn add_ms(ts: Timestamp, ms: u64) -> Timestamp {
    let delta = i64::try_from(ms)
        .ok()
        .and_then(TimeDelta::try_milliseconds)
        .unwrap_or(TimeDelta::MAX);
    ts.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
