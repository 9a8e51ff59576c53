//! Timestamp type used throughout the service.
//!
//! Timestamps are Unix epoch seconds (UTC). Token expiry is decided by
//! comparing wall-clock timestamps at verification time; there is no
//! background sweep.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs();
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward by `secs` seconds (saturating).
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Whether this timestamp is strictly in the past relative to `now`.
    pub fn is_past(&self, now: Timestamp) -> bool {
        self.0 < now.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_secs_saturates() {
        let t = Timestamp::new(u64::MAX);
        assert_eq!(t.plus_secs(10), Timestamp::new(u64::MAX));
    }

    #[test]
    fn is_past_is_strict() {
        let t = Timestamp::new(100);
        assert!(t.is_past(Timestamp::new(101)));
        assert!(!t.is_past(Timestamp::new(100)));
        assert!(!t.is_past(Timestamp::new(99)));
    }
}
