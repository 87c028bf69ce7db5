//! Per-user rate limiting for AI requests.
//!
//! DESIGN
//! ======
//! Sliding window, not a fixed bucket: each admitted request stores its unix
//! timestamp in a per-user list held by the injected `WindowCache`. A check
//! reads the list, drops entries that fell out of the trailing window, and
//! admits only while fewer than `limit` remain. Denied requests never write,
//! so hammering the endpoint while throttled does not extend the lockout.
//!
//! Cache keys are a SHA-256 of a fixed prefix plus the user identifier, so
//! identifier length and charset never matter to the backing store.
//!
//! TRADE-OFFS
//! ==========
//! The read-prune-append-write sequence is not atomic. Two concurrent checks
//! for the same user can both read the pre-append list and both admit, so the
//! effective limit may be exceeded by the number of racing requests. This is
//! advisory throttling, not a billing quota. Exact enforcement would need a
//! compare-and-swap on the cache entry or a per-key mutex.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::cache::WindowCache;
use crate::config::RateLimitSettings;

const CACHE_KEY_PREFIX: &str = "cowriter_ratelimit_";

/// Extra lifetime given to a window entry beyond the window itself.
const CACHE_TTL_BUFFER_SECS: u64 = 60;

pub const HEADER_LIMIT: &str = "X-RateLimit-Limit";
pub const HEADER_REMAINING: &str = "X-RateLimit-Remaining";
pub const HEADER_RESET: &str = "X-RateLimit-Reset";

// =============================================================================
// RESULT
// =============================================================================

/// Outcome of a single `check_limit` call.
///
/// Invariants: `remaining <= limit`, and `remaining == 0` when denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitResult {
    allowed: bool,
    limit: u32,
    remaining: u32,
    reset_time: i64,
}

impl RateLimitResult {
    #[must_use]
    pub fn allowed(&self) -> bool {
        self.allowed
    }

    #[cfg(test)]
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[cfg(test)]
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[cfg(test)]
    /// Unix timestamp at which the oldest counted request leaves the window.
    #[must_use]
    pub fn reset_time(&self) -> i64 {
        self.reset_time
    }

    /// Rate-limit headers for the HTTP response.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, String); 3] {
        [
            (HEADER_LIMIT, self.limit.to_string()),
            (HEADER_REMAINING, self.remaining.to_string()),
            (HEADER_RESET, self.reset_time.to_string()),
        ]
    }

    /// Seconds until a new request may be admitted. Never negative.
    #[must_use]
    pub fn retry_after(&self) -> u64 {
        self.retry_after_at(unix_now())
    }

    fn retry_after_at(&self, now: i64) -> u64 {
        u64::try_from(self.reset_time.saturating_sub(now)).unwrap_or(0)
    }
}

// =============================================================================
// RATE LIMITER
// =============================================================================

#[derive(Clone)]
pub struct RateLimiter {
    cache: Arc<dyn WindowCache>,
    limit: u32,
    window_secs: u64,
}

impl RateLimiter {
    #[must_use]
    pub fn new(cache: Arc<dyn WindowCache>, settings: RateLimitSettings) -> Self {
        Self { cache, limit: settings.requests, window_secs: settings.window_secs }
    }

    /// Check the caller's window and record the request when admitted.
    #[must_use]
    pub fn check_limit(&self, user_identifier: &str) -> RateLimitResult {
        self.check_limit_at(user_identifier, unix_now())
    }

    /// Internal: check + record with explicit timestamp (for testing).
    fn check_limit_at(&self, user_identifier: &str, now: i64) -> RateLimitResult {
        let key = cache_key(user_identifier);
        let window = i64::try_from(self.window_secs).unwrap_or(i64::MAX);
        let cutoff = now.saturating_sub(window);

        let mut timestamps: Vec<i64> = read_timestamps(self.cache.get(&key))
            .into_iter()
            .filter(|&ts| ts > cutoff)
            .collect();

        let reset_time = timestamps
            .iter()
            .copied()
            .min()
            .unwrap_or(now)
            .saturating_add(window);

        let count = u32::try_from(timestamps.len()).unwrap_or(u32::MAX);
        if count >= self.limit {
            return RateLimitResult { allowed: false, limit: self.limit, remaining: 0, reset_time };
        }

        timestamps.push(now);
        let ttl = Duration::from_secs(self.window_secs.saturating_add(CACHE_TTL_BUFFER_SECS));
        self.cache.set(&key, Value::from(timestamps), ttl);

        RateLimitResult { allowed: true, limit: self.limit, remaining: self.limit - (count + 1), reset_time }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Fixed-length cache key for an arbitrary identifier.
fn cache_key(user_identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(CACHE_KEY_PREFIX.as_bytes());
    hasher.update(user_identifier.as_bytes());
    let bytes = hasher.finalize();
    bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
}

/// Coerce a cached value into timestamps, dropping anything that is not an
/// integer. A non-array value reads as an empty window.
fn read_timestamps(stored: Option<Value>) -> Vec<i64> {
    match stored {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_i64).collect(),
        _ => Vec::new(),
    }
}

/// Current time as seconds since Unix epoch.
pub(crate) fn unix_now() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_secs()).unwrap_or(0)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
