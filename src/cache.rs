//! Key-value cache holding rate-limit windows.
//!
//! DESIGN
//! ======
//! The limiter only needs `get` and `set`-with-TTL, so the store sits behind
//! the `WindowCache` trait and the limiter never assumes a backend. Values are
//! untyped JSON: whatever the store hands back is re-validated by the reader,
//! which keeps a corrupted or foreign entry from ever becoming an error.
//!
//! `MemoryCache` is the in-process backend. Expired entries are invisible to
//! `get` immediately and physically removed by `purge_expired`, which the
//! sweeper task calls on an interval.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::debug;

// =============================================================================
// TRAIT
// =============================================================================

/// Minimal cache contract used by the rate limiter.
pub trait WindowCache: Send + Sync {
    /// Return the stored value, or `None` when absent or expired.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key` for `ttl`, replacing any previous entry.
    fn set(&self, key: &str, value: Value, ttl: Duration);
}

// =============================================================================
// MEMORY CACHE
// =============================================================================

struct Entry {
    value: Value,
    expires_at: Instant,
}

#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<Value> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.value.clone())
    }

    fn set_at(&self, key: &str, value: Value, ttl: Duration, now: Instant) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), Entry { value, expires_at: now + ttl });
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        before - entries.len()
    }

    /// Number of entries currently held, expired or not.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl WindowCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) {
        self.set_at(key, value, ttl, Instant::now());
    }
}

// =============================================================================
// SWEEPER
// =============================================================================

/// Spawn the background task that purges expired entries every `interval`.
pub fn spawn_sweeper(cache: MemoryCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let removed = cache.purge_expired();
            if removed > 0 {
                debug!(removed, remaining = cache.entry_count(), "cache: purged expired entries");
            }
        }
    })
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
