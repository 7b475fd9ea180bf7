//! Time-bounded caches for fetched records (incidents, affected users, user search).
//!
//! Provides:
//! - A `Clock` seam so expiry is testable without sleeping
//! - Per-cache TTL, independently tunable
//! - Explicit `clear` for refresh actions
//! - Thread-safe access via `Mutex`, shared by reference or `Arc`

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Millisecond wall clock.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;

    /// Current time as an RFC3339 UTC string.
    fn now_rfc3339(&self) -> String {
        let nanos = i128::from(self.now_ms()) * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .ok()
            .and_then(|dt| dt.format(&Rfc3339).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        u64::try_from(nanos / 1_000_000).unwrap_or(0)
    }
}

/// Hand-driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Cached value with its absolute expiry.
struct CachedEntry<V> {
    value: V,
    expires_at_ms: u64,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Keyed cache with TTL-based expiration. A singleton cache uses `()` as its key.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CachedEntry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value if `now < expiry`.
    pub fn get(&self, key: &K, now_ms: u64) -> Option<V> {
        let entries = lock(&self.entries);
        let cached = entries.get(key)?;
        if now_ms < cached.expires_at_ms {
            return Some(cached.value.clone());
        }
        None
    }

    /// Store a value expiring at `now + ttl`, replacing any previous entry.
    pub fn set(&self, key: K, value: V, now_ms: u64) {
        let ttl_ms = u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX);
        let mut entries = lock(&self.entries);
        entries.insert(
            key,
            CachedEntry {
                value,
                expires_at_ms: now_ms.saturating_add(ttl_ms),
            },
        );
    }

    pub fn expiry(&self, key: &K) -> Option<u64> {
        lock(&self.entries).get(key).map(|e| e.expires_at_ms)
    }

    pub fn invalidate(&self, key: &K) {
        lock(&self.entries).remove(key);
    }

    /// Empty values and expiries immediately (explicit refresh).
    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    pub fn stats(&self, now_ms: u64) -> CacheStats {
        let entries = lock(&self.entries);
        let live = entries
            .values()
            .filter(|e| now_ms < e.expires_at_ms)
            .count();
        CacheStats {
            entries: entries.len(),
            live_entries: live,
            ttl_ms: u64::try_from(self.ttl.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub live_entries: usize,
    pub ttl_ms: u64,
}
