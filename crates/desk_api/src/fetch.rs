use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use desk_core::cache::{CacheStats, Clock, TtlCache};
use desk_core::error::AppError;

use crate::singleflight::SingleFlight;

/// "Fetch with TTL cache and fallback".
///
/// Contract:
/// - A live entry is returned without calling `load` unless `force` is set.
/// - Concurrent misses for one key share a single `load`.
/// - Successful loads are cached with `expiry = now + ttl`.
/// - Failed loads never touch the cache; the caller gets `fallback(&err)` instead, logged at
///   `info` for "not found" and `warn` for everything else.
pub struct CachedFetch<K, V> {
    name: &'static str,
    cache: TtlCache<K, V>,
    flights: SingleFlight<K, Result<V, AppError>>,
    clock: Arc<dyn Clock>,
}

impl<K, V> CachedFetch<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        CachedFetch {
            name,
            cache: TtlCache::new(ttl),
            flights: SingleFlight::new(),
            clock,
        }
    }

    pub fn get(
        &self,
        key: &K,
        force: bool,
        load: impl FnOnce() -> Result<V, AppError>,
        fallback: impl FnOnce(&AppError) -> V,
    ) -> V {
        if !force {
            if let Some(hit) = self.cache.get(key, self.clock.now_ms()) {
                tracing::trace!(cache = self.name, ?key, "cache hit");
                return hit;
            }
        }

        let outcome = self.flights.run(key.clone(), || {
            let loaded = load();
            if let Ok(value) = &loaded {
                self.cache.set(key.clone(), value.clone(), self.clock.now_ms());
            }
            loaded
        });

        match outcome {
            Ok(value) => value,
            Err(err) if err.is_not_found() => {
                tracing::info!(cache = self.name, ?key, error = %err, "not found; serving placeholder");
                fallback(&err)
            }
            Err(err) => {
                tracing::warn!(
                    cache = self.name,
                    ?key,
                    error = %err,
                    details = err.details.as_deref().unwrap_or(""),
                    "fetch failed; serving placeholder"
                );
                fallback(&err)
            }
        }
    }

    pub fn clear(&self) {
        tracing::debug!(cache = self.name, "cache cleared");
        self.cache.clear();
    }

    pub fn expiry(&self, key: &K) -> Option<u64> {
        self.cache.expiry(key)
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats(self.clock.now_ms())
    }
}
