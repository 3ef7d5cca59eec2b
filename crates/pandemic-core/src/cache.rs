use dashmap::DashMap;
use std::future::Future;
use std::time::{Duration, Instant};

/// Memoization service keyed by function name and arguments, see [`TtlCache::key`].
///
/// Entries expire independently. Reads and writes go through a sharded concurrent map, so
/// concurrent sessions never wait on a global lock; two callers racing on an expired key
/// may both recompute, and the last write wins.
pub struct TtlCache<V> {
    entries: DashMap<String, Entry<V>>,
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() < self.ttl
    }
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// `"name:arg1:arg2"`
    pub fn key(function: &str, args: &[&str]) -> String {
        let mut key = function.to_string();
        for arg in args {
            key.push(':');
            key.push_str(arg);
        }
        key
    }

    /// Fresh value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;
        entry.is_fresh().then(|| entry.value.clone())
    }

    pub fn insert(&self, key: String, value: V, ttl: Duration) {
        self.entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Return the fresh value under `key`, or compute, store and return it.
    pub fn get_or_compute<F>(&self, key: &str, ttl: Duration, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(key) {
            log::trace!("cache hit: {key}");
            return value;
        }
        log::trace!("cache miss: {key}");
        let value = compute();
        self.insert(key.to_string(), value.clone(), ttl);
        value
    }

    /// Async, fallible [`get_or_compute`]; an error is handed back and nothing is stored.
    ///
    /// [`get_or_compute`]: TtlCache::get_or_compute
    pub async fn get_or_try_compute<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            log::trace!("cache hit: {key}");
            return Ok(value);
        }
        log::trace!("cache miss: {key}");
        let value = compute().await?;
        self.insert(key.to_string(), value.clone(), ttl);
        Ok(value)
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        self.entries.retain(|_, entry| entry.is_fresh());
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn key_joins_function_and_args() {
        assert_eq!(TtlCache::<u8>::key("load_prices", &["SPY"]), "load_prices:SPY");
        assert_eq!(TtlCache::<u8>::key("load_events", &[]), "load_events");
    }

    #[test]
    fn computes_once_while_fresh() {
        let cache = TtlCache::new();
        let calls = Cell::new(0);
        for _ in 0..3 {
            let value = cache.get_or_compute("k", HOUR, || {
                calls.set(calls.get() + 1);
                42
            });
            assert_eq!(value, 42);
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn expired_entries_are_recomputed() {
        let cache = TtlCache::new();
        let calls = Cell::new(0);
        for _ in 0..2 {
            cache.get_or_compute("k", Duration::ZERO, || {
                calls.set(calls.get() + 1);
                "v".to_string()
            });
        }
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.get("k"), None);

        cache.purge_expired();
        assert!(cache.is_empty());
    }

    #[test]
    fn keys_expire_independently() {
        let cache = TtlCache::new();
        cache.insert("short".to_string(), 1, Duration::ZERO);
        cache.insert("long".to_string(), 2, HOUR);
        assert_eq!(cache.get("short"), None);
        assert_eq!(cache.get("long"), Some(2));

        cache.invalidate("long");
        assert_eq!(cache.get("long"), None);
    }

    #[test]
    fn shared_across_threads() {
        let cache = std::sync::Arc::new(TtlCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    let key = TtlCache::<usize>::key("square", &[&(i % 2).to_string()]);
                    cache.get_or_compute(&key, HOUR, || (i % 2) * (i % 2))
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap() <= 1);
        }
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn failures_are_not_stored() {
        let cache: TtlCache<u32> = TtlCache::new();
        let failed: Result<u32, &str> = cache
            .get_or_try_compute("k", HOUR, || async { Err("store down") })
            .await;
        assert_eq!(failed, Err("store down"));
        assert!(cache.is_empty());

        let ok: Result<u32, &str> = cache
            .get_or_try_compute("k", HOUR, || async { Ok(7) })
            .await;
        assert_eq!(ok, Ok(7));
        assert_eq!(cache.get("k"), Some(7));
    }
}
