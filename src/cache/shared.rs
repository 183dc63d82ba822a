//! Shared Cache Handle
//!
//! Cloneable handle over a [`CacheStore`] that request handlers receive
//! through application state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};

// == TTL Cache ==
/// Thread-safe TTL cache. Clones share the same storage.
#[derive(Debug)]
pub struct TtlCache<V> {
    inner: Arc<RwLock<CacheStore<V>>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Creates an empty cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self::from_store(CacheStore::new(default_ttl))
    }

    /// Wraps an existing store.
    pub fn from_store(store: CacheStore<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.inner.write().await.set(key, value, ttl);
    }

    /// Fresh value for `key`, if any. Expired entries are evicted on the way.
    pub async fn get(&self, key: &str) -> Option<V> {
        // Write lock: lookups may evict and bump counters
        self.inner.write().await.get(key)
    }

    pub async fn has(&self, key: &str) -> bool {
        self.inner.write().await.has(key)
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.inner.write().await.delete(key)
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    /// Removes every expired entry, returning how many were dropped.
    pub async fn sweep(&self) -> usize {
        self.inner.write().await.cleanup_expired()
    }

    // == Get Or Set ==
    /// Returns the cached value for `key`, or runs `producer` and caches its result.
    ///
    /// The lock is released while `producer` runs. A producer error is returned
    /// unchanged and nothing is stored. Concurrent misses on the same key may
    /// each run their producer; the last write wins.
    pub async fn get_or_set<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key).await {
            debug!(key, "cache hit");
            return Ok(value);
        }

        debug!(key, "cache miss, computing");
        let value = producer().await?;
        self.set(key, value.clone(), ttl).await;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_clones_share_storage() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let other = cache.clone();

        cache.set("k", 7u32, None).await;

        assert_eq!(other.get("k").await, Some(7));
        assert!(other.delete("k").await);
        assert!(!cache.has("k").await);
    }

    #[tokio::test]
    async fn test_get_or_set_computes_once() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        for _ in 0..2 {
            let value = cache
                .get_or_set("backups:list", None, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(vec!["b1".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(value, vec!["b1".to_string()]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_set_error_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));

        let result = cache
            .get_or_set("k", None, || async { Err("backend down") })
            .await;
        assert_eq!(result, Err("backend down"));
        assert!(!cache.has("k").await);

        let result = cache
            .get_or_set("k", None, || async { Ok::<_, &str>(42) })
            .await;
        assert_eq!(result, Ok(42));
        assert_eq!(cache.get("k").await, Some(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_or_set_recomputes_after_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let calls = &calls;
        let produce = move || async move {
            Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst) + 1)
        };

        let first = cache
            .get_or_set("system:status:brief", Some(Duration::from_secs(30)), produce)
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;
        let second = cache
            .get_or_set("system:status:brief", Some(Duration::from_secs(30)), produce)
            .await
            .unwrap();

        assert_eq!((first, second), (1, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_and_stats() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("short", 1u8, Some(Duration::from_secs(1))).await;
        cache.set("long", 2u8, None).await;

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.sweep().await, 1);
        let stats = cache.stats().await;
        assert_eq!(stats.size, 1);
        assert_eq!(stats.keys, vec!["long".to_string()]);

        cache.clear().await;
        assert_eq!(cache.stats().await.size, 0);
    }
}
