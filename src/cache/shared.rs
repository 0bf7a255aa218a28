//! Shared Cache Handle
//!
//! Thread-safe handle around [`CacheStore`], constructed once at startup and
//! cloned into request-handling code.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore, KeyPattern};
use crate::config::Config;
use crate::error::CachedQueryError;
use crate::key::create_cache_key;

/// Cloneable handle to a shared cache.
///
/// Contains the cache store wrapped in `Arc<RwLock<>>`. Every operation takes
/// the lock for its own duration only and never awaits anything else while
/// holding it.
#[derive(Debug)]
pub struct QueryCache<T> {
    inner: Arc<RwLock<CacheStore<T>>>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> QueryCache<T> {
    /// Creates a new cache with the given capacity and default TTL.
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self::from_store(CacheStore::new(max_size, default_ttl))
    }

    /// Creates a new cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::from_store(CacheStore::from_config(config))
    }

    /// Wraps an existing store.
    pub fn from_store(store: CacheStore<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Looks up `key`. A stale entry is removed and reported as absent.
    pub async fn get(&self, key: &str) -> Option<T> {
        // Write lock: a lookup may expire the entry and always updates counters
        self.inner.write().await.get(key)
    }

    /// Stores `value` under `key` with the given TTL, or the default.
    pub async fn set(&self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        self.inner.write().await.set(key, value, ttl);
    }

    /// Removes `key`. Returns whether anything was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.inner.write().await.delete(key)
    }

    /// Removes every key selected by `pattern`.
    pub async fn clear_pattern(&self, pattern: impl Into<KeyPattern>) -> usize {
        let pattern = pattern.into();
        self.inner.write().await.clear_pattern(pattern)
    }

    /// Removes every key for which `predicate` returns true.
    pub async fn clear_matching<F>(&self, predicate: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        self.inner.write().await.clear_matching(predicate)
    }

    /// Removes all entries.
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    /// Removes every expired entry. Returns the number removed.
    pub async fn clean_expired(&self) -> usize {
        self.inner.write().await.clean_expired()
    }

    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    /// Returns the current number of entries.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Returns true if `key` holds a live entry, without side effects.
    pub async fn contains_key(&self, key: &str) -> bool {
        self.inner.read().await.contains_key(key)
    }

    // == Read-through ==
    /// Returns the cached value for `key`, or runs `query_fn` and caches its result.
    ///
    /// The lock is released while `query_fn` runs. Concurrent misses on the
    /// same key are not coalesced, so `query_fn` may run once per racing
    /// caller; the last result stored wins. An `Err` from `query_fn` is
    /// returned unchanged and nothing is cached, so the next call retries.
    pub async fn cached_query<F, Fut, E>(
        &self,
        key: &str,
        query_fn: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get(key).await {
            debug!(key, "Query cache hit");
            return Ok(cached);
        }

        debug!(key, "Query cache miss, running query");
        let value = query_fn().await?;
        self.set(key, value.clone(), ttl).await;
        Ok(value)
    }

    /// Builds the key from `prefix` and `params`, then behaves as [`cached_query`](Self::cached_query).
    ///
    /// `query_fn` is not run if the key cannot be built.
    pub async fn cached_query_with_params<P, F, Fut, E>(
        &self,
        prefix: &str,
        params: &P,
        query_fn: F,
        ttl: Option<Duration>,
    ) -> Result<T, CachedQueryError<E>>
    where
        P: Serialize + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = create_cache_key(prefix, params).map_err(CachedQueryError::Key)?;
        self.cached_query(&key, query_fn, ttl)
            .await
            .map_err(CachedQueryError::Query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> QueryCache<String> {
        QueryCache::new(100, Duration::from_secs(300))
    }

    #[test]
    fn test_clones_share_state() {
        tokio_test::block_on(async {
            let cache = cache();
            let other = cache.clone();

            cache.set("key1", "value1".to_string(), None).await;

            assert_eq!(other.get("key1").await, Some("value1".to_string()));
            assert_eq!(other.len().await, 1);
        });
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let cache = cache();

        cache.set("projects:1", "a".to_string(), None).await;
        cache.set("projects:2", "b".to_string(), None).await;
        cache.set("users:1", "c".to_string(), None).await;

        assert!(cache.delete("projects:1").await);
        assert!(!cache.delete("projects:1").await);
        assert_eq!(cache.clear_matching(|key| key.starts_with("users")).await, 1);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = Config::default().with_max_size(2);
        let cache: QueryCache<u8> = QueryCache::from_config(&config);

        cache.set("a", 1, None).await;
        cache.set("b", 2, None).await;
        cache.set("c", 3, None).await;

        let stats = cache.stats().await;
        assert_eq!(stats.size, 2);
        assert_eq!(stats.max_size, 2);
        assert!(!cache.contains_key("a").await);
    }

    #[tokio::test]
    async fn test_cached_query_hit_skips_query() {
        let cache = cache();
        cache.set("key1", "cached".to_string(), None).await;

        let calls = AtomicUsize::new(0);
        let result: Result<String, String> = cache
            .cached_query(
                "key1",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("fresh".to_string())
                },
                None,
            )
            .await;

        assert_eq!(result, Ok("cached".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cached_query_error_is_not_cached() {
        let cache = cache();

        let result: Result<String, String> = cache
            .cached_query("key1", || async { Err("db down".to_string()) }, None)
            .await;

        assert_eq!(result, Err("db down".to_string()));
        assert!(!cache.contains_key("key1").await);
    }

    #[tokio::test]
    async fn test_cached_query_with_params_bad_key_skips_query() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        let result: Result<String, CachedQueryError<String>> = cache
            .cached_query_with_params(
                "projects",
                &[1, 2, 3],
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("value".to_string())
                },
                None,
            )
            .await;

        assert!(matches!(result, Err(CachedQueryError::Key(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
