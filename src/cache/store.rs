//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with insertion-order tracking
//! and TTL expiration. The store itself is single-threaded; share it through
//! [`QueryCache`](super::QueryCache).

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, InsertionOrder, KeyPattern};
use crate::config::Config;

// == Cache Store ==
/// Bounded key/value storage with FIFO eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Insertion order tracker
    order: InsertionOrder,
    /// Counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// TTL for entries stored without an explicit one
    default_ttl: Duration,
}

impl<T: Clone> CacheStore<T> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        let max_size = if max_size == 0 {
            warn!("Cache max_size of 0 is not usable, using 1");
            1
        } else {
            max_size
        };

        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(max_size),
            max_size,
            default_ttl,
        }
    }

    /// Creates a CacheStore from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_size, config.default_ttl)
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous entry wholesale.
    ///
    /// A replaced key gets a fresh `created_at` and becomes the newest entry.
    /// If the key is new and the cache is at capacity, the earliest-inserted
    /// entry is evicted first. Replacing an existing key never evicts.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL (uses default_ttl if None). Zero is accepted and
    ///   is immediately stale.
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            self.evict_oldest();
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        let sequence = self.order.push(&key);
        self.entries.insert(key, CacheEntry::new(value, ttl, sequence));

        self.compact_order();
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A stale entry is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = Instant::now();

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.stats.record_hit();
                return Some(entry.data.clone());
            }
            Some(_) => {}
            None => {
                self.stats.record_miss();
                return None;
            }
        }

        self.entries.remove(key);
        self.stats.record_miss();
        self.stats.record_expirations(1);
        self.compact_order();
        debug!(key, "Expired cache entry removed on read");
        None
    }

    // == Contains ==
    /// Returns true if `key` holds a live entry. Does not remove stale ones.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map_or(false, |entry| !entry.is_expired())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.compact_order();
        }
        removed
    }

    // == Clear Matching ==
    /// Removes every key for which `predicate` returns true.
    ///
    /// The predicate is called exactly once per key. Returns the number of
    /// entries removed.
    pub fn clear_matching<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|key, _| !predicate(key));
        let removed = before - self.entries.len();

        if removed > 0 {
            self.compact_order();
            debug!(removed, "Cleared matching cache entries");
        }
        removed
    }

    // == Clear Pattern ==
    /// Removes every key selected by `pattern` (substring or regex).
    pub fn clear_pattern(&mut self, pattern: impl Into<KeyPattern>) -> usize {
        let pattern = pattern.into();
        self.clear_matching(|key| pattern.matches(key))
    }

    // == Clear ==
    /// Removes all entries. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    // == Clean Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn clean_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();

        if removed > 0 {
            self.stats.record_expirations(removed);
            self.compact_order();
        }
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.size = self.entries.len();
        stats
    }

    // == Length ==
    /// Returns the current number of entries, stale ones included until removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the capacity.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the TTL used when `set` gets none.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn evict_oldest(&mut self) {
        let entries = &self.entries;
        let oldest = self
            .order
            .pop_oldest(|key, sequence| is_live(entries, key, sequence));

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.stats.record_eviction();
            debug!(key = %key, "Evicted oldest cache entry");
        }
    }

    fn compact_order(&mut self) {
        let entries = &self.entries;
        self.order
            .compact_if_needed(entries.len(), |key, sequence| is_live(entries, key, sequence));
    }
}

fn is_live<T>(entries: &HashMap<String, CacheEntry<T>>, key: &str, sequence: u64) -> bool {
    entries
        .get(key)
        .map_or(false, |entry| entry.sequence == sequence)
}
