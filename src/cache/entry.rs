//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A single cached value with the time it was stored and how long it stays valid.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub data: T,
    /// When the entry was stored
    pub created_at: Instant,
    /// How long the entry stays valid after `created_at`
    pub ttl: Duration,
    /// Position in insertion order, used for eviction
    pub(crate) sequence: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub(crate) fn new(data: T, ttl: Duration, sequence: u64) -> Self {
        Self {
            data,
            created_at: Instant::now(),
            ttl,
            sequence,
        }
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now`.
    ///
    /// An entry is valid while `now - created_at <= ttl`. A zero TTL is
    /// always stale, so it expires even when the clock has not moved.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.ttl.is_zero() || now.saturating_duration_since(self.created_at) > self.ttl
    }

    /// Checks if the entry is stale right now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
