//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and insertion-order eviction.

mod entry;
mod order;
mod pattern;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub(crate) use order::InsertionOrder;
pub use pattern::KeyPattern;
pub use shared::QueryCache;
pub use stats::CacheStats;
pub use store::CacheStore;
