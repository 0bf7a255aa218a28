//! Query Cache - A bounded in-process cache for expensive reads
//!
//! Provides TTL expiration, insertion-order eviction, a read-through wrapper
//! and a background reaper for stale entries.

pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod tasks;

pub use cache::{CacheStats, KeyPattern, QueryCache};
pub use config::Config;
pub use error::{CacheError, CachedQueryError, Result};
pub use key::create_cache_key;
pub use tasks::{spawn_reaper, ReaperHandle};
