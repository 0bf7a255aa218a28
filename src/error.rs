//! Error types for the query cache
//!
//! Provides unified error handling using thiserror. A cache miss is never an
//! error; these variants only cover key construction and pattern compilation.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the query cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A key parameter could not be canonically encoded
    #[error("Failed to encode cache key parameters: {0}")]
    KeyEncoding(#[from] serde_json::Error),

    /// Key parameters were not a flat name/value mapping
    #[error("Invalid cache key parameters: {0}")]
    InvalidParams(String),

    /// A key pattern failed to compile
    #[error("Invalid key pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

// == Cached Query Error ==
/// Failure of [`QueryCache::cached_query_with_params`](crate::cache::QueryCache::cached_query_with_params).
///
/// Keeps the caller's query error type intact so it can be matched on.
#[derive(Error, Debug)]
pub enum CachedQueryError<E> {
    /// The cache key could not be built; the query was not run
    #[error(transparent)]
    Key(CacheError),

    /// The query itself failed; nothing was cached
    #[error("Query failed: {0}")]
    Query(E),
}

// == Result Type Alias ==
/// Convenience Result type for the query cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_params_message() {
        let err = CacheError::InvalidParams("expected an object, got array".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid cache key parameters: expected an object, got array"
        );
    }

    #[test]
    fn test_invalid_pattern_from_regex() {
        let err: CacheError = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, CacheError::InvalidPattern(_)));
    }

    #[test]
    fn test_cached_query_error_display() {
        let err: CachedQueryError<String> = CachedQueryError::Query("db down".to_string());
        assert_eq!(err.to_string(), "Query failed: db down");

        let err: CachedQueryError<String> =
            CachedQueryError::Key(CacheError::InvalidParams("bad".to_string()));
        assert_eq!(err.to_string(), "Invalid cache key parameters: bad");
    }
}
