//! Key Pattern Module
//!
//! Predicates over key strings used for bulk invalidation.

use regex::Regex;

use crate::error::Result;

// == Key Pattern ==
/// Selects keys for [`CacheStore::clear_pattern`](super::CacheStore::clear_pattern).
#[derive(Debug, Clone)]
pub enum KeyPattern {
    /// Matches keys containing the string anywhere
    Substring(String),
    /// Matches keys the regular expression finds a match in
    Regex(Regex),
}

impl KeyPattern {
    /// Compiles a regular-expression pattern.
    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(Self::Regex(Regex::new(pattern)?))
    }

    /// Returns true if `key` is selected by this pattern.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Substring(needle) => key.contains(needle.as_str()),
            Self::Regex(re) => re.is_match(key),
        }
    }
}

impl From<&str> for KeyPattern {
    fn from(needle: &str) -> Self {
        Self::Substring(needle.to_string())
    }
}

impl From<String> for KeyPattern {
    fn from(needle: String) -> Self {
        Self::Substring(needle)
    }
}

impl From<Regex> for KeyPattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    #[test]
    fn test_substring_matches_anywhere() {
        let pattern = KeyPattern::from("projects");
        assert!(pattern.matches("projects:limit:10"));
        assert!(pattern.matches("user-projects:1"));
        assert!(!pattern.matches("users:1"));
    }

    #[test]
    fn test_regex_anchored() {
        let pattern = KeyPattern::regex("^projects:").unwrap();
        assert!(pattern.matches("projects:limit:10"));
        assert!(!pattern.matches("user-projects:1"));
    }

    #[test]
    fn test_invalid_regex() {
        let result = KeyPattern::regex("([a-z]");
        assert!(matches!(result, Err(CacheError::InvalidPattern(_))));
    }
}
