//! Selector Module
//!
//! Selectors pick entries for removal and describe declared dependencies.

use std::fmt;

use regex::Regex;

use crate::cache::key::derive_key;
use crate::error::{CacheError, Result};

// == Selector ==
/// Identifies one entry by logical key, or many entries by pattern.
#[derive(Debug, Clone)]
pub enum Selector {
    /// A single logical key, used verbatim
    Plain(String),
    /// A regular expression tested against stored logical keys
    Pattern(Regex),
}

impl Selector {
    /// Creates a plain selector.
    pub fn plain(key: impl Into<String>) -> Self {
        Selector::Plain(key.into())
    }

    /// Compiles a pattern selector from a regular-expression source.
    pub fn pattern(source: &str) -> Result<Self> {
        Regex::new(source)
            .map(Selector::Pattern)
            .map_err(|e| CacheError::InvalidPattern(e.to_string()))
    }

    // == Matches ==
    /// Checks whether an entry stored under `internal_key` with `logical_key`
    /// is selected.
    ///
    /// Plain selectors compare derived keys, so they select whatever entry
    /// shares their hash.
    pub fn matches(&self, internal_key: &str, logical_key: &str) -> bool {
        match self {
            Selector::Plain(key) => derive_key(key) == internal_key,
            Selector::Pattern(re) => re.is_match(logical_key),
        }
    }
}

impl From<&str> for Selector {
    fn from(key: &str) -> Self {
        Selector::Plain(key.to_string())
    }
}

impl From<String> for Selector {
    fn from(key: String) -> Self {
        Selector::Plain(key)
    }
}

impl From<Regex> for Selector {
    fn from(re: Regex) -> Self {
        Selector::Pattern(re)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Plain(key) => write!(f, "{}", key),
            Selector::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}
