//! Path pattern matching.
//!
//! # Responsibilities
//! - Match a navigation path against a configured rule pattern
//!
//! # Design Decisions
//! - Exact match, or a trailing `/*` wildcard
//! - The wildcard is a raw string prefix test, not segment-aware:
//!   `/c/*` matches `/c/cosmetics`, `/c` and also `/cabinets`
//! - No regex and no mid-pattern wildcards
//! - Paths are compared as given, without decoding or normalization

/// Suffix that turns a pattern into a prefix match.
pub const WILDCARD_SUFFIX: &str = "/*";

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches one path exactly.
    Exact(String),
    /// Matches every path starting with the prefix.
    Prefix(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix(WILDCARD_SUFFIX) {
            Some(prefix) => PathPattern::Prefix(prefix.to_string()),
            None => PathPattern::Exact(pattern.to_string()),
        }
    }

    /// Returns true if the path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(expected) => path == expected,
            PathPattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// Returns true if `path` matches `pattern`.
pub fn matches(path: &str, pattern: &str) -> bool {
    if pattern == path {
        return true;
    }
    match pattern.strip_suffix(WILDCARD_SUFFIX) {
        Some(prefix) => path.starts_with(prefix),
        None => false,
    }
}
