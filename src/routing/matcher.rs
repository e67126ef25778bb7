//! Route prefix matching.
//!
//! # Responsibilities
//! - Match request paths against a group prefix
//! - Detect overlapping prefixes before registration
//!
//! # Design Decisions
//! - Matching is on whole path segments: `/CLI/PS` owns `/CLI/PS/x`
//!   but not `/CLI/PSX`
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching

use axum::http::Request;

/// Matches the request path prefix on segment boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. A trailing `/` is ignored.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        while prefix.len() > 1 && prefix.ends_with('/') {
            prefix.pop();
        }
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if `path` is the prefix itself or lies beneath it.
    pub fn matches_path(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || self.prefix == "/",
            None => false,
        }
    }

    /// Returns true if the request path lies under this prefix.
    pub fn matches<B>(&self, req: &Request<B>) -> bool {
        self.matches_path(req.uri().path())
    }

    /// Two prefixes overlap when either one owns the other.
    pub fn overlaps(&self, other: &PathPrefixMatcher) -> bool {
        self.matches_path(&other.prefix) || other.matches_path(&self.prefix)
    }
}
