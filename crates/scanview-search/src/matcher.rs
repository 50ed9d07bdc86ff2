//! Free-text matching for search boxes.
//!
//! A query is tried as a case-insensitive regular expression first. Typing
//! is incremental, so half-written patterns such as `vm-(` are common; a
//! query that does not compile degrades to case-insensitive substring
//! containment instead of failing.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use scanview_core::defaults::REGEX_SIZE_LIMIT;
use scanview_core::{Error, Result};

#[derive(Debug, Clone)]
pub enum TextMatcher {
    /// Empty query: everything matches.
    Any,
    Pattern(Regex),
    /// Lower-cased query for containment tests.
    Substring(String),
}

impl TextMatcher {
    pub fn new(query: &str) -> Self {
        Self::with_size_limit(query, REGEX_SIZE_LIMIT)
    }

    pub fn with_size_limit(query: &str, size_limit: usize) -> Self {
        if query.trim().is_empty() {
            return TextMatcher::Any;
        }
        match compile(query, size_limit) {
            Ok(regex) => TextMatcher::Pattern(regex),
            Err(err) => {
                debug!(
                    subsystem = "search",
                    component = "matcher",
                    query = %query,
                    error = %err,
                    "Query is not a valid regex, falling back to substring match"
                );
                TextMatcher::Substring(query.to_lowercase())
            }
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            TextMatcher::Any => true,
            TextMatcher::Pattern(regex) => regex.is_match(haystack),
            TextMatcher::Substring(needle) => haystack.to_lowercase().contains(needle.as_str()),
        }
    }

    /// Whether the query fell back to substring matching.
    pub fn is_fallback(&self) -> bool {
        matches!(self, TextMatcher::Substring(_))
    }
}

/// Compile a query as a case-insensitive regex.
pub fn compile(query: &str, size_limit: usize) -> Result<Regex> {
    RegexBuilder::new(query)
        .case_insensitive(true)
        .size_limit(size_limit)
        .build()
        .map_err(|e| Error::RegexCompile(e.to_string()))
}
