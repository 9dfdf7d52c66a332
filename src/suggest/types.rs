//! Core suggestion types

use std::fmt;

/// Text typed so far in the composer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace-only input never reaches the fetcher
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Best completion suffix for a query, or `None` when there is nothing to show
pub type SuggestionResult = Option<String>;

/// Identifies one started fetch; later tokens compare greater
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    /// Nothing scheduled, nothing in flight
    Idle,
    /// Waiting for the debounce/throttle window to elapse
    TimerArmed,
    /// A fetch is in flight
    Fetching,
    /// `dispose()` was called; terminal
    Disposed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_queries() {
        assert!(Query::from("").is_blank());
        assert!(Query::from("   ").is_blank());
        assert!(Query::from("\t\n").is_blank());
        assert!(!Query::from(" a ").is_blank());
    }

    #[test]
    fn test_query_equality_is_by_value() {
        assert_eq!(Query::from("hel"), Query::new(String::from("hel")));
        assert_ne!(Query::from("hel"), Query::from("hel "));
    }

    #[test]
    fn test_request_tokens_increase() {
        let first = RequestToken::default().next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 2);
    }
}
