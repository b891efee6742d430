//! Wildcard pattern matching for actions, resources, and condition values
//!
//! A `*` stands for one or more characters other than a newline. It is not a path
//! glob: there is no segment boundary, so `/*/*.log` matches
//! `/var/log/folder/something.log`.
//! Runs of consecutive `*` behave like a single `*`. Patterns always match the entire
//! candidate string.

use crate::error::{AuthzError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard character used in patterns
pub const WILDCARD: char = '*';

static WILDCARD_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*+").unwrap());

/// Stateless wildcard matcher
pub struct PatternMatcher;

impl PatternMatcher {
    /// Check if `value` matches `pattern`
    ///
    /// Patterns without a wildcard require exact equality. Compiles a regex on every
    /// call that has a wildcard; use [`Pattern`] to match the same pattern repeatedly.
    ///
    /// # Examples
    ///
    /// ```
    /// use subject_authz::PatternMatcher;
    ///
    /// assert!(PatternMatcher::matches("a*b", "axxxb"));
    /// assert!(!PatternMatcher::matches("*", ""));
    /// ```
    pub fn matches(pattern: &str, value: &str) -> bool {
        if !pattern.contains(WILDCARD) {
            return pattern == value;
        }

        match Self::compile(pattern) {
            Ok(regex) => regex.is_match(value),
            Err(_) => false,
        }
    }

    /// Translate a pattern into an (unanchored) regex source string
    ///
    /// Literal segments are escaped and joined with `.+`. Empty segments come from
    /// leading or trailing wildcards and stay empty so the join places the operator.
    pub fn to_regex_source(pattern: &str) -> String {
        WILDCARD_RUN
            .split(pattern)
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".+")
    }

    fn compile(pattern: &str) -> Result<Regex> {
        let source = format!(r"\A(?:{})\z", Self::to_regex_source(pattern));
        Regex::new(&source).map_err(|e| AuthzError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Anything a condition or policy can match a candidate string against
pub trait Matches {
    /// Whether `value` satisfies this pattern
    fn matches(&self, value: &str) -> bool;
}

impl Matches for str {
    fn matches(&self, value: &str) -> bool {
        PatternMatcher::matches(self, value)
    }
}

impl Matches for String {
    fn matches(&self, value: &str) -> bool {
        PatternMatcher::matches(self, value)
    }
}

/// A wildcard pattern compiled once and matched many times
///
/// Keeps the raw text alongside the compiled form; the early capability check needs
/// both.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern {
    raw: String,
    /// `None` for literal patterns, which match by equality
    regex: Option<Regex>,
}

impl Pattern {
    /// Compile a pattern
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let regex = if raw.contains(WILDCARD) {
            Some(PatternMatcher::compile(&raw)?)
        } else {
            None
        };

        Ok(Self { raw, regex })
    }

    /// The pattern text as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern contains a wildcard
    pub fn has_wildcard(&self) -> bool {
        self.regex.is_some()
    }
}

impl Matches for Pattern {
    fn matches(&self, value: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(value),
            None => self.raw == value,
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Pattern {}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.raw).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for Pattern {
    type Error = AuthzError;

    fn try_from(raw: String) -> Result<Self> {
        Self::new(raw)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.raw
    }
}

/// True if any pattern in the list matches `value`
pub fn any_matches<P: Matches>(patterns: &[P], value: &str) -> bool {
    patterns.iter().any(|pattern| pattern.matches(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_source(pattern: &str, expected: &str) {
        assert_eq!(
            PatternMatcher::to_regex_source(pattern),
            expected,
            "pattern {:?}",
            pattern
        );
    }

    #[test]
    fn test_regex_source_wildcards() {
        assert_source("*", ".+");
        assert_source("**", ".+");
        assert_source("*/log/dmesg", ".+/log/dmesg");
        assert_source("/var/**/*dmesg", "/var/.+/.+dmesg");
        assert_source("/var/log/*", "/var/log/.+");
    }

    #[test]
    fn test_regex_source_escaping() {
        assert_source("/var/log/*/something.log", r"/var/log/.+/something\.log");
        assert_source("foo[0]{x}*bar", r"foo\[0\]\{x\}.+bar");
        assert_source(r"foo\bar*.log", r"foo\\bar.+\.log");
        assert_source("1 + 1 = *", r"1 \+ 1 = .+");
        assert_source("1 ? 1 = *", r"1 \? 1 = .+");
        assert_source("1 ^ 1 = *", r"1 \^ 1 = .+");
        assert_source("1 $ 1 = *", r"1 \$ 1 = .+");
        assert_source("1 (x) 1 = *", r"1 \(x\) 1 = .+");
        assert_source("1 | 1 = *", r"1 \| 1 = .+");
    }

    #[test]
    fn test_exact_match() {
        assert!(PatternMatcher::matches("some/pattern", "some/pattern"));
        assert!(!PatternMatcher::matches("some/pattern", "some/value"));
        assert!(!PatternMatcher::matches("some/pattern", "some/pattern/"));
    }

    #[test]
    fn test_wildcard_positions() {
        let value = "/var/log/folder/something.log";
        assert!(PatternMatcher::matches("/var/log/*/something.log", value));
        assert!(PatternMatcher::matches("/var/log/*", value));
        assert!(PatternMatcher::matches("/var/log/*/*.log", value));
        assert!(PatternMatcher::matches("/var/*/folder/*.log", value));
        assert!(PatternMatcher::matches("/*/*/*/*.log", value));
        assert!(PatternMatcher::matches("/*/*.log", value));
        assert!(PatternMatcher::matches("*.log", value));
        assert!(PatternMatcher::matches("/var/*/folder/*", value));
        assert!(PatternMatcher::matches("*/folder/*.log", value));
        assert!(PatternMatcher::matches("*/folder/*", value));
    }

    #[test]
    fn test_wildcard_requires_at_least_one_char() {
        assert!(!PatternMatcher::matches("*", ""));
        assert!(PatternMatcher::matches("*", "a"));
        assert!(PatternMatcher::matches("a*", "ab"));
        assert!(!PatternMatcher::matches("a*", "a"));
        assert!(PatternMatcher::matches("a*b", "axxxb"));
        assert!(!PatternMatcher::matches("a*b", "ab"));
        assert!(!PatternMatcher::matches("a**b", "ab"));
    }

    #[test]
    fn test_wildcard_backtracks_to_later_match() {
        assert!(PatternMatcher::matches(
            "a:b:c:*:e:f:g",
            "a:b:c:d:e:f:g:a:b:c:d:e:f:g"
        ));
    }

    #[test]
    fn test_whole_string_anchoring() {
        assert!(!PatternMatcher::matches("auth:*", "xauth:foo"));
        assert!(!PatternMatcher::matches("*:foo", "a:foo:bar"));
        assert!(!PatternMatcher::matches("a.c*", "abcd"));
    }

    #[test]
    fn test_wildcard_stops_at_newlines() {
        assert!(!PatternMatcher::matches("a*b", "a\nb"));
        assert!(!PatternMatcher::matches("auth:principals/*", "auth:principals/u1\nadmin"));
        assert!(!Pattern::new("docs:*").unwrap().matches("docs:a\nb"));
    }

    #[test]
    fn test_compiled_pattern() {
        let literal = Pattern::new("auth:principals/u1").unwrap();
        assert!(!literal.has_wildcard());
        assert!(literal.matches("auth:principals/u1"));
        assert!(!literal.matches("auth:principals/u2"));

        let wild = Pattern::new("money:accounts/*").unwrap();
        assert!(wild.has_wildcard());
        assert!(wild.matches("money:accounts/acct1"));
        assert!(!wild.matches("money:accounts/"));
        assert_eq!(wild.as_str(), "money:accounts/*");
        assert_eq!(wild.to_string(), "money:accounts/*");
    }

    #[test]
    fn test_pattern_serde_as_string() {
        let pattern: Pattern = serde_json::from_str("\"budget:*\"").unwrap();
        assert!(pattern.matches("budget:kazoo"));
        assert_eq!(serde_json::to_string(&pattern).unwrap(), "\"budget:*\"");
    }

    #[test]
    fn test_any_matches() {
        let patterns = vec!["auth:Get*".to_string(), "auth:UpdatePassword".to_string()];
        assert!(any_matches(&patterns, "auth:GetSubject"));
        assert!(any_matches(&patterns, "auth:UpdatePassword"));
        assert!(!any_matches(&patterns, "auth:Delete"));
        assert!(!any_matches::<String>(&[], "auth:GetSubject"));
    }
}
