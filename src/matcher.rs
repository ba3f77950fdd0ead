/*!
Handing expanded patterns to the `regex` crate.

The environment only produces pattern strings. These helpers are the one
place where those strings are compiled into matchers. Syntax errors in raw
patterns surface here as [`Error::Regex`](crate::Error::Regex).
*/

use regex::Regex;

use crate::{env::Environment, Result};

/// Wrap `pattern` so that it only matches an entire haystack.
pub fn anchored(pattern: &str) -> String {
    format!("^(?:{})$", pattern)
}

impl Environment {
    /// Compile the expanded pattern of `name` into a [`Regex`].
    pub fn regex(&mut self, name: &str) -> Result<Regex> {
        Ok(Regex::new(self.resolve(name)?)?)
    }

    /// Compile the expanded pattern of `name` into a [`Regex`] that only
    /// matches entire haystacks.
    pub fn anchored_regex(&mut self, name: &str) -> Result<Regex> {
        Ok(Regex::new(&anchored(self.resolve(name)?))?)
    }

    /// Returns true if `name` matches somewhere in `haystack`.
    pub fn is_match(&mut self, name: &str, haystack: &str) -> Result<bool> {
        Ok(self.regex(name)?.is_match(haystack))
    }

    /// Returns true if `name` matches all of `haystack`.
    pub fn is_full_match(&mut self, name: &str, haystack: &str) -> Result<bool> {
        Ok(self.anchored_regex(name)?.is_match(haystack))
    }
}
