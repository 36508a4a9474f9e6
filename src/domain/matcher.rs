//! Whole-word keyword matching
//!
//! Label rules and the global skip list are both expressed as lists of
//! literal keywords. A keyword matches a text iff it occurs as a whole word,
//! case-insensitively, bounded on each side by start/end of string, a space
//! or a parenthesis.

use anyhow::{Context, Result};
use regex::Regex;

/// Compiled matcher over a list of literal keywords
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Option<Regex>,
}

impl KeywordMatcher {
    /// Compiles a keyword list into a matcher
    ///
    /// Keywords are escaped before compilation, so keywords containing
    /// regex metacharacters (`.`, `(`, `+`, ...) match literally. An empty
    /// list compiles to a matcher that never matches.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        let escaped: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref())
            .filter(|k| !k.is_empty())
            .map(regex::escape)
            .collect();

        if escaped.is_empty() {
            return Ok(Self { regex: None });
        }

        let pattern = format!(r"(?i)(^|[ ()])({})($|[ ()])", escaped.join("|"));
        let regex = Regex::new(&pattern)
            .with_context(|| format!("Failed to compile keyword pattern: {}", pattern))?;

        Ok(Self { regex: Some(regex) })
    }

    /// Tests whether any keyword occurs in `text` as a whole word
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|r| r.is_match(text))
    }
}
