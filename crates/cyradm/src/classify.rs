//! Reply classification.
//!
//! Server replies are free text; whether a line counts as success, a named
//! failure, or an unexpected answer is decided against expected-answer text
//! resolved by key from the injected [`AnswerLookup`]. Two matching
//! disciplines coexist: exact equality for plain acknowledgements, and
//! whole-line patterns for replies with variable content. Named error
//! replies are recognized by literal prefix.

use std::sync::Arc;

use regex::Regex;

use crate::answers::AnswerLookup;

/// Classifies raw reply lines against configured expected answers.
#[derive(Clone)]
pub struct ResponseClassifier {
    answers: Arc<dyn AnswerLookup>,
}

impl ResponseClassifier {
    /// Creates a classifier backed by the given answer lookup.
    pub fn new(answers: Arc<dyn AnswerLookup>) -> Self {
        Self { answers }
    }

    /// Resolves a key to its configured answer text.
    ///
    /// An unmapped key resolves to the key itself, so misconfiguration
    /// degrades to a literal non-match rather than a crash.
    #[must_use]
    pub fn resolve(&self, key: &str) -> String {
        self.answers.get(key).unwrap_or_else(|| key.to_string())
    }

    /// Exact-equality match against the answer configured for `key`.
    #[must_use]
    pub fn matches_literal(&self, line: &str, key: &str) -> bool {
        line == self.resolve(key)
    }

    /// Whole-line pattern match against the answer configured for `key`.
    ///
    /// Invalid pattern text degrades to a literal comparison.
    #[must_use]
    pub fn matches_pattern(&self, line: &str, key: &str) -> bool {
        let expected = self.resolve(key);
        match Regex::new(&format!("^(?:{expected})$")) {
            Ok(re) => re.is_match(line),
            Err(_) => line == expected,
        }
    }

    /// Literal-prefix match against the answer configured for `key`.
    #[must_use]
    pub fn has_prefix(&self, line: &str, key: &str) -> bool {
        line.starts_with(&self.resolve(key))
    }

    /// Matches the generic acknowledgement prefix: the tag and status
    /// tokens of the configured OK literal (`. OK` for the stock table).
    #[must_use]
    pub fn has_ok_prefix(&self, line: &str) -> bool {
        let ok = self.resolve(crate::answers::ANSWER_OK);
        let prefix: Vec<&str> = ok.split_whitespace().take(2).collect();
        line.starts_with(&prefix.join(" "))
    }
}

impl std::fmt::Debug for ResponseClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseClassifier").finish_non_exhaustive()
    }
}
