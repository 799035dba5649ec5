//! Expected-answer lookup.
//!
//! The literals and patterns a server is expected to reply with are not
//! hard-wired into the protocol engine; they are resolved by key through an
//! [`AnswerLookup`] injected at session construction. This keeps localized
//! or server-specific reply text out of the core and lets tests substitute
//! their own table.

use std::collections::HashMap;

/// Lookup for expected server answers, keyed by operation name.
///
/// A `None` return means the key is unmapped; the classifier then uses the
/// key itself verbatim as a literal comparison target, so a misconfigured
/// table degrades to a non-match instead of a crash.
pub trait AnswerLookup: Send + Sync {
    /// Returns the configured answer text for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
}

/// Key for the generic `OK` acknowledgement literal.
pub const ANSWER_OK: &str = "server.answer.ok";
/// Key for the login success pattern.
pub const ANSWER_LOGIN: &str = "server.answer.login";
/// Key for the login failure literal.
pub const ANSWER_LOGIN_FAILED: &str = "server.answer.login.failed";
/// Key for the ACL listing pattern.
pub const ANSWER_ACL: &str = "server.answer.acl";
/// Key for the logout acknowledgement pattern.
pub const ANSWER_LOGOUT: &str = "server.answer.logout";
/// Key for the quota reply marker prefix.
pub const ANSWER_QUOTA: &str = "server.answer.quota";
/// Key for the "mailbox does not exist" reply prefix.
pub const ANSWER_QUOTA_NO_MAILBOX: &str = "server.answer.quota.nomailbox";
/// Key for the "no quota root" reply prefix.
pub const ANSWER_QUOTA_NO_ROOT: &str = "server.answer.quota.noquota";
/// Key for the "unexpected extra arguments" reply prefix.
pub const ANSWER_QUOTA_EXTRA_ARGS: &str = "server.answer.quota.extra";
/// Key for the "mailbox already exists" reply prefix.
pub const ANSWER_CREATE_EXISTS: &str = "server.answer.create.exists";

/// In-memory answer table preloaded with the stock Cyrus reply text.
#[derive(Debug, Clone)]
pub struct Answers {
    entries: HashMap<String, String>,
}

impl Answers {
    /// Creates an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts or replaces an answer, returning self for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl Default for Answers {
    fn default() -> Self {
        Self::empty()
            .with(ANSWER_OK, ". OK Completed")
            .with(ANSWER_LOGIN, r"\. OK .*")
            .with(ANSWER_LOGIN_FAILED, ". NO Login failed.")
            .with(ANSWER_ACL, r"\* ACL .*")
            .with(ANSWER_LOGOUT, r"\* BYE .*")
            .with(ANSWER_QUOTA, "* QUOTA ")
            .with(ANSWER_QUOTA_NO_MAILBOX, ". NO Mailbox does not exist")
            .with(ANSWER_QUOTA_NO_ROOT, ". NO Quota root does not exist")
            .with(ANSWER_QUOTA_EXTRA_ARGS, ". BAD Unexpected extra arguments")
            .with(ANSWER_CREATE_EXISTS, ". NO Mailbox already exists")
    }
}

impl AnswerLookup for Answers {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}
